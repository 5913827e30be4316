//! Static file serving module
//!
//! Resolves request paths against the document root and loads file
//! contents, with traversal confinement and index file support.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, mime, url};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Outcome of mapping a request path onto the document root
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    /// Serve this file's bytes
    File(PathBuf),
    /// Directory with no index file: render a listing
    Listing(PathBuf),
    /// Directory requested without a trailing slash; redirect so
    /// relative links inside it resolve correctly
    Redirect(String),
    NotFound,
}

/// Serve a GET or HEAD request.
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let resolved = resolve(
        &state.document_root,
        ctx.path,
        &state.config.server.index_files,
    )
    .await;

    match resolved {
        Resolved::File(path) => serve_file(ctx, &path).await,
        Resolved::Listing(dir) => serve_listing(ctx, &dir).await,
        Resolved::Redirect(location) => http::build_redirect_response(&location, ctx.is_head),
        Resolved::NotFound => http::build_404_response(),
    }
}

/// Map a raw (still percent-encoded) request path onto the document root.
///
/// `..` segments are collapsed lexically and can never climb above the
/// root; the canonicalized result is then checked against the root
/// prefix, which also blocks escapes through symlinks. Anything outside
/// the root resolves to `NotFound`, never to the escaped file.
pub async fn resolve(root: &Path, raw_path: &str, index_files: &[String]) -> Resolved {
    let decoded = url::percent_decode(raw_path);
    if decoded.contains('\0') {
        return Resolved::NotFound;
    }

    let relative = decoded.trim_start_matches('/');
    let mut candidate = root.to_path_buf();
    let mut depth = 0usize;
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => {
                candidate.push(part);
                depth += 1;
            }
            Component::ParentDir => {
                if depth > 0 {
                    candidate.pop();
                    depth -= 1;
                }
            }
            _ => {}
        }
    }

    let canonical = match fs::canonicalize(&candidate).await {
        Ok(path) => path,
        Err(_) => return Resolved::NotFound,
    };
    if !canonical.starts_with(root) {
        logger::log_warning(&format!("Path traversal attempt blocked: {raw_path}"));
        return Resolved::NotFound;
    }

    let metadata = match fs::metadata(&canonical).await {
        Ok(m) => m,
        Err(_) => return Resolved::NotFound,
    };

    if metadata.is_dir() {
        if !decoded.ends_with('/') {
            return Resolved::Redirect(format!("{raw_path}/"));
        }
        for index in index_files {
            let index_path = canonical.join(index);
            if fs::metadata(&index_path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false)
            {
                return Resolved::File(index_path);
            }
        }
        return Resolved::Listing(canonical);
    }

    Resolved::File(canonical)
}

/// Load a file and build the 200 response (body omitted for HEAD).
async fn serve_file(ctx: &RequestContext<'_>, path: &Path) -> Response<Full<Bytes>> {
    match fs::read(path).await {
        Ok(content) => {
            let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
            http::build_file_response(Bytes::from(content), content_type, ctx.is_head)
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            logger::log_warning(&format!("Permission denied reading '{}'", path.display()));
            http::build_403_response()
        }
        // The file can disappear between resolution and read
        Err(e) if e.kind() == io::ErrorKind::NotFound => http::build_404_response(),
        Err(e) => {
            logger::log_error(&format!("Failed to read '{}': {e}", path.display()));
            http::build_500_response()
        }
    }
}

/// Render a directory listing response.
async fn serve_listing(ctx: &RequestContext<'_>, dir: &Path) -> Response<Full<Bytes>> {
    let display_path = url::percent_decode(ctx.path);
    match listing::render(dir, &display_path).await {
        Ok(page) => http::build_html_response(page, ctx.is_head),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            logger::log_warning(&format!("Permission denied listing '{}'", dir.display()));
            http::build_403_response()
        }
        Err(e) => {
            logger::log_error(&format!("Failed to list '{}': {e}", dir.display()));
            http::build_500_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string(), "index.htm".to_string()]
    }

    fn test_root(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("devserve-static-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir.canonicalize().unwrap()
    }

    #[tokio::test]
    async fn test_resolve_regular_file() {
        let root = test_root("file");
        std::fs::write(root.join("hello.txt"), "hi").unwrap();

        let resolved = resolve(&root, "/hello.txt", &index_files()).await;
        assert_eq!(resolved, Resolved::File(root.join("hello.txt")));
    }

    #[tokio::test]
    async fn test_resolve_missing_file() {
        let root = test_root("missing");
        let resolved = resolve(&root, "/missing.txt", &index_files()).await;
        assert_eq!(resolved, Resolved::NotFound);
    }

    #[tokio::test]
    async fn test_resolve_percent_encoded_name() {
        let root = test_root("encoded");
        std::fs::write(root.join("my file.txt"), "hi").unwrap();

        let resolved = resolve(&root, "/my%20file.txt", &index_files()).await;
        assert_eq!(resolved, Resolved::File(root.join("my file.txt")));
    }

    #[tokio::test]
    async fn test_resolve_root_with_index() {
        let root = test_root("index");
        std::fs::write(root.join("index.html"), "<h1>Hi</h1>").unwrap();

        let resolved = resolve(&root, "/", &index_files()).await;
        assert_eq!(resolved, Resolved::File(root.join("index.html")));
    }

    #[tokio::test]
    async fn test_resolve_directory_without_index_lists() {
        let root = test_root("listing");
        std::fs::create_dir(root.join("sub")).unwrap();
        std::fs::write(root.join("sub").join("a.txt"), "a").unwrap();

        let resolved = resolve(&root, "/sub/", &index_files()).await;
        assert_eq!(resolved, Resolved::Listing(root.join("sub")));
    }

    #[tokio::test]
    async fn test_resolve_directory_without_slash_redirects() {
        let root = test_root("redirect");
        std::fs::create_dir(root.join("sub")).unwrap();

        let resolved = resolve(&root, "/sub", &index_files()).await;
        assert_eq!(resolved, Resolved::Redirect("/sub/".to_string()));
    }

    #[tokio::test]
    async fn test_traversal_stays_inside_root() {
        let root = test_root("traversal");
        // A file next to the root that traversal must never reach
        let outside = root.parent().unwrap().join("devserve-outside.txt");
        std::fs::write(&outside, "secret").unwrap();

        let resolved = resolve(&root, "/../devserve-outside.txt", &index_files()).await;
        assert_eq!(resolved, Resolved::NotFound);

        let resolved = resolve(&root, "/%2e%2e/devserve-outside.txt", &index_files()).await;
        assert_eq!(resolved, Resolved::NotFound);

        let resolved = resolve(&root, "/a/../../devserve-outside.txt", &index_files()).await;
        assert_eq!(resolved, Resolved::NotFound);

        let _ = std::fs::remove_file(outside);
    }

    #[tokio::test]
    async fn test_traversal_back_into_root_is_allowed() {
        let root = test_root("reenter");
        std::fs::create_dir(root.join("sub")).unwrap();
        std::fs::write(root.join("top.txt"), "top").unwrap();

        let resolved = resolve(&root, "/sub/../top.txt", &index_files()).await;
        assert_eq!(resolved, Resolved::File(root.join("top.txt")));
    }

    #[tokio::test]
    async fn test_nul_byte_rejected() {
        let root = test_root("nul");
        let resolved = resolve(&root, "/a%00b", &index_files()).await;
        assert_eq!(resolved, Resolved::NotFound);
    }
}
