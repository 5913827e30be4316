//! Directory listing generation
//!
//! When a request maps to a directory with no index file, the server
//! answers with an HTML page hyperlinking every entry. Directories are
//! shown with a trailing slash so relative links keep working.

use crate::http::url;
use std::fmt::Write;
use std::io;
use std::path::Path;
use tokio::fs;

/// Render the listing page for `dir`, displayed under `request_path`.
///
/// Entries are sorted by name. Hyperlink targets are percent-encoded;
/// display text is HTML-escaped.
pub async fn render(dir: &Path, request_path: &str) -> io::Result<String> {
    let mut names: Vec<String> = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if let Ok(file_type) = entry.file_type().await {
            if file_type.is_dir() {
                name.push('/');
            }
        }
        names.push(name);
    }
    names.sort();

    let title = format!("Directory listing for {request_path}");
    let escaped_title = html_escape(&title);

    let mut page = String::new();
    page.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = write!(
        page,
        "<title>{escaped_title}</title>\n</head>\n<body>\n<h1>{escaped_title}</h1>\n<hr>\n<ul>\n"
    );
    for name in &names {
        let _ = writeln!(
            page,
            "<li><a href=\"{}\">{}</a></li>",
            url::percent_encode_segment(name),
            html_escape(name)
        );
    }
    page.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(page)
}

/// Escape text for inclusion in HTML.
pub fn html_escape(text: &str) -> String {
    // '&' must be replaced first
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
