//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, static
//! file dispatch, CORS decoration, and access logging. Every response
//! that leaves this module carries the CORS header set.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, cors};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) request path
    pub path: &'a str,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling
///
/// Per-request errors are fully contained here and reported as status
/// codes; the service error type is `Infallible` so a failing request
/// can never take down the connection task, let alone the process.
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = format!("{:?}", req.version());
    let referer = header_string(&req, "referer");
    let user_agent = header_string(&req, "user-agent");

    let ctx = RequestContext {
        path: uri.path(),
        is_head: method == Method::HEAD,
    };
    let response = respond(&method, &ctx, &state).await;

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            uri.path().to_string(),
        );
        entry.query = uri.query().map(ToString::to_string);
        entry.http_version = version
            .strip_prefix("HTTP/")
            .unwrap_or(&version)
            .to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.referer = referer;
        entry.user_agent = user_agent;
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.format);
    }

    Ok(response)
}

/// Build the full response for a request: dispatch, then CORS decoration.
pub(crate) async fn respond(
    method: &Method,
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Response<Full<Bytes>> {
    cors::apply(dispatch(method, ctx, state).await)
}

/// Dispatch by method
async fn dispatch(
    method: &Method,
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Response<Full<Bytes>> {
    match method {
        &Method::GET | &Method::HEAD => static_files::serve(ctx, state).await,
        // Preflight: 204 regardless of whether the path exists
        &Method::OPTIONS => http::build_options_response(),
        _ => {
            logger::log_warning(&format!("Unsupported method: {method}"));
            http::build_501_response()
        }
    }
}

fn header_string(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}
