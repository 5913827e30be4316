//! Cross-origin response decoration
//!
//! Every response the handler produces, success or error, carries the
//! permissive development-mode CORS header set. This is what lets a
//! browser-hosted front-end on another origin fetch assets from this
//! server. The 204 preflight response itself is built in
//! `http::response`; the headers are appended here so the contract
//! holds uniformly.

use hyper::header::HeaderValue;
use hyper::Response;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

/// Append the CORS header set to a response.
pub fn apply<B>(mut response: Response<B>) -> Response<B> {
    let headers = response.headers_mut();
    headers.insert(
        "Access-Control-Allow-Origin",
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    response
}
