//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from
//! path resolution and file loading: MIME detection, URL
//! encoding/decoding, CORS decoration, and response builders.

pub mod cors;
pub mod mime;
pub mod response;
pub mod url;

// Re-export commonly used builders
pub use response::{
    build_403_response, build_404_response, build_500_response, build_501_response,
    build_file_response, build_html_response, build_options_response, build_redirect_response,
};
