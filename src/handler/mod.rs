//! Request handler module
//!
//! Responsible for method dispatch and static file serving: the only
//! business logic this server has.

pub mod listing;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
