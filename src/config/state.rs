// Application state module
// Holds the loaded configuration and the canonical document root

use std::io;
use std::path::{Path, PathBuf};

use super::types::Config;

/// Shared application state
///
/// The document root is canonicalized once at startup; path traversal
/// checks compare resolved request paths against this prefix.
pub struct AppState {
    pub config: Config,
    pub document_root: PathBuf,
}

impl AppState {
    /// Create `AppState`, resolving the configured document root.
    ///
    /// Fails if the root does not exist or cannot be canonicalized,
    /// which is a fatal startup error.
    pub fn new(config: &Config) -> io::Result<Self> {
        let document_root = Path::new(&config.server.root).canonicalize()?;
        Ok(Self {
            config: config.clone(),
            document_root,
        })
    }
}
