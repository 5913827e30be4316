// Configuration module entry point
// Loads settings from config.toml and DEVSERVE_* environment variables

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig};

impl Config {
    /// Load configuration from the default "config.toml" location
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; environment variables with the `DEVSERVE`
    /// prefix override it. Nesting uses a double underscore so that
    /// multi-word keys stay addressable: `DEVSERVE_SERVER__PORT=9000`,
    /// `DEVSERVE_PERFORMANCE__SHUTDOWN_GRACE=10`.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DEVSERVE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.root", ".")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.format", "common")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_grace", 5)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let cfg = Config::load_from("no-such-config-file").unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.root, ".");
        assert_eq!(
            cfg.server.index_files,
            vec!["index.html".to_string(), "index.htm".to_string()]
        );
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.format, "common");
        assert_eq!(cfg.performance.shutdown_grace, 5);
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::load_from("no-such-config-file").unwrap();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 8123;
        let addr = cfg.get_socket_addr().unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:8123");
    }

    #[test]
    fn test_env_overrides_single_and_multi_word_keys() {
        // Keys deliberately distinct from the ones asserted in
        // test_defaults_without_config_file; tests run in parallel and
        // environment variables are process-wide.
        std::env::set_var("DEVSERVE_LOGGING__LEVEL", "debug");
        std::env::set_var("DEVSERVE_PERFORMANCE__KEEP_ALIVE_TIMEOUT", "120");
        std::env::set_var("DEVSERVE_PERFORMANCE__READ_TIMEOUT", "42");

        let cfg = Config::load_from("no-such-config-file").unwrap();

        std::env::remove_var("DEVSERVE_LOGGING__LEVEL");
        std::env::remove_var("DEVSERVE_PERFORMANCE__KEEP_ALIVE_TIMEOUT");
        std::env::remove_var("DEVSERVE_PERFORMANCE__READ_TIMEOUT");

        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.performance.keep_alive_timeout, 120);
        assert_eq!(cfg.performance.read_timeout, 42);
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let mut cfg = Config::load_from("no-such-config-file").unwrap();
        cfg.server.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
