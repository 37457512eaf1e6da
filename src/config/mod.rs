// Configuration loading and the shared request-handling state.

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{Config, FilesConfig, LoggingConfig, ServerConfig};

impl Config {
    /// Load configuration from the default "config.toml" next to the
    /// working directory, overlaid with `SERVEDIR__*` environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load from a named file (extension left to the `config` crate),
    /// plus environment overrides and built-in defaults.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVEDIR").separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("files.index_files", vec!["index.html", "index.htm"])?
            .set_default("logging.access_log", false)?
            .set_default("logging.access_log_format", "common")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
