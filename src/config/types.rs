// Deserialization targets for the layered configuration sources.

use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration, one struct per section.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub files: FilesConfig,
    pub logging: LoggingConfig,
}

/// Listening address and runtime sizing.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads; `None` leaves the runtime default.
    pub workers: Option<usize>,
}

/// What gets served and how directories resolve.
#[derive(Debug, Deserialize, Clone)]
pub struct FilesConfig {
    /// Serving root; falls back to the executable's directory.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Names tried in order when a directory is requested.
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Emit one line per finished request.
    pub access_log: bool,
    /// `common`, `combined` or `json`.
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Append access lines here instead of stdout.
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Append errors and warnings here instead of stderr.
    #[serde(default)]
    pub error_log_file: Option<String>,
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

fn default_access_log_format() -> String {
    "common".to_string()
}
