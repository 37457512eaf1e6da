// Application state module
// Holds the configuration and resolved serving root shared by all handlers

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use super::types::Config;

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Canonicalized serving root, the containment boundary for every
    /// filesystem access
    pub root: PathBuf,
}

impl AppState {
    /// Create `AppState` with the serving root resolved and validated.
    ///
    /// Fails when the root does not exist, is not a directory or cannot be
    /// read, so misconfiguration surfaces at startup instead of as a 404 on
    /// every request.
    pub fn new(config: Config) -> io::Result<Self> {
        let root = resolve_root(&config)?;
        Ok(Self { config, root })
    }
}

fn resolve_root(config: &Config) -> io::Result<PathBuf> {
    let configured = match &config.files.root {
        Some(root) => root.clone(),
        None => executable_dir()?,
    };
    let root = configured.canonicalize().map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("cannot resolve root directory '{}': {err}", configured.display()),
        )
    })?;
    if let Err(err) = fs::read_dir(&root) {
        return Err(io::Error::new(
            err.kind(),
            format!("root directory '{}' is not readable: {err}", root.display()),
        ));
    }
    Ok(root)
}

fn executable_dir() -> io::Result<PathBuf> {
    let exe = env::current_exe()?;
    exe.parent().map(PathBuf::from).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "executable path has no parent directory",
        )
    })
}
