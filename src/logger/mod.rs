//! Server-side logging.
//!
//! Free functions cover lifecycle messages (startup banner, bind
//! failures, shutdown) and per-request access lines. Output goes through
//! [`writer`] once it is installed; before that, messages fall back to
//! the console so early failures are still visible.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::{IpAddr, SocketAddr};

/// Install the global writer from the logging section of the config.
pub fn init(config: &Config) -> std::io::Result<()> {
    let logging = &config.logging;
    writer::init(
        logging.access_log_file.as_deref(),
        logging.error_log_file.as_deref(),
    )
}

fn write_info(message: &str) {
    if let Some(w) = writer::try_get() {
        w.write_info(message);
    } else {
        println!("{message}");
    }
}

fn write_error(message: &str) {
    if let Some(w) = writer::try_get() {
        w.write_error(message);
    } else {
        eprintln!("{message}");
    }
}

fn write_access(message: &str) {
    if let Some(w) = writer::try_get() {
        w.write_access(message);
    } else {
        println!("{message}");
    }
}

/// Announce the listening address once the socket is bound.
pub fn log_server_start(addr: &SocketAddr) {
    write_info(&format!(
        "Serving at http://{}:{}",
        banner_host(addr),
        addr.port()
    ));
}

/// Host portion of the startup banner.
///
/// Wildcard and loopback binds are announced as `localhost` so the printed
/// URL is directly usable in a local browser.
fn banner_host(addr: &SocketAddr) -> String {
    let ip = addr.ip();
    if ip.is_unspecified() || ip.is_loopback() {
        return "localhost".to_string();
    }
    match ip {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => format!("[{v6}]"),
    }
}

pub fn log_shutdown(reason: &str) {
    write_info(&format!("Received {reason}, shutting down"));
}

pub fn log_bind_failed(addr: &SocketAddr, err: &std::io::Error) {
    write_error(&format!("[ERROR] Failed to bind {addr}: {err}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Render and write one finished request.
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}
