//! Access log line rendering.
//!
//! A finished request is captured as an [`AccessLogEntry`] and rendered
//! in one of three named formats: `common` (Common Log Format),
//! `combined` (CLF plus referer and user agent) and `json`.
//! Unrecognized names render as `common`.

use chrono::{DateTime, Local};

/// Everything about one request/response pair that the access log needs.
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    /// Taken when the request arrives, not when the line is written.
    pub time: DateTime<Local>,
    pub method: String,
    pub path: String,
    /// Query string without the leading `?`.
    pub query: Option<String>,
    /// `1.0`, `1.1` or `2`.
    pub http_version: String,
    pub status: u16,
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Wall-clock handling time in microseconds.
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Start an entry for a request that just arrived. Response fields
    /// keep placeholder values until the handler fills them in.
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            method,
            path,
            time: Local::now(),
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Render the entry in the named format.
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.format_combined(),
            "json" => self.format_json(),
            _ => self.format_common(),
        }
    }

    /// Common Log Format:
    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    /// Combined appends quoted referer and user agent to the common line.
    fn format_combined(&self) -> String {
        format!(
            "{} \"{}\" \"{}\"",
            self.format_common(),
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    /// One JSON object per line, field names matching the struct.
    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// The quoted request line, query string included.
    fn request_line(&self) -> String {
        let query = self
            .query
            .as_deref()
            .map_or_else(String::new, |q| format!("?{q}"));
        format!(
            "{} {}{} HTTP/{}",
            self.method, self.path, query, self.http_version
        )
    }
}
