//! Conditional request support.
//!
//! Provides `ETag` generation and the `If-None-Match` / `If-Modified-Since`
//! checks behind `304 Not Modified` responses.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

/// Generate an `ETag` for file content using fast hashing.
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Check whether an `If-None-Match` header matches the current `ETag`.
///
/// The header may carry a comma-separated list of tags; `*` or any
/// member equal to the current tag counts as a match.
pub fn check_etag_match(if_none_match: Option<&str>, current_etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header
            .split(',')
            .map(str::trim)
            .any(|tag| tag == "*" || tag == current_etag)
    })
}

/// Format a timestamp as an HTTP date for the `Last-Modified` header.
pub fn format_http_date(time: SystemTime) -> String {
    let datetime: DateTime<Utc> = time.into();
    datetime.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Check whether an `If-Modified-Since` header covers the file's mtime.
///
/// Comparison happens at second granularity since HTTP dates carry no
/// sub-second precision. Unparseable headers are ignored.
pub fn check_modified_since(if_modified_since: Option<&str>, modified: Option<SystemTime>) -> bool {
    let (Some(header), Some(modified)) = (if_modified_since, modified) else {
        return false;
    };
    let Ok(since) = DateTime::parse_from_rfc2822(header) else {
        return false;
    };
    let mtime: DateTime<Utc> = modified.into();
    mtime.timestamp() <= since.timestamp()
}
