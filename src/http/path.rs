//! Request path decoding and normalization.
//!
//! Turns the raw URL path of a request into a filesystem path relative to
//! the serving root, rejecting anything that cannot be decoded or that would
//! climb out of the root.

use std::path::{Component, Path, PathBuf};

/// Percent-decode a raw request path.
///
/// Returns `None` when the decoded bytes are not valid UTF-8 or contain a
/// NUL byte; the caller answers with `400 Bad Request`.
pub fn decode(raw: &str) -> Option<String> {
    let decoded = urlencoding::decode(raw).ok()?;
    if decoded.contains('\0') {
        return None;
    }
    Some(decoded.into_owned())
}

/// Resolve a decoded request path into a path relative to the serving root.
///
/// `.` segments are dropped and `..` segments pop the previous one, so
/// `/a/../b` maps to `b`. Returns `None` as soon as a `..` would climb above
/// the root, whether or not the target exists; the caller answers with
/// `403 Forbidden`.
pub fn resolve(decoded: &str) -> Option<PathBuf> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(decoded.trim_start_matches('/')).components() {
        match component {
            Component::Normal(segment) => parts.push(segment),
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return None;
                }
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    Some(parts.into_iter().collect())
}
