//! Request dispatch module
//!
//! Entry point for HTTP request processing, responsible for method
//! validation, path decoding and access logging around the file handler.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Per-request data the file handler works from, extracted once up front.
pub struct RequestContext<'a> {
    /// Path exactly as it appeared on the request line
    pub raw_path: &'a str,
    /// Percent-decoded path
    pub decoded_path: String,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
}

/// Service entry point: one call per request on an accepted connection.
///
/// Generic over the body type because the server never reads request
/// bodies; tests drive it with `Request<()>`.
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let mut entry = state
        .config
        .logging
        .access_log
        .then(|| access_entry(&req, peer_addr));

    let response = dispatch(&req, &state).await;

    if let Some(entry) = entry.as_mut() {
        entry.status = response.status().as_u16();
        entry.body_bytes = body_len(&response);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn dispatch<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    let method = req.method();
    let uri = req.uri();
    let raw_path = uri.path();

    if let Some(response) = check_http_method(method) {
        return response;
    }

    let Some(decoded_path) = http::path::decode(raw_path) else {
        logger::log_warning(&format!("Malformed request path: {raw_path}"));
        return http::build_400_response();
    };

    let ctx = RequestContext {
        raw_path,
        decoded_path,
        query: uri.query(),
        is_head: *method == Method::HEAD,
        if_none_match: header_value(req, "if-none-match"),
        if_modified_since: header_value(req, "if-modified-since"),
    };

    static_files::serve(&ctx, state).await
}

/// Check HTTP method and return a 405 for anything but GET/HEAD
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn header_value<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format_version(req.version());
    entry.referer = header_value(req, "referer");
    entry.user_agent = header_value(req, "user-agent");
    entry
}

fn format_version(version: hyper::Version) -> String {
    let debug = format!("{version:?}");
    debug.strip_prefix("HTTP/").unwrap_or(&debug).to_string()
}

fn body_len(response: &Response<Full<Bytes>>) -> usize {
    usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(usize::MAX)
}
