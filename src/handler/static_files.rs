//! Static file serving module
//!
//! Resolves request paths against the serving root and builds file,
//! redirect, listing and conditional responses.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, path};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::Path;
use tokio::fs;

/// Serve the request target from the configured root.
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let Some(relative) = path::resolve(&ctx.decoded_path) else {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {}",
            ctx.raw_path
        ));
        return http::build_403_response();
    };
    serve_resolved(ctx, state, &state.root.join(relative)).await
}

async fn serve_resolved(
    ctx: &RequestContext<'_>,
    state: &AppState,
    target: &Path,
) -> Response<Full<Bytes>> {
    let metadata = match fs::metadata(target).await {
        Ok(metadata) => metadata,
        Err(err) => return read_error_response(&err, target),
    };
    if metadata.is_dir() {
        serve_directory(ctx, state, target).await
    } else if metadata.is_file() {
        // A trailing slash promises a directory; a file is not a match.
        if ctx.decoded_path.ends_with('/') {
            return http::build_404_response();
        }
        serve_file(ctx, state, target).await
    } else {
        // Sockets, FIFOs and other special files are not served.
        http::build_404_response()
    }
}

/// Serve a directory: redirect to the slash form, then try index files,
/// then fall back to a generated listing.
async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
) -> Response<Full<Bytes>> {
    if !ctx.decoded_path.ends_with('/') {
        return http::build_redirect_response(&redirect_location(ctx.raw_path, ctx.query));
    }

    let canonical = match fs::canonicalize(dir).await {
        Ok(canonical) => canonical,
        Err(err) => return read_error_response(&err, dir),
    };
    if !canonical.starts_with(&state.root) {
        logger::log_warning(&format!(
            "Symlinked directory escapes the root: {} -> {}",
            dir.display(),
            canonical.display()
        ));
        return http::build_403_response();
    }

    for index_file in &state.config.files.index_files {
        let candidate = canonical.join(index_file);
        if fs::metadata(&candidate).await.is_ok_and(|meta| meta.is_file()) {
            return serve_file(ctx, state, &candidate).await;
        }
    }

    listing::serve_directory_listing(ctx, &canonical).await
}

/// Serve a regular file, honoring conditional request headers.
async fn serve_file(
    ctx: &RequestContext<'_>,
    state: &AppState,
    file_path: &Path,
) -> Response<Full<Bytes>> {
    let canonical = match fs::canonicalize(file_path).await {
        Ok(canonical) => canonical,
        Err(err) => return read_error_response(&err, file_path),
    };
    if !canonical.starts_with(&state.root) {
        logger::log_warning(&format!(
            "Symlinked file escapes the root: {} -> {}",
            file_path.display(),
            canonical.display()
        ));
        return http::build_403_response();
    }

    let metadata = match fs::metadata(&canonical).await {
        Ok(metadata) => metadata,
        Err(err) => return read_error_response(&err, &canonical),
    };
    let content = match fs::read(&canonical).await {
        Ok(content) => content,
        Err(err) => return read_error_response(&err, &canonical),
    };

    let etag = cache::generate_etag(&content);
    let modified = metadata.modified().ok();

    // If-None-Match takes precedence over If-Modified-Since when both are
    // present.
    if ctx.if_none_match.is_some() {
        if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
            return http::build_304_response(&etag);
        }
    } else if cache::check_modified_since(ctx.if_modified_since.as_deref(), modified) {
        return http::build_304_response(&etag);
    }

    let extension = canonical
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);
    let content_type = mime::content_type_for(extension.as_deref());
    let last_modified = modified.map(cache::format_http_date);

    http::build_file_response(
        Bytes::from(content),
        content_type,
        &etag,
        last_modified.as_deref(),
        ctx.is_head,
    )
}

/// Location for the trailing-slash redirect, preserving the query string.
fn redirect_location(raw_path: &str, query: Option<&str>) -> String {
    match query {
        Some(query) => format!("{raw_path}/?{query}"),
        None => format!("{raw_path}/"),
    }
}

/// Map a filesystem error to a response.
///
/// Missing files are ordinary traffic and stay unlogged; a path that
/// runs through a regular file counts as missing.
fn read_error_response(err: &io::Error, target: &Path) -> Response<Full<Bytes>> {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => http::build_404_response(),
        io::ErrorKind::PermissionDenied => {
            logger::log_warning(&format!("Permission denied: {}", target.display()));
            http::build_403_response()
        }
        _ => {
            logger::log_error(&format!("Failed to read '{}': {err}", target.display()));
            http::build_404_response()
        }
    }
}
