//! Builders for the response shapes the file handler produces,
//! decoupled from path resolution and filesystem access.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::logger;

/// Build a 200 response carrying file content.
///
/// `HEAD` requests get the same headers with an empty body; `Content-Length`
/// still reports the file size.
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    last_modified: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", data.len())
        .header("ETag", etag);
    if let Some(date) = last_modified {
        builder = builder.header("Last-Modified", date);
    }
    let body = if is_head { Bytes::new() } else { data };
    builder.body(Full::new(body)).unwrap_or_else(|err| {
        log_build_error(200, &err);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build a 200 response with generated HTML content.
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let bytes = Bytes::from(content);
    let builder = Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", bytes.len());
    let body = if is_head { Bytes::new() } else { bytes };
    builder.body(Full::new(body)).unwrap_or_else(|err| {
        log_build_error(200, &err);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build a 301 redirect to `location`.
pub fn build_redirect_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(301)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|err| {
            log_build_error(301, &err);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a 304 Not Modified response.
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|err| {
            log_build_error(304, &err);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a 400 Bad Request response.
pub fn build_400_response() -> Response<Full<Bytes>> {
    build_plain_response(400, "400 Bad Request")
}

/// Build a 403 Forbidden response.
pub fn build_403_response() -> Response<Full<Bytes>> {
    build_plain_response(403, "403 Forbidden")
}

/// Build a 404 Not Found response.
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_plain_response(404, "404 Not Found")
}

/// Build a 405 Method Not Allowed response advertising the supported methods.
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Allow", "GET, HEAD")
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|err| {
            log_build_error(405, &err);
            Response::new(Full::new(Bytes::new()))
        })
}

fn build_plain_response(status: u16, message: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(message)))
        .unwrap_or_else(|err| {
            log_build_error(status, &err);
            Response::new(Full::new(Bytes::new()))
        })
}

fn log_build_error(status: u16, err: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {status} response: {err}"));
}
