//! MIME type inference.
//!
//! Maps file extensions to a Content-Type; everything unknown falls back to
//! `application/octet-stream`.

/// Content-Type for a file extension.
///
/// # Examples
/// ```
/// use servedir::http::mime::content_type_for;
/// assert_eq!(content_type_for(Some("html")), "text/html; charset=utf-8");
/// assert_eq!(content_type_for(Some("png")), "image/png");
/// assert_eq!(content_type_for(None), "application/octet-stream");
/// ```
pub fn content_type_for(extension: Option<&str>) -> &'static str {
    let Some(extension) = extension else {
        return "application/octet-stream";
    };
    match extension {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "txt" | "md" => "text/plain; charset=utf-8",
        "csv" => "text/csv",
        "xml" => "application/xml",

        // Scripts
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "bmp" => "image/bmp",

        // Audio and video
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "ogg" | "ogv" => "video/ogg",
        "avi" => "video/x-msvideo",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Archives and documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "tar" => "application/x-tar",

        _ => "application/octet-stream",
    }
}
