//! Directory listing generation.
//!
//! Renders a directory as an HTML page of links. Entry names are
//! HTML-escaped for display and percent-encoded for the href so odd file
//! names cannot break the page or the links.

use std::io;
use std::path::Path;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use crate::handler::router::RequestContext;
use crate::http::response;
use crate::logger;

struct ListingEntry {
    name: String,
    is_dir: bool,
    is_symlink: bool,
}

/// Serve an HTML listing of `dir`.
pub async fn serve_directory_listing(
    ctx: &RequestContext<'_>,
    dir: &Path,
) -> Response<Full<Bytes>> {
    match collect_entries(dir).await {
        Ok(entries) => {
            let page = render_page(&ctx.decoded_path, &entries);
            response::build_html_response(page, ctx.is_head)
        }
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            logger::log_warning(&format!("Permission denied listing '{}'", dir.display()));
            response::build_403_response()
        }
        Err(err) => {
            logger::log_error(&format!("Failed to list '{}': {err}", dir.display()));
            response::build_404_response()
        }
    }
}

/// Read directory entries sorted case-insensitively by name.
///
/// Entries whose names are not valid UTF-8 are skipped. For symlinks,
/// `is_dir` reflects the link target so links to directories still get a
/// trailing slash in their href.
async fn collect_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        let Some(name) = entry.file_name().to_str().map(ToString::to_string) else {
            continue;
        };
        let file_type = entry.file_type().await?;
        let is_symlink = file_type.is_symlink();
        let is_dir = if is_symlink {
            fs::metadata(entry.path())
                .await
                .is_ok_and(|meta| meta.is_dir())
        } else {
            file_type.is_dir()
        };
        entries.push(ListingEntry {
            name,
            is_dir,
            is_symlink,
        });
    }
    entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(entries)
}

/// Render the listing page for `display_path`.
///
/// Directories get a trailing `/` on both the link and the displayed name;
/// symlinks display with a trailing `@` while their href still points at
/// the target name.
fn render_page(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut page = String::new();
    page.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str(&format!(
        "<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    ));
    for entry in entries {
        let mut href = urlencoding::encode(&entry.name).into_owned();
        if entry.is_dir {
            href.push('/');
        }
        let display = if entry.is_symlink {
            format!("{}@", escape_html(&entry.name))
        } else if entry.is_dir {
            format!("{}/", escape_html(&entry.name))
        } else {
            escape_html(&entry.name)
        };
        page.push_str(&format!("<li><a href=\"{href}\">{display}</a></li>\n"));
    }
    page.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    page
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
