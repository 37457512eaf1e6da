//! End-to-end tests driving the request handler against real directories.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, Response, StatusCode};

use servedir::config::{AppState, Config, FilesConfig, LoggingConfig, ServerConfig};
use servedir::handler;
use servedir::http::cache;

fn state_for(root: &Path) -> Arc<AppState> {
    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            workers: None,
        },
        files: FilesConfig {
            root: Some(root.to_path_buf()),
            index_files: vec!["index.html".to_string(), "index.htm".to_string()],
        },
        logging: LoggingConfig {
            access_log: false,
            access_log_format: "common".to_string(),
            access_log_file: None,
            error_log_file: None,
        },
    };
    Arc::new(AppState::new(config).unwrap())
}

fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

async fn send(state: &Arc<AppState>, method: Method, target: &str) -> Response<Full<Bytes>> {
    let req = Request::builder()
        .method(method)
        .uri(target)
        .body(())
        .unwrap();
    handler::handle_request(req, peer(), Arc::clone(state))
        .await
        .unwrap()
}

async fn send_with_header(
    state: &Arc<AppState>,
    method: Method,
    target: &str,
    name: &str,
    value: &str,
) -> Response<Full<Bytes>> {
    let req = Request::builder()
        .method(method)
        .uri(target)
        .header(name, value)
        .body(())
        .unwrap();
    handler::handle_request(req, peer(), Arc::clone(state))
        .await
        .unwrap()
}

fn header(response: &Response<Full<Bytes>>, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}

async fn body_bytes(response: Response<Full<Bytes>>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn body_string(response: Response<Full<Bytes>>) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

#[tokio::test]
async fn serves_file_with_headers() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("index.html"), "<h1>hi</h1>").unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/index.html").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "content-type").as_deref(),
        Some("text/html; charset=utf-8")
    );
    assert_eq!(header(&response, "content-length").as_deref(), Some("11"));
    assert!(header(&response, "etag").is_some());
    assert!(header(&response, "last-modified").is_some());
    assert_eq!(body_string(response).await, "<h1>hi</h1>");
}

#[tokio::test]
async fn serves_unknown_extension_as_octet_stream() {
    let root = tempfile::tempdir().unwrap();
    let payload = [0_u8, 159, 146, 150, 255];
    std::fs::write(root.path().join("blob.weird"), payload).unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/blob.weird").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "content-type").as_deref(),
        Some("application/octet-stream")
    );
    assert_eq!(body_bytes(response).await.as_ref(), payload);
}

#[tokio::test]
async fn missing_targets_return_404() {
    let root = tempfile::tempdir().unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/missing.txt").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&state, Method::GET, "/no-such-dir/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn file_with_trailing_slash_is_not_found() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("plain.txt"), "text").unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/plain.txt/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn path_through_a_file_is_not_found() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("notes.txt"), "text").unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/notes.txt/deeper").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn parent_traversal_is_forbidden() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("index.html"), "safe").unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/../../etc/passwd").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn encoded_traversal_is_forbidden() {
    let root = tempfile::tempdir().unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/%2e%2e/%2e%2e/etc/passwd").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn traversal_is_forbidden_even_when_target_missing() {
    let root = tempfile::tempdir().unwrap();
    let state = state_for(root.path());

    // The escape is rejected before any filesystem lookup, so this must
    // not degrade into a 404.
    let response = send(&state, Method::GET, "/a/../../nope").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn inner_parent_segments_are_allowed() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir(root.path().join("sub")).unwrap();
    std::fs::write(root.path().join("index.html"), "top").unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/sub/../index.html").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "top");
}

#[tokio::test]
async fn head_matches_get_without_body() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("page.html"), "<p>content</p>").unwrap();
    let state = state_for(root.path());

    let get = send(&state, Method::GET, "/page.html").await;
    let head = send(&state, Method::HEAD, "/page.html").await;

    assert_eq!(head.status(), get.status());
    assert_eq!(header(&head, "content-type"), header(&get, "content-type"));
    assert_eq!(
        header(&head, "content-length"),
        header(&get, "content-length")
    );
    assert_eq!(header(&head, "etag"), header(&get, "etag"));
    assert!(body_bytes(head).await.is_empty());
}

#[tokio::test]
async fn non_get_methods_are_rejected() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("index.html"), "hi").unwrap();
    let state = state_for(root.path());

    for method in [Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS] {
        let response = send(&state, method, "/index.html").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(header(&response, "allow").as_deref(), Some("GET, HEAD"));
    }
}

#[tokio::test]
async fn directory_without_slash_redirects() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir(root.path().join("sub")).unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/sub").await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(header(&response, "location").as_deref(), Some("/sub/"));

    let response = send(&state, Method::GET, "/sub?x=1").await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(header(&response, "location").as_deref(), Some("/sub/?x=1"));
}

#[tokio::test]
async fn directory_listing_renders_sorted_entries() {
    let root = tempfile::tempdir().unwrap();
    let sub = root.path().join("sub");
    std::fs::create_dir(&sub).unwrap();
    std::fs::write(sub.join("b.txt"), "b").unwrap();
    std::fs::write(sub.join("A.txt"), "a").unwrap();
    std::fs::create_dir(sub.join("nested")).unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/sub/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        header(&response, "content-type").as_deref(),
        Some("text/html; charset=utf-8")
    );
    let page = body_string(response).await;
    assert!(page.contains("<title>Directory listing for /sub/</title>"));
    assert!(page.contains("<h1>Directory listing for /sub/</h1>"));
    assert!(page.contains("<li><a href=\"nested/\">nested/</a></li>"));

    // Case-insensitive name ordering
    let a = page.find("A.txt").unwrap();
    let b = page.find("b.txt").unwrap();
    let nested = page.find("nested/").unwrap();
    assert!(a < b && b < nested);
}

#[tokio::test]
async fn root_listing_when_no_index_present() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("readme.txt"), "hello").unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_string(response).await;
    assert!(page.contains("<h1>Directory listing for /</h1>"));
    assert!(page.contains("readme.txt"));
}

#[tokio::test]
async fn directory_with_index_serves_it() {
    let root = tempfile::tempdir().unwrap();
    let sub = root.path().join("sub");
    std::fs::create_dir(&sub).unwrap();
    std::fs::write(sub.join("index.html"), "indexed").unwrap();
    std::fs::write(sub.join("other.txt"), "other").unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/sub/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "indexed");
}

#[tokio::test]
async fn second_index_name_is_tried() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("index.htm"), "fallback index").unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "fallback index");
}

#[tokio::test]
async fn percent_encoded_names_resolve() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("hello world.txt"), "spaced").unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/hello%20world.txt").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "spaced");
}

#[tokio::test]
async fn invalid_percent_encoding_is_bad_request() {
    let root = tempfile::tempdir().unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/%ff").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn query_strings_are_ignored_for_files() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("index.html"), "hi").unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/index.html?version=2").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn matching_etag_returns_304() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("cached.txt"), "cache me").unwrap();
    let state = state_for(root.path());

    let first = send(&state, Method::GET, "/cached.txt").await;
    let etag = header(&first, "etag").unwrap();

    let second = send_with_header(&state, Method::GET, "/cached.txt", "if-none-match", &etag).await;
    assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    assert!(body_bytes(second).await.is_empty());
}

#[tokio::test]
async fn if_none_match_list_matches_any_member() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("cached.txt"), "cache me").unwrap();
    let state = state_for(root.path());

    let first = send(&state, Method::GET, "/cached.txt").await;
    let etag = header(&first, "etag").unwrap();
    let list = format!("\"zzz\", {etag}");

    let second = send_with_header(&state, Method::GET, "/cached.txt", "if-none-match", &list).await;
    assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
}

#[tokio::test]
async fn if_modified_since_returns_304_when_unchanged() {
    let root = tempfile::tempdir().unwrap();
    let file = root.path().join("cached.txt");
    std::fs::write(&file, "cache me").unwrap();
    let state = state_for(root.path());

    let mtime = std::fs::metadata(&file).unwrap().modified().unwrap();
    let since = cache::format_http_date(mtime);
    let response =
        send_with_header(&state, Method::GET, "/cached.txt", "if-modified-since", &since).await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);

    let stale = "Mon, 01 Jan 1990 00:00:00 GMT";
    let response =
        send_with_header(&state, Method::GET, "/cached.txt", "if-modified-since", stale).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn if_none_match_takes_precedence_over_if_modified_since() {
    let root = tempfile::tempdir().unwrap();
    let file = root.path().join("cached.txt");
    std::fs::write(&file, "cache me").unwrap();
    let state = state_for(root.path());

    let mtime = std::fs::metadata(&file).unwrap().modified().unwrap();
    let since = cache::format_http_date(mtime);
    let req = Request::builder()
        .method(Method::GET)
        .uri("/cached.txt")
        .header("if-none-match", "\"stale\"")
        .header("if-modified-since", since)
        .body(())
        .unwrap();
    let response = handler::handle_request(req, peer(), Arc::clone(&state))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[cfg(unix)]
#[tokio::test]
async fn symlink_inside_root_is_served() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("target.txt"), "linked ok").unwrap();
    std::os::unix::fs::symlink(root.path().join("target.txt"), root.path().join("link.txt"))
        .unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/link.txt").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "linked ok");
}

#[cfg(unix)]
#[tokio::test]
async fn symlink_escaping_root_is_forbidden() {
    let root = tempfile::tempdir().unwrap();
    let outside = tempfile::tempdir().unwrap();
    std::fs::write(outside.path().join("secret.txt"), "secret").unwrap();
    std::os::unix::fs::symlink(
        outside.path().join("secret.txt"),
        root.path().join("leak.txt"),
    )
    .unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/leak.txt").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[cfg(unix)]
#[tokio::test]
async fn listing_marks_symlinks() {
    let root = tempfile::tempdir().unwrap();
    let sub = root.path().join("sub");
    std::fs::create_dir(&sub).unwrap();
    std::fs::write(sub.join("real.txt"), "real").unwrap();
    std::os::unix::fs::symlink(sub.join("real.txt"), sub.join("alias")).unwrap();
    let state = state_for(root.path());

    let response = send(&state, Method::GET, "/sub/").await;
    let page = body_string(response).await;
    assert!(page.contains("<li><a href=\"alias\">alias@</a></li>"));
}
