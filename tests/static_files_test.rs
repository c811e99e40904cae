//! Static folder behaviour: freshness, headers, confinement.

use std::path::Path;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use optiserve::static_files::{format_http_date, StaticFolder};
use tower::ServiceExt;

const CSS: &str = "body { color: #333; }\n";

fn site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("style.css"), CSS).unwrap();
    std::fs::create_dir(dir.path().join("docs")).unwrap();
    std::fs::write(dir.path().join("docs").join("blob.zzqx"), [1u8, 2, 3]).unwrap();
    dir
}

fn mtime_header(path: &Path) -> String {
    format_http_date(std::fs::metadata(path).unwrap().modified().unwrap())
}

async fn fetch(folder: &StaticFolder, uri: &str, if_modified_since: Option<&str>) -> Response {
    let mut request = Request::builder().uri(uri);
    if let Some(since) = if_modified_since {
        request = request.header(header::IF_MODIFIED_SINCE, since);
    }
    folder
        .clone()
        .into_router()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_conditional_get_scenario() {
    let dir = site();
    let folder = StaticFolder::new(dir.path(), 120);
    let last_modified = mtime_header(&dir.path().join("style.css"));

    let response = fetch(&folder, "/style.css", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
    assert_eq!(response.headers()[header::CACHE_CONTROL], "max-age=120");
    assert_eq!(response.headers()[header::LAST_MODIFIED], last_modified.as_str());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body, CSS);

    let response = fetch(&folder, "/style.css", Some(&last_modified)).await;
    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    assert!(response.headers().get(header::LAST_MODIFIED).is_none());
    assert_eq!(response.headers()[header::CACHE_CONTROL], "max-age=120");
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_stale_or_malformed_timestamp_sends_full_body() {
    let dir = site();
    let folder = StaticFolder::new(dir.path(), 60);
    let path = dir.path().join("style.css");
    let modified = std::fs::metadata(&path).unwrap().modified().unwrap();

    let stale = format_http_date(modified - Duration::from_secs(86_400));
    let newer = format_http_date(modified + Duration::from_secs(86_400));
    for since in [stale.as_str(), newer.as_str(), "yesterday", "2024-01-01T00:00:00Z"] {
        let response = fetch(&folder, "/style.css", Some(since)).await;
        assert_eq!(response.status(), StatusCode::OK, "If-Modified-Since: {since}");
        assert_eq!(response.headers()[header::LAST_MODIFIED], mtime_header(&path).as_str());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, CSS);
    }
}

#[tokio::test]
async fn test_unknown_extension_has_no_content_type() {
    let dir = site();
    let folder = StaticFolder::new(dir.path(), 60);

    let response = fetch(&folder, "/docs/blob.zzqx", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body.as_ref(), &[1u8, 2, 3]);
}

#[tokio::test]
async fn test_missing_file_uses_default_not_found() {
    let dir = site();
    let folder = StaticFolder::new(dir.path(), 60);

    let response = fetch(&folder, "/nope.js", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body, "404 page not found");
}

#[tokio::test]
async fn test_directories_are_not_served() {
    let dir = site();
    let folder = StaticFolder::new(dir.path(), 60);

    assert_eq!(fetch(&folder, "/docs", None).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(fetch(&folder, "/", None).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_traversal_outside_root_is_not_found() {
    let outer = tempfile::tempdir().unwrap();
    let root = outer.path().join("public");
    std::fs::create_dir(&root).unwrap();
    std::fs::write(root.join("index.html"), "<h1>hi</h1>").unwrap();
    std::fs::write(outer.path().join("secret.txt"), "top secret").unwrap();

    let folder = StaticFolder::new(&root, 60)
        .with_not_found(|_| StatusCode::IM_A_TEAPOT.into_response());

    let response = fetch(&folder, "/../secret.txt", None).await;
    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);

    let response = fetch(&folder, "/sub/../../secret.txt", None).await;
    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);

    let response = fetch(&folder, "/sub/../index.html", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_file_uses_error_handler() {
    use std::os::unix::fs::PermissionsExt;

    let dir = site();
    let locked = dir.path().join("locked.txt");
    std::fs::write(&locked, "hidden").unwrap();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can open it anyway.
    if std::fs::File::open(&locked).is_ok() {
        return;
    }

    let folder = StaticFolder::new(dir.path(), 60)
        .with_error(|_| (StatusCode::SERVICE_UNAVAILABLE, "try later").into_response());

    let response = fetch(&folder, "/locked.txt", None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body, "try later");

    let default = fetch(&StaticFolder::new(dir.path(), 60), "/locked.txt", None).await;
    assert_eq!(default.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
