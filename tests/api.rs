#![cfg(unix)]

mod common;

use axum::body::{to_bytes, Body, Bytes};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{fake_app, state_for, BINARY_PAYLOAD};
use ytdlp_relay_lib::downloader::YtDlpBackend;
use ytdlp_relay_lib::server::create_router;

async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body)
}

async fn post_json(app: Router, path: &str, body: Value) -> (StatusCode, HeaderMap, Bytes) {
    let request = Request::post(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

fn error_message(body: &[u8]) -> String {
    let json: Value = serde_json::from_slice(body).unwrap();
    let obj = json.as_object().unwrap();
    assert_eq!(obj.len(), 1, "error body should only carry `error`: {json}");
    obj["error"].as_str().unwrap().to_string()
}

fn content_type(headers: &HeaderMap) -> &str {
    headers.get(header::CONTENT_TYPE).unwrap().to_str().unwrap()
}

// ---------------------------------------------------------------------------
// /info
// ---------------------------------------------------------------------------

#[tokio::test]
async fn info_returns_tool_metadata() {
    let (status, _, body) =
        post_json(fake_app(), "/info", json!({ "url": "https://example.com/watch?v=1" })).await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        json,
        json!({
            "webpage_url": "https://example.com/watch?v=1",
            "title": "fake",
            "extractor": "generic"
        })
    );
}

#[tokio::test]
async fn info_tool_failure_is_500() {
    let (status, _, body) = post_json(fake_app(), "/info", json!({ "url": "fail:nope" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = error_message(&body);
    assert!(message.contains("Unsupported URL: fail:nope"), "{message}");
}

#[tokio::test]
async fn info_unparseable_output_is_500() {
    let (status, _, body) = post_json(fake_app(), "/info", json!({ "url": "garbage:x" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(error_message(&body).starts_with("Failed to parse yt-dlp output"));
}

#[tokio::test]
async fn info_missing_binary_is_500() {
    let program = "/nonexistent/bin/yt-dlp";
    let app = create_router(state_for(program, YtDlpBackend::new(program)));
    let (status, _, body) = post_json(app, "/info", json!({ "url": "https://a" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_message(&body), "Tool not found: /nonexistent/bin/yt-dlp");
}

#[tokio::test]
async fn info_bad_bodies_are_500() {
    let (status, _, body) = post_json(fake_app(), "/info", json!({})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!error_message(&body).is_empty());

    let request = Request::post("/info")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _, body) = send(fake_app(), request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!error_message(&body).is_empty());

    let request = Request::post("/info")
        .body(Body::from(r#"{"url":"https://a"}"#))
        .unwrap();
    let (status, _, body) = send(fake_app(), request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!error_message(&body).is_empty());
}

// ---------------------------------------------------------------------------
// /download
// ---------------------------------------------------------------------------

#[tokio::test]
async fn download_video_is_mp4() {
    let (status, headers, body) = post_json(
        fake_app(),
        "/download",
        json!({ "url": "https://example.com/v", "format": "video" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type(&headers), "video/mp4");
    assert_eq!(&body[..], b"media:https://example.com/v");
}

#[tokio::test]
async fn download_anything_else_is_mpeg() {
    for format in [json!("audio"), json!("mp3"), json!(7), Value::Null] {
        let (status, headers, _) = post_json(
            fake_app(),
            "/download",
            json!({ "url": "https://example.com/v", "format": format }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type(&headers), "audio/mpeg", "format {format}");
    }

    let (_, headers, _) =
        post_json(fake_app(), "/download", json!({ "url": "https://example.com/v" })).await;
    assert_eq!(content_type(&headers), "audio/mpeg");
}

#[tokio::test]
async fn download_body_is_byte_identical() {
    let (status, _, body) = post_json(
        fake_app(),
        "/download",
        json!({ "url": "binary:clip", "format": "video" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], BINARY_PAYLOAD);
}

#[tokio::test]
async fn download_quality_defaults_to_best() {
    let (_, _, omitted) = post_json(fake_app(), "/download", json!({ "url": "args:x" })).await;
    let (_, _, explicit) = post_json(
        fake_app(),
        "/download",
        json!({ "url": "args:x", "quality": "best" }),
    )
    .await;
    assert_eq!(&omitted[..], b"-f\nbest\n-o\n-\n--\nargs:x\n");
    assert_eq!(omitted, explicit);

    let (_, _, custom) = post_json(
        fake_app(),
        "/download",
        json!({ "url": "args:x", "quality": "bv*[height<=480]+ba/b" }),
    )
    .await;
    assert_eq!(&custom[..], b"-f\nbv*[height<=480]+ba/b\n-o\n-\n--\nargs:x\n");
}

#[tokio::test]
async fn download_tool_failure_is_500() {
    let (status, headers, body) =
        post_json(fake_app(), "/download", json!({ "url": "fail:gone", "format": "video" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(content_type(&headers).starts_with("application/json"));
    assert!(error_message(&body).contains("Unsupported URL: fail:gone"));
}

// ---------------------------------------------------------------------------
// Shell metacharacters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn urls_are_never_shell_interpreted() {
    let dir = tempfile::tempdir().unwrap();
    let marker = |name: &str| dir.path().join(name);
    let url = format!(
        "http://x; touch {} && touch {} $(touch {}) `touch {}`",
        marker("a").display(),
        marker("b").display(),
        marker("c").display(),
        marker("d").display(),
    );

    let (status, _, body) = post_json(fake_app(), "/info", json!({ "url": url })).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["webpage_url"], url.as_str());

    let (status, _, body) = post_json(
        fake_app(),
        "/download",
        json!({ "url": url, "quality": format!("best; touch {}", marker("e").display()) }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, format!("media:{}", url).into_bytes());

    for name in ["a", "b", "c", "d", "e"] {
        assert!(!marker(name).exists(), "marker {name} was created");
    }
}

#[tokio::test]
async fn dash_prefixed_url_is_not_an_option() {
    let (status, _, body) =
        post_json(fake_app(), "/info", json!({ "url": "--version" })).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["webpage_url"], "--version");
}

// ---------------------------------------------------------------------------
// /health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_tool() {
    let request = Request::get("/health").body(Body::empty()).unwrap();
    let (status, _, body) = send(fake_app(), request).await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["backend"], "yt-dlp");
    assert_eq!(json["tool"]["version"], "2099.01.01");
    assert_eq!(json["tool"]["is_available"], true);
}
