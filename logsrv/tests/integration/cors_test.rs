//! CORSヘッダーとプリフライト

use axum::http::{header, Method, StatusCode};
use serde_json::json;

use crate::support::gateway::{body_bytes, get, send, Fixture};

fn assert_cors(response: &axum::response::Response) {
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
        "GET, OPTIONS"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
        "Content-Type, Authorization"
    );
}

#[tokio::test]
async fn every_response_carries_cors_headers() {
    let public = Fixture::publishing(&json!({"summary": {"auth_required": false}}));
    let protected = Fixture::publishing(&json!({"summary": {"auth_required": true}}));
    let missing = Fixture::with_probe("exit 0");
    let broken = Fixture::with_probe("exit 1");

    let cases = [
        (public.basic_app(), "/rest/v1/log-servidor", StatusCode::OK),
        (public.basic_app(), "/health", StatusCode::OK),
        (public.basic_app(), "/", StatusCode::OK),
        (public.basic_app(), "/nope", StatusCode::NOT_FOUND),
        (
            protected.basic_app(),
            "/rest/v1/log-servidor",
            StatusCode::UNAUTHORIZED,
        ),
        (
            missing.basic_app(),
            "/rest/v1/log-servidor",
            StatusCode::SERVICE_UNAVAILABLE,
        ),
        (
            broken.basic_app(),
            "/rest/v1/log-servidor",
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (app, path, expected) in cases {
        let response = get(&app, path, None).await;
        assert_eq!(response.status(), expected, "GET {path}");
        assert_cors(&response);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}

#[tokio::test]
async fn options_on_any_path_is_empty_200() {
    let fixture = Fixture::with_probe("touch \"$SNAPSHOT.ran\"\nexit 1");
    let app = fixture.basic_app();

    for path in ["/rest/v1/log-servidor", "/health", "/", "/does/not/exist"] {
        let response = send(&app, Method::OPTIONS, path, None).await;
        assert_eq!(response.status(), StatusCode::OK, "OPTIONS {path}");
        assert_cors(&response);
        assert!(body_bytes(response).await.is_empty());
    }
    // プリフライトはプローブを起動しない
    assert!(!fixture.dir.path().join("server-monitor.json.ran").exists());
}
