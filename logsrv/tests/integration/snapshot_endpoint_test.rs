//! GET /rest/v1/log-servidor: 公開状態・エラー応答

use axum::http::StatusCode;
use serde_json::json;

use crate::support::gateway::{body_json, get, Fixture};

const ENDPOINT: &str = "/rest/v1/log-servidor";

#[tokio::test]
async fn public_snapshot_returns_full_envelope_without_credentials() {
    let document = json!({
        "timestamp": "2025-01-01T00:00:00Z",
        "summary": {"auth_required": false, "healthy_services": 3, "total_services": 5},
        "services": [{"name": "backend", "status": "down"}]
    });
    let fixture = Fixture::publishing(&document);
    let app = fixture.basic_app();

    let response = get(&app, ENDPOINT, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["server_logs"], document);
    assert_eq!(json["endpoint_info"]["path"], ENDPOINT);
    assert_eq!(json["endpoint_info"]["auth_required"], false);
    assert!(json["endpoint_info"]["auth_note"].is_string());
    assert_eq!(json["domain"], "conexaodesorte.com.br");

    let generated_at = json["endpoint_info"]["generated_at"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(generated_at).is_ok());
    assert_ne!(generated_at, "2025-01-01T00:00:00Z");
}

#[tokio::test]
async fn absent_auth_flag_is_public() {
    let fixture = Fixture::publishing(&json!({"summary": {}}));
    let response = get(&fixture.basic_app(), ENDPOINT, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_snapshot_file_returns_503() {
    let fixture = Fixture::with_probe("exit 0");
    let response = get(&fixture.basic_app(), ENDPOINT, None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Snapshot unavailable");
    assert!(json.get("server_logs").is_none());
    assert!(!json.to_string().contains("server-monitor.json"));
}

#[tokio::test]
async fn malformed_snapshot_returns_500() {
    let fixture = Fixture::with_probe("printf '{\"summary\": {\"auth_req' > \"$SNAPSHOT\"");
    let response = get(&fixture.basic_app(), ENDPOINT, None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Invalid snapshot");
}

#[tokio::test]
async fn unreadable_snapshot_returns_500_not_503() {
    let fixture = Fixture::with_probe("exit 0");
    std::fs::create_dir(&fixture.snapshot).unwrap();

    let response = get(&fixture.basic_app(), ENDPOINT, None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Snapshot read failed");
    assert!(json.get("server_logs").is_none());
    assert!(!json.to_string().contains("server-monitor.json"));
}

#[tokio::test]
async fn failing_probe_returns_500() {
    let fixture = Fixture::with_probe(
        "echo '{\"summary\":{\"auth_required\":false}}' > \"$SNAPSHOT\"\nexit 1",
    );
    let response = get(&fixture.basic_app(), ENDPOINT, None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Probe execution failed");
    assert_eq!(json["message"], "Monitor script failed");
}

#[tokio::test]
async fn missing_probe_returns_500() {
    let fixture = Fixture::with_probe("exit 0");
    std::fs::remove_file(&fixture.probe).unwrap();
    let response = get(&fixture.basic_app(), ENDPOINT, None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn each_request_reflects_latest_probe_output() {
    // 実行ごとにカウンタを進めるプローブ
    let fixture = Fixture::with_probe(
        r#"n=$(cat "$SNAPSHOT.count" 2>/dev/null || echo 0)
n=$((n + 1))
echo "$n" > "$SNAPSHOT.count"
echo "{\"summary\":{\"auth_required\":false},\"run\":$n}" > "$SNAPSHOT""#,
    );
    let app = fixture.basic_app();

    let first = body_json(get(&app, ENDPOINT, None).await).await;
    let second = body_json(get(&app, ENDPOINT, None).await).await;
    assert_eq!(first["server_logs"]["run"], 1);
    assert_eq!(second["server_logs"]["run"], 2);
}
