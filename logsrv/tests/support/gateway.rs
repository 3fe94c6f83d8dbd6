use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use logsrv::config::{AuthConfig, GatewayConfig};
use logsrv::{api, AppState};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "senha";

/// 一時ディレクトリ上のプローブとスナップショット
pub struct Fixture {
    pub dir: TempDir,
    pub snapshot: PathBuf,
    pub probe: PathBuf,
}

impl Fixture {
    /// 任意のシェルスクリプトをプローブとして配置する（`$SNAPSHOT`は出力パスに置換）
    pub fn with_probe(body: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("server-monitor.json");
        let probe = dir.path().join("server-monitor.sh");
        let body = body.replace("$SNAPSHOT", &snapshot.display().to_string());
        std::fs::write(&probe, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&probe, std::fs::Permissions::from_mode(0o755)).unwrap();
        Self {
            dir,
            snapshot,
            probe,
        }
    }

    /// 指定JSONを書き出すプローブ
    pub fn publishing(document: &Value) -> Self {
        Self::with_probe(&format!(
            "cat > \"$SNAPSHOT\" <<'JSON'\n{}\nJSON",
            serde_json::to_string_pretty(document).unwrap()
        ))
    }

    pub fn config(&self, auth: AuthConfig) -> GatewayConfig {
        GatewayConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            snapshot_path: self.snapshot.clone(),
            probe_path: self.probe.clone(),
            probe_timeout: Duration::from_secs(5),
            snapshot_ttl: Duration::ZERO,
            domain: "conexaodesorte.com.br".to_string(),
            auth,
        }
    }

    pub fn state(&self, auth: AuthConfig) -> AppState {
        AppState::from_config(self.config(auth)).unwrap()
    }

    pub fn app(&self, auth: AuthConfig) -> Router {
        api::create_app(self.state(auth))
    }

    pub fn basic_app(&self) -> Router {
        self.app(basic_auth())
    }
}

pub fn basic_auth() -> AuthConfig {
    AuthConfig::Basic {
        username: ADMIN_USER.to_string(),
        password: ADMIN_PASSWORD.to_string(),
        realm: "Log Server Admin".to_string(),
    }
}

pub fn bearer_auth(identity_url: &str, timeout: Duration) -> AuthConfig {
    AuthConfig::Bearer {
        identity_url: identity_url.to_string(),
        timeout,
    }
}

pub fn basic_header(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}

/// `.oneshot()`でリクエストを1件送る
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str, authorization: Option<&str>) -> Response {
    send(app, Method::GET, uri, authorization).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
