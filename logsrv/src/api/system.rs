//! ライブネス・サービス情報・404

use super::{error::AppError, now_timestamp, PUBLISHED_ENDPOINTS};
use crate::common::error::GatewayError;
use crate::AppState;
use axum::{extract::State, http::Uri, Json};
use serde::Serialize;

/// サービス名
pub const SERVICE_NAME: &str = "Log Server";

/// `GET /health`のレスポンス
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// 常に`healthy`
    pub status: &'static str,
    /// 応答時刻
    pub timestamp: String,
}

/// `GET /`のレスポンス
#[derive(Debug, Serialize)]
pub struct ServiceInfoResponse {
    /// サービス名
    pub service: &'static str,
    /// バージョン
    pub version: &'static str,
    /// 公開エンドポイント
    pub endpoints: Vec<&'static str>,
    /// 認証方式
    pub auth_mode: &'static str,
    /// 応答時刻
    pub timestamp: String,
}

/// GET /health
///
/// このサービス自身のライブネス。プローブやスナップショットには一切依存しない。
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: now_timestamp(),
    })
}

/// GET /
pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        endpoints: PUBLISHED_ENDPOINTS.to_vec(),
        auth_mode: state.config.auth.mode_name(),
        timestamp: now_timestamp(),
    })
}

/// 未定義ルート
pub async fn not_found(uri: Uri) -> AppError {
    AppError(GatewayError::RouteNotFound(uri.path().to_string()))
}
