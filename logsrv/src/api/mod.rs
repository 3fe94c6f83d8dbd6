//! REST APIハンドラー
//!
//! スナップショット公開、ライブネス、サービス情報、CORSプリフライト

pub mod cors;
pub mod error;
pub mod snapshot;
pub mod system;

use crate::AppState;
use axum::{
    http::{header, HeaderValue},
    middleware,
    routing::get,
    Router,
};
use chrono::{SecondsFormat, Utc};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

/// スナップショットエンドポイント
pub const SNAPSHOT_PATH: &str = "/rest/v1/log-servidor";

/// ライブネスエンドポイント
pub const HEALTH_PATH: &str = "/health";

/// サービス情報エンドポイント
pub const ROOT_PATH: &str = "/";

/// サービス情報に列挙する公開エンドポイント
pub const PUBLISHED_ENDPOINTS: [&str; 2] = [SNAPSHOT_PATH, HEALTH_PATH];

/// アプリケーション全体のルーターを作成
///
/// 未定義のパス、および定義済みパスへの未対応メソッドはいずれも404。
/// OPTIONSはルーティング前に200で応答し、CORSヘッダーは全レスポンスに付与する。
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route(
            SNAPSHOT_PATH,
            get(snapshot::get_log_servidor).fallback(system::not_found),
        )
        .route(
            HEALTH_PATH,
            get(system::health).fallback(system::not_found),
        )
        .route(
            ROOT_PATH,
            get(system::service_info).fallback(system::not_found),
        )
        .fallback(system::not_found)
        .layer(middleware::from_fn(cors::preflight))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(cors::ALLOW_ORIGIN),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(cors::ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(cors::ALLOW_HEADERS),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// RFC 3339形式（UTC, `Z`付き）の現在時刻
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
