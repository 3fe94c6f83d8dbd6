//! スナップショットエンドポイント
//!
//! プローブ実行 → 認証ゲート → エンベロープの順で処理する。
//! ゲートはスナップショット取得ロックの外で動くため、遅い認証サービスがプローブを止めることはない。

use super::{error::AppError, now_timestamp, SNAPSHOT_PATH};
use crate::auth;
use crate::snapshot::Snapshot;
use crate::AppState;
use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;
use tracing::debug;

const PUBLIC_NOTE: &str = "Public access while the system is not fully operational. \
Authentication will be required once every service runs without errors.";

const PROTECTED_NOTE: &str =
    "System is fully operational. Access is restricted to authenticated administrators.";

/// エンドポイント情報
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    /// エンドポイントのパス
    pub path: &'static str,
    /// スナップショットが認証を要求していたか
    pub auth_required: bool,
    /// 認証状態の説明
    pub auth_note: &'static str,
    /// レスポンス生成時刻（スナップショット自体の時刻ではない）
    pub generated_at: String,
}

/// レスポンスエンベロープ
#[derive(Debug, Serialize)]
pub struct Envelope {
    /// プローブが生成したスナップショット（無加工）
    pub server_logs: Snapshot,
    /// エンドポイント情報
    pub endpoint_info: EndpointInfo,
    /// ドメイン
    pub domain: String,
}

impl Envelope {
    /// スナップショットを包む
    pub fn wrap(snapshot: Snapshot, domain: &str) -> Self {
        let auth_required = snapshot.auth_required();
        Self {
            server_logs: snapshot,
            endpoint_info: EndpointInfo {
                path: SNAPSHOT_PATH,
                auth_required,
                auth_note: if auth_required {
                    PROTECTED_NOTE
                } else {
                    PUBLIC_NOTE
                },
                generated_at: now_timestamp(),
            },
            domain: domain.to_string(),
        }
    }
}

/// GET /rest/v1/log-servidor
pub async fn get_log_servidor(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Envelope>, AppError> {
    let snapshot = state.snapshots.get_snapshot().await?;
    let access = auth::authorize(&snapshot, &headers, state.authenticator.as_ref()).await?;
    debug!(?access, "Serving snapshot");
    Ok(Json(Envelope::wrap(snapshot, &state.config.domain)))
}
