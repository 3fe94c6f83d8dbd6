//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! `GatewayError`は`status_code()`・`label()`・`external_message()`を提供し、
//! 呼び出し側に返すJSONエラーボディを組み立てられる。内部の詳細（パス、終了コード、
//! パースエラー位置など）は`Display`にのみ含まれ、サーバーログ専用となる。

use axum::http::StatusCode;
use thiserror::Error;

/// 認証方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Basic <base64(user:pass)>`
    Basic,
    /// `Authorization: Bearer <token>`
    Bearer,
}

impl AuthScheme {
    /// `Authorization`ヘッダーのスキーム名
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Bearer => "Bearer",
        }
    }
}

impl std::fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 資格情報が拒否された理由
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthFailure {
    /// Authorizationヘッダーなし
    #[error("missing Authorization header")]
    MissingCredentials,

    /// 設定と異なるスキーム
    #[error("expected {expected} scheme")]
    WrongScheme {
        /// 期待されたスキーム
        expected: AuthScheme,
    },

    /// デコードできない資格情報
    #[error("malformed credentials: {0}")]
    MalformedCredentials(String),

    /// 資格情報の不一致
    #[error("invalid credentials")]
    InvalidCredentials,

    /// 認証サービスが200以外を返した
    #[error("identity service rejected token with status {0}")]
    IdentityServiceRejected(u16),

    /// 認証サービスに到達できない（タイムアウト含む）
    #[error("identity service unreachable: {0}")]
    IdentityServiceUnreachable(String),
}

impl AuthFailure {
    /// 資格情報が提示されていなかったか
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::MissingCredentials)
    }
}

/// ゲートウェイのエラー型
#[derive(Debug, Error)]
pub enum GatewayError {
    /// ルート未定義
    #[error("Route not found: {0}")]
    RouteNotFound(String),

    /// 認証要求・認証失敗
    #[error("Authentication rejected ({scheme}): {failure}")]
    Unauthorized {
        /// 使用中の認証方式
        scheme: AuthScheme,
        /// `WWW-Authenticate`ヘッダー値
        challenge: String,
        /// 拒否理由
        failure: AuthFailure,
    },

    /// プローブの起動失敗・非ゼロ終了・タイムアウト
    #[error("Probe execution failed: {0}")]
    ProbeExecution(String),

    /// スナップショットファイルが存在しない
    #[error("Snapshot unavailable: {0}")]
    SnapshotUnavailable(String),

    /// スナップショットファイルの読み込み失敗
    #[error("Snapshot read failed: {0}")]
    SnapshotRead(String),

    /// スナップショットが不正なJSON
    #[error("Snapshot parse failed: {0}")]
    SnapshotParse(String),

    /// 設定エラー（起動時のみ）
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// HTTPステータスコード
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RouteNotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::ProbeExecution(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SnapshotUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::SnapshotRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SnapshotParse(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// エラーボディの`error`フィールド
    pub fn label(&self) -> &'static str {
        match self {
            Self::RouteNotFound(_) => "Not Found",
            Self::Unauthorized { failure, .. } if failure.is_missing() => {
                "Authentication required"
            }
            Self::Unauthorized { .. } => "Authentication failed",
            Self::ProbeExecution(_) => "Probe execution failed",
            Self::SnapshotUnavailable(_) => "Snapshot unavailable",
            Self::SnapshotRead(_) => "Snapshot read failed",
            Self::SnapshotParse(_) => "Invalid snapshot",
            Self::Config(_) => "Configuration error",
        }
    }

    /// Returns a safe error message for external clients.
    ///
    /// Internal details such as filesystem paths, exit codes or the identity
    /// service address are only part of the `Display` output, which goes to logs.
    pub fn external_message(&self) -> &'static str {
        match self {
            Self::RouteNotFound(_) => "Endpoint not found",
            Self::Unauthorized { failure, .. } if failure.is_missing() => {
                "System is fully operational. Admin authentication is required."
            }
            Self::Unauthorized { .. } => "The supplied credentials were not accepted.",
            Self::ProbeExecution(_) => "Monitor script failed",
            Self::SnapshotUnavailable(_) => "Monitor data not available",
            Self::SnapshotRead(_) => "Monitor data could not be read",
            Self::SnapshotParse(_) => "Invalid monitor data",
            Self::Config(_) => "Internal server error",
        }
    }
}
