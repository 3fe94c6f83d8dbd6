//! Runtime configuration
//!
//! Built once at startup from the parsed CLI arguments and shared read-only
//! through `AppState`.

use crate::cli::serve::{AuthMode, ServeArgs};
use crate::common::error::GatewayError;
use std::path::PathBuf;
use std::time::Duration;

/// 認証方式ごとの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthConfig {
    /// 固定の管理者資格情報
    Basic {
        /// ユーザー名
        username: String,
        /// パスワード
        password: String,
        /// `WWW-Authenticate`に載せるrealm
        realm: String,
    },
    /// 外部認証サービスによるトークン検証
    Bearer {
        /// 認証サービスのベースURL（末尾スラッシュなし）
        identity_url: String,
        /// 1回の検証呼び出しのタイムアウト
        timeout: Duration,
    },
}

impl AuthConfig {
    /// ログ・メタデータ用の方式名
    pub fn mode_name(&self) -> &'static str {
        match self {
            Self::Basic { .. } => "basic",
            Self::Bearer { .. } => "bearer",
        }
    }
}

/// ゲートウェイ設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// バインドアドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// プローブが書き出すスナップショットのパス
    pub snapshot_path: PathBuf,
    /// プローブ実行ファイルのパス
    pub probe_path: PathBuf,
    /// プローブ実行のタイムアウト
    pub probe_timeout: Duration,
    /// スナップショット再利用期間（ゼロなら毎回プローブを実行）
    pub snapshot_ttl: Duration,
    /// エンベロープに載せるドメイン
    pub domain: String,
    /// 認証設定
    pub auth: AuthConfig,
}

impl GatewayConfig {
    /// CLI引数から設定を構築し検証する
    pub fn from_args(args: &ServeArgs) -> Result<Self, GatewayError> {
        if args.probe_timeout_secs == 0 {
            return Err(GatewayError::Config(
                "probe timeout must be greater than zero".to_string(),
            ));
        }

        let auth = match args.auth_mode {
            AuthMode::Basic => {
                let password = args
                    .admin_password
                    .clone()
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| {
                        GatewayError::Config(
                            "LOGSRV_ADMIN_PASSWORD is required when auth mode is basic"
                                .to_string(),
                        )
                    })?;
                if args.admin_username.is_empty() || args.admin_username.contains(':') {
                    return Err(GatewayError::Config(
                        "admin username must be non-empty and must not contain ':'".to_string(),
                    ));
                }
                AuthConfig::Basic {
                    username: args.admin_username.clone(),
                    password,
                    realm: args.auth_realm.clone(),
                }
            }
            AuthMode::Bearer => {
                let identity_url = args
                    .identity_url
                    .as_deref()
                    .map(str::trim)
                    .filter(|u| !u.is_empty())
                    .ok_or_else(|| {
                        GatewayError::Config(
                            "LOGSRV_IDENTITY_URL is required when auth mode is bearer"
                                .to_string(),
                        )
                    })?;
                if !(identity_url.starts_with("http://") || identity_url.starts_with("https://"))
                {
                    return Err(GatewayError::Config(format!(
                        "identity URL must start with http:// or https://: {identity_url}"
                    )));
                }
                if args.identity_timeout_secs == 0 {
                    return Err(GatewayError::Config(
                        "identity timeout must be greater than zero".to_string(),
                    ));
                }
                AuthConfig::Bearer {
                    identity_url: identity_url.trim_end_matches('/').to_string(),
                    timeout: Duration::from_secs(args.identity_timeout_secs),
                }
            }
        };

        Ok(Self {
            host: args.host.clone(),
            port: args.port,
            snapshot_path: args.snapshot_path.clone(),
            probe_path: args.probe_path.clone(),
            probe_timeout: Duration::from_secs(args.probe_timeout_secs),
            snapshot_ttl: Duration::from_millis(args.snapshot_ttl_ms),
            domain: args.domain.clone(),
            auth,
        })
    }

    /// `host:port`形式のバインドアドレス
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
