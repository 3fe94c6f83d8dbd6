//! サーバー起動オプション

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 認証方式の選択
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// 固定の管理者資格情報（HTTP Basic）
    Basic,
    /// 外部認証サービスによるトークン検証（Bearer）
    Bearer,
}

/// サーバー起動引数
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(short, long, default_value = "9090", env = "LOGSRV_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "LOGSRV_HOST")]
    pub host: String,

    /// JSON snapshot written by the probe
    #[arg(
        long,
        default_value = "/app/logs/server-monitor.json",
        env = "LOGSRV_SNAPSHOT_PATH"
    )]
    pub snapshot_path: PathBuf,

    /// Probe executable, invoked without arguments
    #[arg(
        long,
        default_value = "/app/scripts/server-monitor.sh",
        env = "LOGSRV_PROBE_PATH"
    )]
    pub probe_path: PathBuf,

    /// Kill the probe if it runs longer than this
    #[arg(long, default_value = "30", env = "LOGSRV_PROBE_TIMEOUT_SECS")]
    pub probe_timeout_secs: u64,

    /// Reuse a snapshot for this long instead of re-running the probe (0 disables)
    #[arg(long, default_value = "0", env = "LOGSRV_SNAPSHOT_TTL_MS")]
    pub snapshot_ttl_ms: u64,

    /// Domain reported in the response envelope
    #[arg(long, default_value = "conexaodesorte.com.br", env = "LOGSRV_DOMAIN")]
    pub domain: String,

    /// Credential scheme used when the snapshot requires authentication
    #[arg(long, value_enum, default_value = "basic", env = "LOGSRV_AUTH_MODE")]
    pub auth_mode: AuthMode,

    /// Admin username (basic mode)
    #[arg(long, default_value = "admin", env = "LOGSRV_ADMIN_USERNAME")]
    pub admin_username: String,

    /// Admin password (required in basic mode)
    #[arg(long, env = "LOGSRV_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,

    /// Realm announced in the Basic challenge
    #[arg(long, default_value = "Log Server Admin", env = "LOGSRV_AUTH_REALM")]
    pub auth_realm: String,

    /// Identity service base URL (required in bearer mode)
    #[arg(long, env = "LOGSRV_IDENTITY_URL")]
    pub identity_url: Option<String>,

    /// Timeout for one token validation call
    #[arg(long, default_value = "5", env = "LOGSRV_IDENTITY_TIMEOUT_SECS")]
    pub identity_timeout_secs: u64,
}
