//! ロギング初期化
//!
//! 標準出力へのfmtレイヤーに加え、`LOGSRV_LOG_DIR`が設定されていれば日次ローテーションの
//! ファイル出力を追加する。

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// ログレベル指定の環境変数
pub const LOG_LEVEL_ENV: &str = "LOGSRV_LOG_LEVEL";
/// ログ出力ディレクトリの環境変数
pub const LOG_DIR_ENV: &str = "LOGSRV_LOG_DIR";

const DEFAULT_LEVEL: &str = "info";
const LOG_FILE_PREFIX: &str = "logsrv.log";

/// tracingサブスクライバーを初期化する
///
/// ファイル出力時は返された`WorkerGuard`をプロセス終了まで保持すること。
pub fn init() -> anyhow::Result<Option<WorkerGuard>> {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .or_else(|| std::env::var("RUST_LOG").ok());
    let filter = build_filter(level.as_deref());
    let stdout_layer = fmt::layer().with_target(true);

    match std::env::var_os(LOG_DIR_ENV) {
        Some(dir) => {
            std::fs::create_dir_all(&dir).with_context(|| {
                format!("Failed to create log directory {}", dir.to_string_lossy())
            })?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX));
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()
                .context("Failed to install tracing subscriber")?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stdout_layer)
                .try_init()
                .context("Failed to install tracing subscriber")?;
            Ok(None)
        }
    }
}

/// フィルター文字列を解釈する。不正・未指定なら`info`
fn build_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL))
}
