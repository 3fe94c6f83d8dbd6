//! axumサーバー起動・シャットダウンハンドリング

use crate::config::GatewayConfig;
use crate::{api, AppState};
use anyhow::Context;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

/// 設定のアドレスにバインドし、シャットダウンシグナルまで待機する
pub async fn run(state: AppState) -> anyhow::Result<()> {
    let bind_addr = state.config.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {bind_addr}"))?;
    let local_addr = listener.local_addr().context("Failed to read local address")?;

    log_banner(&state.config, local_addr);
    serve(listener, state, shutdown_signal()).await
}

/// 既存のリスナーでサーバーを動かす
///
/// `shutdown`が完了すると新規接続の受付を止め、処理中のリクエストを待ってから戻る。
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = api::create_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

fn log_banner(config: &GatewayConfig, addr: SocketAddr) {
    info!("Log Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Listening on {}", addr);
    info!("Endpoint: http://{}{}", addr, api::SNAPSHOT_PATH);
    info!("Health: http://{}{}", addr, api::HEALTH_PATH);
    info!(
        auth_mode = config.auth.mode_name(),
        probe = %config.probe_path.display(),
        snapshot = %config.snapshot_path.display(),
        ttl_ms = config.snapshot_ttl.as_millis() as u64,
        "Snapshot access is authenticated whenever the probe reports auth_required"
    );
}

/// Ctrl+C / SIGTERMを待機
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}
