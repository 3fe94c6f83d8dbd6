//! Log Server
//!
//! 外部プローブが生成する監視スナップショットを公開するHTTPゲートウェイ。
//! 監視対象システムが自身を健全と宣言している間はスナップショットを認証で保護する。

#![warn(missing_docs)]

/// 共通型定義（エラー型）
pub mod common;

/// REST APIハンドラー
pub mod api;

/// 認証ゲート（Basic / Bearer）
pub mod auth;

/// スナップショット取得（プローブ実行・読み込み）
pub mod snapshot;

/// 設定管理（起動時に一度だけ構築される不変設定）
pub mod config;

/// CLIインターフェース
pub mod cli;

/// ロギング初期化ユーティリティ
pub mod logging;

/// axumサーバー起動・シャットダウンハンドリング
pub mod server;

use std::sync::Arc;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// 不変のランタイム設定
    pub config: Arc<config::GatewayConfig>,
    /// スナップショットプロバイダー（プローブ実行を直列化）
    pub snapshots: snapshot::SnapshotProvider,
    /// 設定で選択された認証方式
    pub authenticator: Arc<dyn auth::Authenticator>,
}

impl AppState {
    /// 設定から状態を組み立てる
    pub fn from_config(config: config::GatewayConfig) -> Result<Self, common::error::GatewayError> {
        let snapshots = snapshot::SnapshotProvider::new(&config);
        let authenticator = auth::build_authenticator(&config.auth)?;
        Ok(Self {
            config: Arc::new(config),
            snapshots,
            authenticator,
        })
    }
}
