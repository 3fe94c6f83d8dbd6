//! ゲートウェイ全体で共有する型

/// エラー型定義
pub mod error;
