//! スナップショットプロバイダー
//!
//! プローブの実行とスナップショットファイルの読み込みを1つのクリティカルセクションとして扱う。
//! プローブは固定パスに書き出すため、並行実行すると書き込み途中のファイルを読む恐れがある。
//! 実行と読み込みは単一のMutexで直列化し、TTLが設定されていれば直近の結果を再利用する。

pub mod probe;

use crate::common::error::GatewayError;
use crate::config::GatewayConfig;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};

pub use probe::{ProbeRun, ProbeRunner};

/// プローブが生成したJSONドキュメント
///
/// `summary.auth_required`以外は解釈せず、そのまま返す。
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    document: Arc<Value>,
}

impl Snapshot {
    /// JSONバイト列からスナップショットを構築
    ///
    /// ルートはJSONオブジェクトでなければならない。
    pub fn from_slice(bytes: &[u8]) -> Result<Self, GatewayError> {
        let document: Value =
            serde_json::from_slice(bytes).map_err(|e| GatewayError::SnapshotParse(e.to_string()))?;
        Self::from_value(document)
    }

    /// JSON値からスナップショットを構築
    pub fn from_value(document: Value) -> Result<Self, GatewayError> {
        if !document.is_object() {
            return Err(GatewayError::SnapshotParse(
                "snapshot root is not a JSON object".to_string(),
            ));
        }
        Ok(Self {
            document: Arc::new(document),
        })
    }

    /// 元のJSONドキュメント
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// `summary.auth_required`を真偽値として解釈する
    ///
    /// 欠落・`null`はfalse。文字列は`""`/`false`/`0`/`no`/`off`のみfalse、
    /// 数値は非ゼロでtrue、配列・オブジェクトは空でなければtrue。
    pub fn auth_required(&self) -> bool {
        self.document
            .get("summary")
            .and_then(|summary| summary.get("auth_required"))
            .map(is_truthy)
            .unwrap_or(false)
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.document.serialize(serializer)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "false" | "0" | "no" | "off"
        ),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[derive(Debug)]
struct CachedSnapshot {
    snapshot: Snapshot,
    fetched_at: Instant,
}

struct ProviderInner {
    probe: ProbeRunner,
    snapshot_path: PathBuf,
    ttl: Duration,
    // プローブ実行 + 読み込みのクリティカルセクション
    slot: Mutex<Option<CachedSnapshot>>,
}

/// スナップショットプロバイダー
#[derive(Clone)]
pub struct SnapshotProvider {
    inner: Arc<ProviderInner>,
}

impl SnapshotProvider {
    /// 設定からプロバイダーを作成
    pub fn new(config: &GatewayConfig) -> Self {
        Self::with_parts(
            ProbeRunner::new(&config.probe_path, config.probe_timeout),
            &config.snapshot_path,
            config.snapshot_ttl,
        )
    }

    /// 個別の部品からプロバイダーを作成
    pub fn with_parts(probe: ProbeRunner, snapshot_path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                probe,
                snapshot_path: snapshot_path.into(),
                ttl,
                slot: Mutex::new(None),
            }),
        }
    }

    /// 最新のスナップショットを取得
    ///
    /// ロック取得後、TTL内の結果があれば再利用し、なければプローブを実行してファイルを読む。
    /// 失敗はキャッシュしない。
    pub async fn get_snapshot(&self) -> Result<Snapshot, GatewayError> {
        let mut slot = self.inner.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            if cached.fetched_at.elapsed() < self.inner.ttl {
                debug!(
                    age_ms = cached.fetched_at.elapsed().as_millis() as u64,
                    "Reusing cached snapshot"
                );
                return Ok(cached.snapshot.clone());
            }
        }

        let snapshot = self.refresh().await?;
        if !self.inner.ttl.is_zero() {
            *slot = Some(CachedSnapshot {
                snapshot: snapshot.clone(),
                fetched_at: Instant::now(),
            });
        }
        Ok(snapshot)
    }

    async fn refresh(&self) -> Result<Snapshot, GatewayError> {
        let run = self.inner.probe.run().await?;
        let path = &self.inner.snapshot_path;

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GatewayError::SnapshotUnavailable(format!(
                    "{} does not exist after probe run",
                    path.display()
                )))
            }
            Err(e) => {
                return Err(GatewayError::SnapshotRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let snapshot = Snapshot::from_slice(&bytes).map_err(|e| match e {
            GatewayError::SnapshotParse(detail) => {
                GatewayError::SnapshotParse(format!("{}: {}", path.display(), detail))
            }
            other => other,
        })?;

        info!(
            snapshot = %path.display(),
            probe_ms = run.elapsed.as_millis() as u64,
            bytes = bytes.len(),
            auth_required = snapshot.auth_required(),
            "Snapshot refreshed"
        );
        Ok(snapshot)
    }
}
