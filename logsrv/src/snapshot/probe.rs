//! 外部プローブの実行
//!
//! プローブは引数なしで起動され、終了コードとスナップショットファイルの書き出しのみが契約。
//! stdoutは読み捨て、stderrはログ出力のためだけに取得する。

use crate::common::error::GatewayError;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::debug;

/// stderrをログに残す最大バイト数
const STDERR_LOG_LIMIT: usize = 2048;

/// 1回のプローブ実行結果
#[derive(Debug, Clone)]
pub struct ProbeRun {
    /// 実行時間
    pub elapsed: Duration,
}

/// プローブ実行器
#[derive(Debug, Clone)]
pub struct ProbeRunner {
    program: PathBuf,
    timeout: Duration,
}

impl ProbeRunner {
    /// 新しい実行器を作成
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// プローブを実行し、正常終了を待つ
    ///
    /// 起動失敗・非ゼロ終了・タイムアウトはいずれも`ProbeExecution`。
    /// タイムアウト時は子プロセスを破棄して終了させる。
    pub async fn run(&self) -> Result<ProbeRun, GatewayError> {
        let started = Instant::now();
        let child = Command::new(&self.program)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GatewayError::ProbeExecution(format!(
                    "failed to spawn {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| {
                GatewayError::ProbeExecution(format!(
                    "failed to wait for {}: {}",
                    self.program.display(),
                    e
                ))
            })?,
            Err(_) => {
                return Err(GatewayError::ProbeExecution(format!(
                    "{} timed out after {:?}",
                    self.program.display(),
                    self.timeout
                )))
            }
        };

        let elapsed = started.elapsed();
        if !output.status.success() {
            return Err(GatewayError::ProbeExecution(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr_excerpt(&output.stderr)
            )));
        }

        debug!(
            probe = %self.program.display(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Probe finished"
        );

        Ok(ProbeRun { elapsed })
    }
}

fn stderr_excerpt(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    if trimmed.len() <= STDERR_LOG_LIMIT {
        return trimmed.to_string();
    }
    let mut cut = trimmed.len() - STDERR_LOG_LIMIT;
    while !trimmed.is_char_boundary(cut) {
        cut += 1;
    }
    format!("...{}", &trimmed[cut..])
}
