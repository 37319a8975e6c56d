use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};

use crate::net_utils::command::CommandRunner;

/// プロセス起動やDNS解決にかかる分としてpingのタイムアウトに上乗せする猶予
const PROCESS_GRACE: Duration = Duration::from_secs(1);

/// 1回の到達性確認の結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeResult {
    /// 往復時間(ms)
    Latency(f64),
    Unreachable,
}

impl ProbeResult {
    pub fn latency(&self) -> Option<f64> {
        match self {
            ProbeResult::Latency(ms) => Some(*ms),
            ProbeResult::Unreachable => None,
        }
    }
}

#[async_trait]
pub trait Prober: Send + Sync {
    /// 対象に1回だけEcho Requestを送る
    /// 失敗はすべてUnreachableとして返し、呼び出し元にエラーを返さない
    async fn probe(&self, target: &str, timeout: Duration) -> ProbeResult;
}

/// pingコマンドの引数体系
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

impl Platform {
    pub const fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    /// 1回分のpingを行う引数を組み立てる
    fn ping_args(&self, target: &str, timeout: Duration) -> Vec<String> {
        // Unix系のpingは秒単位なので切り上げる
        let secs = timeout.as_millis().div_ceil(1000).max(1);
        match self {
            Platform::Linux => vec![
                "-c".to_string(),
                "1".to_string(),
                "-W".to_string(),
                secs.to_string(),
                target.to_string(),
            ],
            Platform::MacOs => vec![
                "-c".to_string(),
                "1".to_string(),
                "-t".to_string(),
                secs.to_string(),
                target.to_string(),
            ],
            Platform::Windows => vec![
                "-n".to_string(),
                "1".to_string(),
                "-w".to_string(),
                timeout.as_millis().max(1).to_string(),
                target.to_string(),
            ],
        }
    }
}

/// OSのpingコマンドによるProber
pub struct Ping<R: CommandRunner> {
    runner: R,
    platform: Platform,
}

impl<R: CommandRunner> Ping<R> {
    pub fn new(runner: R) -> Self {
        Self::with_platform(runner, Platform::current())
    }

    pub fn with_platform(runner: R, platform: Platform) -> Self {
        Self { runner, platform }
    }
}

#[async_trait]
impl<R: CommandRunner> Prober for Ping<R> {
    async fn probe(&self, target: &str, timeout: Duration) -> ProbeResult {
        let args = self.platform.ping_args(target, timeout);
        let output = match self.runner.run("ping", &args, timeout + PROCESS_GRACE).await {
            Ok(output) => output,
            Err(e) => {
                warn!("Failed to ping {target}: {e}");
                return ProbeResult::Unreachable;
            }
        };

        if !output.success {
            debug!(
                "Ping to {target} exited with failure status: {}",
                output.stderr.trim()
            );
            return ProbeResult::Unreachable;
        }

        match parse_latency(&output.stdout) {
            Some(latency) => ProbeResult::Latency(latency),
            None => {
                debug!("Ping to {target} succeeded but no round-trip time was reported");
                ProbeResult::Unreachable
            }
        }
    }
}

/// pingの出力から往復時間(ms)を取り出す
///
/// `time=` (Windowsの1ms未満は `time<`) に続くトークンを読む。
/// 単位は `12ms` のように続けて書かれる場合と `0.012 ms` のように
/// 空白を挟む場合の両方があり、値は小数として解釈する。
pub fn parse_latency(output: &str) -> Option<f64> {
    output.lines().find_map(parse_latency_line)
}

fn parse_latency_line(line: &str) -> Option<f64> {
    // ASCIIの小文字化はバイト位置を変えない
    let lower = line.to_ascii_lowercase();
    let marker = lower.find("time=").or_else(|| lower.find("time<"))?;
    let rest = &lower[marker + "time=".len()..];

    let token = rest.split_whitespace().next()?;
    let value = token.strip_suffix("ms").unwrap_or(token);
    let latency = value.parse::<f64>().ok()?;

    (latency.is_finite() && latency >= 0.0).then_some(latency)
}
