use std::io;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Failed to spawn '{0}'. error: {1}")]
    SpawnError(String, io::ErrorKind),
    #[error("'{0}' did not finish within {1:?}")]
    Timeout(String, Duration),
}

/// 外部コマンドの実行結果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// 終了ステータスが0だったかどうか
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[cfg(test)]
    pub fn success(stdout: &str) -> Self {
        Self {
            success: true,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    #[cfg(test)]
    pub fn failure(stdout: &str) -> Self {
        Self {
            success: false,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }
}

/// OSのツール(ping, arp)を起動するための抽象化
///
/// ProbeとAddressResolverはこのトレイト経由でのみプロセスを起動する。
/// テストでは合成した出力を返す実装に差し替える。
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandOutput, CommandError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        timeout_duration: Duration,
    ) -> Result<CommandOutput, CommandError> {
        debug!("Running command: {program} {}", args.join(" "));

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // タイムアウトでFutureが破棄された場合は子プロセスも終了させる
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CommandError::SpawnError(program.to_string(), e.kind()))?;

        let output = timeout(timeout_duration, child.wait_with_output())
            .await
            .map_err(|_| CommandError::Timeout(program.to_string(), timeout_duration))?
            .map_err(|e| CommandError::SpawnError(program.to_string(), e.kind()))?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error() {
        // [正常系] エラーの表示確認
        let error = CommandError::SpawnError("arp".to_string(), io::ErrorKind::NotFound);
        assert_eq!(
            error.to_string(),
            format!("Failed to spawn 'arp'. error: {}", io::ErrorKind::NotFound)
        );

        let error = CommandError::Timeout("ping".to_string(), Duration::from_secs(5));
        assert_eq!(error.to_string(), "'ping' did not finish within 5s");
    }

    #[tokio::test]
    async fn test_run_missing_program() {
        // [異常系] 存在しないコマンドはSpawnErrorになる
        let runner = SystemCommandRunner;
        let result = runner
            .run(
                "pingmon-command-that-does-not-exist",
                &[],
                Duration::from_secs(1),
            )
            .await;

        assert!(matches!(
            result,
            Err(CommandError::SpawnError(_, io::ErrorKind::NotFound))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captures_output() {
        // [正常系] 標準出力と終了ステータスを取得できる
        let runner = SystemCommandRunner;
        let output = runner
            .run(
                "sh",
                &["-c".to_string(), "echo hello".to_string()],
                Duration::from_secs(5),
            )
            .await
            .unwrap();
        assert!(output.success);
        assert_eq!(output.stdout.trim(), "hello");

        // [正常系] 非0の終了ステータス
        let output = runner
            .run(
                "sh",
                &["-c".to_string(), "exit 2".to_string()],
                Duration::from_secs(5),
            )
            .await
            .unwrap();
        assert!(!output.success);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_timeout() {
        // [異常系] タイムアウトを超えた場合はTimeoutになる
        let runner = SystemCommandRunner;
        let result = runner
            .run(
                "sh",
                &["-c".to_string(), "sleep 5".to_string()],
                Duration::from_millis(100),
            )
            .await;

        assert!(matches!(result, Err(CommandError::Timeout(_, _))));
    }
}
