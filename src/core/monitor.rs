use std::fmt::{self, Display};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use futures::FutureExt;
use itertools::Itertools;
use log::{debug, error, info};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::classifier::Severity;
use super::events::{EventSink, ProbeEvent, RoundComplete, SessionAborted};
use super::probe::Prober;
use super::resolver::AddressResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    /// 停止要求済みで、監視タスクがまだ終了していない
    StopRequested,
}

impl Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::StopRequested => "stopping",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Monitoring session is already {0}")]
    AlreadyRunning(SessionState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    /// 1回のpingのタイムアウト
    pub timeout: Duration,
    /// ラウンド間の待機時間
    pub interval: Duration,
    /// このラウンド数を終えたらセッションを終了する
    /// Noneの場合は停止されるまで続ける
    pub max_rounds: Option<u64>,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            interval: Duration::from_secs(2),
            max_rounds: None,
        }
    }
}

/// 制御側と監視タスクで共有する状態
struct Shared {
    state: watch::Sender<SessionState>,
    /// 実行中セッションの停止用トークン
    /// 状態遷移はこのロックを保持したまま行う
    token: Mutex<Option<CancellationToken>>,
}

/// 対象の一覧を定期的に監視し、結果をEventSinkへ流す
pub struct MonitorLoop<P, R> {
    prober: Arc<P>,
    resolver: Arc<R>,
    settings: MonitorSettings,
    shared: Arc<Shared>,
}

impl<P, R> MonitorLoop<P, R>
where
    P: Prober + 'static,
    R: AddressResolver + 'static,
{
    pub fn new(prober: P, resolver: R, settings: MonitorSettings) -> Self {
        let (state, _) = watch::channel(SessionState::Idle);
        Self {
            prober: Arc::new(prober),
            resolver: Arc::new(resolver),
            settings,
            shared: Arc::new(Shared {
                state,
                token: Mutex::new(None),
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.shared.state.borrow()
    }

    /// セッション状態の変化を購読する
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state.subscribe()
    }

    /// 監視セッションをバックグラウンドで開始する
    ///
    /// 呼び出しはすぐに返り、以降の結果はすべて `sink` に届く。
    /// 対象が空、空白のみ、または'-'で始まる場合、およびセッションが終了していない場合はエラーとなり、
    /// タスクは起動しない。
    pub fn start<I, S>(&self, targets: I, sink: Arc<dyn EventSink>) -> Result<(), MonitorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let targets = validate_targets(targets)?;

        let mut slot = self.shared.token.lock();
        let mut current = SessionState::Idle;
        let started = self.shared.state.send_if_modified(|state| {
            if *state == SessionState::Idle {
                *state = SessionState::Running;
                true
            } else {
                current = *state;
                false
            }
        });
        if !started {
            return Err(MonitorError::AlreadyRunning(current));
        }

        let token = CancellationToken::new();
        *slot = Some(token.clone());
        drop(slot);

        info!("Starting monitoring session: [{}]", targets.iter().join(", "));

        let session = Session {
            targets,
            prober: self.prober.clone(),
            resolver: self.resolver.clone(),
            settings: self.settings,
            sink: sink.clone(),
            token,
        };
        let shared = self.shared.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::spawn(session.run()).await {
                error!("Monitoring session terminated unexpectedly: {e}");
                let aborted = SessionAborted {
                    timestamp: Local::now(),
                    reason: e.to_string(),
                };
                if AssertUnwindSafe(sink.on_session_aborted(aborted))
                    .catch_unwind()
                    .await
                    .is_err()
                {
                    error!("Event sink panicked while reporting the aborted session");
                }
            }
            shared.finish();
        });

        Ok(())
    }

    /// 実行中のセッションに停止を要求する
    ///
    /// 完了を待たずに返る。監視タスクは次の対象の前、またはラウンド間の待機中に停止する。
    /// 実行中でなければ何もしない。
    pub fn stop(&self) {
        let slot = self.shared.token.lock();
        let requested = self.shared.state.send_if_modified(|state| {
            if *state == SessionState::Running {
                *state = SessionState::StopRequested;
                true
            } else {
                false
            }
        });

        if requested {
            if let Some(token) = slot.as_ref() {
                token.cancel();
            }
            info!("Stop requested for monitoring session");
        }
    }

    /// セッションがIdleになるまで待つ
    pub async fn wait_idle(&self) {
        let mut rx = self.shared.state.subscribe();
        let _ = rx.wait_for(|state| *state == SessionState::Idle).await;
    }
}

impl Shared {
    fn finish(&self) {
        let mut slot = self.token.lock();
        *slot = None;
        self.state.send_replace(SessionState::Idle);
        info!("Monitoring session finished");
    }
}

fn validate_targets<I, S>(targets: I) -> Result<Vec<String>, MonitorError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let targets = targets
        .into_iter()
        .map(|target| target.as_ref().trim().to_string())
        .collect::<Vec<_>>();

    if targets.is_empty() {
        return Err(MonitorError::InvalidInput(
            "at least one target is required".to_string(),
        ));
    }
    if let Some(index) = targets.iter().position(|target| target.is_empty()) {
        return Err(MonitorError::InvalidInput(format!(
            "target #{} is blank",
            index + 1
        )));
    }
    // pingやarpのオプションとして解釈されるため受け付けない
    if let Some(target) = targets.iter().find(|target| target.starts_with('-')) {
        return Err(MonitorError::InvalidInput(format!(
            "target '{target}' must not start with '-'"
        )));
    }

    Ok(targets)
}

/// 1回の監視セッションでバックグラウンドタスクが所有するもの
struct Session<P, R> {
    targets: Vec<String>,
    prober: Arc<P>,
    resolver: Arc<R>,
    settings: MonitorSettings,
    sink: Arc<dyn EventSink>,
    token: CancellationToken,
}

impl<P: Prober, R: AddressResolver> Session<P, R> {
    async fn run(self) {
        let mut round = 0;
        loop {
            round += 1;
            debug!("Starting round {round}");

            for target in &self.targets {
                // 停止要求は対象ごとの境界でのみ確認する
                if self.token.is_cancelled() {
                    info!("Monitoring stopped during round {round}");
                    return;
                }
                let event = self.probe_target(target, round).await;
                self.sink.on_probe_event(event).await;
            }

            self.sink
                .on_round_complete(RoundComplete {
                    timestamp: Local::now(),
                    round,
                })
                .await;

            if self.settings.max_rounds.is_some_and(|max| round >= max) {
                info!("Reached the round limit ({round})");
                return;
            }

            tokio::select! {
                _ = self.token.cancelled() => {
                    info!("Monitoring stopped after round {round}");
                    return;
                }
                _ = sleep(self.settings.interval) => {}
            }
        }
    }

    async fn probe_target(&self, target: &str, round: u64) -> ProbeEvent {
        let result = self.prober.probe(target, self.settings.timeout).await;
        let severity = result.latency().map(Severity::classify);
        let address = self.resolver.resolve(target).await;
        debug!("{target}: {result:?} ({address})");

        ProbeEvent {
            target: target.to_string(),
            timestamp: Local::now(),
            round,
            result,
            severity,
            address,
        }
    }
}
