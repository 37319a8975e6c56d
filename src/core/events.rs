use async_trait::async_trait;
use chrono::{DateTime, Local};
use log::warn;
use tokio::sync::mpsc;

use super::classifier::Severity;
use super::probe::ProbeResult;
use super::resolver::AddressResult;

/// 1つの対象に対する1回分の監視結果
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeEvent {
    pub target: String,
    pub timestamp: DateTime<Local>,
    /// セッション内のラウンド番号(1始まり)
    pub round: u64,
    pub result: ProbeResult,
    /// レイテンシが得られた場合のみ設定される
    pub severity: Option<Severity>,
    pub address: AddressResult,
}

/// ラウンドの区切り
#[derive(Debug, Clone, PartialEq)]
pub struct RoundComplete {
    pub timestamp: DateTime<Local>,
    pub round: u64,
}

/// 監視タスクが想定外の理由で終了したことの通知
#[derive(Debug, Clone, PartialEq)]
pub struct SessionAborted {
    pub timestamp: DateTime<Local>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Probe(ProbeEvent),
    RoundComplete(RoundComplete),
    SessionAborted(SessionAborted),
}

/// 監視イベントの受け手
///
/// 監視タスクからのみ順番に呼ばれる。
/// 呼び出しが返るまで監視ループは先に進まないので、長時間ブロックしてはならない。
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn on_probe_event(&self, event: ProbeEvent);

    async fn on_round_complete(&self, event: RoundComplete);

    async fn on_session_aborted(&self, _event: SessionAborted) {}
}

/// 受け取ったイベントをmpscチャネルへ流すEventSink
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Event>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        Self { tx }
    }

    async fn send(&self, event: Event) {
        if let Err(e) = self.tx.send(event).await {
            warn!("Failed to send monitoring event: {e}");
        }
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn on_probe_event(&self, event: ProbeEvent) {
        self.send(Event::Probe(event)).await;
    }

    async fn on_round_complete(&self, event: RoundComplete) {
        self.send(Event::RoundComplete(event)).await;
    }

    async fn on_session_aborted(&self, event: SessionAborted) {
        self.send(Event::SessionAborted(event)).await;
    }
}
