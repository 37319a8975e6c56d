use std::collections::VecDeque;

use chrono::{DateTime, Local};
use crossterm::event;

use crate::config::Config;
use crate::core::{AddressResult, Event as MonitorEvent, ProbeResult, SessionState, Severity};

#[derive(Debug, Clone)]
pub(crate) enum Event {
    Init,
    Quit,
    Error,
    Render,
    Key(event::KeyEvent),
}

/// キー入力から監視ループへ発行する命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Start(Vec<String>),
    Stop,
}

/// タイムラインの1行
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TimelineEntry {
    Probe {
        timestamp: DateTime<Local>,
        target: String,
        result: ProbeResult,
        severity: Option<Severity>,
    },
    Address(AddressResult),
    Separator,
    Notice(String),
}

pub(crate) struct AppState {
    /// 入力欄の内容(カンマ区切りの対象)
    pub(crate) input: String,
    pub(crate) timeline: VecDeque<TimelineEntry>,
    pub(crate) history_size: usize,
    pub(crate) session_state: SessionState,
}

impl AppState {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            input: config.targets.join(", "),
            timeline: VecDeque::new(),
            history_size: config.history_size.max(1),
            session_state: SessionState::Idle,
        }
    }

    /// 入力欄の内容を対象のリストに分解する
    pub(crate) fn targets(&self) -> Vec<String> {
        self.input
            .split(',')
            .map(str::trim)
            .filter(|target| !target.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub(crate) fn apply_event(&mut self, event: MonitorEvent) {
        match event {
            MonitorEvent::Probe(probe) => {
                self.push(TimelineEntry::Probe {
                    timestamp: probe.timestamp,
                    target: probe.target,
                    result: probe.result,
                    severity: probe.severity,
                });
                self.push(TimelineEntry::Address(probe.address));
            }
            MonitorEvent::RoundComplete(_) => self.push(TimelineEntry::Separator),
            MonitorEvent::SessionAborted(aborted) => {
                self.push_notice(format!("Monitoring aborted: {}", aborted.reason));
            }
        }
    }

    pub(crate) fn push_notice(&mut self, message: impl Into<String>) {
        self.push(TimelineEntry::Notice(message.into()));
    }

    fn push(&mut self, entry: TimelineEntry) {
        self.timeline.push_back(entry);
        while self.timeline.len() > self.history_size {
            self.timeline.pop_front();
        }
    }

    pub(crate) fn clear(&mut self) {
        self.timeline.clear();
    }

    pub(crate) fn is_running(&self) -> bool {
        self.session_state != SessionState::Idle
    }
}
