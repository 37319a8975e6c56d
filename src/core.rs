use std::time::Duration as StdDuration;

use chrono::Duration;

use crate::config::Config;
use crate::net_utils::command::SystemCommandRunner;

pub mod classifier;
pub mod events;
pub mod monitor;
pub mod probe;
pub mod resolver;

pub use classifier::Severity;
pub use events::{ChannelSink, Event, EventSink};
pub use monitor::{MonitorLoop, MonitorSettings, SessionState};
pub use probe::{Ping, ProbeResult, Prober};
pub use resolver::{AddressResolver, AddressResult, ArpResolver};

/// OSのpingとarpを使うMonitorLoop
pub type SystemMonitor = MonitorLoop<Ping<SystemCommandRunner>, ArpResolver<SystemCommandRunner>>;

impl From<&Config> for MonitorSettings {
    fn from(config: &Config) -> Self {
        let default = MonitorSettings::default();
        Self {
            timeout: to_std_or(config.timeout, default.timeout),
            interval: to_std_or(config.interval, default.interval),
            max_rounds: config.max_rounds,
        }
    }
}

/// 設定からOSのコマンドを使う監視ループを作る
pub fn system_monitor(config: &Config) -> SystemMonitor {
    let settings = MonitorSettings::from(config);
    let arp_timeout = to_std_or(config.arp.timeout, settings.timeout);

    MonitorLoop::new(
        Ping::new(SystemCommandRunner),
        ArpResolver::new(SystemCommandRunner, arp_timeout),
        settings,
    )
}

/// 負の値など変換できない場合は既定値を使う
fn to_std_or(duration: Duration, default: StdDuration) -> StdDuration {
    duration.to_std().unwrap_or(default)
}
