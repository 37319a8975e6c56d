use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use env_logger::Env;
use log::{error, info, warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::cli::Cli;
use crate::core::{ChannelSink, Event};

mod cli;
mod config;
mod core;
mod net_utils;
mod tui;

/// 終了時に監視セッションの停止を待つ上限
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> Result<()> {
    #[cfg(all(debug_assertions, feature = "tokio-console"))]
    console_subscriber::init();
    env_logger::init_from_env(Env::default().default_filter_or("error"));
    color_eyre::install().map_err(|e| {
        error!("Failed to install color_eyre: {e}");
        anyhow::anyhow!("Failed to install color_eyre")
    })?;

    let cli = Cli::parse();
    let config = cli.load_config()?;

    // 監視イベント用のチャネルを作成
    let (event_sender, event_receiver) = mpsc::channel::<Event>(config.buffer_size.max(1));
    let sink = Arc::new(ChannelSink::new(event_sender));
    let monitor = Arc::new(core::system_monitor(&config));
    let token = CancellationToken::new();

    // Ctrl-Cシグナルで終了する
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down");
            signal_token.cancel();
        }
    });

    if let Err(e) = tui::run_tui(
        token.clone(),
        Arc::clone(&monitor),
        sink,
        event_receiver,
        &config,
    )
    .await
    {
        error!("Error has occurred in TUI: {e}");
    }

    // 実行中のセッションを止めて終了を待つ
    token.cancel();
    monitor.stop();
    if tokio::time::timeout(SHUTDOWN_TIMEOUT, monitor.wait_idle())
        .await
        .is_err()
    {
        warn!("Monitoring session did not stop within {SHUTDOWN_TIMEOUT:?}");
    }

    Ok(())
}
