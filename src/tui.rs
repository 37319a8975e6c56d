use std::sync::Arc;

use color_eyre::Result;
use events::{EventHandler, handle_key_event};
use log::{info, warn};
use models::{AppState, Command, Event};
use ratatui::DefaultTerminal;
use renderer::render;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::{AddressResolver, Event as MonitorEvent, EventSink, MonitorLoop, Prober};

pub(crate) mod components;
pub(crate) mod events;
pub(crate) mod models;
pub(crate) mod renderer;
pub(crate) mod styles;

pub(crate) async fn run_tui<P, R>(
    token: CancellationToken,
    monitor: Arc<MonitorLoop<P, R>>,
    sink: Arc<dyn EventSink>,
    monitor_receiver: mpsc::Receiver<MonitorEvent>,
    config: &Config,
) -> Result<()>
where
    P: Prober + 'static,
    R: AddressResolver + 'static,
{
    let terminal = ratatui::init();
    let result = run(token, terminal, monitor, sink, monitor_receiver, config).await;
    ratatui::restore();
    result
}

async fn run<P, R>(
    token: CancellationToken,
    mut terminal: DefaultTerminal,
    monitor: Arc<MonitorLoop<P, R>>,
    sink: Arc<dyn EventSink>,
    mut monitor_receiver: mpsc::Receiver<MonitorEvent>,
    config: &Config,
) -> Result<()>
where
    P: Prober + 'static,
    R: AddressResolver + 'static,
{
    let mut events = EventHandler::new();
    let event_sender = events.get_sender();
    let mut app_state = AppState::new(config);
    let mut state_receiver = monitor.subscribe();
    app_state.session_state = *state_receiver.borrow_and_update();

    // 設定やコマンドラインで対象が与えられていればすぐに監視を始める
    if !config.targets.is_empty() {
        execute(
            &monitor,
            &sink,
            &mut app_state,
            Command::Start(config.targets.clone()),
        );
    }

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                monitor.stop();
                break;
            }
            Some(event) = events.next() => {
                match event {
                    Event::Quit => {
                        monitor.stop();
                        token.cancel();
                        break;
                    },
                    Event::Init | Event::Render => {
                        terminal.draw(|frame| render(frame, &app_state))?;
                    },
                    Event::Key(key) => {
                        let command = handle_key_event(&mut app_state, key, &event_sender);
                        if let Some(command) = command {
                            execute(&monitor, &sink, &mut app_state, command);
                            let _ = event_sender.send(Event::Render);
                        }
                    },
                    Event::Error => warn!("Failed to read terminal event"),
                }
            }
            Some(monitor_event) = monitor_receiver.recv() => {
                app_state.apply_event(monitor_event);
                let _ = event_sender.send(Event::Render);
            }
            Ok(()) = state_receiver.changed() => {
                app_state.session_state = *state_receiver.borrow_and_update();
                let _ = event_sender.send(Event::Render);
            }
        }
    }
    Ok(())
}

/// キー入力から得た命令を監視ループに発行する
fn execute<P, R>(
    monitor: &MonitorLoop<P, R>,
    sink: &Arc<dyn EventSink>,
    app_state: &mut AppState,
    command: Command,
) where
    P: Prober + 'static,
    R: AddressResolver + 'static,
{
    match command {
        Command::Start(targets) => match monitor.start(targets, Arc::clone(sink)) {
            Ok(()) => info!("Monitoring started"),
            Err(e) => {
                warn!("Failed to start monitoring: {e}");
                app_state.push_notice(e.to_string());
            }
        },
        Command::Stop => monitor.stop(),
    }
}
