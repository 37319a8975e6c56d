use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tui::models::{AppState, Command, Event};

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
    token: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task_tx = tx.clone();
        let token = CancellationToken::new();
        let task_token = token.clone();
        let task = tokio::spawn(async move {
            let mut reader = EventStream::new();

            let _ = task_tx.send(Event::Init);
            loop {
                let event = tokio::select! {
                    _ = task_token.cancelled() => {
                        break;
                    }
                    maybe_event = reader.next().fuse() => match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                            let ctrl_c = key.code == KeyCode::Char('c')
                                && key.modifiers == KeyModifiers::CONTROL;
                            if ctrl_c {
                                Event::Quit
                            } else {
                                Event::Key(key)
                            }
                        }
                        Some(Ok(CrosstermEvent::Resize(_, _))) => Event::Render,
                        Some(Err(_)) => Event::Error,
                        Some(_) => continue,
                        None => break,
                    }
                };
                if task_tx.send(event).is_err() {
                    break;
                }
            }
        });
        Self {
            rx,
            tx,
            token,
            task,
        }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn get_sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.token.cancel();
        self.task.abort();
    }
}

/// キー入力を処理する
/// 監視ループの開始/停止が必要な場合はCommandを返す
pub fn handle_key_event(
    app_state: &mut AppState,
    key: KeyEvent,
    event_sender: &mpsc::UnboundedSender<Event>,
) -> Option<Command> {
    let command = match key.code {
        KeyCode::Enter => Some(Command::Start(app_state.targets())),
        KeyCode::Esc => Some(Command::Stop),
        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app_state.clear();
            None
        }
        KeyCode::Backspace => {
            app_state.input.pop();
            None
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app_state.input.push(c);
            None
        }
        _ => return None,
    };
    let _ = event_sender.send(Event::Render);
    command
}
