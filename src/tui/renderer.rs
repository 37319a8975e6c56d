use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::tui::components::{footer, header, input, timeline};
use crate::tui::models::AppState;
use crate::tui::styles::{FOOTER_HEIGHT, HEADER_HEIGHT, INPUT_HEIGHT};

/// 全UIコンポーネントを統制するメインレンダー関数
pub(crate) fn render(frame: &mut Frame, app_state: &AppState) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT), // ヘッダー
            Constraint::Length(INPUT_HEIGHT),  // 入力欄
            Constraint::Min(0),                // タイムライン
            Constraint::Length(FOOTER_HEIGHT), // フッター
        ])
        .split(frame.area());

    header::render_header_content(frame, app_state.session_state, main_layout[0]);
    input::render_input_content(frame, app_state, main_layout[1]);
    timeline::render_timeline_content(frame, app_state, main_layout[2]);
    footer::render_footer_content(frame, app_state, main_layout[3]);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::config::Config;
    use crate::core::events::ProbeEvent;
    use crate::core::{AddressResult, Event, ProbeResult, Severity};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_render() {
        // [正常系] 入力欄とタイムラインの内容が描画される
        let config = Config {
            targets: vec!["192.168.1.1".to_string()],
            ..Config::default()
        };
        let mut app_state = AppState::new(&config);
        app_state.apply_event(Event::Probe(ProbeEvent {
            target: "192.168.1.1".to_string(),
            timestamp: chrono::Local::now(),
            round: 1,
            result: ProbeResult::Latency(12.5),
            severity: Some(Severity::Fast),
            address: AddressResult::Address("aa:bb:cc:dd:ee:ff".to_string()),
        }));

        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal.draw(|frame| render(frame, &app_state)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Pingmon - Ping & MAC Address Monitor"));
        assert!(text.contains("[idle]"));
        assert!(text.contains("192.168.1.1 - 12.5ms"));
        assert!(text.contains("MAC: aa:bb:cc:dd:ee:ff"));
        assert!(text.contains("Enter: Start"));
    }

    #[test]
    fn test_render_small_area() {
        // [正常系] 表示領域が極端に小さくてもパニックしない
        let app_state = AppState::new(&Config::default());
        let mut terminal = Terminal::new(TestBackend::new(10, 3)).unwrap();
        terminal.draw(|frame| render(frame, &app_state)).unwrap();
    }
}
