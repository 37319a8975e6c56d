use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::core::SessionState;
use crate::tui::styles::{APP_TITLE, HEADER_COLOR, MUTED_COLOR, SLOW_COLOR, SUCCESS_COLOR};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) fn render_header_content(frame: &mut Frame, session_state: SessionState, area: Rect) {
    let version_text = format!("v{VERSION}");
    let state_text = format!("[{session_state}] ");
    let state_color = match session_state {
        SessionState::Idle => MUTED_COLOR,
        SessionState::Running => SUCCESS_COLOR,
        SessionState::StopRequested => SLOW_COLOR,
    };

    // 中央寄せのためのパディング計算
    let total_width = area.width as usize;
    let title_len = APP_TITLE.len();
    let title_padding = (total_width.saturating_sub(title_len)) / 2;
    let left_padding = title_padding.saturating_sub(state_text.len());

    // バージョン表示の残りスペース計算
    let used_width = state_text.len() + left_padding + title_len + version_text.len();
    let remaining_space = total_width.saturating_sub(used_width);

    let line = Line::from(vec![
        Span::styled(state_text, Style::default().fg(state_color)),
        Span::raw(" ".repeat(left_padding)),
        Span::styled(
            APP_TITLE,
            Style::default()
                .fg(HEADER_COLOR)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(remaining_space)),
        Span::raw(version_text),
    ]);

    let header = Paragraph::new(line).block(Block::default());
    frame.render_widget(header, area);
}
