use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::models::AppState;
use crate::tui::styles::{INPUT_COLOR, INPUT_TITLE, MUTED_COLOR};

pub(crate) fn render_input_content(frame: &mut Frame, app_state: &AppState, area: Rect) {
    // 監視中は入力しても次の開始まで反映されないため淡色で表示する
    let color = if app_state.is_running() {
        MUTED_COLOR
    } else {
        INPUT_COLOR
    };

    let input = Paragraph::new(app_state.input.as_str())
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL).title(INPUT_TITLE));
    frame.render_widget(input, area);

    let cursor_x = area
        .x
        .saturating_add(1)
        .saturating_add(app_state.input.chars().count() as u16)
        .min(area.right().saturating_sub(2));
    frame.set_cursor_position(Position::new(cursor_x, area.y + 1));
}
