use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Paragraph};

use crate::tui::models::AppState;
use crate::tui::styles::{FOOTER_COLOR, FOOTER_TEXT_IDLE, FOOTER_TEXT_RUNNING};

pub(crate) fn render_footer_content(frame: &mut Frame, app_state: &AppState, area: Rect) {
    let footer_text = if app_state.is_running() {
        FOOTER_TEXT_RUNNING
    } else {
        FOOTER_TEXT_IDLE
    };

    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(FOOTER_COLOR))
        .block(Block::default());
    frame.render_widget(footer, area);
}
