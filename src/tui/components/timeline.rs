use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::core::{ProbeResult, Severity};
use crate::tui::models::{AppState, TimelineEntry};
use crate::tui::styles::{
    ERROR_COLOR, FAST_COLOR, MAC_COLOR, MEDIUM_COLOR, MUTED_COLOR, SEPARATOR_WIDTH, SLOW_COLOR,
    TIMELINE_BORDER_COLOR, TIMELINE_TITLE, UNREACHABLE_COLOR,
};

pub(crate) fn render_timeline_content(frame: &mut Frame, app_state: &AppState, area: Rect) {
    // 枠線の分を除いた表示可能な行数
    let visible_rows = area.height.saturating_sub(2) as usize;
    let skip = app_state.timeline.len().saturating_sub(visible_rows);

    let lines: Vec<Line> = app_state
        .timeline
        .iter()
        .skip(skip)
        .map(timeline_line)
        .collect();

    let timeline = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(TIMELINE_BORDER_COLOR))
            .title(TIMELINE_TITLE),
    );
    frame.render_widget(timeline, area);
}

fn timeline_line(entry: &TimelineEntry) -> Line<'static> {
    let (text, color) = format_entry(entry);
    Line::styled(text, Style::default().fg(color))
}

/// タイムラインの1行を文字列と色に変換する
fn format_entry(entry: &TimelineEntry) -> (String, Color) {
    match entry {
        TimelineEntry::Probe {
            timestamp,
            target,
            result,
            severity,
        } => {
            let timestamp = timestamp.format("%H:%M:%S");
            match result {
                ProbeResult::Latency(latency) => (
                    format!("[{timestamp}] {target} - {latency}ms"),
                    severity.map_or(MUTED_COLOR, severity_color),
                ),
                ProbeResult::Unreachable => (
                    format!("[{timestamp}] {target} - Unreachable"),
                    UNREACHABLE_COLOR,
                ),
            }
        }
        TimelineEntry::Address(address) => (format!("MAC: {address}"), MAC_COLOR),
        TimelineEntry::Separator => ("-".repeat(SEPARATOR_WIDTH), MUTED_COLOR),
        TimelineEntry::Notice(message) => (message.clone(), ERROR_COLOR),
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Fast => FAST_COLOR,
        Severity::Medium => MEDIUM_COLOR,
        Severity::Slow => SLOW_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::*;
    use crate::core::AddressResult;

    fn probe_entry(result: ProbeResult) -> TimelineEntry {
        TimelineEntry::Probe {
            timestamp: Local.with_ymd_and_hms(2024, 1, 2, 9, 5, 7).unwrap(),
            target: "192.168.1.1".to_string(),
            result,
            severity: result.latency().map(Severity::classify),
        }
    }

    #[test]
    fn test_format_probe_entry() {
        // [正常系] 整数のレイテンシ
        assert_eq!(
            format_entry(&probe_entry(ProbeResult::Latency(12.0))),
            ("[09:05:07] 192.168.1.1 - 12ms".to_string(), FAST_COLOR)
        );

        // [正常系] 1ミリ秒未満のレイテンシは丸めない
        assert_eq!(
            format_entry(&probe_entry(ProbeResult::Latency(0.012))),
            ("[09:05:07] 192.168.1.1 - 0.012ms".to_string(), FAST_COLOR)
        );

        // [正常系] 帯域ごとの色
        assert_eq!(
            format_entry(&probe_entry(ProbeResult::Latency(50.0))).1,
            MEDIUM_COLOR
        );
        assert_eq!(
            format_entry(&probe_entry(ProbeResult::Latency(150.0))).1,
            SLOW_COLOR
        );

        // [異常系] 到達不能
        assert_eq!(
            format_entry(&probe_entry(ProbeResult::Unreachable)),
            (
                "[09:05:07] 192.168.1.1 - Unreachable".to_string(),
                UNREACHABLE_COLOR
            )
        );
    }

    #[test]
    fn test_format_other_entries() {
        // [正常系] MACアドレス行
        assert_eq!(
            format_entry(&TimelineEntry::Address(AddressResult::Address(
                "aa:bb:cc:dd:ee:ff".to_string()
            ))),
            ("MAC: aa:bb:cc:dd:ee:ff".to_string(), MAC_COLOR)
        );
        assert_eq!(
            format_entry(&TimelineEntry::Address(AddressResult::NotFound)).0,
            "MAC: Not found"
        );
        assert_eq!(
            format_entry(&TimelineEntry::Address(AddressResult::LookupError)).0,
            "MAC: Error"
        );

        // [正常系] 区切り線
        let (separator, _) = format_entry(&TimelineEntry::Separator);
        assert_eq!(separator.len(), SEPARATOR_WIDTH);
        assert!(separator.chars().all(|c| c == '-'));

        // [異常系] 通知
        assert_eq!(
            format_entry(&TimelineEntry::Notice("Invalid input".to_string())),
            ("Invalid input".to_string(), ERROR_COLOR)
        );
    }
}
