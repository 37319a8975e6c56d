use ratatui::style::Color;

/// コアテーマ色
pub const ERROR_COLOR: Color = Color::Red;
pub const SUCCESS_COLOR: Color = Color::Green;
pub const MUTED_COLOR: Color = Color::Gray;

/// レイテンシ帯域ごとの色
pub const FAST_COLOR: Color = Color::Rgb(0x00, 0xff, 0x00);
pub const MEDIUM_COLOR: Color = Color::Rgb(0xff, 0xff, 0x00);
pub const SLOW_COLOR: Color = Color::Rgb(0xff, 0x55, 0x55);

/// 到達不能時の色
pub const UNREACHABLE_COLOR: Color = Color::Rgb(0xff, 0x33, 0x33);
/// MACアドレス行の色
pub const MAC_COLOR: Color = Color::Rgb(0xff, 0xa5, 0x00);

/// UI要素の色
pub const HEADER_COLOR: Color = Color::Green;
pub const FOOTER_COLOR: Color = Color::Gray;
pub const INPUT_COLOR: Color = Color::White;
pub const TIMELINE_BORDER_COLOR: Color = Color::DarkGray;
