/// ラウンド区切りの幅
pub const SEPARATOR_WIDTH: usize = 50;

/// レイアウトの高さ
pub const HEADER_HEIGHT: u16 = 1;
pub const INPUT_HEIGHT: u16 = 3;
pub const FOOTER_HEIGHT: u16 = 1;

/// UIテキスト定数
pub const APP_TITLE: &str = "Pingmon - Ping & MAC Address Monitor";
pub const INPUT_TITLE: &str = " Target IP (comma separated) ";
pub const TIMELINE_TITLE: &str = " Output ";
pub const FOOTER_TEXT_IDLE: &str =
    "Enter: Start | Esc: Stop | Ctrl-L: Clear output | Ctrl-C: Quit";
pub const FOOTER_TEXT_RUNNING: &str = "Esc: Stop | Ctrl-L: Clear output | Ctrl-C: Quit";
