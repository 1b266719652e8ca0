//! Layout sizes and fixed strings for the terminal UI.

pub const INPUT_HEIGHT: u16 = 3;
pub const FILTER_BAR_HEIGHT: u16 = 3;
pub const LIST_MIN_HEIGHT: u16 = 3;
pub const SUMMARY_HEIGHT: u16 = 3;
/// Help line plus message line, inside borders.
pub const STATUS_HEIGHT: u16 = 4;

pub const HIGHLIGHT_SYMBOL: &str = "▶ ";
pub const ACTIVE_MARKER: &str = "[ ] ";
pub const COMPLETED_MARKER: &str = "[x] ";

pub const INPUT_PLACEHOLDER: &str = "What needs to be done?";
pub const NOT_SAVED_WARNING: &str = "Changes are not being saved; they will be lost on exit";
