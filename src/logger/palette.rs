//! Dracula colour shades used by the console logger

use std::fmt::Display;
use yansi::{Color, Paint};

use super::LogType;

/// Light foreground, `#f8f8f2`
pub const LOG: Color = Color::RGB(0xf8, 0xf8, 0xf2);
/// Yellow, `#f1fa8c`
pub const WARN: Color = Color::RGB(0xf1, 0xfa, 0x8c);
/// Red, `#ff5555`
pub const ERROR: Color = Color::RGB(0xff, 0x55, 0x55);
/// Purple, `#bd93f9`
pub const TRACE: Color = Color::RGB(0xbd, 0x93, 0xf9);

/// Colour assigned to a log type
pub fn color_for(log_type: LogType) -> Color {
    match log_type {
        LogType::Log => LOG,
        LogType::Warn => WARN,
        LogType::Error => ERROR,
        LogType::Trace => TRACE,
    }
}

/// Wraps `item` in the colour of `log_type`
pub fn paint<T: Display>(log_type: LogType, item: T) -> Paint<T> {
    Paint::new(item).fg(color_for(log_type))
}
