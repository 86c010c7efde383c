//! Shared UI theme constants.

use ratatui::style::Color;

// One colour per series, cycled when there are more series than entries
pub const SERIES_COLORS: &[Color] = &[
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Red,
    Color::Blue,
    Color::LightCyan,
    Color::LightMagenta,
];

pub const PAUSED: Color = Color::Yellow;
pub const RUNNING: Color = Color::Green;
pub const SKIP: Color = Color::Rgb(170, 170, 180);

pub fn series_color(idx: usize) -> Color {
    SERIES_COLORS[idx % SERIES_COLORS.len()]
}
