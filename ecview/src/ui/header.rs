//! Top header: title, loop state, counters and key hints.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::theme;
use crate::update::{LoopState, LoopStatus};

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, title: &str, status: &LoopStatus) {
    let (label, color) = match status.state {
        LoopState::Running => ("RUNNING", theme::RUNNING),
        LoopState::Paused => ("PAUSED", theme::PAUSED),
    };
    let updated = status
        .last_update
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".into());

    let mut spans = vec![
        Span::styled(title.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" — "),
        Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            " | samples: {} | updated: {updated}",
            status.accepted
        )),
    ];
    if status.skipped > 0 {
        let reason = status.last_skip.as_deref().unwrap_or("?");
        spans.push(Span::styled(
            format!(" | skipped: {} ({reason})", status.skipped),
            Style::default().fg(theme::SKIP),
        ));
    }
    spans.push(Span::raw("  (q quit, w pause)"));

    let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(p, area);
}
