//! Multi-series line chart over the current window.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph},
};

use crate::bounds::Bounds;
use crate::config::DisplayConfig;
use crate::ui::theme::series_color;
use crate::ui::util::{axis_labels, non_degenerate};

/// Owned copy of the last redraw, kept so the chart can be repainted without new data.
#[derive(Debug, Clone, Default)]
pub struct ChartData {
    pub series: Vec<Vec<(f64, f64)>>,
    pub x_bounds: [f64; 2],
    pub y_bounds: Option<Bounds>,
}

pub fn draw_chart(f: &mut ratatui::Frame<'_>, area: Rect, display: &DisplayConfig, data: &ChartData) {
    let block = Block::default().borders(Borders::ALL);
    let Some(y) = data.y_bounds.filter(|_| !data.series.is_empty()) else {
        let para = Paragraph::new("Waiting for samples...").block(block);
        f.render_widget(para, area);
        return;
    };

    let x = non_degenerate(data.x_bounds[0], data.x_bounds[1]);
    let y = non_degenerate(y.min, y.max);

    let datasets: Vec<Dataset> = data
        .series
        .iter()
        .enumerate()
        .map(|(i, pts)| {
            Dataset::default()
                .name(display.series_name(i))
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(series_color(i)))
                .data(pts)
        })
        .collect();

    let x_axis = Axis::default()
        .title(display.x_label.clone())
        .style(Style::default().fg(Color::Gray))
        .bounds(x)
        .labels(axis_labels(x[0], x[1], 0).into_iter().map(Span::raw).collect::<Vec<_>>());
    let y_axis = Axis::default()
        .title(display.y_label.clone())
        .style(Style::default().fg(Color::Gray))
        .bounds(y)
        .labels(axis_labels(y[0], y[1], 1).into_iter().map(Span::raw).collect::<Vec<_>>());

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(x_axis)
        .y_axis(y_axis)
        .legend_position(Some(LegendPosition::BottomLeft))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));
    f.render_widget(chart, area);
}
