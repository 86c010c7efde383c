//! UI module root: the renderer contract and its terminal implementation.

pub mod chart;
pub mod header;
pub mod theme;
pub mod util;

use std::io;

use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::bounds::Bounds;
use crate::config::DisplayConfig;
use crate::history::Window;
use crate::update::LoopStatus;
use chart::{draw_chart, ChartData};
use header::draw_header;

/// Something that can show the current window.
pub trait ChartRenderer {
    /// Draw the window after an accepted sample.
    fn redraw(&mut self, window: &Window<'_>, bounds: Bounds) -> io::Result<()>;

    /// Remember the status for the next paint. Never paints by itself.
    fn update_status(&mut self, _status: &LoopStatus) {}

    /// Paint again with the data of the last redraw (pause toggle, resize).
    fn repaint(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Draws onto a ratatui terminal: a one-line header above the chart.
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
    display: DisplayConfig,
    data: ChartData,
    status: LoopStatus,
}

impl<B: Backend> TerminalRenderer<B> {
    pub fn new(terminal: Terminal<B>, display: DisplayConfig) -> Self {
        Self {
            terminal,
            display,
            data: ChartData::default(),
            status: LoopStatus::default(),
        }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    fn paint(&mut self) -> io::Result<()> {
        let display = &self.display;
        let data = &self.data;
        let status = &self.status;
        self.terminal.draw(|f| {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(2), Constraint::Min(5)])
                .split(f.area());
            draw_header(f, rows[0], &display.title, status);
            draw_chart(f, rows[1], display, data);
        })?;
        Ok(())
    }
}

impl<B: Backend> ChartRenderer for TerminalRenderer<B> {
    fn redraw(&mut self, window: &Window<'_>, bounds: Bounds) -> io::Result<()> {
        self.data = ChartData {
            series: (0..window.series_count())
                .map(|i| window.series_points(i))
                .collect(),
            x_bounds: window.x_bounds().unwrap_or([0.0, 1.0]),
            y_bounds: Some(bounds),
        };
        self.paint()
    }

    fn update_status(&mut self, status: &LoopStatus) {
        self.status = status.clone();
    }

    fn repaint(&mut self) -> io::Result<()> {
        self.paint()
    }
}
