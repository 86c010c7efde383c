//! The poll loop: timer ticks pull a sample, feed history and bounds, and ask
//! the renderer to redraw. Key input pauses, resumes or quits.
//!
//! Everything runs on one task. Timer ticks and input events are serialized by
//! `run`'s `select!`, so `LoopState` needs no lock; the only invariant to keep is
//! that at most one timer exists, and none while paused or terminated.

use std::io;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::Event;
use futures::Stream;
use futures_util::StreamExt;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::bounds::{BoundsTracker, DEFAULT_MARGIN};
use crate::error::ReadError;
use crate::history::{SeriesBuffer, SeriesError};
use crate::input::{action_for_event, Action};
use crate::sample::Sample;
use crate::source::SampleSource;
use crate::ui::ChartRenderer;

pub const DEFAULT_PERIOD: Duration = Duration::from_millis(1000);
pub const DEFAULT_WINDOW: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopConfig {
    pub period: Duration,
    pub window: usize,
    pub margin: f64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            window: DEFAULT_WINDOW,
            margin: DEFAULT_MARGIN,
        }
    }
}

/// What the header shows besides the chart itself.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopStatus {
    pub state: LoopState,
    pub accepted: usize,
    pub skipped: usize,
    pub last_skip: Option<String>,
    pub last_update: Option<DateTime<Local>>,
}

impl Default for LoopStatus {
    fn default() -> Self {
        Self {
            state: LoopState::Running,
            accepted: 0,
            skipped: 0,
            last_skip: None,
            last_update: None,
        }
    }
}

/// Outcome of one poll.
#[derive(Debug)]
pub enum Tick {
    Accepted,
    Skipped(ReadError),
}

pub struct UpdateLoop<S, R> {
    source: S,
    renderer: R,
    history: SeriesBuffer,
    bounds: BoundsTracker,
    config: LoopConfig,
    status: LoopStatus,
    timer: Option<Interval>,
    terminated: bool,
    last_timestamp: Option<f64>,
}

impl<S: SampleSource, R: ChartRenderer> UpdateLoop<S, R> {
    pub fn new(source: S, renderer: R, config: LoopConfig) -> Self {
        Self {
            source,
            renderer,
            history: SeriesBuffer::new(),
            bounds: BoundsTracker::new(config.margin),
            config,
            status: LoopStatus::default(),
            timer: None,
            terminated: false,
            last_timestamp: None,
        }
    }

    /// Bootstrap read, first paint, then arm the recurring timer.
    /// Must be called from inside a tokio runtime.
    pub fn start(&mut self) -> io::Result<()> {
        if let Tick::Skipped(e) = self.poll()? {
            debug!("no initial sample yet: {e}");
        }
        self.renderer.update_status(&self.status);
        self.renderer.repaint()?;
        if self.status.state == LoopState::Running && !self.terminated {
            self.arm();
        }
        Ok(())
    }

    /// One timer tick worth of work. Only renderer failures are errors; every
    /// source problem is reported as `Tick::Skipped` and leaves state untouched.
    pub fn poll(&mut self) -> io::Result<Tick> {
        match self.source.read().and_then(|s| self.accept(s)) {
            Ok(()) => {
                self.status.accepted = self.history.len();
                self.status.last_update = Some(Local::now());
                self.renderer.update_status(&self.status);
                let window = self.history.window(self.config.window);
                if let Some(bounds) = self.bounds.range() {
                    self.renderer.redraw(&window, bounds)?;
                }
                Ok(Tick::Accepted)
            }
            Err(e) => {
                warn!("skipping tick: {e}");
                self.status.skipped += 1;
                self.status.last_skip = Some(e.kind().to_string());
                self.renderer.update_status(&self.status);
                Ok(Tick::Skipped(e))
            }
        }
    }

    fn accept(&mut self, sample: Sample) -> Result<(), ReadError> {
        let stored = if self.history.is_initialized() {
            self.history.append(&sample)
        } else {
            self.history.initialize(&sample)
        };
        stored.map_err(|e| match e {
            SeriesError::CardinalityMismatch { expected, got } => {
                ReadError::CardinalityMismatch { expected, got }
            }
            other => ReadError::Malformed(other.to_string()),
        })?;
        if let Some(prev) = self.last_timestamp {
            if sample.timestamp() < prev {
                debug!("timestamp went backwards: {} < {prev}", sample.timestamp());
            }
        }
        self.last_timestamp = Some(sample.timestamp());
        self.bounds.observe(sample.series());
        debug!(t = sample.timestamp(), points = self.history.len(), "sample accepted");
        Ok(())
    }

    /// RUNNING cancels the timer; PAUSED re-arms a fresh one.
    pub fn toggle(&mut self) -> io::Result<()> {
        if self.terminated {
            return Ok(());
        }
        self.status.state = match self.status.state {
            LoopState::Running => {
                self.timer = None;
                info!("paused");
                LoopState::Paused
            }
            LoopState::Paused => {
                self.arm();
                info!("resumed");
                LoopState::Running
            }
        };
        self.renderer.update_status(&self.status);
        self.renderer.repaint()
    }

    /// Drops any timer and marks the loop finished. Safe to call repeatedly.
    pub fn terminate(&mut self) {
        if self.terminated {
            return;
        }
        self.timer = None;
        self.terminated = true;
        info!("terminated");
    }

    pub fn apply(&mut self, action: Action) -> io::Result<()> {
        match action {
            Action::Quit => {
                self.terminate();
                Ok(())
            }
            Action::TogglePause => self.toggle(),
        }
    }

    fn arm(&mut self) {
        let mut timer = interval_at(Instant::now() + self.config.period, self.config.period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.timer = Some(timer);
    }

    /// Resolves on the next timer tick; never resolves while no timer is armed.
    pub async fn next_tick(&mut self) {
        match self.timer.as_mut() {
            Some(t) => {
                t.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    /// Drives the loop until `q` or the end of `events`.
    pub async fn run<E>(&mut self, mut events: E) -> io::Result<()>
    where
        E: Stream<Item = io::Result<Event>> + Unpin,
    {
        self.start()?;
        while !self.terminated {
            let wake = tokio::select! {
                _ = self.next_tick() => Wake::Tick,
                ev = events.next() => Wake::Input(ev),
            };
            match wake {
                Wake::Tick => {
                    self.poll()?;
                }
                Wake::Input(Some(Ok(ev))) => {
                    if let Some(action) = action_for_event(&ev) {
                        self.apply(action)?;
                    } else if matches!(ev, Event::Resize(_, _)) {
                        self.renderer.repaint()?;
                    }
                }
                Wake::Input(Some(Err(e))) => return Err(e),
                Wake::Input(None) => self.terminate(),
            }
        }
        Ok(())
    }

    pub fn state(&self) -> LoopState {
        self.status.state
    }

    pub fn status(&self) -> &LoopStatus {
        &self.status
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    pub fn history(&self) -> &SeriesBuffer {
        &self.history
    }

    pub fn bounds(&self) -> &BoundsTracker {
        &self.bounds
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

enum Wake {
    Tick,
    Input(Option<io::Result<Event>>),
}
