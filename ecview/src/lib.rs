//! Live terminal viewer for power telemetry.
//!
//! A [`source::SampleSource`] is polled at a fixed period; each accepted
//! [`sample::Sample`] grows the [`history::SeriesBuffer`] and widens the
//! [`bounds::BoundsTracker`], then the [`ui::ChartRenderer`] redraws the most
//! recent window. [`update::UpdateLoop`] owns all of it and serializes timer
//! ticks with key input.

pub mod app;
pub mod bounds;
pub mod config;
pub mod error;
pub mod history;
pub mod input;
pub mod logging;
pub mod sample;
pub mod source;
pub mod ui;
pub mod update;
