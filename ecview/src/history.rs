//! Per-series sample history and the windowed view handed to the renderer.
//!
//! Storage is column-wise: one timestamp column shared by every series. The
//! full history is retained for the life of the process; a window is a view
//! over the tail, never a truncation. Memory therefore grows by one row per
//! accepted sample (about 8 bytes per field), which is fine for a monitor
//! session but should become an explicit retention policy before anything
//! long-running depends on it.

use thiserror::Error;

use crate::sample::Sample;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("series buffer already initialized")]
    AlreadyInitialized,
    #[error("series buffer not initialized")]
    NotInitialized,
    #[error("sample has {got} fields, expected {expected}")]
    CardinalityMismatch { expected: usize, got: usize },
}

#[derive(Debug, Default)]
pub struct SeriesBuffer {
    timestamps: Vec<f64>,
    // One column per series; every column is as long as `timestamps`.
    series: Vec<Vec<f64>>,
    // Field count of the first sample (timestamp included).
    fields: Option<usize>,
}

impl SeriesBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the series count from `sample` and stores its point.
    pub fn initialize(&mut self, sample: &Sample) -> Result<(), SeriesError> {
        if self.fields.is_some() {
            return Err(SeriesError::AlreadyInitialized);
        }
        self.fields = Some(sample.len());
        self.series = vec![Vec::new(); sample.series().len()];
        self.push(sample);
        Ok(())
    }

    /// Appends one point per series. The buffer is untouched on error.
    pub fn append(&mut self, sample: &Sample) -> Result<(), SeriesError> {
        let expected = self.fields.ok_or(SeriesError::NotInitialized)?;
        if sample.len() != expected {
            return Err(SeriesError::CardinalityMismatch {
                expected,
                got: sample.len(),
            });
        }
        self.push(sample);
        Ok(())
    }

    fn push(&mut self, sample: &Sample) {
        self.timestamps.push(sample.timestamp());
        for (col, v) in self.series.iter_mut().zip(sample.series()) {
            col.push(*v);
        }
    }

    /// The last `size` points of every series (all of them if fewer exist).
    pub fn window(&self, size: usize) -> Window<'_> {
        let start = self.timestamps.len().saturating_sub(size);
        Window {
            timestamps: &self.timestamps[start..],
            series: self.series.iter().map(|c| &c[start..]).collect(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.fields.is_some()
    }

    /// Sample field count fixed at initialization, timestamp included.
    pub fn fields(&self) -> Option<usize> {
        self.fields
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Number of stored points (per series).
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Borrowed tail of a [`SeriesBuffer`].
#[derive(Debug, Clone)]
pub struct Window<'a> {
    timestamps: &'a [f64],
    series: Vec<&'a [f64]>,
}

impl<'a> Window<'a> {
    pub fn timestamps(&self) -> &'a [f64] {
        self.timestamps
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Values of series `idx` in timestamp order.
    pub fn values(&self, idx: usize) -> Option<&'a [f64]> {
        self.series.get(idx).copied()
    }

    /// `(timestamp, value)` pairs for series `idx`, ready for plotting.
    pub fn series_points(&self, idx: usize) -> Vec<(f64, f64)> {
        self.values(idx)
            .map(|vals| {
                self.timestamps
                    .iter()
                    .copied()
                    .zip(vals.iter().copied())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Row view: each timestamp with the values of every series at that instant.
    pub fn points(&self) -> impl Iterator<Item = (f64, Vec<f64>)> + '_ {
        self.timestamps
            .iter()
            .enumerate()
            .map(|(i, t)| (*t, self.series.iter().map(|col| col[i]).collect()))
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// X extent `[first, last]`; a single point gets one synthetic unit.
    pub fn x_bounds(&self) -> Option<[f64; 2]> {
        let first = *self.timestamps.first()?;
        let last = *self.timestamps.last()?;
        if self.timestamps.len() == 1 {
            Some([first, first + 1.0])
        } else {
            Some([first, last])
        }
    }
}
