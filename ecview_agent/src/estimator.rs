//! CPU-based power estimators: a fixed min/max model and a linear model that
//! recalibrates itself against a reference meter.

use std::collections::VecDeque;

pub const DEFAULT_PMIN: f64 = 18.75;
pub const DEFAULT_PMAX: f64 = 45.0;

/// `pmin` at idle, `pmax` at full load, linear in between.
#[derive(Debug, Clone, Copy)]
pub struct MinMaxCpu {
    pmin: f64,
    delta: f64,
}

impl MinMaxCpu {
    pub fn new(pmin: f64, pmax: f64) -> Self {
        Self {
            pmin,
            delta: pmax - pmin,
        }
    }

    /// `util` is CPU utilisation in `0.0..=1.0`.
    pub fn estimate(&self, util: f64) -> f64 {
        self.pmin + self.delta * util.clamp(0.0, 1.0)
    }
}

/// `w0 + w1 * util`, refit by least squares over the last `capacity` observations.
#[derive(Debug, Clone)]
pub struct AdaptiveCpu {
    weights: [f64; 2],
    observations: VecDeque<(f64, f64)>,
    capacity: usize,
}

impl AdaptiveCpu {
    pub fn new(weights: [f64; 2], capacity: usize) -> Self {
        Self {
            weights,
            observations: VecDeque::with_capacity(capacity),
            capacity: capacity.max(2),
        }
    }

    pub fn estimate(&self, util: f64) -> f64 {
        self.weights[0] + self.weights[1] * util.clamp(0.0, 1.0)
    }

    /// Records one `(utilisation, measured watts)` pair.
    pub fn observe(&mut self, util: f64, watts: f64) {
        if self.observations.len() == self.capacity {
            self.observations.pop_front();
        }
        self.observations.push_back((util.clamp(0.0, 1.0), watts));
    }

    /// Refits the weights. Keeps the old ones and returns false when the data
    /// cannot determine a slope (fewer than two points, or constant utilisation).
    pub fn calibrate(&mut self) -> bool {
        match fit_line(self.observations.iter().copied()) {
            Some(w) => {
                self.weights = w;
                true
            }
            None => false,
        }
    }

    pub fn weights(&self) -> [f64; 2] {
        self.weights
    }

    /// Observations currently held for the next fit.
    pub fn observed(&self) -> usize {
        self.observations.len()
    }
}

/// Ordinary least squares for `y = w0 + w1 * x`.
fn fit_line(points: impl Iterator<Item = (f64, f64)>) -> Option<[f64; 2]> {
    let (mut n, mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (x, y) in points {
        n += 1.0;
        sx += x;
        sy += y;
        sxx += x * x;
        sxy += x * y;
    }
    if n < 2.0 {
        return None;
    }
    let denom = n * sxx - sx * sx;
    if denom.abs() < 1e-12 {
        return None;
    }
    let w1 = (n * sxy - sx * sy) / denom;
    let w0 = (sy - w1 * sx) / n;
    (w0.is_finite() && w1.is_finite()).then_some([w0, w1])
}
