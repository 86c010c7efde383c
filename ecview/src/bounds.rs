//! Widening-only display range across every series value seen so far.
//!
//! The margin is applied once, at the moment a new extreme is recorded, and is
//! never re-evaluated. A value that lands just inside the margin of an old
//! extreme does not move the range, so after many updates the axis can sit
//! closer to some points than the margin suggests. That is the intended
//! behaviour: the range never shrinks and never jitters.

/// Default padding added outside a new extreme.
pub const DEFAULT_MARGIN: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone)]
pub struct BoundsTracker {
    range: Option<Bounds>,
    margin: f64,
}

impl Default for BoundsTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MARGIN)
    }
}

impl BoundsTracker {
    pub fn new(margin: f64) -> Self {
        Self {
            range: None,
            margin,
        }
    }

    /// Widens the range with `values`. The very first call seeds the range with
    /// the raw extrema of `values` (no margin) before widening.
    pub fn observe(&mut self, values: &[f64]) {
        if self.range.is_none() {
            self.range = raw_extrema(values);
        }
        let Some(range) = self.range.as_mut() else {
            return;
        };
        for &v in values {
            if v < range.min {
                range.min = v - self.margin;
            }
            if v > range.max {
                range.max = v + self.margin;
            }
        }
    }

    /// Current range, `None` until something has been observed.
    pub fn range(&self) -> Option<Bounds> {
        self.range
    }
}

fn raw_extrema(values: &[f64]) -> Option<Bounds> {
    let (first, rest) = values.split_first()?;
    let seed = Bounds {
        min: *first,
        max: *first,
    };
    Some(rest.iter().fold(seed, |b, &v| Bounds {
        min: b.min.min(v),
        max: b.max.max(v),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_uses_raw_extrema() {
        let mut b = BoundsTracker::default();
        assert_eq!(b.range(), None);
        b.observe(&[10.0, 12.0, 9.0]);
        assert_eq!(b.range(), Some(Bounds { min: 9.0, max: 12.0 }));
    }

    #[test]
    fn empty_observation_does_not_seed() {
        let mut b = BoundsTracker::default();
        b.observe(&[]);
        assert_eq!(b.range(), None);
    }

    #[test]
    fn margin_applies_only_to_new_extremes() {
        let mut b = BoundsTracker::new(10.0);
        b.observe(&[10.0, 12.0, 9.0]);
        b.observe(&[40.0, 5.0, 30.0]);
        assert_eq!(b.range(), Some(Bounds { min: -5.0, max: 50.0 }));
        // 45 is above the old extreme 40 but inside the padded range: no change
        b.observe(&[45.0, 0.0, 0.0]);
        assert_eq!(b.range(), Some(Bounds { min: -5.0, max: 50.0 }));
    }
}
