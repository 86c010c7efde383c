//! Small UI helpers: axis extents and labels.

/// Widens a zero-width extent so the chart still has something to draw into.
pub fn non_degenerate(lo: f64, hi: f64) -> [f64; 2] {
    if hi > lo {
        [lo, hi]
    } else {
        [lo - 1.0, lo + 1.0]
    }
}

/// Three evenly spaced labels: low, middle, high.
pub fn axis_labels(lo: f64, hi: f64, decimals: usize) -> Vec<String> {
    let mid = lo + (hi - lo) / 2.0;
    [lo, mid, hi]
        .iter()
        .map(|v| format!("{v:.decimals$}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_extent_is_padded() {
        assert_eq!(non_degenerate(5.0, 5.0), [4.0, 6.0]);
        assert_eq!(non_degenerate(0.0, 2.0), [0.0, 2.0]);
    }

    #[test]
    fn labels_cover_the_extent() {
        assert_eq!(axis_labels(0.0, 10.0, 0), vec!["0", "5", "10"]);
        assert_eq!(axis_labels(-5.0, 50.0, 1), vec!["-5.0", "22.5", "50.0"]);
    }
}
