//! SeriesBuffer: windowing and cardinality rules.
use ecview::history::{SeriesBuffer, SeriesError};
use ecview::sample::Sample;

fn sample(line: &str) -> Sample {
    line.parse().expect("valid sample")
}

fn filled(n: usize) -> SeriesBuffer {
    let mut buf = SeriesBuffer::new();
    for i in 0..n {
        let s = sample(&format!("{i} {} {} {}", i * 10, i * 10 + 1, i * 10 + 2));
        if i == 0 {
            buf.initialize(&s).unwrap();
        } else {
            buf.append(&s).unwrap();
        }
    }
    buf
}

#[test]
fn window_returns_most_recent_points_in_order() {
    for n in 1..8 {
        let buf = filled(n);
        for size in 1..10 {
            let w = buf.window(size);
            let expect = size.min(n);
            assert_eq!(w.len(), expect, "n={n} size={size}");
            let first = (n - expect) as f64;
            let ts: Vec<f64> = (0..expect).map(|k| first + k as f64).collect();
            assert_eq!(w.timestamps(), ts.as_slice());
            for idx in 0..3 {
                assert_eq!(w.values(idx).unwrap().len(), expect);
            }
        }
    }
}

#[test]
fn window_is_a_view_not_a_truncation() {
    let buf = filled(5);
    let w = buf.window(3);
    assert_eq!(w.timestamps(), &[2.0, 3.0, 4.0]);
    assert_eq!(w.values(0).unwrap(), &[20.0, 30.0, 40.0]);
    assert_eq!(w.series_points(2), vec![(2.0, 22.0), (3.0, 32.0), (4.0, 42.0)]);
    assert_eq!(buf.len(), 5);
    assert_eq!(buf.window(100).len(), 5);
}

#[test]
fn rows_pair_timestamp_with_every_series() {
    let buf = filled(2);
    let rows: Vec<(f64, Vec<f64>)> = buf.window(10).points().collect();
    assert_eq!(
        rows,
        vec![(0.0, vec![0.0, 1.0, 2.0]), (1.0, vec![10.0, 11.0, 12.0])]
    );
}

#[test]
fn x_bounds_span_the_window() {
    let buf = filled(1);
    assert_eq!(buf.window(100).x_bounds(), Some([0.0, 1.0]));
    let buf = filled(150);
    assert_eq!(buf.window(100).x_bounds(), Some([50.0, 149.0]));
    assert_eq!(SeriesBuffer::new().window(100).x_bounds(), None);
}

#[test]
fn initialize_fixes_cardinality_once() {
    let mut buf = SeriesBuffer::new();
    assert!(!buf.is_initialized());
    buf.initialize(&sample("0 1 2 3 4")).unwrap();
    assert_eq!(buf.series_count(), 4);
    assert_eq!(buf.fields(), Some(5));
    assert_eq!(
        buf.initialize(&sample("1 1 2 3 4")),
        Err(SeriesError::AlreadyInitialized)
    );
    assert_eq!(buf.len(), 1);
}

#[test]
fn append_requires_matching_length() {
    let mut buf = SeriesBuffer::new();
    assert_eq!(
        buf.append(&sample("0 1 2 3")),
        Err(SeriesError::NotInitialized)
    );
    buf.initialize(&sample("0 1 2 3")).unwrap();
    assert_eq!(
        buf.append(&sample("1 1 2 3 4")),
        Err(SeriesError::CardinalityMismatch { expected: 4, got: 5 })
    );
    assert_eq!(buf.len(), 1);
    buf.append(&sample("1 4 5 6")).unwrap();
    assert_eq!(buf.len(), 2);
    for idx in 0..buf.series_count() {
        assert_eq!(buf.window(10).values(idx).unwrap().len(), buf.len());
    }
}
