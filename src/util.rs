/// Asserts that a numerical value is in the provided interval `[a,b]` and panics
/// with a helpful message if not
///
/// ### Example
/// ```
/// # use rl_dp::assert_interval;
/// let gamma = 0.9;
/// assert_interval!(gamma, 0.0, 1.0);
/// ```
/// A value of `2.0` would panic with the message "Invalid value for \`gamma\`. Must be in the interval \[0.0, 1.0\]."
#[macro_export]
macro_rules! assert_interval {
    ($var:expr, $a:expr, $b:expr) => {
        assert!(
            $var >= $a && $var <= $b,
            "Invalid value for `{}`. Must be in the interval [{}, {}].",
            stringify!($var),
            $a,
            $b,
        );
    };
}

/// Sup-norm distance between two equally sized value functions
///
/// A NaN difference (e.g. from two infinite values) counts as an infinite gap
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x - y).abs() {
            d if d.is_nan() => f64::INFINITY,
            d => d,
        })
        .fold(0.0, f64::max)
}

/// Index of the largest value, preferring the first occurrence on ties
///
/// **Panics** if `values` is empty
pub fn argmax(values: &[f64]) -> (usize, f64) {
    assert!(!values.is_empty(), "argmax of an empty slice");
    values
        .iter()
        .copied()
        .enumerate()
        .fold((0, values[0]), |best, (i, v)| if v > best.1 { (i, v) } else { best })
}
