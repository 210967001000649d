//! Assertion utilities for floating-point values and color ramps.

use adcirc_tiles::ColorStop;

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Assert that two values are approximately equal.
///
/// # Panics
///
/// Panics if the absolute difference between `actual` and `expected` is greater than `epsilon`.
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: Option<f64>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();

    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// Assert that two slices are approximately element-wise equal.
pub fn assert_array_approx_eq(actual: &[f64], expected: &[f64], epsilon: Option<f64>) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Arrays have different lengths: actual = {}, expected = {}",
        actual.len(),
        expected.len()
    );

    let eps = epsilon.unwrap_or(DEFAULT_EPSILON);
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= eps,
            "Arrays differ at index {}: actual = {}, expected = {}",
            i,
            a,
            e
        );
    }
}

/// Assert stop values never decrease
pub fn assert_non_decreasing(stops: &[ColorStop]) {
    for pair in stops.windows(2) {
        assert!(
            pair[1].value >= pair[0].value,
            "Stops decrease: {} then {}",
            pair[0].value,
            pair[1].value
        );
    }
}

/// Assert no two neighbouring stops share a color
pub fn assert_no_adjacent_duplicate_colors(stops: &[ColorStop]) {
    for (i, pair) in stops.windows(2).enumerate() {
        assert_ne!(
            pair[0].color,
            pair[1].color,
            "Stops {} and {} share color {}",
            i,
            i + 1,
            pair[0].hex()
        );
    }
}
