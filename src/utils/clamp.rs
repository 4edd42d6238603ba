//! Clamping utilities for normalized carrier quantities

/// Saturate a value into the unit interval [0, 1]
///
/// NaN saturates to 0 so a bad compare value can never hold an output on.
#[inline]
pub fn clamp_unit(val: f64) -> f64 {
    if val >= 1.0 {
        1.0
    } else if val > 0.0 {
        val
    } else {
        0.0
    }
}
