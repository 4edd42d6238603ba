//! Small carrier math helpers

/// Fractional part of a cycle count, always in [0, 1)
///
/// A NaN or infinite count has no meaningful position and maps to 0.
#[inline]
pub fn fract_cycle(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    let frac = raw - raw.floor();
    // floor() of a value just below an integer can leave exactly 1.0
    if frac >= 1.0 {
        0.0
    } else {
        frac
    }
}

/// Center-aligned counter for a cycle position in [0, 1)
///
/// Rises from 0 at the period start to 1 at mid-period, then falls back.
#[inline]
pub fn triangle(frac: f64) -> f64 {
    1.0 - (2.0 * frac - 1.0).abs()
}

/// Distance from a cycle position to the nearest period start
#[inline]
pub fn distance_to_period_start(frac: f64) -> f64 {
    frac.min(1.0 - frac)
}

/// Reduce a cycle count to its shortest equivalent in [-0.5, 0.5]
#[inline]
pub fn shortest_cycles(cycles: f64) -> f64 {
    cycles - cycles.round()
}
