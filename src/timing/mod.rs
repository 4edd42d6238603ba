//! Carrier timing control
//!
//! Frequency and phase changes are scheduled here so they only ever take
//! effect at a period boundary.

mod continuity;

pub use continuity::ContinuityController;

/// Phase differences at or below this (seconds) are treated as realized
pub const PHASE_EPSILON_S: f64 = 1e-9;

/// Largest phase shift applied in one transitional cycle, in cycles.
///
/// Bounds the borrowed frequency to `[0.8 f, 1.333 f]`; larger requests are
/// split over successive transitional cycles.
pub const MAX_SHIFT_PER_CYCLE: f64 = 0.25;

/// Convert a phase angle in degrees to a phase offset in seconds
///
/// # Arguments
/// * `degrees` - Phase angle (one full period = 360°)
/// * `frequency_hz` - Carrier frequency the angle refers to
#[inline]
pub fn phase_offset_from_degrees(degrees: f64, frequency_hz: f64) -> f64 {
    degrees / 360.0 / frequency_hz
}

/// Convert a phase angle in radians to a phase offset in seconds
#[inline]
pub fn phase_offset_from_radians(radians: f64, frequency_hz: f64) -> f64 {
    radians / (2.0 * std::f64::consts::PI) / frequency_hz
}
