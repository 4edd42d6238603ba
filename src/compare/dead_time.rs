//! Compare value → lead/lag thresholds

use crate::utils::clamp_unit;

use super::{ComparePair, DeadTime};

/// Split a compare value around a symmetric dead time
///
/// The dead time is normalized by the *active* frequency, i.e. the one the
/// carrier is integrating right now, which differs from the nominal one
/// during a transitional cycle.
///
/// # Arguments
/// * `compare` - Compare value in counter units
/// * `dead_time_s` - Dead time in seconds
/// * `active_frequency_hz` - Frequency of the current carrier cycle
#[inline]
pub fn compute(compare: f64, dead_time_s: f64, active_frequency_hz: f64) -> ComparePair {
    compute_asymmetric(compare, DeadTime::symmetric(dead_time_s), active_frequency_hz)
}

/// Split a compare value with separate rising/falling dead times
///
/// Once clamped, a pair touching 0 collapses to 0 and otherwise a pair
/// touching 1 collapses to 1, so the outputs sit at a rail instead of
/// emitting slivers.
pub fn compute_asymmetric(compare: f64, dead_time: DeadTime, active_frequency_hz: f64) -> ComparePair {
    let half_rise = dead_time.rising_s * active_frequency_hz / 2.0;
    let half_fall = dead_time.falling_s * active_frequency_hz / 2.0;

    let lead = clamp_unit(compare + half_rise);
    let lag = clamp_unit(compare - half_fall);

    if lead == 0.0 || lag == 0.0 {
        ComparePair::new(0.0, 0.0)
    } else if lead == 1.0 || lag == 1.0 {
        ComparePair::new(1.0, 1.0)
    } else {
        ComparePair::new(lead, lag)
    }
}
