//! Carrier trait - Counter/direction generation
//!
//! Defines the reference waveform every compare crossing is measured against.
//! Pure timing - no knowledge of duty, dead time or outputs.

/// Direction the center-aligned counter is currently moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountDirection {
    /// First half of the period, counter rising 0 → 1
    #[default]
    Up,
    /// Second half of the period, counter falling 1 → 0
    Down,
}

/// One carrier evaluation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CarrierSample {
    /// Center-aligned counter value in [0, 1]
    ///
    /// 0 at the period start, 1 at mid-period (`1 - |2 frac - 1|`), so `Up`
    /// really is rising. Counters that peak at the period start read half a
    /// period shifted against this one.
    pub counter: f64,
    /// Counter direction at this instant
    pub direction: CountDirection,
    /// True on the step a new period started
    pub period_boundary: bool,
}

/// Carrier generator trait
///
/// Implementations map simulation time to a triangular counter.
/// Frequency and phase live in the carrier's own configuration.
pub trait Carrier: Send + Sync {
    /// Advance to `time_s` and evaluate the counter
    ///
    /// # Arguments
    /// * `time_s` - Absolute simulation time; may regress or jump
    fn advance(&mut self, time_s: f64) -> CarrierSample;

    /// Hard-restart the period at `time_s` (external sync pulse)
    fn synchronize(&mut self, time_s: f64);

    /// Return to the construction state, keeping configuration
    fn reset(&mut self);

    /// Current position within the period, in [0, 1)
    fn phase(&self) -> f64;

    /// Frequency integrated during the current cycle (Hz)
    fn frequency(&self) -> f64;

    /// Request a new carrier frequency
    ///
    /// Returns false and keeps the previous value when `freq_hz` is not a
    /// finite positive number.
    fn set_frequency(&mut self, freq_hz: f64) -> bool;

    /// Request a new phase offset in seconds
    ///
    /// Returns false and keeps the previous value when `offset_s` is NaN
    /// or infinite.
    fn set_phase_offset(&mut self, offset_s: f64) -> bool;
}
