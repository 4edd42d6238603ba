//! Frequency/phase continuity controller
//!
//! Requests are recorded immediately but only touch the integrated
//! frequency at a period boundary, so an in-progress cycle is never
//! stretched or truncated mid-way.
//!
//! A phase shift is a rate change, never a counter overwrite: one cycle runs
//! at a borrowed frequency `f / (1 - f·Δ)` so the counter arrives at the
//! shifted phase exactly when that cycle ends, then the nominal frequency
//! is restored at the following boundary.

use crate::error::{check_finite, check_frequency, ConfigError};
use crate::utils::shortest_cycles;

use super::{MAX_SHIFT_PER_CYCLE, PHASE_EPSILON_S};

/// Schedules frequency and phase changes onto period boundaries
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuityController {
    /// Configured (target) frequency
    nominal_frequency_hz: f64,
    /// Configured (target) phase offset
    requested_phase_s: f64,
    /// Frequency integrated during the current cycle
    current_frequency_hz: f64,
    /// Frequency to swap in at the next boundary
    pending_frequency_hz: f64,
    frequency_change_pending: bool,
    /// Phase offset already realized in the waveform
    cumulative_phase_applied_s: f64,
}

impl ContinuityController {
    /// Create a controller with the initial offset already realized
    ///
    /// # Arguments
    /// * `frequency_hz` - Nominal carrier frequency (> 0)
    /// * `phase_offset_s` - Initial phase offset in seconds
    pub fn new(frequency_hz: f64, phase_offset_s: f64) -> Result<Self, ConfigError> {
        let frequency_hz = check_frequency(frequency_hz)?;
        let phase_offset_s = check_finite(phase_offset_s, "phase_offset_s")?;
        Ok(Self {
            nominal_frequency_hz: frequency_hz,
            requested_phase_s: phase_offset_s,
            current_frequency_hz: frequency_hz,
            pending_frequency_hz: frequency_hz,
            frequency_change_pending: false,
            cumulative_phase_applied_s: phase_offset_s,
        })
    }

    /// Queue a frequency change for the next period boundary
    ///
    /// Returns false (keeping the previous target) for non-finite or
    /// non-positive values.
    pub fn request_frequency(&mut self, frequency_hz: f64) -> bool {
        let frequency_hz = match check_frequency(frequency_hz) {
            Ok(hz) => hz,
            Err(e) => {
                log::debug!("frequency update ignored: {}", e);
                return false;
            }
        };

        self.nominal_frequency_hz = frequency_hz;
        self.pending_frequency_hz = frequency_hz;
        self.frequency_change_pending = true;
        true
    }

    /// Set the target phase offset; the difference is realized later
    pub fn request_phase_offset(&mut self, phase_offset_s: f64) -> bool {
        if !phase_offset_s.is_finite() {
            log::debug!("phase offset update ignored: {} is not finite", phase_offset_s);
            return false;
        }
        self.requested_phase_s = phase_offset_s;
        true
    }

    /// Apply whatever is scheduled for the boundary just crossed
    ///
    /// A pending frequency swap (including restoring the nominal frequency
    /// after a borrowed cycle) wins; otherwise an outstanding phase
    /// difference starts a transitional cycle.
    pub fn on_period_boundary(&mut self) {
        if self.frequency_change_pending {
            log::trace!(
                "boundary: {:.3} Hz -> {:.3} Hz",
                self.current_frequency_hz,
                self.pending_frequency_hz
            );
            self.current_frequency_hz = self.pending_frequency_hz;
            self.frequency_change_pending = false;
            return;
        }

        let difference_s = self.phase_difference();
        if difference_s.abs() <= PHASE_EPSILON_S {
            return;
        }

        let f = self.nominal_frequency_hz;
        let cycles = shortest_cycles(difference_s * f);
        let step = cycles.clamp(-MAX_SHIFT_PER_CYCLE, MAX_SHIFT_PER_CYCLE);

        // Whole-period requests need no waveform change
        if step.abs() / f <= PHASE_EPSILON_S {
            self.cumulative_phase_applied_s = self.requested_phase_s;
            return;
        }

        // One cycle of length (1 - step)/f; |step| <= 0.25 keeps this positive
        let borrowed_hz = f / (1.0 - step);
        log::debug!(
            "phase shift {:+.4} cycles: borrowing {:.3} Hz for one cycle (nominal {:.3} Hz)",
            step,
            borrowed_hz,
            f
        );

        self.current_frequency_hz = borrowed_hz;
        self.pending_frequency_hz = f;
        self.frequency_change_pending = true;

        if (cycles - step).abs() / f <= PHASE_EPSILON_S {
            self.cumulative_phase_applied_s = self.requested_phase_s;
        } else {
            self.cumulative_phase_applied_s += step / f;
        }
    }

    /// External sync: drop in-flight scheduling, run at nominal frequency
    ///
    /// The carrier is re-anchored to the sync source, so the configured
    /// offset is considered realized relative to the new time base.
    pub fn on_sync(&mut self) {
        if self.frequency_change_pending || self.current_frequency_hz != self.nominal_frequency_hz {
            log::debug!(
                "sync discarded scheduled change, running at {:.3} Hz",
                self.nominal_frequency_hz
            );
        }
        self.current_frequency_hz = self.nominal_frequency_hz;
        self.pending_frequency_hz = self.nominal_frequency_hz;
        self.frequency_change_pending = false;
        self.cumulative_phase_applied_s = self.requested_phase_s;
    }

    /// Return to the construction state for the current configuration
    pub fn reset(&mut self) {
        self.current_frequency_hz = self.nominal_frequency_hz;
        self.pending_frequency_hz = self.nominal_frequency_hz;
        self.frequency_change_pending = false;
        self.cumulative_phase_applied_s = self.requested_phase_s;
    }

    /// Requested phase not yet realized, in seconds
    pub fn phase_difference(&self) -> f64 {
        self.requested_phase_s - self.cumulative_phase_applied_s
    }

    /// Frequency integrated during the current cycle
    pub fn current_frequency(&self) -> f64 {
        self.current_frequency_hz
    }

    /// Configured frequency
    pub fn nominal_frequency(&self) -> f64 {
        self.nominal_frequency_hz
    }

    /// Frequency queued for the next boundary
    pub fn pending_frequency(&self) -> f64 {
        self.pending_frequency_hz
    }

    pub fn is_frequency_change_pending(&self) -> bool {
        self.frequency_change_pending
    }

    /// Configured phase offset in seconds
    pub fn phase_offset(&self) -> f64 {
        self.requested_phase_s
    }

    pub fn cumulative_phase_applied(&self) -> f64 {
        self.cumulative_phase_applied_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_change_deferred_to_boundary() {
        let mut ctrl = ContinuityController::new(100e3, 0.0).unwrap();
        assert!(ctrl.request_frequency(50e3));

        assert_eq!(ctrl.current_frequency(), 100e3);
        assert!(ctrl.is_frequency_change_pending());

        ctrl.on_period_boundary();
        assert_eq!(ctrl.current_frequency(), 50e3);
        assert!(!ctrl.is_frequency_change_pending());
    }

    #[test]
    fn test_quarter_period_shift_borrows_one_cycle() {
        let mut ctrl = ContinuityController::new(100e3, 0.0).unwrap();
        ctrl.request_phase_offset(2.5e-6);

        ctrl.on_period_boundary();
        // 10 µs period shortened to 7.5 µs
        assert!((ctrl.current_frequency() - 100e3 / 0.75).abs() < 1e-6);
        assert!(ctrl.is_frequency_change_pending());
        assert!(ctrl.phase_difference().abs() < 1e-15);

        ctrl.on_period_boundary();
        assert_eq!(ctrl.current_frequency(), 100e3);
        assert!(!ctrl.is_frequency_change_pending());

        // Nothing left to do
        ctrl.on_period_boundary();
        assert_eq!(ctrl.current_frequency(), 100e3);
    }

    #[test]
    fn test_phase_delay_lowers_frequency() {
        let mut ctrl = ContinuityController::new(100e3, 0.0).unwrap();
        ctrl.request_phase_offset(-1e-6);
        ctrl.on_period_boundary();
        assert!(ctrl.current_frequency() < 100e3);
        assert!((ctrl.current_frequency() - 100e3 / 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_large_shift_is_split() {
        let mut ctrl = ContinuityController::new(100e3, 0.0).unwrap();
        // 0.4 cycles: 0.25 now, 0.15 after the nominal cycle is restored
        ctrl.request_phase_offset(4e-6);

        ctrl.on_period_boundary();
        assert!((ctrl.current_frequency() - 100e3 / 0.75).abs() < 1e-6);
        assert!((ctrl.phase_difference() - 1.5e-6).abs() < 1e-12);

        ctrl.on_period_boundary();
        assert_eq!(ctrl.current_frequency(), 100e3);

        ctrl.on_period_boundary();
        assert!((ctrl.current_frequency() - 100e3 / 0.85).abs() < 1e-3);
        assert!(ctrl.phase_difference().abs() < 1e-12);
    }

    #[test]
    fn test_shift_uses_shortest_direction() {
        let mut ctrl = ContinuityController::new(100e3, 0.0).unwrap();
        // 0.9 cycles ahead is 0.1 cycles behind
        ctrl.request_phase_offset(9e-6);
        ctrl.on_period_boundary();
        assert!((ctrl.current_frequency() - 100e3 / 1.1).abs() < 1e-3);
        assert!(ctrl.phase_difference().abs() < 1e-12);
    }

    #[test]
    fn test_whole_period_shift_is_noop() {
        let mut ctrl = ContinuityController::new(100e3, 0.0).unwrap();
        ctrl.request_phase_offset(10e-6);
        ctrl.on_period_boundary();
        assert_eq!(ctrl.current_frequency(), 100e3);
        assert!(!ctrl.is_frequency_change_pending());
        assert!(ctrl.phase_difference().abs() < 1e-15);
    }

    #[test]
    fn test_pending_frequency_wins_over_phase() {
        let mut ctrl = ContinuityController::new(100e3, 0.0).unwrap();
        ctrl.request_frequency(200e3);
        ctrl.request_phase_offset(1e-6);

        ctrl.on_period_boundary();
        assert_eq!(ctrl.current_frequency(), 200e3);
        assert!(ctrl.phase_difference() > 0.0);

        // Phase handled on the following boundary at the new nominal
        ctrl.on_period_boundary();
        assert!((ctrl.current_frequency() - 200e3 / 0.8).abs() < 1e-3);
    }

    #[test]
    fn test_sync_discards_borrowed_cycle() {
        let mut ctrl = ContinuityController::new(100e3, 0.0).unwrap();
        ctrl.request_phase_offset(2.5e-6);
        ctrl.on_period_boundary();
        assert!(ctrl.current_frequency() > 100e3);

        ctrl.on_sync();
        assert_eq!(ctrl.current_frequency(), 100e3);
        assert!(!ctrl.is_frequency_change_pending());
        assert_eq!(ctrl.phase_difference(), 0.0);
    }

    #[test]
    fn test_invalid_requests_ignored() {
        let mut ctrl = ContinuityController::new(100e3, 1e-6).unwrap();
        assert!(!ctrl.request_frequency(0.0));
        assert!(!ctrl.request_frequency(f64::NAN));
        assert!(!ctrl.request_phase_offset(f64::NAN));
        assert_eq!(ctrl.nominal_frequency(), 100e3);
        assert_eq!(ctrl.phase_offset(), 1e-6);
        assert!(!ctrl.is_frequency_change_pending());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut ctrl = ContinuityController::new(100e3, 0.0).unwrap();
        ctrl.request_phase_offset(2.5e-6);
        ctrl.on_period_boundary();

        ctrl.reset();
        let once = ctrl.clone();
        ctrl.reset();
        assert_eq!(ctrl, once);
        assert_eq!(ctrl.current_frequency(), 100e3);
    }
}
