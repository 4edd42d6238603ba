//! Continuous center-aligned carrier
//!
//! Integrates `dt * f` into a phase accumulator instead of recomputing from
//! absolute time, so a frequency change only affects the future. All
//! frequency/phase scheduling is delegated to the [`ContinuityController`].

use crate::error::ConfigError;
use crate::timing::ContinuityController;
use crate::traits::{Carrier, CarrierSample};
use crate::utils::{fract_cycle, triangle};

use super::stateless::direction_at;

/// Snapshot of the continuous carrier's state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarrierState {
    pub current_frequency_hz: f64,
    pub pending_frequency_hz: f64,
    pub frequency_change_pending: bool,
    pub cumulative_phase_applied_s: f64,
    pub last_time_s: f64,
    /// Position within the period, always in [0, 1)
    pub accumulated_counter: f64,
    /// Triangle counter value before the last advance
    pub previous_counter: f64,
}

/// Phase-accumulating carrier
#[derive(Debug, Clone)]
pub struct ContinuousCarrier {
    controller: ContinuityController,
    last_time_s: f64,
    accumulated: f64,
    previous_counter: f64,
    restarted: bool,
}

impl ContinuousCarrier {
    /// Create a continuous carrier
    ///
    /// The accumulator starts at the initial phase offset and time zero, so
    /// an unshifted carrier lines up with the stateless form.
    ///
    /// # Arguments
    /// * `frequency_hz` - Carrier frequency in Hz (> 0)
    /// * `phase_offset_s` - Initial phase offset in seconds
    pub fn new(frequency_hz: f64, phase_offset_s: f64) -> Result<Self, ConfigError> {
        let controller = ContinuityController::new(frequency_hz, phase_offset_s)?;
        let accumulated = fract_cycle(phase_offset_s * frequency_hz);
        Ok(Self {
            controller,
            last_time_s: 0.0,
            accumulated,
            previous_counter: triangle(accumulated),
            restarted: false,
        })
    }

    /// Continuity controller (read-only)
    pub fn controller(&self) -> &ContinuityController {
        &self.controller
    }

    /// Current triangle counter value
    pub fn counter(&self) -> f64 {
        triangle(self.accumulated)
    }

    /// Snapshot of the integrator and scheduling state
    pub fn state(&self) -> CarrierState {
        CarrierState {
            current_frequency_hz: self.controller.current_frequency(),
            pending_frequency_hz: self.controller.pending_frequency(),
            frequency_change_pending: self.controller.is_frequency_change_pending(),
            cumulative_phase_applied_s: self.controller.cumulative_phase_applied(),
            last_time_s: self.last_time_s,
            accumulated_counter: self.accumulated,
            previous_counter: self.previous_counter,
        }
    }
}

impl Carrier for ContinuousCarrier {
    fn advance(&mut self, time_s: f64) -> CarrierSample {
        // NaN or infinite time is a zero-length step
        let dt = if time_s.is_finite() {
            let dt = (time_s - self.last_time_s).max(0.0);
            self.last_time_s = time_s;
            dt
        } else {
            0.0
        };

        // Whole cycles are dropped before accumulating; an overflowing product is no movement
        let cycles = dt * self.controller.current_frequency();
        let cycles = if cycles.is_finite() { cycles } else { 0.0 };
        let whole = cycles.floor();

        self.previous_counter = triangle(self.accumulated);
        self.accumulated += cycles - whole;

        let wrapped = whole >= 1.0 || self.accumulated >= 1.0;
        if wrapped {
            self.accumulated = fract_cycle(self.accumulated);
            self.controller.on_period_boundary();
        }

        let period_boundary = wrapped || self.restarted;
        self.restarted = false;

        CarrierSample {
            counter: triangle(self.accumulated),
            direction: direction_at(self.accumulated),
            period_boundary,
        }
    }

    fn synchronize(&mut self, time_s: f64) {
        log::debug!("continuous carrier synchronized at t={:.9}s", time_s);
        self.accumulated = 0.0;
        if time_s.is_finite() {
            self.last_time_s = time_s;
        }
        self.controller.on_sync();
        self.restarted = true;
    }

    fn reset(&mut self) {
        self.controller.reset();
        let f = self.controller.nominal_frequency();
        self.accumulated = fract_cycle(self.controller.phase_offset() * f);
        self.last_time_s = 0.0;
        self.previous_counter = triangle(self.accumulated);
        self.restarted = false;
    }

    fn phase(&self) -> f64 {
        self.accumulated
    }

    fn frequency(&self) -> f64 {
        self.controller.current_frequency()
    }

    fn set_frequency(&mut self, freq_hz: f64) -> bool {
        self.controller.request_frequency(freq_hz)
    }

    fn set_phase_offset(&mut self, offset_s: f64) -> bool {
        self.controller.request_phase_offset(offset_s)
    }
}
