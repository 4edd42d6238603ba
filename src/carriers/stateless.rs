//! Stateless center-aligned carrier
//!
//! The counter is a pure function of absolute time. Correct only while the
//! frequency is constant: changing it re-times the whole waveform history.

use crate::error::{check_finite, check_frequency, ConfigError};
use crate::traits::{Carrier, CarrierSample, CountDirection};
use crate::utils::{distance_to_period_start, fract_cycle, triangle};

use super::PERIOD_BOUNDARY_TOLERANCE;

/// Evaluate the carrier at an absolute time
///
/// A NaN or infinite time evaluates as the period start.
///
/// # Arguments
/// * `time_s` - Simulation time in seconds
/// * `frequency_hz` - Carrier frequency
/// * `phase_offset_s` - Phase offset in seconds (positive advances the carrier)
pub fn sample_at(time_s: f64, frequency_hz: f64, phase_offset_s: f64) -> CarrierSample {
    let frac = fract_cycle((time_s + phase_offset_s) * frequency_hz);
    sample_from_fraction(frac)
}

/// Build a sample from a position within the period
#[inline]
pub(crate) fn sample_from_fraction(frac: f64) -> CarrierSample {
    CarrierSample {
        counter: triangle(frac),
        direction: direction_at(frac),
        period_boundary: distance_to_period_start(frac) < PERIOD_BOUNDARY_TOLERANCE,
    }
}

#[inline]
pub(crate) fn direction_at(frac: f64) -> CountDirection {
    if frac < 0.5 {
        CountDirection::Up
    } else {
        CountDirection::Down
    }
}

/// Stateless carrier with boundary tracking
///
/// Recomputes the counter from `(time - anchor + phase) * f` on every call.
/// The only memory is the last cycle index, so a step that jumps over a
/// period start is still reported as a boundary, and fine steps around a
/// period start report it once.
#[derive(Debug, Clone)]
pub struct StatelessCarrier {
    frequency_hz: f64,
    phase_offset_s: f64,
    anchor_s: f64,
    last_cycle: Option<i64>,
    last_fraction: f64,
    restarted: bool,
}

impl StatelessCarrier {
    /// Create a stateless carrier
    ///
    /// # Arguments
    /// * `frequency_hz` - Carrier frequency in Hz (> 0)
    /// * `phase_offset_s` - Phase offset in seconds
    pub fn new(frequency_hz: f64, phase_offset_s: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            frequency_hz: check_frequency(frequency_hz)?,
            phase_offset_s: check_finite(phase_offset_s, "phase_offset_s")?,
            anchor_s: 0.0,
            last_cycle: None,
            last_fraction: 0.0,
            restarted: false,
        })
    }

    /// Raw cycle count at `time_s`
    #[inline]
    fn cycles_at(&self, time_s: f64) -> f64 {
        (time_s - self.anchor_s + self.phase_offset_s) * self.frequency_hz
    }

    /// Configured phase offset in seconds
    pub fn phase_offset(&self) -> f64 {
        self.phase_offset_s
    }
}

impl Carrier for StatelessCarrier {
    fn advance(&mut self, time_s: f64) -> CarrierSample {
        let raw = self.cycles_at(time_s);
        // No position for a NaN/infinite time: hold the last one
        if !raw.is_finite() {
            let mut sample = sample_from_fraction(self.last_fraction);
            sample.period_boundary = self.restarted;
            self.restarted = false;
            return sample;
        }

        let frac = fract_cycle(raw);
        // A position just short of a period start already counts as the next period
        let cycle = (raw + PERIOD_BOUNDARY_TOLERANCE).floor() as i64;

        let mut sample = sample_from_fraction(frac);
        if let Some(last) = self.last_cycle {
            sample.period_boundary = cycle > last;
        }
        sample.period_boundary |= self.restarted;

        self.restarted = false;
        self.last_cycle = Some(cycle);
        self.last_fraction = frac;
        sample
    }

    fn synchronize(&mut self, time_s: f64) {
        if !time_s.is_finite() {
            return;
        }
        log::debug!("stateless carrier re-anchored at t={:.9}s", time_s);
        self.anchor_s = time_s;
        self.last_cycle = None;
        self.restarted = true;
    }

    fn reset(&mut self) {
        self.anchor_s = 0.0;
        self.last_cycle = None;
        self.last_fraction = 0.0;
        self.restarted = false;
    }

    fn phase(&self) -> f64 {
        self.last_fraction
    }

    fn frequency(&self) -> f64 {
        self.frequency_hz
    }

    fn set_frequency(&mut self, freq_hz: f64) -> bool {
        match check_frequency(freq_hz) {
            Ok(hz) => {
                self.frequency_hz = hz;
                true
            }
            Err(e) => {
                log::debug!("stateless carrier kept {} Hz: {}", self.frequency_hz, e);
                false
            }
        }
    }

    fn set_phase_offset(&mut self, offset_s: f64) -> bool {
        if offset_s.is_finite() {
            self.phase_offset_s = offset_s;
            true
        } else {
            false
        }
    }
}
