//! Complementary PWM on a phase-continuous carrier
//!
//! The carrier integrates time deltas, so frequency and phase can be changed
//! while running without a jump in the counter. Runtime updates follow a
//! "last known good" policy: an invalid field is dropped, the rest applied.

use crate::actions::{ActionMode, EdgeActionProcessor};
use crate::carriers::{CarrierState, ContinuousCarrier, DEFAULT_CARRIER_FREQ};
use crate::compare::{compute, ComparePair, DEFAULT_DEAD_TIME};
use crate::error::{check_dead_time, check_duty, ConfigError};
use crate::output::{GateLevels, PwmOutputs};
use crate::traits::Carrier;

/// Default duty value
pub const DEFAULT_DUTY: f64 = 0.5;

/// Complementary PWM configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplementaryParams {
    pub frequency_hz: f64,
    pub phase_offset_s: f64,
    pub dead_time_s: f64,
    /// Stored compare value in [0, 1]
    pub duty: f64,
    /// Honor `sync_in` on `step`
    pub sync_enabled: bool,
    pub gate_on_v: f64,
    pub gate_off_v: f64,
    pub mode_a: ActionMode,
    pub mode_b: ActionMode,
}

impl Default for ComplementaryParams {
    fn default() -> Self {
        let gates = GateLevels::default();
        Self {
            frequency_hz: DEFAULT_CARRIER_FREQ,
            phase_offset_s: 0.0,
            dead_time_s: DEFAULT_DEAD_TIME,
            duty: DEFAULT_DUTY,
            sync_enabled: false,
            gate_on_v: gates.on_v,
            gate_off_v: gates.off_v,
            mode_a: ActionMode::ActiveBelow,
            mode_b: ActionMode::ActiveAbove,
        }
    }
}

/// Runtime parameter update; `None` keeps the current value
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParameterUpdate {
    pub frequency_hz: Option<f64>,
    pub dead_time_s: Option<f64>,
    pub phase_offset_s: Option<f64>,
    pub duty: Option<f64>,
}

/// Complementary output pair with dead band
#[derive(Debug, Clone)]
pub struct ComplementaryPwm {
    params: ComplementaryParams,
    gates: GateLevels,
    carrier: ContinuousCarrier,
    channel_a: EdgeActionProcessor,
    channel_b: EdgeActionProcessor,
    /// Last sampled `sync_in`, for rising-edge detection
    sync_prev: bool,
    compare: ComparePair,
    outputs: PwmOutputs,
}

impl ComplementaryPwm {
    pub fn new(params: ComplementaryParams) -> Result<Self, ConfigError> {
        check_dead_time(params.dead_time_s)?;
        check_duty(params.duty)?;
        let gates = GateLevels::new(params.gate_on_v, params.gate_off_v)?;
        let carrier = ContinuousCarrier::new(params.frequency_hz, params.phase_offset_s)?;
        let compare = compute(params.duty, params.dead_time_s, params.frequency_hz);

        Ok(Self {
            params,
            gates,
            carrier,
            channel_a: EdgeActionProcessor::new(params.mode_a),
            channel_b: EdgeActionProcessor::new(params.mode_b),
            sync_prev: false,
            compare,
            outputs: PwmOutputs::cleared(&gates),
        })
    }

    /// Advance to `time_s`
    ///
    /// # Arguments
    /// * `time_s` - Simulation time; a regression is a zero-length step
    /// * `sync_in` - Restart the period on its rising edge (when sync is enabled)
    pub fn step(&mut self, time_s: f64, sync_in: bool) -> PwmOutputs {
        let sync_edge = sync_in && !self.sync_prev;
        self.sync_prev = sync_in;
        if self.params.sync_enabled && sync_edge {
            self.carrier.synchronize(time_s);
        }

        let sample = self.carrier.advance(time_s);
        self.compare = compute(self.params.duty, self.params.dead_time_s, self.carrier.frequency());

        let a = self.channel_a.process(&sample, &self.compare);
        let b = self.channel_b.process(&sample, &self.compare);

        self.outputs = PwmOutputs::from_states(&self.gates, a, b, &sample);
        self.outputs
    }

    /// Back to the construction state; accepted parameter updates are kept
    pub fn reset(&mut self) {
        self.carrier.reset();
        self.channel_a.reset();
        self.channel_b.reset();
        self.sync_prev = false;
        self.compare = compute(self.params.duty, self.params.dead_time_s, self.carrier.frequency());
        self.outputs = PwmOutputs::cleared(&self.gates);
    }

    /// Apply every valid field of `update`
    ///
    /// Returns true when every provided field was accepted.
    pub fn update_parameters(&mut self, update: ParameterUpdate) -> bool {
        let mut accepted = true;
        if let Some(hz) = update.frequency_hz {
            accepted &= self.set_frequency(hz);
        }
        if let Some(s) = update.dead_time_s {
            accepted &= self.set_dead_time(s);
        }
        if let Some(s) = update.phase_offset_s {
            accepted &= self.set_phase_offset(s);
        }
        if let Some(d) = update.duty {
            accepted &= self.set_duty(d);
        }
        accepted
    }

    /// Queue a frequency change for the next period boundary
    pub fn set_frequency(&mut self, frequency_hz: f64) -> bool {
        let ok = self.carrier.set_frequency(frequency_hz);
        if ok {
            self.params.frequency_hz = frequency_hz;
        }
        ok
    }

    pub fn set_dead_time(&mut self, dead_time_s: f64) -> bool {
        match check_dead_time(dead_time_s) {
            Ok(s) => {
                self.params.dead_time_s = s;
                true
            }
            Err(e) => {
                log::debug!("dead time update ignored: {}", e);
                false
            }
        }
    }

    /// Set the target phase offset; realized over transitional cycles
    pub fn set_phase_offset(&mut self, phase_offset_s: f64) -> bool {
        let ok = self.carrier.set_phase_offset(phase_offset_s);
        if ok {
            self.params.phase_offset_s = phase_offset_s;
        }
        ok
    }

    /// Duty takes effect on the next step
    pub fn set_duty(&mut self, duty: f64) -> bool {
        match check_duty(duty) {
            Ok(d) => {
                self.params.duty = d;
                true
            }
            Err(e) => {
                log::debug!("duty update ignored: {}", e);
                false
            }
        }
    }

    pub fn params(&self) -> &ComplementaryParams {
        &self.params
    }

    /// Thresholds used by the last step
    pub fn compare_pair(&self) -> ComparePair {
        self.compare
    }

    pub fn carrier_state(&self) -> CarrierState {
        self.carrier.state()
    }

    pub fn outputs(&self) -> PwmOutputs {
        self.outputs
    }
}
