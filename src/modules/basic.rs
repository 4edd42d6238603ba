//! Basic stateless PWM

use crate::carriers::{CarrierShape, StatelessCarrier, DEFAULT_CARRIER_FREQ};
use crate::error::ConfigError;
use crate::output::GateLevels;
use crate::timing::phase_offset_from_radians;
use crate::traits::Carrier;

/// Basic PWM configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicParams {
    pub frequency_hz: f64,
    /// Carrier compared against the duty value
    pub shape: CarrierShape,
    pub gate_on_v: f64,
    pub gate_off_v: f64,
}

impl Default for BasicParams {
    fn default() -> Self {
        let gates = GateLevels::default();
        Self {
            frequency_hz: DEFAULT_CARRIER_FREQ,
            shape: CarrierShape::default(),
            gate_on_v: gates.on_v,
            gate_off_v: gates.off_v,
        }
    }
}

/// Basic PWM outputs
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BasicOutputs {
    /// Gate voltage
    pub pwm: f64,
    pub sawtooth_up: f64,
    pub center_aligned: f64,
    pub sawtooth_down: f64,
    /// High on the step a carrier period started
    pub clk_out: bool,
}

/// Single-output PWM evaluated from absolute time
///
/// The output is on while the selected carrier is below the duty value.
/// All three carrier shapes are reported regardless of the selection.
#[derive(Debug, Clone)]
pub struct BasicPwm {
    shape: CarrierShape,
    gates: GateLevels,
    carrier: StatelessCarrier,
    outputs: BasicOutputs,
}

impl BasicPwm {
    pub fn new(params: BasicParams) -> Result<Self, ConfigError> {
        let gates = GateLevels::new(params.gate_on_v, params.gate_off_v)?;
        let carrier = StatelessCarrier::new(params.frequency_hz, 0.0)?;
        Ok(Self {
            shape: params.shape,
            gates,
            carrier,
            outputs: Self::cleared(&gates),
        })
    }

    fn cleared(gates: &GateLevels) -> BasicOutputs {
        BasicOutputs {
            pwm: gates.off_v,
            ..BasicOutputs::default()
        }
    }

    /// Evaluate at `time_s`
    ///
    /// # Arguments
    /// * `time_s` - Simulation time
    /// * `duty` - Duty value in [0, 1]; NaN keeps the output off
    /// * `phase_rad` - Carrier phase shift in radians; a full turn is one period
    pub fn step(&mut self, time_s: f64, duty: f64, phase_rad: f64) -> BasicOutputs {
        let offset_s = phase_offset_from_radians(phase_rad, self.carrier.frequency());
        self.carrier.set_phase_offset(offset_s);

        let sample = self.carrier.advance(time_s);
        let frac = self.carrier.phase();

        let selected = self.shape.value(frac);
        self.outputs = BasicOutputs {
            pwm: if selected < duty { self.gates.on_v } else { self.gates.off_v },
            sawtooth_up: CarrierShape::SawtoothUp.value(frac),
            center_aligned: CarrierShape::CenterAligned.value(frac),
            sawtooth_down: CarrierShape::SawtoothDown.value(frac),
            clk_out: sample.period_boundary,
        };
        self.outputs
    }

    pub fn reset(&mut self) {
        self.carrier.reset();
        self.outputs = Self::cleared(&self.gates);
    }

    pub fn outputs(&self) -> BasicOutputs {
        self.outputs
    }

    pub fn shape(&self) -> CarrierShape {
        self.shape
    }
}
