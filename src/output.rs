//! Output mapping: channel states → gate voltages

use crate::actions::OutputState;
use crate::error::{check_finite, ConfigError};
use crate::traits::{CarrierSample, CountDirection};

/// Default gate-on voltage (normalized logic level)
pub const DEFAULT_GATE_ON_V: f64 = 1.0;

/// Default gate-off voltage
pub const DEFAULT_GATE_OFF_V: f64 = 0.0;

/// Gate drive voltages for the two output levels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateLevels {
    pub on_v: f64,
    pub off_v: f64,
}

impl Default for GateLevels {
    fn default() -> Self {
        Self {
            on_v: DEFAULT_GATE_ON_V,
            off_v: DEFAULT_GATE_OFF_V,
        }
    }
}

impl GateLevels {
    pub fn new(on_v: f64, off_v: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            on_v: check_finite(on_v, "gate_on_v")?,
            off_v: check_finite(off_v, "gate_off_v")?,
        })
    }

    #[inline]
    pub fn map(&self, state: OutputState) -> f64 {
        match state {
            OutputState::Active => self.on_v,
            OutputState::Inactive => self.off_v,
        }
    }
}

/// Two-channel module outputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PwmOutputs {
    /// Channel A gate voltage
    pub pwm_a: f64,
    /// Channel B gate voltage
    pub pwm_b: f64,
    /// Carrier counter in [0, 1]
    pub counter: f64,
    pub direction: CountDirection,
    /// High for the step a new carrier period started; feeds a slave's sync input
    pub period_sync: bool,
}

impl PwmOutputs {
    /// All-off outputs, as after reset
    pub fn cleared(gates: &GateLevels) -> Self {
        Self {
            pwm_a: gates.off_v,
            pwm_b: gates.off_v,
            counter: 0.0,
            direction: CountDirection::Up,
            period_sync: false,
        }
    }

    pub(crate) fn from_states(
        gates: &GateLevels,
        a: OutputState,
        b: OutputState,
        sample: &CarrierSample,
    ) -> Self {
        Self {
            pwm_a: gates.map(a),
            pwm_b: gates.map(b),
            counter: sample.counter,
            direction: sample.direction,
            period_sync: sample.period_boundary,
        }
    }
}
