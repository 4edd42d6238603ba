//! Carrier generator implementations
//!
//! - [`StatelessCarrier`]: recomputes the counter from absolute time
//! - [`ContinuousCarrier`]: integrates time deltas, frequency/phase glitch-free

mod continuous;
mod stateless;

pub use continuous::{CarrierState, ContinuousCarrier};
pub use stateless::{sample_at, StatelessCarrier};

/// Default carrier frequency (100 kHz switching)
pub const DEFAULT_CARRIER_FREQ: f64 = 100e3;

/// Fraction of a cycle around the period start reported as a boundary
/// by the stateless form
pub const PERIOD_BOUNDARY_TOLERANCE: f64 = 1e-4;

/// Carrier waveform used to compare against a duty value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CarrierShape {
    /// Triangle 0 → 1 → 0 (center-aligned PWM)
    #[default]
    CenterAligned,
    /// Rising ramp 0 → 1 (edge-aligned PWM)
    SawtoothUp,
    /// Falling ramp 1 → 0 (edge-aligned PWM)
    SawtoothDown,
}

impl CarrierShape {
    /// Carrier value at a cycle position in [0, 1)
    #[inline]
    pub fn value(self, frac: f64) -> f64 {
        match self {
            CarrierShape::CenterAligned => crate::utils::triangle(frac),
            CarrierShape::SawtoothUp => frac,
            CarrierShape::SawtoothDown => 1.0 - frac,
        }
    }
}
