//! PWM Engine - Phase-continuous carrier and gate-edge generation
//!
//! Synthesizes PWM gate-drive signals for power-electronics simulation from a
//! host-supplied simulation time. Frequency, phase and duty may change while
//! running without counter jumps, double switching or shoot-through.
//! The host simulator only marshals pins; all timing lives here.

pub mod traits;
pub mod carriers;
pub mod timing;
pub mod compare;
pub mod actions;
pub mod output;
pub mod modules;
pub mod error;
pub mod slab;
pub mod nif;
mod utils;

// Re-export core types for convenience
pub use traits::{Carrier, CarrierSample, CountDirection};
pub use carriers::{sample_at, CarrierShape, CarrierState, ContinuousCarrier, StatelessCarrier};
pub use timing::{phase_offset_from_degrees, phase_offset_from_radians, ContinuityController};
pub use compare::{ComparePair, DeadTime, Saturation};
pub use actions::{ActionMode, EdgeActionProcessor, OutputState};
pub use output::{GateLevels, PwmOutputs};
pub use modules::{
    BasicOutputs, BasicParams, BasicPwm, ComplementaryParams, ComplementaryPwm, EnhancedParams,
    EnhancedPwm, ParameterUpdate,
};
pub use error::ConfigError;

rustler::init!("Elixir.PowerStage.Pwm.Native");
