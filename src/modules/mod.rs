//! PWM modules
//!
//! Each module composes a carrier, the compare calculator, per-channel edge
//! processors and the output mapper:
//!
//! - [`BasicPwm`]: stateless, one output, selectable carrier shape
//! - [`EnhancedPwm`]: stateless center-aligned, two channels with their own
//!   compare values and action modes, asymmetric dead time
//! - [`ComplementaryPwm`]: continuous carrier with frequency/phase
//!   continuity and a complementary output pair

mod basic;
mod complementary;
mod enhanced;

pub use basic::{BasicOutputs, BasicParams, BasicPwm};
pub use complementary::{ComplementaryParams, ComplementaryPwm, ParameterUpdate};
pub use enhanced::{EnhancedParams, EnhancedPwm};

#[cfg(test)]
mod module_tests;
