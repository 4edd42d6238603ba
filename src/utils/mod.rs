//! Utility functions for carrier arithmetic

mod clamp;
mod math;

pub use clamp::clamp_unit;
pub use math::*;
