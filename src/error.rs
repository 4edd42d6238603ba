//! Configuration errors
//!
//! Raised once, at construction. Runtime updates never error; they keep the
//! last accepted value instead.

use std::fmt;

/// Reason a parameter set was rejected
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Carrier frequency must be finite and strictly positive
    InvalidFrequency(f64),
    /// Dead time must be finite and non-negative
    InvalidDeadTime(f64),
    /// Duty / compare value must lie in [0, 1]
    DutyOutOfRange(f64),
    /// A field that must be finite was NaN or infinite
    NonFinite(&'static str),
}

impl ConfigError {
    /// Short machine-readable code, used as the error atom by the NIF layer
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::InvalidFrequency(_) => "invalid_frequency",
            ConfigError::InvalidDeadTime(_) => "invalid_dead_time",
            ConfigError::DutyOutOfRange(_) => "duty_out_of_range",
            ConfigError::NonFinite(_) => "non_finite",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidFrequency(hz) => {
                write!(f, "carrier frequency must be > 0 Hz, got {}", hz)
            }
            ConfigError::InvalidDeadTime(s) => {
                write!(f, "dead time must be >= 0 s, got {}", s)
            }
            ConfigError::DutyOutOfRange(d) => {
                write!(f, "duty must be within [0, 1], got {}", d)
            }
            ConfigError::NonFinite(field) => write!(f, "{} must be finite", field),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validate a carrier frequency
pub(crate) fn check_frequency(hz: f64) -> Result<f64, ConfigError> {
    if hz.is_finite() && hz > 0.0 {
        Ok(hz)
    } else {
        Err(ConfigError::InvalidFrequency(hz))
    }
}

/// Validate a dead time
pub(crate) fn check_dead_time(s: f64) -> Result<f64, ConfigError> {
    if s.is_finite() && s >= 0.0 {
        Ok(s)
    } else {
        Err(ConfigError::InvalidDeadTime(s))
    }
}

/// Validate a duty / compare value
pub(crate) fn check_duty(d: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&d) {
        Ok(d)
    } else {
        Err(ConfigError::DutyOutOfRange(d))
    }
}

/// Validate that a field is finite
pub(crate) fn check_finite(value: f64, field: &'static str) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite(field))
    }
}
