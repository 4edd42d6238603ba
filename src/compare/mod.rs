//! Dead-time-aware compare thresholds
//!
//! A single compare value is split into two thresholds half a dead time
//! either side of it. The channel that switches on at `lag` and the one that
//! switches on at `lead` are then separated by the full dead time.

mod dead_time;

pub use dead_time::{compute, compute_asymmetric};

/// Default dead time (100 ns)
pub const DEFAULT_DEAD_TIME: f64 = 100e-9;

/// Which rail a compare pair is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saturation {
    /// Both thresholds at 0
    Low,
    /// Both thresholds at 1
    High,
}

/// Lead/lag thresholds in counter units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComparePair {
    /// Upper threshold, `compare + dt/2`
    pub lead: f64,
    /// Lower threshold, `compare - dt/2`
    pub lag: f64,
}

impl ComparePair {
    pub fn new(lead: f64, lag: f64) -> Self {
        Self { lead, lag }
    }

    /// Rail the pair is pinned to, if any
    pub fn saturation(&self) -> Option<Saturation> {
        if self.lead <= 0.0 && self.lag <= 0.0 {
            Some(Saturation::Low)
        } else if self.lead >= 1.0 && self.lag >= 1.0 {
            Some(Saturation::High)
        } else {
            None
        }
    }

    /// Width of the dead band in counter units
    pub fn dead_band(&self) -> f64 {
        self.lead - self.lag
    }
}

/// Asymmetric dead time
///
/// `rising_s` delays the turn-on of the channel switching at `lead`,
/// `falling_s` the turn-on of the channel switching at `lag`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeadTime {
    pub rising_s: f64,
    pub falling_s: f64,
}

impl DeadTime {
    /// Same dead time on both edges
    pub fn symmetric(dead_time_s: f64) -> Self {
        Self {
            rising_s: dead_time_s,
            falling_s: dead_time_s,
        }
    }
}
