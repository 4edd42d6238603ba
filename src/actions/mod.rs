//! Compare-crossing action modes
//!
//! An [`ActionMode`] decides which threshold crossing switches a channel on
//! and which switches it off. The two modes are logical complements, so a
//! pair of channels configured `ActiveBelow`/`ActiveAbove` never overlap and
//! are separated by the lead/lag dead band.

mod edge;

pub use edge::EdgeActionProcessor;

use crate::compare::{ComparePair, Saturation};
use crate::traits::CountDirection;

/// Output level of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputState {
    #[default]
    Inactive,
    Active,
}

impl OutputState {
    #[inline]
    pub fn is_active(self) -> bool {
        self == OutputState::Active
    }
}

/// Which half of a compare pair a trigger watches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    Lead,
    Lag,
}

impl Threshold {
    #[inline]
    pub fn of(self, pair: &ComparePair) -> f64 {
        match self {
            Threshold::Lead => pair.lead,
            Threshold::Lag => pair.lag,
        }
    }
}

/// A threshold crossed in a given counter direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub threshold: Threshold,
    pub direction: CountDirection,
}

impl Trigger {
    /// True if moving from `from` to `to` in `direction` crosses the threshold
    ///
    /// Downward: `from > th && to <= th`. Upward: `from < th && to >= th`.
    #[inline]
    pub fn fires(&self, from: f64, to: f64, direction: CountDirection, pair: &ComparePair) -> bool {
        if direction != self.direction {
            return false;
        }
        let th = self.threshold.of(pair);
        match direction {
            CountDirection::Down => from > th && to <= th,
            CountDirection::Up => from < th && to >= th,
        }
    }
}

/// Trigger assignment for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionMode {
    /// Active while the counter is below `lag`: on at the downward `lag`
    /// crossing, off at the upward one. Duty equals on-time.
    #[default]
    ActiveBelow,
    /// Active while the counter is above `lead`: on at the upward `lead`
    /// crossing, off at the downward one.
    ActiveAbove,
}

impl ActionMode {
    /// Trigger that switches the channel on
    pub fn set_trigger(self) -> Trigger {
        match self {
            ActionMode::ActiveBelow => Trigger {
                threshold: Threshold::Lag,
                direction: CountDirection::Down,
            },
            ActionMode::ActiveAbove => Trigger {
                threshold: Threshold::Lead,
                direction: CountDirection::Up,
            },
        }
    }

    /// Trigger that switches the channel off
    pub fn clear_trigger(self) -> Trigger {
        match self {
            ActionMode::ActiveBelow => Trigger {
                threshold: Threshold::Lag,
                direction: CountDirection::Up,
            },
            ActionMode::ActiveAbove => Trigger {
                threshold: Threshold::Lead,
                direction: CountDirection::Down,
            },
        }
    }

    pub fn complement(self) -> Self {
        match self {
            ActionMode::ActiveBelow => ActionMode::ActiveAbove,
            ActionMode::ActiveAbove => ActionMode::ActiveBelow,
        }
    }

    /// True when `counter` is strictly on the inactive side of the threshold
    #[inline]
    pub fn outside(self, counter: f64, pair: &ComparePair) -> bool {
        match self {
            ActionMode::ActiveBelow => counter > pair.lag,
            ActionMode::ActiveAbove => counter < pair.lead,
        }
    }

    /// Level implied by the counter position alone
    pub fn level_at(self, counter: f64, pair: &ComparePair) -> OutputState {
        let active = match self {
            ActionMode::ActiveBelow => counter < pair.lag,
            ActionMode::ActiveAbove => counter > pair.lead,
        };
        if active {
            OutputState::Active
        } else {
            OutputState::Inactive
        }
    }

    /// Level held while the compare pair is pinned to a rail
    pub fn saturated_level(self, saturation: Saturation) -> OutputState {
        match (self, saturation) {
            (ActionMode::ActiveBelow, Saturation::High) | (ActionMode::ActiveAbove, Saturation::Low) => {
                OutputState::Active
            }
            _ => OutputState::Inactive,
        }
    }
}
