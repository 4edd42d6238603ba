//! Per-channel edge action state machine

use crate::compare::ComparePair;
use crate::traits::{CarrierSample, CountDirection};

use super::{ActionMode, OutputState};

/// Turns compare crossings into output transitions for one channel
///
/// Sets and clears are edge-triggered, so moving a threshold past a
/// stationary counter does not add a pulse. A channel is however never left
/// active on the strictly inactive side of its own threshold, which keeps a
/// complementary pair exclusive even when the thresholds move mid-period.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeActionProcessor {
    mode: ActionMode,
    state: OutputState,
    previous: Option<(f64, CountDirection)>,
}

impl EdgeActionProcessor {
    pub fn new(mode: ActionMode) -> Self {
        Self {
            mode,
            state: OutputState::Inactive,
            previous: None,
        }
    }

    pub fn mode(&self) -> ActionMode {
        self.mode
    }

    pub fn state(&self) -> OutputState {
        self.state
    }

    /// Change the action mode; the level is re-derived on the next step
    pub fn set_mode(&mut self, mode: ActionMode) {
        if mode != self.mode {
            self.mode = mode;
            self.previous = None;
        }
    }

    /// Back to the construction state
    pub fn reset(&mut self) {
        self.state = OutputState::Inactive;
        self.previous = None;
    }

    /// Process one carrier sample against the current thresholds
    ///
    /// The first call after construction, reset or a saturated stretch only
    /// takes the level from the counter position. It does not stay inactive
    /// until the first crossing, so a channel started inside its active
    /// region drives from the first step. A step whose direction
    /// differs from the previous one is walked as separate segments through
    /// the turning point.
    pub fn process(&mut self, sample: &CarrierSample, pair: &ComparePair) -> OutputState {
        let counter = sample.counter;
        let direction = sample.direction;

        if let Some(saturation) = pair.saturation() {
            self.state = self.mode.saturated_level(saturation);
            self.previous = None;
            return self.state;
        }

        let (prev_counter, prev_direction) = match self.previous {
            Some(prev) => prev,
            None => {
                self.state = self.mode.level_at(counter, pair);
                self.previous = Some((counter, direction));
                return self.state;
            }
        };

        match (prev_direction, direction) {
            (CountDirection::Up, CountDirection::Down) => {
                self.segment(prev_counter, 1.0, CountDirection::Up, pair);
                self.segment(1.0, counter, CountDirection::Down, pair);
            }
            (CountDirection::Down, CountDirection::Up) => {
                self.segment(prev_counter, 0.0, CountDirection::Down, pair);
                self.segment(0.0, counter, CountDirection::Up, pair);
            }
            // Same direction but moved backwards: a whole turn went by
            (CountDirection::Up, CountDirection::Up) if counter < prev_counter => {
                self.segment(prev_counter, 1.0, CountDirection::Up, pair);
                self.segment(1.0, 0.0, CountDirection::Down, pair);
                self.segment(0.0, counter, CountDirection::Up, pair);
            }
            (CountDirection::Down, CountDirection::Down) if counter > prev_counter => {
                self.segment(prev_counter, 0.0, CountDirection::Down, pair);
                self.segment(0.0, 1.0, CountDirection::Up, pair);
                self.segment(1.0, counter, CountDirection::Down, pair);
            }
            _ => self.segment(prev_counter, counter, direction, pair),
        }

        if self.state.is_active() && self.mode.outside(counter, pair) {
            self.state = OutputState::Inactive;
        }

        self.previous = Some((counter, direction));
        self.state
    }

    fn segment(&mut self, from: f64, to: f64, direction: CountDirection, pair: &ComparePair) {
        if self.mode.set_trigger().fires(from, to, direction, pair) {
            self.state = OutputState::Active;
        } else if self.mode.clear_trigger().fires(from, to, direction, pair) {
            self.state = OutputState::Inactive;
        }
    }
}
