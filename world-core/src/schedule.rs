//! Run state and the frame cadences layered on top of the simulation clock.

use crate::types::Speed;

/// Whether frames advance, and how fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunState {
    pub running: bool,
    pub paused: bool,
    pub speed: Speed,
}

impl RunState {
    /// Frames only advance once started and while not paused.
    pub fn is_active(&self) -> bool {
        self.running && !self.paused
    }
}

/// Counts frames and fires every `interval` of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    counter: u32,
}

impl Cadence {
    pub fn new() -> Self {
        Self { counter: 0 }
    }

    /// Bump the counter; returns true (and resets) once it reaches `interval`.
    pub fn tick(&mut self, interval: u32) -> bool {
        self.counter += 1;
        if self.counter >= interval.max(1) {
            self.counter = 0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.counter = 0;
    }
}

impl Default for Cadence {
    fn default() -> Self {
        Self::new()
    }
}

/// Frames between automaton steps at `speed`, e.g. 120 at 1x and 15 at 8x.
pub fn automaton_interval(base: u32, speed: Speed) -> u32 {
    (base / speed.multiplier()).max(1)
}
