//! World time. One unit is a simulated minute; a day is 1440 units.

pub const MINUTES_PER_DAY: u64 = 1440;
pub const MINUTES_PER_HOUR: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct WorldClock {
    pub time: u64,
}

impl WorldClock {
    pub fn new(time: u64) -> Self {
        Self { time }
    }

    pub fn advance(&mut self, minutes: u64) {
        self.time += minutes;
    }

    /// 1-based day number.
    pub fn day(&self) -> u64 {
        self.time / MINUTES_PER_DAY + 1
    }

    pub fn hour(&self) -> u64 {
        (self.time % MINUTES_PER_DAY) / MINUTES_PER_HOUR
    }

    pub fn minute(&self) -> u64 {
        self.time % MINUTES_PER_HOUR
    }

    pub fn is_daytime(&self) -> bool {
        (6..18).contains(&self.hour())
    }

    /// Compact stamp used on log entries, e.g. `D2 03:07`.
    pub fn stamp(&self) -> String {
        format!("D{} {:02}:{:02}", self.day(), self.hour(), self.minute())
    }

    /// Header label, e.g. `Day 2, 03:07`.
    pub fn label(&self) -> String {
        format!("Day {}, {:02}:{:02}", self.day(), self.hour(), self.minute())
    }
}
