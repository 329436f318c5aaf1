//! Scheduling run reports.
//!
//! A [`ScheduleReport`] is returned for every month a run touches, including
//! months that turned out to be scheduled already. Timing is wall-clock for
//! the whole `schedule_month` call (pool load, selection and commit).

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// Rows were written by this run.
    Scheduled,
    /// Another run already committed the month; nothing was written.
    AlreadyScheduled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleReport {
    pub year: i32,
    pub month: u32,
    pub outcome: ScheduleOutcome,
    /// Days assigned in this run (the whole month when scheduled).
    pub days: usize,
    /// Distinct pool entries used.
    pub entries_used: usize,
    /// Days served from entries pinned to that calendar day.
    pub fixed_date_days: usize,
    pub elapsed: Duration,
}

impl ScheduleReport {
    pub fn committed(&self) -> bool {
        self.outcome == ScheduleOutcome::Scheduled
    }
}
