//! Daily verse scheduling.
//!
//! Assigns one pool entry to every calendar day and keeps a rolling buffer of
//! scheduled months ahead of today.
//!
//! ```text
//! ensure_buffer(today)
//!   for each month in [next, next + buffer_months)
//!     has rows? ──yes──▶ skip
//!        │no
//!        v
//!   schedule_month(y, m)
//!     load pool once
//!     for each day: fixed-date subset or whole pool ──▶ select::pick
//!     commit ScheduleBatch (days + usage + (y, m) marker), all or nothing
//! ```
//!
//! Entry lifecycle: never scheduled (`last_scheduled_at = None`) → scheduled
//! once → scheduled many (`schedule_count` grows). Entries recycle forever.
//!
//! Overlapping runs for the same month are harmless: the `(year, month)`
//! marker turns the later commit into [`ScheduleOutcome::AlreadyScheduled`].
//! A clash on a single date without a marker (rows written by other means)
//! surfaces as [`Error::SchedulingConflict`] and is safe to retry.

#[path = "scheduler/report.rs"]
mod report;
#[path = "scheduler/select.rs"]
mod select;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::SchedulerConfig;
use crate::error::{Error, Result, StoreError};
use crate::store::{CommitOutcome, PoolUsage, ScheduleBatch, Store};
use crate::VerseRange;

pub use report::{ScheduleOutcome, ScheduleReport};

// --- Pool and calendar types --------------------------------------------------

/// A month/day pair (`MM-DD`) that pins a pool entry to a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDay {
    pub month: u32,
    pub day: u32,
}

impl CalendarDay {
    pub fn new(month: u32, day: u32) -> Option<Self> {
        // 2000 is a leap year, so 02-29 is accepted.
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| CalendarDay { month, day })
    }

    pub fn of(date: NaiveDate) -> Self {
        CalendarDay { month: date.month(), day: date.day() }
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for CalendarDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Config(format!("invalid calendar day '{s}' (expected MM-DD)"));
        let (month, day) = s.trim().split_once('-').ok_or_else(invalid)?;
        let month = month.parse().map_err(|_| invalid())?;
        let day = day.parse().map_err(|_| invalid())?;
        CalendarDay::new(month, day).ok_or_else(invalid)
    }
}

impl TryFrom<String> for CalendarDay {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CalendarDay> for String {
    fn from(day: CalendarDay) -> Self {
        day.to_string()
    }
}

/// A candidate range for daily scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub id: u64,
    pub range: VerseRange,
    #[serde(default)]
    pub fixed_date: Option<CalendarDay>,
    #[serde(default)]
    pub last_scheduled_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub schedule_count: u32,
}

impl PoolEntry {
    pub fn new(id: u64, range: VerseRange) -> Self {
        PoolEntry { id, range, fixed_date: None, last_scheduled_at: None, schedule_count: 0 }
    }

    pub fn pinned_to(mut self, day: CalendarDay) -> Self {
        self.fixed_date = Some(day);
        self
    }
}

/// One calendar date assigned to one pool entry. Unique on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledDay {
    pub date: NaiveDate,
    pub entry_id: u64,
}

/// Every date of `year`-`month`, in order.
pub fn month_days(year: i32, month: u32) -> Result<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(Error::InvalidMonth { year, month })?;
    Ok(first.iter_days().take_while(|d| d.month() == month).collect())
}

/// `(year, month)` shifted forward by `months`.
fn add_months(year: i32, month: u32, months: u32) -> (i32, u32) {
    let zero_based = year * 12 + (month as i32 - 1) + months as i32;
    (zero_based.div_euclid(12), zero_based.rem_euclid(12) as u32 + 1)
}

// --- Scheduler ------------------------------------------------------------------

/// Schedules pool entries onto calendar days through a [`Store`].
pub struct Scheduler<'a, S: Store + ?Sized> {
    store: &'a S,
    config: &'a SchedulerConfig,
}

impl<'a, S: Store + ?Sized> Scheduler<'a, S> {
    pub fn new(store: &'a S, config: &'a SchedulerConfig) -> Self {
        Scheduler { store, config }
    }

    /// Assign a pool entry to every day of `year`-`month`.
    ///
    /// `now` is written to `last_scheduled_at` of every entry used.
    pub fn schedule_month<R: Rng + ?Sized>(
        &self,
        year: i32,
        month: u32,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Result<ScheduleReport> {
        let started = Instant::now();
        let dates = month_days(year, month)?;
        let pool = self.store.load_pool()?;
        if pool.is_empty() {
            return Err(Error::EmptyPool);
        }

        let everyone: Vec<usize> = (0..pool.len()).collect();
        let mut picked = vec![0u32; pool.len()];
        let mut days = Vec::with_capacity(dates.len());
        let mut fixed_date_days = 0;

        for &date in &dates {
            let key = CalendarDay::of(date);
            let pinned: Vec<usize> = everyone.iter().copied().filter(|&i| pool[i].fixed_date == Some(key)).collect();
            let candidates = if pinned.is_empty() { &everyone } else { &pinned };
            if !pinned.is_empty() {
                fixed_date_days += 1;
            }

            let Some(idx) = select::pick(&pool, candidates, &picked, self.config.lru_window, rng) else {
                return Err(Error::EmptyPool);
            };
            picked[idx] += 1;
            debug!(%date, entry = pool[idx].id, range = %pool[idx].range, "picked daily verse");
            days.push(ScheduledDay { date, entry_id: pool[idx].id });
        }

        let usage: Vec<PoolUsage> = picked
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(i, &count)| PoolUsage { entry_id: pool[i].id, count })
            .collect();
        let entries_used = usage.len();
        let batch = ScheduleBatch { year, month, days, usage, scheduled_at: now };

        let outcome = match self.store.commit_schedule(&batch) {
            Ok(CommitOutcome::Committed) => ScheduleOutcome::Scheduled,
            Ok(CommitOutcome::AlreadyScheduled) => ScheduleOutcome::AlreadyScheduled,
            Err(StoreError::UniqueViolation { constraint: "scheduled_day.date", key }) => {
                let date = NaiveDate::parse_from_str(&key, "%Y-%m-%d").unwrap_or(dates[0]);
                warn!(%date, year, month, "schedule batch collided with an existing day");
                return Err(Error::SchedulingConflict { date });
            }
            Err(err) => return Err(err.into()),
        };

        let report = match outcome {
            ScheduleOutcome::Scheduled => ScheduleReport {
                year,
                month,
                outcome,
                days: batch.days.len(),
                entries_used,
                fixed_date_days,
                elapsed: started.elapsed(),
            },
            ScheduleOutcome::AlreadyScheduled => ScheduleReport {
                year,
                month,
                outcome,
                days: 0,
                entries_used: 0,
                fixed_date_days: 0,
                elapsed: started.elapsed(),
            },
        };
        info!(
            year,
            month,
            outcome = ?report.outcome,
            days = report.days,
            entries = report.entries_used,
            "schedule run"
        );
        Ok(report)
    }

    /// Keep `buffer_months` months after `today` scheduled.
    ///
    /// Months that already have rows are skipped, so repeated calls only
    /// ever add the newest month.
    pub fn ensure_buffer<R: Rng + ?Sized>(
        &self,
        today: NaiveDate,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Result<Vec<ScheduleReport>> {
        let mut reports = Vec::new();
        for offset in 1..=self.config.buffer_months.max(1) {
            let (year, month) = add_months(today.year(), today.month(), offset);
            let dates = month_days(year, month)?;
            let (Some(&first), Some(&last)) = (dates.first(), dates.last()) else {
                continue;
            };
            if self.store.has_schedule_between(first, last)? {
                debug!(year, month, "month already scheduled");
                continue;
            }
            reports.push(self.schedule_month(year, month, now, rng)?);
        }
        Ok(reports)
    }

    /// The range scheduled for `date`.
    pub fn scheduled_range(&self, date: NaiveDate) -> Result<VerseRange> {
        let day = self.store.scheduled_day(date)?.ok_or(Error::NotScheduled(date))?;
        let entry = self.store.pool_entry(day.entry_id)?.ok_or_else(|| {
            StoreError::Backend(format!("scheduled day {date} references missing pool entry {}", day.entry_id))
        })?;
        Ok(entry.range)
    }
}
