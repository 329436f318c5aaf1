//! Storage seam.
//!
//! The core never talks to a database directly. It reads and writes through
//! [`Store`], which a relational backend implements by rendering
//! [`VerseQuery::to_sql`](crate::VerseQuery::to_sql) and mapping unique-key
//! failures to [`StoreError::UniqueViolation`].
//!
//! [`MemoryStore`] is the in-process implementation used by the CLI and the
//! tests. It enforces the same unique constraints a SQL schema would:
//!
//! - `verse (translation, book, chapter, verse)`
//! - `scheduled_day (date)`
//! - `schedule_batch (year, month)`

#[path = "store/dataset.rs"]
mod dataset;
#[path = "store/memory.rs"]
mod memory;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::StoreError;
use crate::predicate::VerseQuery;
use crate::scheduler::{PoolEntry, ScheduledDay};
use crate::{Translation, Verse};

pub use dataset::{Dataset, DatasetVerse, PoolSeed};
pub use memory::MemoryStore;

/// How many times one pool entry was picked in a scheduling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolUsage {
    pub entry_id: u64,
    pub count: u32,
}

/// Everything one `schedule_month` run writes, committed atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleBatch {
    pub year: i32,
    pub month: u32,
    pub days: Vec<ScheduledDay>,
    pub usage: Vec<PoolUsage>,
    /// Written to `last_scheduled_at` of every used entry.
    pub scheduled_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    /// A batch for the same month was committed earlier; nothing was written.
    AlreadyScheduled,
}

/// Query interface the core needs from persistent storage.
pub trait Store {
    fn translations(&self) -> Result<Vec<Translation>, StoreError>;

    /// Verses matching the query, ordered by book ordinal, chapter, verse.
    fn select_verses(&self, query: &VerseQuery) -> Result<Vec<Verse>, StoreError>;

    fn load_pool(&self) -> Result<Vec<PoolEntry>, StoreError>;

    fn pool_entry(&self, id: u64) -> Result<Option<PoolEntry>, StoreError>;

    fn scheduled_day(&self, date: NaiveDate) -> Result<Option<ScheduledDay>, StoreError>;

    /// Schedule rows with `from <= date <= to`, ordered by date.
    fn scheduled_days(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<ScheduledDay>, StoreError>;

    /// Insert the batch marker, its days and the pool usage in one unit.
    ///
    /// Either everything is written or nothing is. A date that already has a
    /// row fails the whole batch with [`StoreError::UniqueViolation`].
    fn commit_schedule(&self, batch: &ScheduleBatch) -> Result<CommitOutcome, StoreError>;

    fn has_schedule_between(&self, from: NaiveDate, to: NaiveDate) -> Result<bool, StoreError> {
        Ok(!self.scheduled_days(from, to)?.is_empty())
    }
}
