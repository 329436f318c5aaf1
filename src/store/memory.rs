//! In-memory [`Store`].
//!
//! All tables live behind one `RwLock`, so `commit_schedule` is a single
//! critical section and either applies fully or not at all.

use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{CommitOutcome, ScheduleBatch, Store};
use crate::error::StoreError;
use crate::predicate::VerseQuery;
use crate::scheduler::{PoolEntry, ScheduledDay};
use crate::{Translation, Verse};

type VerseKey = (String, String, u16, u16);

#[derive(Debug, Default)]
struct Tables {
    translations: BTreeMap<String, Translation>,
    verses: HashMap<VerseKey, Verse>,
    pool: BTreeMap<u64, PoolEntry>,
    schedule: BTreeMap<NaiveDate, ScheduledDay>,
    batches: BTreeSet<(i32, u32)>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_translation(&self, translation: Translation) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if tables.translations.contains_key(&translation.slug) {
            return Err(StoreError::UniqueViolation { constraint: "translation.slug", key: translation.slug });
        }
        tables.translations.insert(translation.slug.clone(), translation);
        Ok(())
    }

    pub fn insert_verse(&self, verse: Verse) -> Result<(), StoreError> {
        let key = (verse.translation.clone(), verse.book.clone(), verse.chapter, verse.verse);
        let mut tables = self.tables.write();
        if tables.verses.contains_key(&key) {
            return Err(StoreError::UniqueViolation {
                constraint: "verse.key",
                key: format!("{}/{} {}:{}", key.0, key.1, key.2, key.3),
            });
        }
        tables.verses.insert(key, verse);
        Ok(())
    }

    pub fn insert_pool_entry(&self, entry: PoolEntry) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if tables.pool.contains_key(&entry.id) {
            return Err(StoreError::UniqueViolation { constraint: "pool.id", key: entry.id.to_string() });
        }
        tables.pool.insert(entry.id, entry);
        Ok(())
    }

    /// Insert one schedule row outside any batch.
    pub fn insert_scheduled_day(&self, day: ScheduledDay) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if tables.schedule.contains_key(&day.date) {
            return Err(StoreError::UniqueViolation { constraint: "scheduled_day.date", key: day.date.to_string() });
        }
        tables.schedule.insert(day.date, day);
        Ok(())
    }

    pub fn verse_count(&self) -> usize {
        self.tables.read().verses.len()
    }
}

impl Store for MemoryStore {
    fn translations(&self) -> Result<Vec<Translation>, StoreError> {
        Ok(self.tables.read().translations.values().cloned().collect())
    }

    fn select_verses(&self, query: &VerseQuery) -> Result<Vec<Verse>, StoreError> {
        let tables = self.tables.read();
        let mut rows: Vec<Verse> = tables.verses.values().filter(|v| query.predicate.matches(v)).cloned().collect();
        rows.sort_by(|a, b| a.position().cmp(&b.position()).then_with(|| a.translation.cmp(&b.translation)));
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    fn load_pool(&self) -> Result<Vec<PoolEntry>, StoreError> {
        Ok(self.tables.read().pool.values().cloned().collect())
    }

    fn pool_entry(&self, id: u64) -> Result<Option<PoolEntry>, StoreError> {
        Ok(self.tables.read().pool.get(&id).cloned())
    }

    fn scheduled_day(&self, date: NaiveDate) -> Result<Option<ScheduledDay>, StoreError> {
        Ok(self.tables.read().schedule.get(&date).cloned())
    }

    fn scheduled_days(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<ScheduledDay>, StoreError> {
        if from > to {
            return Ok(Vec::new());
        }
        Ok(self.tables.read().schedule.range(from..=to).map(|(_, d)| d.clone()).collect())
    }

    fn commit_schedule(&self, batch: &ScheduleBatch) -> Result<CommitOutcome, StoreError> {
        let mut tables = self.tables.write();
        if tables.batches.contains(&(batch.year, batch.month)) {
            return Ok(CommitOutcome::AlreadyScheduled);
        }

        // Validate everything before the first write.
        let mut dates = BTreeSet::new();
        for day in &batch.days {
            if tables.schedule.contains_key(&day.date) || !dates.insert(day.date) {
                return Err(StoreError::UniqueViolation {
                    constraint: "scheduled_day.date",
                    key: day.date.to_string(),
                });
            }
        }
        if let Some(missing) = batch.usage.iter().find(|u| !tables.pool.contains_key(&u.entry_id)) {
            return Err(StoreError::Backend(format!("pool entry {} does not exist", missing.entry_id)));
        }

        for day in &batch.days {
            tables.schedule.insert(day.date, day.clone());
        }
        for usage in &batch.usage {
            if let Some(entry) = tables.pool.get_mut(&usage.entry_id) {
                entry.last_scheduled_at = Some(batch.scheduled_at);
                entry.schedule_count += usage.count;
            }
        }
        tables.batches.insert((batch.year, batch.month));
        Ok(CommitOutcome::Committed)
    }
}
