use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::OnceCell;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::Config;
use crate::engine::{BookResolver, RangeCompiler, ReferenceParser, partition_rows};
use crate::error::{Error, Result, StoreError};
use crate::predicate::{Predicate, VerseQuery};
use crate::scheduler::{ScheduleReport, Scheduler};
use crate::store::Store;
use crate::{Catalog, Translation, Verse, VerseRange};

/// Call context.
///
/// Holds the clock reading used by scheduling: `reference_time` becomes
/// `last_scheduled_at` and its date is "today" for the rolling buffer.
#[derive(Debug, Clone)]
pub struct Context {
    pub reference_time: NaiveDateTime,
}

impl Default for Context {
    fn default() -> Self {
        if cfg!(test) {
            let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap_or_default();
            Self { reference_time: NaiveDateTime::new(date, NaiveTime::MIN) }
        } else {
            Self { reference_time: Local::now().naive_local() }
        }
    }
}

impl Context {
    pub fn today(&self) -> NaiveDate {
        self.reference_time.date()
    }
}

/// Verses of one range in one translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passage {
    pub range: VerseRange,
    pub translation: String,
    /// Ordered by book ordinal, chapter, verse.
    pub verses: Vec<Verse>,
    /// `true` when `query.passage_limit` cut the passage short.
    pub truncated: bool,
}

impl Passage {
    /// Heading with the translation's own book names.
    pub fn label(&self, translation: &Translation) -> String {
        self.range.label(translation)
    }
}

/// Translations read from the store on first use.
#[derive(Debug, Default)]
struct Library {
    translations: BTreeMap<String, Translation>,
}

/// Entry point tying the catalog, the engine and a [`Store`] together.
///
/// ```
/// use lectio::{Config, Lectio, MemoryStore, VerseRange};
///
/// let lectio = Lectio::new(MemoryStore::new(), Config::default());
/// let range = lectio.parse_reference("john 3:16-18", None).unwrap();
/// assert_eq!(range, VerseRange::new(("john", 3, 16), ("john", 3, 18)));
/// ```
pub struct Lectio<S: Store> {
    catalog: Catalog,
    resolver: BookResolver,
    store: S,
    config: Config,
    library: OnceCell<Library>,
}

impl<S: Store> Lectio<S> {
    pub fn new(store: S, config: Config) -> Self {
        let catalog = Catalog::canonical();
        let resolver = BookResolver::with_strategies(&catalog, config.resolver.strategies());
        Lectio { catalog, resolver, store, config, library: OnceCell::new() }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn parser(&self) -> ReferenceParser<'_> {
        ReferenceParser::new(&self.catalog, &self.resolver).with_reversed_ranges(self.config.parser.reversed_ranges)
    }

    pub fn compiler(&self) -> RangeCompiler<'_> {
        RangeCompiler::new(&self.catalog).with_intermediate_books(self.config.query.expand_intermediate_books)
    }

    fn library(&self) -> Result<&Library> {
        self.library.get_or_try_init(|| {
            let translations: BTreeMap<_, _> =
                self.store.translations()?.into_iter().map(|t| (t.slug.clone(), t)).collect();
            debug!(count = translations.len(), "translations loaded");
            Ok(Library { translations })
        })
    }

    pub fn translation(&self, slug: &str) -> Result<&Translation> {
        self.library()?.translations.get(slug).ok_or_else(|| Error::TranslationNotFound(slug.to_string()))
    }

    pub fn translations(&self) -> Result<impl Iterator<Item = &Translation>> {
        Ok(self.library()?.translations.values())
    }

    fn localized(&self, translation: Option<&str>) -> Result<Option<&Translation>> {
        translation.map(|slug| self.translation(slug)).transpose()
    }

    // --- Books and references ----------------------------------------------

    /// Canonical slug for a book name, canonical or localized.
    pub fn resolve_book(&self, name: &str, translation: Option<&str>) -> Result<&'static str> {
        self.resolver.resolve(name, self.localized(translation)?)
    }

    pub fn parse_reference(&self, reference: &str, translation: Option<&str>) -> Result<VerseRange> {
        self.parser().parse(reference, self.localized(translation)?)
    }

    pub fn compile_range(&self, range: &VerseRange, translation: &str) -> Predicate {
        self.compiler().compile(range, translation)
    }

    pub fn compile_ranges(&self, ranges: &[VerseRange], translation: &str) -> Predicate {
        self.compiler().compile_batch(ranges, translation)
    }

    // --- Passages ------------------------------------------------------------

    /// Parse `reference` and load its verses.
    ///
    /// Book names may use `translation`'s localized names.
    pub fn passage(&self, reference: &str, translation: &str) -> Result<Passage> {
        let range = self.parse_reference(reference, Some(translation))?;
        self.passage_for(range, translation)
    }

    /// Load the verses of `range`, capped at `query.passage_limit`.
    pub fn passage_for(&self, range: VerseRange, translation: &str) -> Result<Passage> {
        self.fetch(range, translation, self.config.query.limit())
    }

    fn fetch(&self, range: VerseRange, translation: &str, limit: Option<usize>) -> Result<Passage> {
        self.translation(translation)?;
        if range.start_book == range.end_book && !self.catalog.has_chapter(&range.start_book, range.start_chapter) {
            debug!(range = %range, "chapter outside the canon, skipping the store");
            return Err(Error::RangeNotFound(range));
        }
        // One extra row tells a full passage from a truncated one.
        let query =
            VerseQuery::new(self.compile_range(&range, translation)).with_limit(limit.map(|n| n.saturating_add(1)));
        let mut verses = self.store.select_verses(&query)?;
        if verses.is_empty() {
            return Err(Error::RangeNotFound(range));
        }
        let truncated = cap(&mut verses, limit);
        debug!(range = %range, translation, verses = verses.len(), truncated, "passage loaded");
        Ok(Passage { range, translation: translation.to_string(), verses, truncated })
    }

    /// Load many ranges with a single store query.
    ///
    /// Passages come back in input order, each capped at
    /// `query.passage_limit`. Overlapping ranges each receive the shared
    /// verses. Any range without verses fails the whole batch with
    /// [`Error::RangeNotFound`].
    pub fn hydrate(&self, ranges: &[VerseRange], translation: &str) -> Result<Vec<Passage>> {
        self.hydrate_with(ranges, translation, self.config.query.limit())
    }

    fn hydrate_with(&self, ranges: &[VerseRange], translation: &str, limit: Option<usize>) -> Result<Vec<Passage>> {
        self.translation(translation)?;
        if ranges.is_empty() {
            return Ok(Vec::new());
        }
        let compiler = self.compiler();
        let rows = self.store.select_verses(&VerseQuery::new(compiler.compile_batch(ranges, translation)))?;

        let mut passages = Vec::with_capacity(ranges.len());
        for (range, mut verses) in ranges.iter().zip(partition_rows(&compiler, ranges, &rows)) {
            if verses.is_empty() {
                return Err(Error::RangeNotFound(range.clone()));
            }
            let truncated = cap(&mut verses, limit);
            passages.push(Passage { range: range.clone(), translation: translation.to_string(), verses, truncated });
        }
        debug!(ranges = ranges.len(), rows = rows.len(), translation, "hydrated batch");
        Ok(passages)
    }

    // --- Daily verses ----------------------------------------------------------

    fn rng(&self) -> StdRng {
        match self.config.scheduler.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn scheduler(&self) -> Scheduler<'_, S> {
        Scheduler::new(&self.store, &self.config.scheduler)
    }

    pub fn schedule_month(&self, year: i32, month: u32, ctx: &Context) -> Result<ScheduleReport> {
        self.scheduler().schedule_month(year, month, ctx.reference_time, &mut self.rng())
    }

    pub fn ensure_buffer(&self, ctx: &Context) -> Result<Vec<ScheduleReport>> {
        self.scheduler().ensure_buffer(ctx.today(), ctx.reference_time, &mut self.rng())
    }

    pub fn scheduled_range(&self, date: NaiveDate) -> Result<VerseRange> {
        self.scheduler().scheduled_range(date)
    }

    /// The passage scheduled for `date`. Scheduled ranges are never capped.
    pub fn daily_verse(&self, date: NaiveDate, translation: &str) -> Result<Passage> {
        let range = self.scheduled_range(date)?;
        self.fetch(range, translation, None)
    }

    /// Daily passages for every scheduled date in `from..=to`.
    ///
    /// Unscheduled dates are skipped. Passages are not capped. A scheduled
    /// entry with no verses in `translation` fails the whole span with
    /// [`Error::RangeNotFound`]; use [`daily_verse`](Self::daily_verse) per
    /// date to isolate it.
    pub fn daily_verses(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        translation: &str,
    ) -> Result<Vec<(NaiveDate, Passage)>> {
        let days = self.store.scheduled_days(from, to)?;
        let mut dates = Vec::with_capacity(days.len());
        let mut ranges = Vec::with_capacity(days.len());
        for day in days {
            let entry = self.store.pool_entry(day.entry_id)?.ok_or_else(|| {
                let message = format!("scheduled day {} references missing pool entry {}", day.date, day.entry_id);
                StoreError::Backend(message)
            })?;
            dates.push(day.date);
            ranges.push(entry.range);
        }
        Ok(dates.into_iter().zip(self.hydrate_with(&ranges, translation, None)?).collect())
    }
}

/// Truncate to `limit`; `true` when rows were dropped.
fn cap(verses: &mut Vec<Verse>, limit: Option<usize>) -> bool {
    match limit {
        Some(n) if verses.len() > n => {
            verses.truncate(n);
            true
        }
        _ => false,
    }
}
