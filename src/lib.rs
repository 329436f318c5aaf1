extern crate self as lectio;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[macro_use]
mod macros;
mod api;
mod catalog;
mod config;
mod engine;
mod error;
mod predicate;
mod scheduler;
mod store;

pub use api::{Context, Lectio, Passage};
pub use catalog::{CanonicalBook, Catalog, Testament};
pub use config::{Config, ParserConfig, QueryConfig, ResolverConfig, ReversedRanges, SchedulerConfig};
pub use engine::{
    BookResolver, RangeCompiler, ReferenceParser, ResolveStrategy, normalize_text, partition_rows,
};
pub use error::{Error, Result, StoreError};
pub use predicate::{Field, Predicate, SqlFragment, SqlParam, VerseQuery};
pub use scheduler::{
    CalendarDay, PoolEntry, ScheduleOutcome, ScheduleReport, ScheduledDay, Scheduler, month_days,
};
pub use store::{CommitOutcome, Dataset, DatasetVerse, MemoryStore, PoolSeed, PoolUsage, ScheduleBatch, Store};

// --- Corpus types -----------------------------------------------------------

/// Aggregate counts for an imported translation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationTotals {
    #[serde(default)]
    pub books: u32,
    #[serde(default)]
    pub chapters: u32,
    #[serde(default)]
    pub verses: u32,
}

/// A named translation of the corpus.
///
/// `book_names` maps canonical slugs to the translation's own display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub slug: String,
    pub language: String,
    #[serde(default)]
    pub book_names: HashMap<String, String>,
    #[serde(default)]
    pub totals: TranslationTotals,
}

impl Translation {
    /// Localized name for a canonical slug, falling back to the slug itself.
    pub fn book_name<'a>(&'a self, slug: &'a str) -> &'a str {
        self.book_names.get(slug).map(String::as_str).unwrap_or(slug)
    }
}

/// One verse row. Unique on `(translation, book, chapter, verse)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub translation: String,
    pub book: String,
    /// Canonical ordinal of `book`, denormalised for ordering.
    pub book_ordinal: u8,
    pub book_name: String,
    pub chapter: u16,
    pub verse: u16,
    pub text: String,
}

impl Verse {
    /// Sort key matching canonical reading order.
    pub fn position(&self) -> (u8, u16, u16) {
        (self.book_ordinal, self.chapter, self.verse)
    }
}

// --- Verse ranges -----------------------------------------------------------

/// A resolved, inclusive verse range.
///
/// Single verses are ranges whose start equals their end. Books are canonical
/// slugs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerseRange {
    pub start_book: String,
    pub start_chapter: u16,
    pub start_verse: u16,
    pub end_book: String,
    pub end_chapter: u16,
    pub end_verse: u16,
}

/// Topology of a range, which decides the predicate shape it compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeShape {
    SingleVerse,
    SameChapter,
    SameBook,
    CrossBook,
}

impl VerseRange {
    pub fn single(book: impl Into<String>, chapter: u16, verse: u16) -> Self {
        let book = book.into();
        VerseRange {
            start_book: book.clone(),
            start_chapter: chapter,
            start_verse: verse,
            end_book: book,
            end_chapter: chapter,
            end_verse: verse,
        }
    }

    pub fn new(
        start: (impl Into<String>, u16, u16),
        end: (impl Into<String>, u16, u16),
    ) -> Self {
        VerseRange {
            start_book: start.0.into(),
            start_chapter: start.1,
            start_verse: start.2,
            end_book: end.0.into(),
            end_chapter: end.1,
            end_verse: end.2,
        }
    }

    pub fn shape(&self) -> RangeShape {
        if self.start_book != self.end_book {
            RangeShape::CrossBook
        } else if self.start_chapter != self.end_chapter {
            RangeShape::SameBook
        } else if self.start_verse != self.end_verse {
            RangeShape::SameChapter
        } else {
            RangeShape::SingleVerse
        }
    }

    /// Exchange start and end.
    pub fn swapped(self) -> Self {
        VerseRange {
            start_book: self.end_book,
            start_chapter: self.end_chapter,
            start_verse: self.end_verse,
            end_book: self.start_book,
            end_chapter: self.start_chapter,
            end_verse: self.start_verse,
        }
    }

    /// Render with the translation's localized book names.
    pub fn label(&self, translation: &Translation) -> String {
        self.render(translation.book_name(&self.start_book), translation.book_name(&self.end_book))
    }

    fn render(&self, start_name: &str, end_name: &str) -> String {
        let head = format!("{} {}:{}", start_name, self.start_chapter, self.start_verse);
        match self.shape() {
            RangeShape::SingleVerse => head,
            RangeShape::SameChapter => format!("{head}-{}", self.end_verse),
            RangeShape::SameBook => format!("{head}-{}:{}", self.end_chapter, self.end_verse),
            RangeShape::CrossBook => format!("{head}-{} {}:{}", end_name, self.end_chapter, self.end_verse),
        }
    }
}

impl fmt::Display for VerseRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&self.start_book, &self.end_book))
    }
}
