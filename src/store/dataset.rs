//! TOML seed documents for [`MemoryStore`].
//!
//! ```toml
//! [[translations]]
//! slug = "vdcc"
//! language = "ro"
//! book_names = { john = "Ioan", 1-john = "1 Ioan" }
//!
//! [[verses]]
//! translation = "vdcc"
//! book = "john"
//! chapter = 3
//! verse = 16
//! text = "Fiindcă atât de mult a iubit Dumnezeu lumea..."
//!
//! [[pool]]
//! id = 1
//! reference = "john 3:16-18"
//!
//! [[pool]]
//! id = 2
//! reference = "luke 2:1-20"
//! fixed_date = "12-25"
//! ```
//!
//! Verse rows carry canonical book slugs; the ordinal and the localized book
//! name are derived while loading. Translation totals left at zero are
//! computed from the verses.

use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::info;

use super::MemoryStore;
use crate::engine::ReferenceParser;
use crate::error::{Error, Result};
use crate::scheduler::{CalendarDay, PoolEntry};
use crate::{Catalog, Translation, TranslationTotals, Verse};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Dataset {
    pub translations: Vec<Translation>,
    pub verses: Vec<DatasetVerse>,
    pub pool: Vec<PoolSeed>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetVerse {
    pub translation: String,
    pub book: String,
    pub chapter: u16,
    pub verse: u16,
    pub text: String,
}

/// A pool entry written as a reference string.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolSeed {
    pub id: u64,
    pub reference: String,
    #[serde(default)]
    pub fixed_date: Option<CalendarDay>,
}

impl Dataset {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| Error::Config(format!("invalid dataset: {err}")))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("failed to read {}: {err}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Insert everything into `store`.
    ///
    /// Pool references are parsed with `parser` (canonical names only).
    pub fn load_into(&self, store: &MemoryStore, catalog: &Catalog, parser: &ReferenceParser<'_>) -> Result<()> {
        let by_slug: HashMap<&str, &Translation> = self.translations.iter().map(|t| (t.slug.as_str(), t)).collect();
        let mut rows = Vec::with_capacity(self.verses.len());
        for seed in &self.verses {
            let translation = by_slug
                .get(seed.translation.as_str())
                .ok_or_else(|| Error::TranslationNotFound(seed.translation.clone()))?;
            let book = catalog.get(&seed.book).ok_or_else(|| Error::BookNotFound {
                name: seed.book.clone(),
                translation: seed.translation.clone(),
            })?;
            if seed.chapter == 0 || seed.verse == 0 {
                let reference = format!("{} {}:{}", seed.book, seed.chapter, seed.verse);
                return Err(Error::invalid(&reference, "chapter and verse start at 1"));
            }
            rows.push(Verse {
                translation: translation.slug.clone(),
                book: book.slug.to_string(),
                book_ordinal: book.ordinal,
                book_name: translation.book_name(book.slug).to_string(),
                chapter: seed.chapter,
                verse: seed.verse,
                text: seed.text.clone(),
            });
        }

        for translation in &self.translations {
            let mut translation = translation.clone();
            if translation.totals == TranslationTotals::default() {
                translation.totals = totals_for(&translation.slug, &rows);
            }
            store.insert_translation(translation)?;
        }
        for row in rows {
            store.insert_verse(row)?;
        }
        for seed in &self.pool {
            let range = parser.parse(&seed.reference, None)?;
            let mut entry = PoolEntry::new(seed.id, range);
            entry.fixed_date = seed.fixed_date;
            store.insert_pool_entry(entry)?;
        }

        info!(
            translations = self.translations.len(),
            verses = self.verses.len(),
            pool = self.pool.len(),
            "dataset loaded"
        );
        Ok(())
    }
}

fn totals_for(slug: &str, rows: &[Verse]) -> TranslationTotals {
    let mine: Vec<&Verse> = rows.iter().filter(|v| v.translation == slug).collect();
    let books: BTreeSet<u8> = mine.iter().map(|v| v.book_ordinal).collect();
    let chapters: BTreeSet<(u8, u16)> = mine.iter().map(|v| (v.book_ordinal, v.chapter)).collect();
    TranslationTotals { books: books.len() as u32, chapters: chapters.len() as u32, verses: mine.len() as u32 }
}
