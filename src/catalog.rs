//! Canonical book catalog.
//!
//! The 66 books in canonical order, each with a stable slug and its chapter
//! count. Ordinals 1..=39 are the Old Testament, 40..=66 the New Testament.
//!
//! The catalog is an ordinary value: build it once with [`Catalog::canonical`]
//! and hand references to whatever needs book lookups.

use std::collections::HashMap;

/// `(slug, chapters)` in canonical order. The position + 1 is the ordinal.
const CANON: [(&str, u16); 66] = [
    ("genesis", 50),
    ("exodus", 40),
    ("leviticus", 27),
    ("numbers", 36),
    ("deuteronomy", 34),
    ("joshua", 24),
    ("judges", 21),
    ("ruth", 4),
    ("1-samuel", 31),
    ("2-samuel", 24),
    ("1-kings", 22),
    ("2-kings", 25),
    ("1-chronicles", 29),
    ("2-chronicles", 36),
    ("ezra", 10),
    ("nehemiah", 13),
    ("esther", 10),
    ("job", 42),
    ("psalms", 150),
    ("proverbs", 31),
    ("ecclesiastes", 12),
    ("song-of-solomon", 8),
    ("isaiah", 66),
    ("jeremiah", 52),
    ("lamentations", 5),
    ("ezekiel", 48),
    ("daniel", 12),
    ("hosea", 14),
    ("joel", 3),
    ("amos", 9),
    ("obadiah", 1),
    ("jonah", 4),
    ("micah", 7),
    ("nahum", 3),
    ("habakkuk", 3),
    ("zephaniah", 3),
    ("haggai", 2),
    ("zechariah", 14),
    ("malachi", 4),
    ("matthew", 28),
    ("mark", 16),
    ("luke", 24),
    ("john", 21),
    ("acts", 28),
    ("romans", 16),
    ("1-corinthians", 16),
    ("2-corinthians", 13),
    ("galatians", 6),
    ("ephesians", 6),
    ("philippians", 4),
    ("colossians", 4),
    ("1-thessalonians", 5),
    ("2-thessalonians", 3),
    ("1-timothy", 6),
    ("2-timothy", 4),
    ("titus", 3),
    ("philemon", 1),
    ("hebrews", 13),
    ("james", 5),
    ("1-peter", 5),
    ("2-peter", 3),
    ("1-john", 5),
    ("2-john", 1),
    ("3-john", 1),
    ("jude", 1),
    ("revelation", 22),
];

/// Last Old Testament ordinal (Malachi).
const LAST_OLD_TESTAMENT: u8 = 39;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Testament {
    Old,
    New,
}

/// One entry of the canonical catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalBook {
    pub slug: &'static str,
    pub ordinal: u8,
    pub chapter_count: u16,
}

impl CanonicalBook {
    pub fn testament(&self) -> Testament {
        if self.ordinal <= LAST_OLD_TESTAMENT { Testament::Old } else { Testament::New }
    }
}

/// Immutable, ordered list of canonical books with slug lookup.
#[derive(Debug, Clone)]
pub struct Catalog {
    books: Vec<CanonicalBook>,
    by_slug: HashMap<&'static str, usize>,
}

impl Catalog {
    /// Build the fixed 66-book canonical catalog.
    pub fn canonical() -> Self {
        let books: Vec<CanonicalBook> = CANON
            .iter()
            .enumerate()
            .map(|(idx, &(slug, chapter_count))| CanonicalBook { slug, ordinal: (idx + 1) as u8, chapter_count })
            .collect();
        let by_slug = books.iter().enumerate().map(|(idx, b)| (b.slug, idx)).collect();
        Catalog { books, by_slug }
    }

    pub fn books(&self) -> &[CanonicalBook] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, slug: &str) -> Option<&CanonicalBook> {
        self.by_slug.get(slug).map(|&idx| &self.books[idx])
    }

    pub fn by_ordinal(&self, ordinal: u8) -> Option<&CanonicalBook> {
        self.books.get(usize::from(ordinal).checked_sub(1)?)
    }

    /// Ordinal of `slug`, or `None` for an unknown slug.
    pub fn ordinal(&self, slug: &str) -> Option<u8> {
        self.get(slug).map(|b| b.ordinal)
    }

    /// Books strictly between two ordinals, in canonical order.
    pub fn between(&self, start: u8, end: u8) -> impl Iterator<Item = &CanonicalBook> {
        self.books.iter().filter(move |b| b.ordinal > start && b.ordinal < end)
    }

    /// True when `chapter` exists in `slug`.
    pub fn has_chapter(&self, slug: &str, chapter: u16) -> bool {
        self.get(slug).is_some_and(|b| chapter >= 1 && chapter <= b.chapter_count)
    }
}
