//! Reference string parser.
//!
//! Turns `"genesis 1:1-5"`, `"1 imp 3:5 to 2 sam 4:2"` or `"john 3:16"` into a
//! [`VerseRange`].
//!
//! ## Pipeline
//!
//! ```text
//! (0) separators   "->", " to ", "–", " - "  ──▶ "-"      spacing around ":" removed
//! (1) split        first "-" that follows <chapter>:<verse>
//! (2) start part   <book> <chapter>:<verse>                 book ──▶ BookResolver
//! (3) end part     <book> <chapter>:<verse>   cross-book / explicit book
//!                  <chapter>:<verse>          same book
//!                  <verse>                    same chapter
//! (4) assemble     missing end fields copy the start
//! (5) order check  keep, reject or swap per ReversedRanges
//! ```
//!
//! The split looks for a separator *after* a chapter:verse pair so hyphenated
//! book names such as `1-samuel` survive step (1).
//!
//! Under the default [`ReversedRanges::Keep`] only the canonical order of two
//! different books goes unchecked; an end before its start within one book
//! is always rejected.

use tracing::debug;

use super::resolver::BookResolver;
use crate::config::ReversedRanges;
use crate::error::{Error, Result};
use crate::{Catalog, Translation, VerseRange};

/// One side of a reference after the grammar matched.
#[derive(Debug, Clone, PartialEq, Eq)]
enum EndPart {
    Full { book: &'static str, chapter: u16, verse: u16 },
    ChapterVerse { chapter: u16, verse: u16 },
    Verse(u16),
}

/// Parses reference strings into verse ranges.
#[derive(Debug, Clone)]
pub struct ReferenceParser<'a> {
    catalog: &'a Catalog,
    resolver: &'a BookResolver,
    reversed: ReversedRanges,
}

impl<'a> ReferenceParser<'a> {
    pub fn new(catalog: &'a Catalog, resolver: &'a BookResolver) -> Self {
        ReferenceParser { catalog, resolver, reversed: ReversedRanges::default() }
    }

    pub fn with_reversed_ranges(mut self, policy: ReversedRanges) -> Self {
        self.reversed = policy;
        self
    }

    /// Parse `reference`, resolving book names with `translation` as the
    /// localized fallback.
    pub fn parse(&self, reference: &str, translation: Option<&Translation>) -> Result<VerseRange> {
        let text = normalize_separators(reference);
        let (start_text, end_text) = split_range(&text);

        let (book, chapter, verse) = self
            .full_reference(reference, start_text, translation)?
            .ok_or_else(|| Error::invalid(reference, "expected '<book> <chapter>:<verse>'"))?;

        let end = match end_text {
            None => EndPart::Verse(verse),
            Some(end_text) => {
                if regex!(r"\d+:\d+-|\d-\d").is_match(end_text) {
                    return Err(Error::invalid(reference, "multiple ranges are not supported"));
                }
                self.end_part(reference, end_text, translation)?
            }
        };

        let range = match end {
            EndPart::Full { book: end_book, chapter: end_chapter, verse: end_verse } => {
                VerseRange::new((book, chapter, verse), (end_book, end_chapter, end_verse))
            }
            EndPart::ChapterVerse { chapter: end_chapter, verse: end_verse } => {
                VerseRange::new((book, chapter, verse), (book, end_chapter, end_verse))
            }
            EndPart::Verse(end_verse) => VerseRange::new((book, chapter, verse), (book, chapter, end_verse)),
        };

        let range = self.check_order(reference, range)?;
        debug!(reference, range = %range, "parsed reference");
        Ok(range)
    }

    /// Match `<book> <chapter>:<verse>`. `Ok(None)` means the text has a
    /// different shape; a book that fails to resolve is an error.
    fn full_reference(
        &self,
        reference: &str,
        text: &str,
        translation: Option<&Translation>,
    ) -> Result<Option<(&'static str, u16, u16)>> {
        let Some(caps) = regex!(r"^(?P<book>.*\p{L}\.?)\s*(?P<chapter>\d+):(?P<verse>\d+)$").captures(text) else {
            return Ok(None);
        };
        let book = self.resolver.resolve(&caps["book"], translation)?;
        let chapter = number(reference, &caps["chapter"])?;
        let verse = number(reference, &caps["verse"])?;
        Ok(Some((book, chapter, verse)))
    }

    fn end_part(&self, reference: &str, text: &str, translation: Option<&Translation>) -> Result<EndPart> {
        if let Some((book, chapter, verse)) = self.full_reference(reference, text, translation)? {
            return Ok(EndPart::Full { book, chapter, verse });
        }
        if let Some(caps) = regex!(r"^(\d+):(\d+)$").captures(text) {
            let chapter = number(reference, &caps[1])?;
            let verse = number(reference, &caps[2])?;
            return Ok(EndPart::ChapterVerse { chapter, verse });
        }
        if let Some(caps) = regex!(r"^(\d+)$").captures(text) {
            return Ok(EndPart::Verse(number(reference, &caps[1])?));
        }
        Err(Error::invalid(reference, "range end must be '<book> <ch>:<v>', '<ch>:<v>' or '<v>'"))
    }

    fn check_order(&self, reference: &str, range: VerseRange) -> Result<VerseRange> {
        let start = (self.catalog.ordinal(&range.start_book), range.start_chapter, range.start_verse);
        let end = (self.catalog.ordinal(&range.end_book), range.end_chapter, range.end_verse);
        if end >= start {
            return Ok(range);
        }
        match self.reversed {
            ReversedRanges::Keep if range.start_book != range.end_book => {
                debug!(reference, "keeping cross-book range out of canonical order");
                Ok(range)
            }
            ReversedRanges::Keep | ReversedRanges::Reject => Err(Error::invalid(reference, "range end precedes its start")),
            ReversedRanges::Swap => {
                debug!(reference, "swapping reversed range");
                Ok(range.swapped())
            }
        }
    }
}

/// Collapse whitespace and rewrite every accepted range separator to `-`.
fn normalize_separators(reference: &str) -> String {
    let text = reference.split_whitespace().collect::<Vec<_>>().join(" ");
    let text = text.replace("->", "-").replace(['\u{2013}', '\u{2014}'], "-");
    let text = regex!(r"(?i)\s+to\s+").replace_all(&text, "-");
    let text = regex!(r"\s*-\s*").replace_all(&text, "-");
    regex!(r"\s*:\s*").replace_all(&text, ":").into_owned()
}

/// Split at the first `-` that follows a chapter:verse pair.
fn split_range(text: &str) -> (&str, Option<&str>) {
    match regex!(r"^(.+?\d+:\d+)-(.+)$").captures(text) {
        Some(caps) => match (caps.get(1), caps.get(2)) {
            (Some(start), Some(end)) => (start.as_str(), Some(end.as_str())),
            _ => (text, None),
        },
        None => (text, None),
    }
}

/// Parse a chapter or verse number; both start at 1.
fn number(reference: &str, digits: &str) -> Result<u16> {
    match digits.parse::<u16>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(Error::invalid(reference, "chapter and verse numbers must be between 1 and 65535")),
    }
}
