//! Re-partitioning rows from a batched fetch.
//!
//! A batched query ORs one branch per range, and storage does not report which
//! branch matched a row. The rows are split again here by evaluating each
//! range's own predicate, so the boundaries are exactly the ones the query
//! used. Overlapping ranges each receive a copy of the shared rows.

use super::compiler::RangeCompiler;
use crate::{Verse, VerseRange};

/// Split `rows` into one bucket per entry of `ranges`, preserving row order.
pub fn partition_rows(compiler: &RangeCompiler<'_>, ranges: &[VerseRange], rows: &[Verse]) -> Vec<Vec<Verse>> {
    let predicates: Vec<_> = ranges.iter().map(|r| compiler.range_predicate(r)).collect();
    let mut buckets: Vec<Vec<Verse>> = vec![Vec::new(); ranges.len()];

    for row in rows {
        for (bucket, predicate) in buckets.iter_mut().zip(&predicates) {
            if predicate.matches(row) {
                bucket.push(row.clone());
            }
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Catalog;

    fn row(book: &str, ordinal: u8, chapter: u16, verse: u16) -> Verse {
        Verse {
            translation: "kjv".into(),
            book: book.into(),
            book_ordinal: ordinal,
            book_name: book.into(),
            chapter,
            verse,
            text: format!("{book} {chapter}:{verse}"),
        }
    }

    #[test]
    fn rows_are_split_per_range_and_overlaps_are_shared() {
        let catalog = Catalog::canonical();
        let compiler = RangeCompiler::new(&catalog);
        let ranges = [
            VerseRange::new(("john", 3, 16), ("john", 3, 17)),
            VerseRange::single("john", 3, 17),
            VerseRange::single("jude", 1, 3),
        ];
        let rows = [row("john", 43, 3, 16), row("john", 43, 3, 17), row("jude", 65, 1, 3), row("jude", 65, 1, 4)];

        let buckets = partition_rows(&compiler, &ranges, &rows);
        let verses: Vec<Vec<u16>> = buckets.iter().map(|b| b.iter().map(|v| v.verse).collect()).collect();
        assert_eq!(verses, vec![vec![16, 17], vec![17], vec![3]]);
    }

    #[test]
    fn empty_ranges_give_no_buckets() {
        let catalog = Catalog::canonical();
        let compiler = RangeCompiler::new(&catalog);
        assert!(partition_rows(&compiler, &[], &[row("john", 43, 1, 1)]).is_empty());
    }
}
