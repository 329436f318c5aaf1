//! Range query compilation.
//!
//! Picks the most specific predicate shape for a [`VerseRange`]:
//!
//! ```text
//! SingleVerse  book = B AND chapter = C AND verse = V
//! SameChapter  book = B AND chapter = C AND verse BETWEEN sv AND ev
//! SameBook     book = B AND ( (chapter = sc AND verse >= sv)
//!                           OR chapter BETWEEN sc+1 AND ec-1
//!                           OR (chapter = ec AND verse <= ev) )
//! CrossBook    (book = SB AND ((chapter = sc AND verse >= sv) OR chapter > sc))
//!           OR (book = EB AND (chapter < ec OR (chapter = ec AND verse <= ev)))
//!           [OR book IN (books strictly between SB and EB)]
//! ```
//!
//! The middle `BETWEEN` of the same-book shape is left out when the chapters
//! are adjacent. The cross-book shape only covers the two endpoint books
//! unless intermediate expansion is switched on.

use tracing::debug;

use crate::predicate::{Field, Predicate};
use crate::{Catalog, RangeShape, VerseRange};

#[derive(Debug, Clone)]
pub struct RangeCompiler<'a> {
    catalog: &'a Catalog,
    expand_intermediate_books: bool,
}

impl<'a> RangeCompiler<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        RangeCompiler { catalog, expand_intermediate_books: false }
    }

    pub fn with_intermediate_books(mut self, expand: bool) -> Self {
        self.expand_intermediate_books = expand;
        self
    }

    /// Predicate for `range` within one translation.
    pub fn compile(&self, range: &VerseRange, translation: &str) -> Predicate {
        all![Predicate::translation(translation), self.range_predicate(range)]
    }

    /// One predicate covering every range, for a single batched fetch.
    ///
    /// Rows come back unlabelled; use [`partition_rows`](super::partition_rows)
    /// to split them per range.
    pub fn compile_batch(&self, ranges: &[VerseRange], translation: &str) -> Predicate {
        let branches = ranges.iter().map(|r| self.range_predicate(r)).collect();
        all![Predicate::translation(translation), Predicate::Or(branches)]
    }

    /// Predicate for `range` with no translation constraint.
    pub fn range_predicate(&self, range: &VerseRange) -> Predicate {
        let shape = range.shape();
        debug!(range = %range, ?shape, "compiling range");

        let (sc, sv, ec, ev) = (range.start_chapter, range.start_verse, range.end_chapter, range.end_verse);
        match shape {
            RangeShape::SingleVerse => all![
                Predicate::book(&range.start_book),
                Predicate::Eq(Field::Chapter, sc),
                Predicate::Eq(Field::Verse, sv),
            ],
            RangeShape::SameChapter => all![
                Predicate::book(&range.start_book),
                Predicate::Eq(Field::Chapter, sc),
                Predicate::Between(Field::Verse, sv, ev),
            ],
            RangeShape::SameBook => {
                let mut chapters = vec![all![Predicate::Eq(Field::Chapter, sc), Predicate::Ge(Field::Verse, sv)]];
                if ec > sc.saturating_add(1) {
                    chapters.push(Predicate::Between(Field::Chapter, sc + 1, ec - 1));
                }
                chapters.push(all![Predicate::Eq(Field::Chapter, ec), Predicate::Le(Field::Verse, ev)]);
                all![Predicate::book(&range.start_book), Predicate::Or(chapters)]
            }
            RangeShape::CrossBook => {
                let head = all![
                    Predicate::book(&range.start_book),
                    any![
                        all![Predicate::Eq(Field::Chapter, sc), Predicate::Ge(Field::Verse, sv)],
                        Predicate::Gt(Field::Chapter, sc),
                    ],
                ];
                let tail = all![
                    Predicate::book(&range.end_book),
                    any![
                        Predicate::Lt(Field::Chapter, ec),
                        all![Predicate::Eq(Field::Chapter, ec), Predicate::Le(Field::Verse, ev)],
                    ],
                ];
                let mut branches = vec![head, tail];
                if self.expand_intermediate_books {
                    let middle = self.intermediate_books(range);
                    if !middle.is_empty() {
                        branches.push(Predicate::In(Field::Book, middle));
                    }
                }
                Predicate::Or(branches)
            }
        }
    }

    fn intermediate_books(&self, range: &VerseRange) -> Vec<String> {
        match (self.catalog.ordinal(&range.start_book), self.catalog.ordinal(&range.end_book)) {
            (Some(start), Some(end)) => self.catalog.between(start, end).map(|b| b.slug.to_string()).collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_verse_is_all_equalities() {
        let catalog = Catalog::canonical();
        let p = RangeCompiler::new(&catalog).compile(&VerseRange::single("john", 3, 16), "kjv");
        assert_eq!(
            p.to_sql().clause,
            "translation = ? AND (book = ? AND chapter = ? AND verse = ?)"
        );
    }

    #[test]
    fn same_chapter_uses_between() {
        let catalog = Catalog::canonical();
        let range = VerseRange::new(("genesis", 1, 1), ("genesis", 1, 5));
        let p = RangeCompiler::new(&catalog).range_predicate(&range);
        assert_eq!(p.to_sql().clause, "book = ? AND chapter = ? AND verse BETWEEN ? AND ?");
    }

    #[test]
    fn same_book_has_three_clauses_when_chapters_are_apart() {
        let catalog = Catalog::canonical();
        let compiler = RangeCompiler::new(&catalog);

        let wide = compiler.range_predicate(&VerseRange::new(("john", 3, 16), ("john", 6, 2)));
        assert_eq!(
            wide.to_sql().clause,
            "book = ? AND ((chapter = ? AND verse >= ?) OR chapter BETWEEN ? AND ? OR (chapter = ? AND verse <= ?))"
        );

        let adjacent = compiler.range_predicate(&VerseRange::new(("john", 3, 16), ("john", 4, 2)));
        assert_eq!(
            adjacent.to_sql().clause,
            "book = ? AND ((chapter = ? AND verse >= ?) OR (chapter = ? AND verse <= ?))"
        );
    }

    #[test]
    fn cross_book_covers_endpoint_books_only_by_default() {
        let catalog = Catalog::canonical();
        let range = VerseRange::new(("genesis", 50, 1), ("leviticus", 1, 2));

        let p = RangeCompiler::new(&catalog).range_predicate(&range);
        let Predicate::Or(branches) = &p else { panic!("expected disjunction, got {p:?}") };
        assert_eq!(branches.len(), 2);

        let p = RangeCompiler::new(&catalog).with_intermediate_books(true).range_predicate(&range);
        let Predicate::Or(branches) = &p else { panic!("expected disjunction, got {p:?}") };
        assert_eq!(branches.last(), Some(&Predicate::In(Field::Book, vec!["exodus".to_string()])));
    }

    #[test]
    fn batch_ors_each_range_under_one_translation() {
        let catalog = Catalog::canonical();
        let ranges = [VerseRange::single("john", 3, 16), VerseRange::single("jude", 1, 3)];
        let p = RangeCompiler::new(&catalog).compile_batch(&ranges, "kjv");
        let Predicate::And(parts) = &p else { panic!("expected conjunction") };
        assert_eq!(parts[0], Predicate::translation("kjv"));
        assert!(matches!(&parts[1], Predicate::Or(b) if b.len() == 2));
    }

    #[test]
    fn batch_of_one_cross_book_range_keeps_translation_on_both_books() {
        let catalog = Catalog::canonical();
        let ranges = [VerseRange::new(("genesis", 1, 1), ("exodus", 2, 3))];
        let sql = RangeCompiler::new(&catalog).compile_batch(&ranges, "kjv").to_sql();
        assert_eq!(
            sql.clause,
            "translation = ? AND ((book = ? AND ((chapter = ? AND verse >= ?) OR chapter > ?)) \
             OR (book = ? AND (chapter < ? OR (chapter = ? AND verse <= ?))))"
        );
        assert_eq!(sql.params.len(), 9);
    }

    #[test]
    fn batch_sql_groups_each_range() {
        let catalog = Catalog::canonical();
        let compiler = RangeCompiler::new(&catalog);

        let ranges = [VerseRange::single("john", 3, 16), VerseRange::new(("jude", 1, 3), ("jude", 1, 5))];
        assert_eq!(
            compiler.compile_batch(&ranges, "kjv").to_sql().clause,
            "translation = ? AND ((book = ? AND chapter = ? AND verse = ?) \
             OR (book = ? AND chapter = ? AND verse BETWEEN ? AND ?))"
        );

        let ranges = [
            VerseRange::new(("john", 3, 16), ("john", 4, 2)),
            VerseRange::new(("malachi", 4, 6), ("matthew", 1, 1)),
        ];
        assert_eq!(
            compiler.compile_batch(&ranges, "kjv").to_sql().clause,
            "translation = ? AND ((book = ? AND ((chapter = ? AND verse >= ?) OR (chapter = ? AND verse <= ?))) \
             OR ((book = ? AND ((chapter = ? AND verse >= ?) OR chapter > ?)) \
             OR (book = ? AND (chapter < ? OR (chapter = ? AND verse <= ?)))))"
        );
    }
}
