use crate::engine::{BookResolver, RangeCompiler, ReferenceParser};
use crate::{Catalog, Error, Translation, TranslationTotals, Verse, VerseRange};
use std::collections::HashMap;

fn romanian() -> Translation {
    let names = [
        ("genesis", "Geneza"),
        ("exodus", "Exodul"),
        ("1-kings", "1 Împăraţi"),
        ("2-kings", "2 Împăraţi"),
        ("2-samuel", "2 Samuel"),
        ("psalms", "Psalmii"),
        ("song-of-solomon", "Cântarea Cântărilor"),
        ("john", "Ioan"),
        ("1-john", "1 Ioan"),
        ("acts", "Faptele Apostolilor"),
    ];
    Translation {
        slug: "vdcc".into(),
        language: "ro".into(),
        book_names: names.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<HashMap<_, _>>(),
        totals: TranslationTotals::default(),
    }
}

#[test]
fn reference_examples_parse() {
    // (input, start, end)
    let cases: Vec<(&str, (&str, u16, u16), (&str, u16, u16))> = vec![
        ("john 3:16", ("john", 3, 16), ("john", 3, 16)),
        ("John 3:16", ("john", 3, 16), ("john", 3, 16)),
        ("JOHN 3 : 16", ("john", 3, 16), ("john", 3, 16)),
        ("john3:16", ("john", 3, 16), ("john", 3, 16)),
        ("john 3:16-18", ("john", 3, 16), ("john", 3, 18)),
        ("john 3:16 - 18", ("john", 3, 16), ("john", 3, 18)),
        ("john 3:16–18", ("john", 3, 16), ("john", 3, 18)),
        ("john 3:16—18", ("john", 3, 16), ("john", 3, 18)),
        ("john 3:16->18", ("john", 3, 16), ("john", 3, 18)),
        ("john 3:16 to 18", ("john", 3, 16), ("john", 3, 18)),
        ("john 3:16-4:2", ("john", 3, 16), ("john", 4, 2)),
        ("john 3:16 to 4:2", ("john", 3, 16), ("john", 4, 2)),
        ("john 3:16-john 4:2", ("john", 3, 16), ("john", 4, 2)),
        ("genesis 1:1-5", ("genesis", 1, 1), ("genesis", 1, 5)),
        ("gen 1:1", ("genesis", 1, 1), ("genesis", 1, 1)),
        ("gen. 1:1", ("genesis", 1, 1), ("genesis", 1, 1)),
        ("genesis 1:1-exodus 2:3", ("genesis", 1, 1), ("exodus", 2, 3)),
        ("genesis 50:26 to exodus 1:1", ("genesis", 50, 26), ("exodus", 1, 1)),
        ("1 samuel 17:45", ("1-samuel", 17, 45), ("1-samuel", 17, 45)),
        ("1-samuel 17:45", ("1-samuel", 17, 45), ("1-samuel", 17, 45)),
        ("1samuel 17:45", ("1-samuel", 17, 45), ("1-samuel", 17, 45)),
        ("2 sam 4:2", ("2-samuel", 4, 2), ("2-samuel", 4, 2)),
        ("1-kings 3:5-2-kings 1:1", ("1-kings", 3, 5), ("2-kings", 1, 1)),
        ("song of solomon 2:4", ("song-of-solomon", 2, 4), ("song-of-solomon", 2, 4)),
        ("psalms 119:105", ("psalms", 119, 105), ("psalms", 119, 105)),
        ("rev 22:21", ("revelation", 22, 21), ("revelation", 22, 21)),
        ("  jude   1:24  ", ("jude", 1, 24), ("jude", 1, 24)),
    ];

    let catalog = Catalog::canonical();
    let resolver = BookResolver::new(&catalog);
    let parser = ReferenceParser::new(&catalog, &resolver);

    for (input, start, end) in cases {
        let expected = VerseRange::new(start, end);
        match parser.parse(input, None) {
            Ok(range) => assert_eq!(range, expected, "input '{input}'"),
            Err(err) => panic!("input '{input}' failed: {err}"),
        }
    }
}

#[test]
fn localized_reference_examples_parse() {
    let cases: Vec<(&str, (&str, u16, u16), (&str, u16, u16))> = vec![
        ("Ioan 3:16", ("john", 3, 16), ("john", 3, 16)),
        ("ioan 3:16", ("john", 3, 16), ("john", 3, 16)),
        ("1 Ioan 4:8", ("1-john", 4, 8), ("1-john", 4, 8)),
        ("1 Împăraţi 3:5", ("1-kings", 3, 5), ("1-kings", 3, 5)),
        ("1 imparati 3:5", ("1-kings", 3, 5), ("1-kings", 3, 5)),
        ("1 imp 3:5 to 2 sam 4:2", ("1-kings", 3, 5), ("2-samuel", 4, 2)),
        ("Geneza 1:1-Exodul 2:3", ("genesis", 1, 1), ("exodus", 2, 3)),
        ("Psalmii 23:1-6", ("psalms", 23, 1), ("psalms", 23, 6)),
        ("cantarea cantarilor 2:4", ("song-of-solomon", 2, 4), ("song-of-solomon", 2, 4)),
        ("Faptele 2:38", ("acts", 2, 38), ("acts", 2, 38)),
        // canonical names keep working with a translation present
        ("john 1:1", ("john", 1, 1), ("john", 1, 1)),
    ];

    let catalog = Catalog::canonical();
    let resolver = BookResolver::new(&catalog);
    let parser = ReferenceParser::new(&catalog, &resolver);
    let ro = romanian();

    for (input, start, end) in cases {
        let expected = VerseRange::new(start, end);
        match parser.parse(input, Some(&ro)) {
            Ok(range) => assert_eq!(range, expected, "input '{input}'"),
            Err(err) => panic!("input '{input}' failed: {err}"),
        }
    }
}

#[test]
fn malformed_references_are_rejected() {
    let cases = vec![
        "",
        "   ",
        "not a reference",
        "genesis",
        "genesis 1",
        "genesis 1:",
        "genesis :1",
        "genesis 1:1:2",
        "genesis-exodus",
        "genesis 0:1",
        "genesis 1:0",
        "genesis 1:1-0",
        "genesis 1:99999",
        "john 3:16-18, 20",
        "john 3:16-18-20",
        "john 3:16-4:2-5:1",
        "john 3:16-exodus",
        "3:16",
        "john 3:18-16",
        "john 4:1-3:16",
    ];

    let catalog = Catalog::canonical();
    let resolver = BookResolver::new(&catalog);
    let parser = ReferenceParser::new(&catalog, &resolver);

    for input in cases {
        match parser.parse(input, None) {
            Err(Error::InvalidFormat { .. }) => {}
            other => panic!("input '{input}' should be InvalidFormat, got {other:?}"),
        }
    }
}

#[test]
fn unknown_books_are_book_not_found() {
    let cases = vec!["hezekiah 1:1", "jo 1:1", "ioan 3:16", "john 3:16-hezekiah 1:1"];

    let catalog = Catalog::canonical();
    let resolver = BookResolver::new(&catalog);
    let parser = ReferenceParser::new(&catalog, &resolver);

    for input in cases {
        match parser.parse(input, None) {
            Err(err @ Error::BookNotFound { .. }) => assert!(err.is_user_error()),
            other => panic!("input '{input}' should be BookNotFound, got {other:?}"),
        }
    }
}

/// Every book, three chapters of five verses.
fn corpus(catalog: &Catalog) -> Vec<Verse> {
    let mut rows = Vec::new();
    for book in catalog.books() {
        for chapter in 1..=book.chapter_count.min(3) {
            for verse in 1..=5 {
                rows.push(Verse {
                    translation: "kjv".into(),
                    book: book.slug.to_string(),
                    book_ordinal: book.ordinal,
                    book_name: book.slug.to_string(),
                    chapter,
                    verse,
                    text: String::new(),
                });
            }
        }
    }
    rows
}

#[test]
fn compiled_ranges_select_expected_counts() {
    // (reference, verses selected from the corpus)
    let cases: Vec<(&str, usize)> = vec![
        ("john 1:1", 1),
        ("john 1:2-4", 3),
        ("john 1:5-2:1", 2),
        ("john 1:3-3:2", 3 + 5 + 2),
        ("john 2:1-2:5", 5),
        ("obadiah 1:1-5", 5),
        ("genesis 3:4-exodus 1:2", 2 + 2),
        ("malachi 3:5-matthew 1:1", 1 + 1),
        // exodus is between the endpoints and stays out
        ("genesis 3:5-leviticus 1:1", 1 + 1),
        ("john 9:1", 0),
    ];

    let catalog = Catalog::canonical();
    let resolver = BookResolver::new(&catalog);
    let parser = ReferenceParser::new(&catalog, &resolver);
    let compiler = RangeCompiler::new(&catalog);
    let rows = corpus(&catalog);

    for (input, expected) in cases {
        let range = parser.parse(input, None).unwrap_or_else(|err| panic!("input '{input}' failed: {err}"));
        let predicate = compiler.compile(&range, "kjv");
        let selected = rows.iter().filter(|v| predicate.matches(v)).count();
        assert_eq!(selected, expected, "input '{input}' ({predicate:?})");

        let other_translation = compiler.compile(&range, "asv");
        assert_eq!(rows.iter().filter(|v| other_translation.matches(v)).count(), 0, "input '{input}'");
    }
}

#[test]
fn expanded_cross_book_ranges_include_intermediate_books() {
    let cases: Vec<(&str, usize)> = vec![
        ("genesis 3:5-leviticus 1:1", 1 + 15 + 1),
        ("genesis 3:5-exodus 1:1", 1 + 1),
        ("jude 1:5-revelation 1:1", 1 + 1),
        ("3-john 1:1-revelation 1:1", 5 + 5 + 1),
    ];

    let catalog = Catalog::canonical();
    let resolver = BookResolver::new(&catalog);
    let parser = ReferenceParser::new(&catalog, &resolver);
    let compiler = RangeCompiler::new(&catalog).with_intermediate_books(true);
    let rows = corpus(&catalog);

    for (input, expected) in cases {
        let range = parser.parse(input, None).unwrap_or_else(|err| panic!("input '{input}' failed: {err}"));
        let predicate = compiler.compile(&range, "kjv");
        assert_eq!(rows.iter().filter(|v| predicate.matches(v)).count(), expected, "input '{input}'");
    }
}
