//! Book name resolution.
//!
//! Maps free text to a canonical book slug. Strategies run in a fixed order
//! and the first one that yields a single answer wins:
//!
//! ```text
//! text ── alnum_key ──┬─ CANONICAL_EXACT   "1 samuel"  == "1-samuel"
//!                     ├─ CANONICAL_PREFIX  "gen"       -> genesis (only if unique)
//!                     ├─ LOCALIZED_EXACT   "ioan"      == "Ioan"
//!                     └─ LOCALIZED_PREFIX  "1 imp"     -> shortest display name
//! ```
//!
//! Localized names are only consulted when a translation is supplied.

use tracing::debug;

use super::normalize::alnum_key;
use crate::error::{Error, Result};
use crate::{Catalog, Translation};

bitflags::bitflags! {
    /// Which matching strategies the resolver may use.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResolveStrategy: u8 {
        const CANONICAL_EXACT  = 1 << 0;
        const CANONICAL_PREFIX = 1 << 1;
        const LOCALIZED_EXACT  = 1 << 2;
        const LOCALIZED_PREFIX = 1 << 3;
    }
}

impl Default for ResolveStrategy {
    fn default() -> Self {
        ResolveStrategy::all()
    }
}

/// Canonical slug paired with its comparison key.
#[derive(Debug, Clone)]
struct CanonicalKey {
    key: String,
    slug: &'static str,
    ordinal: u8,
}

/// Resolves book names against the canonical catalog and, as a fallback,
/// against a translation's localized names.
#[derive(Debug, Clone)]
pub struct BookResolver {
    keys: Vec<CanonicalKey>,
    strategies: ResolveStrategy,
}

impl BookResolver {
    pub fn new(catalog: &Catalog) -> Self {
        Self::with_strategies(catalog, ResolveStrategy::default())
    }

    pub fn with_strategies(catalog: &Catalog, strategies: ResolveStrategy) -> Self {
        let keys = catalog
            .books()
            .iter()
            .map(|b| CanonicalKey { key: alnum_key(b.slug), slug: b.slug, ordinal: b.ordinal })
            .collect();
        BookResolver { keys, strategies }
    }

    pub fn strategies(&self) -> ResolveStrategy {
        self.strategies
    }

    /// Resolve `text` to a canonical slug.
    ///
    /// `translation` enables the localized strategies; without it only the
    /// canonical ones run.
    pub fn resolve(&self, text: &str, translation: Option<&Translation>) -> Result<&'static str> {
        let key = alnum_key(text);
        let not_found = || Error::BookNotFound {
            name: text.trim().to_string(),
            translation: translation.map(|t| t.slug.clone()).unwrap_or_default(),
        };
        if key.is_empty() {
            return Err(not_found());
        }

        if self.strategies.contains(ResolveStrategy::CANONICAL_EXACT) {
            if let Some(hit) = self.keys.iter().find(|k| k.key == key) {
                debug!(input = text, slug = hit.slug, strategy = "canonical-exact", "resolved book");
                return Ok(hit.slug);
            }
        }

        if self.strategies.contains(ResolveStrategy::CANONICAL_PREFIX) {
            let mut hits = self.keys.iter().filter(|k| k.key.starts_with(&key));
            if let (Some(hit), None) = (hits.next(), hits.next()) {
                debug!(input = text, slug = hit.slug, strategy = "canonical-prefix", "resolved book");
                return Ok(hit.slug);
            }
        }

        if let Some(translation) = translation {
            if let Some(slug) = self.resolve_localized(&key, translation) {
                debug!(input = text, slug, translation = %translation.slug, "resolved localized book");
                return Ok(slug);
            }
        }

        debug!(input = text, "book not found");
        Err(not_found())
    }

    fn resolve_localized(&self, key: &str, translation: &Translation) -> Option<&'static str> {
        // (display length, ordinal, slug) so ties break deterministically.
        let mut exact: Vec<(usize, u8, &'static str)> = Vec::new();
        let mut prefix: Vec<(usize, u8, &'static str)> = Vec::new();

        for (canonical, display) in &translation.book_names {
            let Some(known) = self.keys.iter().find(|k| k.slug == canonical.as_str()) else {
                continue;
            };
            let local = alnum_key(display);
            let candidate = (display.chars().count(), known.ordinal, known.slug);
            if local == key {
                exact.push(candidate);
            } else if local.starts_with(key) {
                prefix.push(candidate);
            }
        }

        if self.strategies.contains(ResolveStrategy::LOCALIZED_EXACT) {
            if let Some(best) = exact.iter().min() {
                return Some(best.2);
            }
        }
        if self.strategies.contains(ResolveStrategy::LOCALIZED_PREFIX) {
            // Exact hits also satisfy a prefix match.
            return exact.iter().chain(prefix.iter()).min().map(|c| c.2);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TranslationTotals;
    use std::collections::HashMap;

    fn romanian() -> Translation {
        let names = [
            ("1-kings", "1 Împăraţi"),
            ("2-kings", "2 Împăraţi"),
            ("john", "Ioan"),
            ("1-john", "1 Ioan"),
            ("2-samuel", "2 Samuel"),
            ("exodus", "Exodul"),
            ("acts", "Faptele Apostolilor"),
        ];
        Translation {
            slug: "vdcc".into(),
            language: "ro".into(),
            book_names: names.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            totals: TranslationTotals::default(),
        }
    }

    #[test]
    fn canonical_exact_ignores_punctuation_and_case() {
        let resolver = BookResolver::new(&Catalog::canonical());
        assert_eq!(resolver.resolve("1 Samuel", None).unwrap(), "1-samuel");
        assert_eq!(resolver.resolve("1-samuel", None).unwrap(), "1-samuel");
        assert_eq!(resolver.resolve("GENESIS", None).unwrap(), "genesis");
        assert_eq!(resolver.resolve("Song of Solomon", None).unwrap(), "song-of-solomon");
    }

    #[test]
    fn canonical_prefix_requires_a_unique_candidate() {
        let resolver = BookResolver::new(&Catalog::canonical());
        assert_eq!(resolver.resolve("gen", None).unwrap(), "genesis");
        assert_eq!(resolver.resolve("2 sam", None).unwrap(), "2-samuel");
        assert_eq!(resolver.resolve("rev", None).unwrap(), "revelation");
        // john, joel, job, jonah, joshua
        assert!(matches!(resolver.resolve("jo", None), Err(Error::BookNotFound { .. })));
    }

    #[test]
    fn exact_canonical_beats_longer_prefix() {
        // "jud" is a prefix of both judges and jude
        let resolver = BookResolver::new(&Catalog::canonical());
        assert_eq!(resolver.resolve("jude", None).unwrap(), "jude");
        assert!(resolver.resolve("jud", None).is_err());
    }

    #[test]
    fn localized_fallback_prefers_shortest_display_name() {
        let resolver = BookResolver::new(&Catalog::canonical());
        let ro = romanian();
        assert_eq!(resolver.resolve("1 imp", Some(&ro)).unwrap(), "1-kings");
        assert_eq!(resolver.resolve("ioan", Some(&ro)).unwrap(), "john");
        assert_eq!(resolver.resolve("Faptele", Some(&ro)).unwrap(), "acts");
        assert_eq!(resolver.resolve("exod", Some(&ro)).unwrap(), "exodus");
    }

    #[test]
    fn localized_prefix_tie_break_is_by_length() {
        let mut ro = romanian();
        ro.book_names = HashMap::from([
            ("1-kings".to_string(), "1 Împăraţi".to_string()),
            ("1-chronicles".to_string(), "1 Împăraţi şi profeţi".to_string()),
        ]);
        let resolver = BookResolver::new(&Catalog::canonical());
        for _ in 0..8 {
            assert_eq!(resolver.resolve("1 împ", Some(&ro)).unwrap(), "1-kings");
        }
    }

    #[test]
    fn resolution_is_idempotent() {
        let resolver = BookResolver::new(&Catalog::canonical());
        let ro = romanian();
        let first = resolver.resolve("1 Ioan", Some(&ro)).unwrap();
        let second = resolver.resolve("1 Ioan", Some(&ro)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "1-john");
    }

    #[test]
    fn disabled_strategies_are_skipped() {
        let catalog = Catalog::canonical();
        let resolver = BookResolver::with_strategies(&catalog, ResolveStrategy::CANONICAL_EXACT);
        assert!(resolver.resolve("gen", None).is_err());
        assert!(resolver.resolve("ioan", Some(&romanian())).is_err());
        assert_eq!(resolver.resolve("genesis", None).unwrap(), "genesis");
    }

    #[test]
    fn empty_and_unknown_names_fail() {
        let resolver = BookResolver::new(&Catalog::canonical());
        let err = resolver.resolve("  ", Some(&romanian())).unwrap_err();
        assert!(matches!(err, Error::BookNotFound { ref translation, .. } if translation == "vdcc"));
        assert!(resolver.resolve("maccabees", None).is_err());
    }
}
