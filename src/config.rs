//! Runtime configuration.
//!
//! Every field has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! [parser]
//! reversed_ranges = "swap"
//!
//! [query]
//! passage_limit = 500
//! expand_intermediate_books = false
//!
//! [resolver]
//! prefix_matching = true
//! localized_fallback = true
//!
//! [scheduler]
//! lru_window = 90
//! buffer_months = 2
//! seed = 7
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::engine::ResolveStrategy;
use crate::error::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub parser: ParserConfig,
    pub query: QueryConfig,
    pub resolver: ResolverConfig,
    pub scheduler: SchedulerConfig,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| Error::Config(err.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("failed to read {}: {err}", path.display())))?;
        Self::from_toml_str(&text)
    }
}

/// What to do with a range whose end precedes its start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReversedRanges {
    /// Pass cross-book ranges through in any book order; reject the rest.
    #[default]
    Keep,
    Reject,
    Swap,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParserConfig {
    pub reversed_ranges: ReversedRanges,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryConfig {
    /// Row cap for user passages. `0` disables it.
    pub passage_limit: usize,
    /// OR in the books strictly between the endpoints of a cross-book range.
    pub expand_intermediate_books: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { passage_limit: 500, expand_intermediate_books: false }
    }
}

impl QueryConfig {
    pub fn limit(&self) -> Option<usize> {
        (self.passage_limit > 0).then_some(self.passage_limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    pub prefix_matching: bool,
    pub localized_fallback: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { prefix_matching: true, localized_fallback: true }
    }
}

impl ResolverConfig {
    pub fn strategies(&self) -> ResolveStrategy {
        let mut mask = ResolveStrategy::CANONICAL_EXACT;
        if self.prefix_matching {
            mask |= ResolveStrategy::CANONICAL_PREFIX;
        }
        if self.localized_fallback {
            mask |= ResolveStrategy::LOCALIZED_EXACT;
            if self.prefix_matching {
                mask |= ResolveStrategy::LOCALIZED_PREFIX;
            }
        }
        mask
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// How many least-recently-used candidates the random pick draws from.
    pub lru_window: usize,
    /// Months kept scheduled ahead on first run.
    pub buffer_months: u32,
    /// Fixed RNG seed for reproducible schedules.
    pub seed: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { lru_window: 90, buffer_months: 2, seed: None }
    }
}
