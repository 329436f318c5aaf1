//! Reference engine.
//!
//! This module is the entry point for everything between a user-typed
//! reference string and a storage predicate. It is split into focused
//! submodules under `src/engine/`.
//!
//! ## How the parts work together
//!
//! ```text
//! "1 imp 3:5 to 2 sam 4:2"
//!         │
//!         v
//!   normalize_text / alnum_key       (normalize.rs)
//!         │
//!         v
//!   ReferenceParser::parse           (parser.rs)
//!     - separator normalisation
//!     - split start / end
//!     - book text ──▶ BookResolver   (resolver.rs)
//!         │
//!         v
//!     VerseRange
//!         │
//!         v
//!   RangeCompiler::compile[_batch]   (compiler.rs)
//!         │
//!         v
//!     Predicate ──▶ Store ──▶ rows ──▶ partition_rows (partition.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `normalize.rs`: diacritic folding, case folding and whitespace collapse
//!   shared by the resolver and the parser.
//! - `resolver.rs`: canonical-then-localized book name resolution.
//! - `parser.rs`: reference grammar and range assembly.
//! - `compiler.rs`: range topology to predicate shape.
//! - `partition.rs`: re-splitting rows fetched by one batched query.
//!
//! ## Debugging
//!
//! Every stage logs through `tracing` at `debug` level; run the CLI with
//! `LECTIO_LOG=lectio=debug` to see strategy hits and compiled shapes.

#[path = "engine/compiler.rs"]
mod compiler;
#[path = "engine/normalize.rs"]
mod normalize;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/partition.rs"]
mod partition;
#[path = "engine/resolver.rs"]
mod resolver;
#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use compiler::RangeCompiler;
pub(crate) use normalize::alnum_key;
pub use normalize::normalize_text;
pub use parser::ReferenceParser;
pub use partition::partition_rows;
pub use resolver::{BookResolver, ResolveStrategy};
