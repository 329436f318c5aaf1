//! Least-recently-used biased random selection.
//!
//! ```text
//! candidates ── sort by (picked this run, last_scheduled_at, id) ──▶ [c0 c1 c2 ... cN]
//!                                                                    └── window ──┘
//!                                                             uniform pick ──▶ winner
//! ```
//!
//! `None < Some(_)` for `last_scheduled_at`, so never-scheduled entries always
//! lead. Entries already picked earlier in the same run sort behind the rest,
//! which spreads one month across as many distinct entries as the window has.

use rand::Rng;

use super::PoolEntry;

/// Pick one index out of `candidates` (indices into `pool`).
///
/// `picked[i]` counts how often `pool[i]` was chosen so far in this run.
/// Returns `None` only when `candidates` is empty.
pub(crate) fn pick<R: Rng + ?Sized>(
    pool: &[PoolEntry],
    candidates: &[usize],
    picked: &[u32],
    window: usize,
    rng: &mut R,
) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }

    let mut ordered = candidates.to_vec();
    ordered.sort_by_key(|&i| (picked[i], pool[i].last_scheduled_at, pool[i].id));

    let window = window.clamp(1, ordered.len());
    Some(ordered[rng.gen_range(0..window)])
}
