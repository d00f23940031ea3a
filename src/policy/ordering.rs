//! Deterministic ordering helpers.
//!
//! Every sort in the policy goes through `rank_by` with an explicit key.
//! The sort is stable, so ties keep their input order: ascending cell id for
//! board lists, or the seeded shuffle from `shuffled` for sets whose
//! tie-break should be pseudorandom but reproducible.

use std::cmp::Ordering;

use rand::seq::SliceRandom;
use rand::Rng;

/// Sort direction for `rank_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Ascending,
    Descending,
}

/// Stable-sorts `items` by `key` in the given direction.
pub fn rank_by<T, K, F>(items: &mut [T], rank: Rank, key: F)
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    items.sort_by(|a, b| {
        let ord = key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal);
        match rank {
            Rank::Ascending => ord,
            Rank::Descending => ord.reverse(),
        }
    });
}

/// Sorts `items` by `id`, then applies a seeded shuffle. The result depends
/// only on the set contents and the RNG state, never on how the set was
/// collected.
pub fn shuffled<T, F>(mut items: Vec<T>, id: F, rng: &mut impl Rng) -> Vec<T>
where
    F: Fn(&T) -> usize,
{
    items.sort_by_key(|item| id(item));
    items.shuffle(rng);
    items
}
