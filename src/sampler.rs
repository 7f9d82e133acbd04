//! Uniform sampling of distinct words without replacement.

use std::collections::HashSet;

use rand::Rng;

use crate::error::{EngineError, Result};
use crate::index::EmbeddingIndex;

/// Draw `k` distinct words from `index`, none of them in `excluded`.
///
/// Fisher–Yates over the filtered pool; fails without a partial result when
/// the pool holds fewer than `k` words.
pub fn sample<R: Rng + ?Sized>(
    index: &EmbeddingIndex,
    k: usize,
    excluded: &HashSet<&str>,
    rng: &mut R,
) -> Result<Vec<String>> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(index.len());
    let mut pool: Vec<&str> = index
        .words()
        .iter()
        .map(String::as_str)
        .filter(|w| !excluded.contains(*w) && seen.insert(*w))
        .collect();

    if pool.len() < k {
        return Err(EngineError::InsufficientPool { needed: k, available: pool.len() });
    }

    for i in (1..pool.len()).rev() {
        let j = rng.gen_range(0..=i);
        pool.swap(i, j);
    }

    Ok(pool.into_iter().take(k).map(str::to_string).collect())
}
