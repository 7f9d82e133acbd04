//! In-memory embedding table with case-insensitive lookup.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{EngineError, Result};
use crate::parse::parse_line;
use crate::types::IndexSummary;

/// Smallest table a game can be played on.
pub const MIN_DATASET_ROWS: usize = 20;

/// Row-major embedding table keyed by word.
#[derive(Clone, Debug, Default)]
pub struct EmbeddingIndex {
    dim: usize,
    /// File order, repeated words kept positionally.
    words: Vec<String>,
    /// Lower-cased word -> first-seen canonical spelling.
    by_lower: HashMap<String, String>,
    /// Exact word -> row in `vecs` / `norms`.
    slots: HashMap<String, usize>,
    vecs: Vec<f32>, // concatenated rows of length `dim`
    norms: Vec<f32>,
    skipped: usize,
}

/// Borrowed view of one stored word.
#[derive(Clone, Copy, Debug)]
pub struct WordRef<'a> {
    pub word: &'a str,
    pub vector: &'a [f32],
    pub norm: f32,
}

impl EmbeddingIndex {
    /// Build a fresh table from raw embedding text.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut idx = EmbeddingIndex::default();
        for line in raw.lines() {
            if line.trim().is_empty() { continue; }
            match parse_line(line) {
                Some(e) if idx.dim == 0 || e.vector.len() == idx.dim => {
                    idx.dim = e.vector.len();
                    idx.insert(e.word, &e.vector, e.norm);
                }
                _ => idx.skipped += 1,
            }
        }
        if idx.skipped > 0 {
            debug!(skipped = idx.skipped, "ignored malformed embedding rows");
        }
        if idx.words.len() < MIN_DATASET_ROWS {
            return Err(EngineError::DatasetTooSmall {
                accepted: idx.words.len(),
                required: MIN_DATASET_ROWS,
            });
        }
        Ok(idx)
    }

    /// Replace the table with one parsed from `raw`.
    ///
    /// On error `self` is left exactly as it was.
    pub fn load(&mut self, raw: &str) -> Result<IndexSummary> {
        let fresh = Self::parse(raw)?;
        *self = fresh;
        Ok(self.summary())
    }

    fn insert(&mut self, word: String, v: &[f32], norm: f32) {
        let lower = word.to_lowercase();
        self.by_lower.entry(lower).or_insert_with(|| word.clone());
        match self.slots.get(&word) {
            Some(&slot) => {
                let start = slot * self.dim;
                self.vecs[start..start + self.dim].copy_from_slice(v);
                self.norms[slot] = norm;
            }
            None => {
                self.slots.insert(word.clone(), self.norms.len());
                self.vecs.extend_from_slice(v);
                self.norms.push(norm);
            }
        }
        self.words.push(word);
    }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }
    /// Accepted rows, repeated words counted each time.
    pub fn len(&self) -> usize { self.words.len() }
    pub fn dim(&self) -> usize { self.dim }
    pub fn words(&self) -> &[String] { &self.words }

    pub fn summary(&self) -> IndexSummary {
        IndexSummary {
            dim: self.dim,
            rows: self.words.len(),
            distinct_words: self.slots.len(),
            skipped: self.skipped,
        }
    }

    pub fn contains(&self, word: &str) -> bool { self.slots.contains_key(word) }

    #[inline]
    fn row(&self, slot: usize) -> &[f32] {
        let start = slot * self.dim; let end = start + self.dim; &self.vecs[start..end]
    }

    pub fn get(&self, word: &str) -> Option<WordRef<'_>> {
        let (word, &slot) = self.slots.get_key_value(word)?;
        Some(WordRef { word, vector: self.row(slot), norm: self.norms[slot] })
    }

    pub fn vector(&self, word: &str) -> Option<&[f32]> { self.get(word).map(|w| w.vector) }

    pub fn norm(&self, word: &str) -> Option<f32> { self.get(word).map(|w| w.norm) }

    /// Canonical word for free-form input: exact match first, then
    /// case-insensitive. Blank input never resolves.
    pub fn resolve(&self, input: &str) -> Option<&str> {
        let trimmed = input.trim();
        if trimmed.is_empty() { return None; }
        if let Some((word, _)) = self.slots.get_key_value(trimmed) {
            return Some(word.as_str());
        }
        self.by_lower.get(&trimmed.to_lowercase()).map(String::as_str)
    }

    /// Autocomplete candidates for a partial guess.
    ///
    /// Words starting with `prefix` (case-insensitive) come before words that
    /// merely contain it, each group in table order. The scan stops as soon as
    /// `limit` candidates of either kind have been seen, so later prefix
    /// matches can lose to earlier substring matches.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<&str> {
        let lower = prefix.trim().to_lowercase();
        if lower.is_empty() {
            return self.words.iter().take(limit).map(String::as_str).collect();
        }

        let mut starts = Vec::new();
        let mut contains = Vec::new();
        for word in &self.words {
            if starts.len() + contains.len() >= limit { break; }
            let lw = word.to_lowercase();
            if lw.starts_with(&lower) {
                starts.push(word.as_str());
            } else if lw.contains(&lower) {
                contains.push(word.as_str());
            }
        }
        starts.extend(contains);
        starts.truncate(limit);
        starts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `count` filler rows `w0 .. w{count-1}` with distinct directions.
    fn filler(count: usize) -> String {
        (0..count).map(|i| format!("w{} {} 1 0.5\n", i, i + 1)).collect()
    }

    #[test]
    fn loads_rows_and_skips_garbage() {
        let raw = format!("{}\nbad row here\n\nzero 0 0 0\r\nshort 1\n", filler(20));
        let idx = EmbeddingIndex::parse(&raw).unwrap();
        assert_eq!(idx.len(), 20);
        assert_eq!(idx.dim(), 3);
        let s = idx.summary();
        assert_eq!(s.skipped, 3);
        assert_eq!(s.distinct_words, 20);
        let w = idx.get("w3").unwrap();
        assert_eq!(w.vector, &[4.0f32, 1.0, 0.5]);
        assert!((w.norm - (16.0f32 + 1.0 + 0.25).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn too_small_dataset_is_rejected() {
        let err = EmbeddingIndex::parse(&filler(19)).unwrap_err();
        assert!(matches!(err, EngineError::DatasetTooSmall { accepted: 19, required: 20 }));
    }

    #[test]
    fn failed_load_keeps_previous_table() {
        let mut idx = EmbeddingIndex::parse(&filler(25)).unwrap();
        assert!(idx.load("tiny 1 2\n").is_err());
        assert_eq!(idx.len(), 25);
        assert!(idx.contains("w24"));

        let summary = idx.load(&format!("{}fresh 9 9 9\n", filler(20))).unwrap();
        assert_eq!(summary.rows, 21);
        assert!(!idx.contains("w24"));
        assert!(idx.contains("fresh"));
    }

    #[test]
    fn mismatched_dimension_rows_are_skipped() {
        let raw = format!("{}odd 1 2 3 4\n", filler(20));
        let idx = EmbeddingIndex::parse(&raw).unwrap();
        assert!(!idx.contains("odd"));
        assert_eq!(idx.summary().skipped, 1);
    }

    #[test]
    fn duplicate_word_overwrites_vector_keeps_positions() {
        let raw = format!("Apple 1 0 0\n{}apple 0 1 0\nApple 0 0 2\n", filler(20));
        let idx = EmbeddingIndex::parse(&raw).unwrap();
        assert_eq!(idx.len(), 23);
        assert_eq!(idx.words().iter().filter(|w| *w == "Apple").count(), 2);
        assert_eq!(idx.vector("Apple").unwrap(), &[0.0f32, 0.0, 2.0]);
        assert_eq!(idx.norm("Apple"), Some(2.0));
        // case-insensitive lookup keeps the first casing
        assert_eq!(idx.resolve("APPLE"), Some("Apple"));
        // exact match still wins
        assert_eq!(idx.resolve(" apple "), Some("apple"));
    }

    #[test]
    fn resolve_misses() {
        let idx = EmbeddingIndex::parse(&filler(20)).unwrap();
        assert_eq!(idx.resolve(""), None);
        assert_eq!(idx.resolve("   "), None);
        assert_eq!(idx.resolve("nope"), None);
        assert_eq!(idx.resolve("W7"), Some("w7"));
    }

    #[test]
    fn suggestions_rank_prefix_before_substring() {
        let raw = format!("{}sea 1 2 3\nBaseball 1 1 1\nseal 3 2 1\ndiesel 2 2 1\n", filler(20));
        let idx = EmbeddingIndex::parse(&raw).unwrap();
        assert_eq!(idx.suggest("SE", 10), vec!["sea", "seal", "Baseball", "diesel"]);
        assert_eq!(idx.suggest("se", 2), vec!["sea", "Baseball"]);
        assert_eq!(idx.suggest("", 3), vec!["w0", "w1", "w2"]);
        assert!(idx.suggest("zzz", 5).is_empty());
    }
}
