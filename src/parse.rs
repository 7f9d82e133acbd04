//! Vector parser: one text row `word v1 v2 ... vD` into a [`WordEntry`].

use crate::metric::l2_norm;

/// One parsed embedding row.
#[derive(Clone, Debug, PartialEq)]
pub struct WordEntry {
    pub word: String,
    pub vector: Vec<f32>,
    pub norm: f32,
}

/// Parse a single embedding row.
///
/// Returns `None` for rows with fewer than two components, any component that
/// is not a finite float, or a norm that is zero or beyond `f32` range. Malformed rows are data
/// quality noise, not errors.
pub fn parse_line(line: &str) -> Option<WordEntry> {
    let mut parts = line.split_whitespace();
    let word = parts.next()?;
    let mut vector = Vec::new();
    for tok in parts {
        let x: f32 = tok.parse().ok()?;
        if !x.is_finite() { return None; }
        vector.push(x);
    }
    if vector.len() < 2 { return None; }

    let norm = l2_norm(&vector);
    if norm == 0.0 || !norm.is_finite() { return None; }

    Some(WordEntry { word: word.to_string(), vector, norm })
}
