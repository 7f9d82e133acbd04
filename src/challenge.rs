//! Per-round challenges: an embedding equation or a two-team word split.

use std::collections::HashSet;

use rand::Rng;
use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::index::EmbeddingIndex;
use crate::metric::{self, l2_norm};
use crate::sampler::sample;

/// Coefficient shapes an equation round can take.
pub const SIGN_PATTERNS: [&[i8]; 4] = [&[1, 1], &[1, 1, -1], &[1, -1, 1], &[1, -1, -1]];

/// Comparison words shown next to an equation's result.
pub const DECOY_COUNT: usize = 10;

/// Upper bound for the team size `n`.
pub const MAX_TEAM_SIZE: usize = 10;

#[derive(Clone, Debug)]
pub struct Equation {
    pub words: Vec<String>,
    pub coeffs: Vec<i8>,
    pub decoys: Vec<String>,
    target: Vec<f32>,
    target_norm: f32,
}

impl Equation {
    /// Build the target `Σ coeffᵢ · vᵢ` for already chosen words.
    pub fn build(
        index: &EmbeddingIndex,
        words: Vec<String>,
        coeffs: Vec<i8>,
        decoys: Vec<String>,
    ) -> Result<Self> {
        debug_assert_eq!(words.len(), coeffs.len());
        let mut terms = Vec::with_capacity(words.len());
        for (w, &c) in words.iter().zip(&coeffs) {
            let v = index.vector(w).ok_or_else(|| EngineError::UnknownWord(w.clone()))?;
            terms.push((f32::from(c), v));
        }
        let target = metric::weighted_sum(index.dim(), terms);
        let target_norm = l2_norm(&target);
        if target_norm == 0.0 || !target_norm.is_finite() {
            return Err(EngineError::ZeroTarget);
        }
        Ok(Self { words, coeffs, decoys, target, target_norm })
    }

    /// Random sign pattern, operand words, and `DECOY_COUNT` disjoint decoys.
    pub fn random<R: Rng + ?Sized>(index: &EmbeddingIndex, rng: &mut R) -> Result<Self> {
        let coeffs = SIGN_PATTERNS[rng.gen_range(0..SIGN_PATTERNS.len())].to_vec();
        let words = sample(index, coeffs.len(), &HashSet::new(), rng)?;
        let excluded: HashSet<&str> = words.iter().map(String::as_str).collect();
        let decoys = sample(index, DECOY_COUNT, &excluded, rng)?;
        Self::build(index, words, coeffs, decoys)
    }

    pub fn target(&self) -> &[f32] { &self.target }
    pub fn target_norm(&self) -> f32 { self.target_norm }

    /// Cosine distance from a stored word to the target.
    pub fn distance_to(&self, index: &EmbeddingIndex, word: &str) -> Option<f32> {
        let w = index.get(word)?;
        Some(metric::cosine_distance(w.vector, &self.target, w.norm, self.target_norm))
    }

    /// Display form, e.g. `king - man + woman = ?`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, (w, &c)) in self.words.iter().zip(&self.coeffs).enumerate() {
            if i == 0 {
                if c < 0 { out.push('-'); }
                out.push_str(w);
            } else {
                out.push_str(if c >= 0 { " + " } else { " - " });
                out.push_str(w);
            }
        }
        out.push_str(" = ?");
        out
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TeamSplit {
    pub yours: Vec<String>,
    pub enemy: Vec<String>,
}

impl TeamSplit {
    /// Two disjoint teams of `n` words each.
    pub fn random<R: Rng + ?Sized>(index: &EmbeddingIndex, n: usize, rng: &mut R) -> Result<Self> {
        let yours = sample(index, n, &HashSet::new(), rng)?;
        let excluded: HashSet<&str> = yours.iter().map(String::as_str).collect();
        let enemy = sample(index, n, &excluded, rng)?;
        Ok(Self { yours, enemy })
    }

    pub fn size(&self) -> usize { self.yours.len() }
}

#[derive(Clone, Debug)]
pub enum Challenge {
    Equation(Equation),
    Teams(TeamSplit),
}

/// What the front end shows before a guess.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChallengeView {
    Equation { text: String, words: Vec<String>, coeffs: Vec<i8> },
    Teams { yours: Vec<String>, enemy: Vec<String> },
}

impl Challenge {
    pub fn view(&self) -> ChallengeView {
        match self {
            Challenge::Equation(eq) => ChallengeView::Equation {
                text: eq.text(),
                words: eq.words.clone(),
                coeffs: eq.coeffs.clone(),
            },
            Challenge::Teams(t) => ChallengeView::Teams {
                yours: t.yours.clone(),
                enemy: t.enemy.clone(),
            },
        }
    }
}
