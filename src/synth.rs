// src/synth.rs
// Deterministic synthetic embedding tables for demos and tests.
// Each word's vector is seeded by base seed XOR FNV-1a(word), so a word keeps
// its vector regardless of table size or row order.

use std::fmt::Write;

use crate::seed::SplitMix64;
use rand::RngCore;

const SYLLABLES: [&str; 16] = [
    "ka", "lo", "mi", "ren", "su", "ta", "vel", "no", "ri", "da", "zen", "po", "li", "mar", "qu", "es",
];

/// Pronounceable, unique name for row `i`.
pub fn synthetic_word(i: usize) -> String {
    let mut n = i;
    let mut out = String::new();
    loop {
        out.push_str(SYLLABLES[n % SYLLABLES.len()]);
        n /= SYLLABLES.len();
        if n == 0 { break; }
        n -= 1;
    }
    out
}

/// Vector for `word`, components in `[-0.5, 0.5]`.
pub fn synthetic_vector(word: &str, dim: usize, base_seed: u64) -> Vec<f32> {
    let mut rng = SplitMix64::new(base_seed ^ fnv1a64(word.as_bytes()));
    (0..dim)
        .map(|_| {
            let u = (rng.next_u64() >> 11) as f64 * (1.0 / ((1u64 << 53) as f64));
            u as f32 - 0.5
        })
        .collect()
}

/// Embedding file text with `rows` words of dimension `dim`.
pub fn synthetic_table(rows: usize, dim: usize, base_seed: u64) -> String {
    let mut out = String::with_capacity(rows * dim * 10);
    for i in 0..rows {
        let word = synthetic_word(i);
        out.push_str(&word);
        for x in synthetic_vector(&word, dim, base_seed) {
            let _ = write!(out, " {:.6}", x);
        }
        out.push('\n');
    }
    out
}

#[inline]
fn fnv1a64(bytes: &[u8]) -> u64 {
    // FNV-1a 64-bit
    let mut h: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        h ^= b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}
