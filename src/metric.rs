//! Similarity helpers: dot products, norms and cosine distance.

/// Dot product accumulated in f64; squares of small or large components
/// stay representable.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let mut s = 0.0f64;
    for i in 0..a.len() { s += f64::from(a[i]) * f64::from(b[i]); }
    s
}

/// Euclidean norm, `sqrt(Σ vᵢ²)`. Infinite when the norm exceeds `f32::MAX`.
#[inline]
pub fn l2_norm(v: &[f32]) -> f32 {
    dot(v, v).sqrt() as f32
}

/// `1 - cos(a, b)` using precomputed norms.
///
/// Both norms must be nonzero; the result is NaN or infinite otherwise.
/// Ranges over `[0, 2]` up to rounding: 0 for the same direction, 2 for
/// opposite directions.
#[inline]
pub fn cosine_distance(a: &[f32], b: &[f32], norm_a: f32, norm_b: f32) -> f32 {
    (1.0 - dot(a, b) / (f64::from(norm_a) * f64::from(norm_b))) as f32
}

/// Coefficient-weighted sum of equally sized rows.
pub fn weighted_sum<'a, I>(dim: usize, terms: I) -> Vec<f32>
where
    I: IntoIterator<Item = (f32, &'a [f32])>,
{
    let mut acc = vec![0.0f64; dim];
    for (scale, row) in terms {
        debug_assert_eq!(row.len(), dim);
        for (o, &x) in acc.iter_mut().zip(row) { *o += f64::from(scale) * f64::from(x); }
    }
    acc.into_iter().map(|x| x as f32).collect()
}
