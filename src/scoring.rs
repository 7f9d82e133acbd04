//! Point rules for both round variants.

/// Distance thresholds for 3, 2 and 1 points in an equation round.
pub const EQUATION_THRESHOLDS: [(f32, u32); 3] = [(0.22, 3), (0.34, 2), (0.5, 1)];

/// Best points an equation round can give.
pub const EQUATION_MAX_POINTS: u32 = 3;

pub fn equation_points(distance: f32) -> u32 {
    EQUATION_THRESHOLDS
        .iter()
        .find(|(limit, _)| distance <= *limit)
        .map_or(0, |&(_, pts)| pts)
}

/// Number of "your" words strictly closer to the guess than the nearest enemy.
pub fn team_points(yours: &[f32], enemy: &[f32]) -> u32 {
    let nearest_enemy = min_distance(enemy);
    yours.iter().filter(|&&d| d < nearest_enemy).count() as u32
}

/// `+inf` for an empty slice.
pub fn min_distance(ds: &[f32]) -> f32 {
    ds.iter().copied().fold(f32::INFINITY, f32::min)
}

/// `-inf` for an empty slice.
pub fn max_distance(ds: &[f32]) -> f32 {
    ds.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}
