use serde::Serialize;

/// Which part of the board a word belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Yours,
    Enemy,
    Decoy,
    Guess,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WordDistance { pub word: String, pub distance: f32 }

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedWord {
    pub rank: usize,
    pub word: String,
    pub side: Side,
    pub distance: f32,
}

/// Stable ranking by (distance asc, board position asc), ranks start at 1.
pub fn rank_by_distance(board: Vec<(Side, WordDistance)>) -> Vec<RankedWord> {
    let mut rows: Vec<(usize, Side, WordDistance)> =
        board.into_iter().enumerate().map(|(i, (s, wd))| (i, s, wd)).collect();
    rows.sort_by(|a, b| {
        a.2.distance
            .partial_cmp(&b.2.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    rows.into_iter()
        .enumerate()
        .map(|(r, (_, side, wd))| RankedWord { rank: r + 1, word: wd.word, side, distance: wd.distance })
        .collect()
}

/// What a successful load produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IndexSummary {
    pub dim: usize,
    /// Accepted rows, duplicates included.
    pub rows: usize,
    pub distinct_words: usize,
    /// Non-blank lines that failed to parse.
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wd(w: &str, d: f32) -> WordDistance { WordDistance { word: w.into(), distance: d } }

    #[test]
    fn ranks_ascending_with_stable_ties() {
        let ranked = rank_by_distance(vec![
            (Side::Yours, wd("b", 0.3)),
            (Side::Enemy, wd("c", 0.1)),
            (Side::Yours, wd("a", 0.3)),
            (Side::Enemy, wd("d", 0.9)),
        ]);
        let order: Vec<_> = ranked.iter().map(|r| (r.rank, r.word.as_str())).collect();
        assert_eq!(order, vec![(1, "c"), (2, "b"), (3, "a"), (4, "d")]);
        assert_eq!(ranked[0].side, Side::Enemy);
    }
}
