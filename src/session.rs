//! Round engine: one game session and the commands a front end sends it.
//!
//! ```text
//! Empty --load--> Ready --start_round--> InRound --submit_guess--> Scored
//!                   ^                       ^                        |
//!                   |                       +------start_round-------+
//!                   +----------------- load (any state) -------------+
//! ```
//!
//! Every command returns a plain result value; rendering is the caller's job.
//! A failed command leaves the session in the state it was in before.

use std::collections::VecDeque;

use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::challenge::{Challenge, ChallengeView, Equation, TeamSplit};
use crate::config::{clamp_team_size, GameConfig, Language, Variant};
use crate::error::{EngineError, Result};
use crate::index::EmbeddingIndex;
use crate::metric::cosine_distance;
use crate::scoring::{self, EQUATION_MAX_POINTS};
use crate::seed::SplitMix64;
use crate::source::DatasetSource;
use crate::types::{rank_by_distance, IndexSummary, RankedWord, Side, WordDistance};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// No table loaded.
    Empty,
    /// Table loaded, no challenge yet.
    Ready,
    /// Challenge on the board, waiting for a guess.
    InRound,
    /// Last guess evaluated; more guesses or a new round may follow.
    Scored,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionScore {
    pub points: u64,
    pub rounds: u64,
}

/// Per-word distances behind a score.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Breakdown {
    Equation {
        equation: String,
        /// Guess to target.
        distance: f32,
        decoys: Vec<WordDistance>,
    },
    Teams {
        yours: Vec<WordDistance>,
        enemy: Vec<WordDistance>,
        nearest_enemy: f32,
        farthest_yours: f32,
    },
}

/// One history row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredGuess {
    pub round: u64,
    pub guess: String,
    pub points: u32,
    pub max_points: u32,
    pub breakdown: Breakdown,
    /// Display order only; has no effect on points.
    pub ranking: Vec<RankedWord>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum GuessOutcome {
    Scored(ScoredGuess),
    /// The guess repeated the last scored word, so a new round started.
    Advanced(ChallengeView),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub path: String,
    #[serde(flatten)]
    pub summary: IndexSummary,
}

pub struct Session {
    config: GameConfig,
    index: Option<EmbeddingIndex>,
    challenge: Option<Challenge>,
    phase: Phase,
    /// Guess scored most recently in the current round.
    last_scored: Option<String>,
    /// A round was scored since the last start; drives auto-increment.
    pending_increment: bool,
    /// Path of the load in flight, if any.
    pending_load: Option<String>,
    score: SessionScore,
    /// Most recent first.
    history: VecDeque<ScoredGuess>,
    rng: SplitMix64,
}

impl Session {
    pub fn new(mut config: GameConfig) -> Self {
        config.team_size = clamp_team_size(config.team_size);
        // Unseeded sessions draw their seed from the OS.
        let rng = config.seed.map_or_else(SplitMix64::from_entropy, SplitMix64::new);
        Self {
            config,
            index: None,
            challenge: None,
            phase: Phase::Empty,
            last_scored: None,
            pending_increment: false,
            pending_load: None,
            score: SessionScore::default(),
            history: VecDeque::new(),
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig { &self.config }
    pub fn phase(&self) -> Phase { self.phase }
    pub fn score(&self) -> SessionScore { self.score }
    pub fn history(&self) -> &VecDeque<ScoredGuess> { &self.history }
    pub fn index(&self) -> Option<&EmbeddingIndex> { self.index.as_ref() }
    pub fn is_loading(&self) -> bool { self.pending_load.is_some() }

    pub fn challenge(&self) -> Option<ChallengeView> {
        self.challenge.as_ref().map(Challenge::view)
    }

    /// Takes effect at the next round start.
    pub fn set_variant(&mut self, variant: Variant) { self.config.variant = variant; }
    pub fn set_team_size(&mut self, n: usize) { self.config.set_team_size(n); }
    pub fn set_auto_increment(&mut self, on: bool) { self.config.auto_increment = on; }
    pub fn set_language(&mut self, language: Language) { self.config.set_language(language); }

    /// Arm the load guard for `path`. A second load is refused until
    /// [`Session::finish_load`] runs.
    pub fn begin_load(&mut self, path: &str) -> Result<()> {
        if let Some(inflight) = &self.pending_load {
            return Err(EngineError::LoadInFlight(inflight.clone()));
        }
        let path = path.trim();
        if path.is_empty() {
            return Err(EngineError::EmptyPath);
        }
        info!(path, "loading embeddings");
        self.pending_load = Some(path.to_string());
        Ok(())
    }

    /// Complete the pending load with the fetched text or the fetch error.
    ///
    /// The guard is released either way. The table, and with it the current
    /// round, is replaced only when parsing succeeds.
    pub fn finish_load(&mut self, fetched: Result<String>) -> Result<LoadReport> {
        let path = self.pending_load.take().ok_or(EngineError::NoPendingLoad)?;
        let index = fetched
            .and_then(|raw| EmbeddingIndex::parse(&raw))
            .map_err(|e| {
                warn!(path = %path, error = %e, "failed to load embeddings");
                e
            })?;

        let summary = index.summary();
        info!(path = %path, rows = summary.rows, dim = summary.dim, skipped = summary.skipped, "loaded embeddings");
        self.index = Some(index);
        self.challenge = None;
        self.last_scored = None;
        self.pending_increment = false;
        self.phase = Phase::Ready;
        self.config.dataset_path = path.clone();
        Ok(LoadReport { path, summary })
    }

    /// Fetch `path` from `source` and load it.
    pub fn load_dataset<S: DatasetSource + ?Sized>(&mut self, source: &mut S, path: &str) -> Result<LoadReport> {
        self.begin_load(path)?;
        let fetched = source.fetch(path.trim());
        self.finish_load(fetched)
    }

    /// Deal a new challenge for the configured variant.
    pub fn start_round(&mut self) -> Result<ChallengeView> {
        let index = self.index.as_ref().ok_or(EngineError::NotLoaded)?;
        let built = match self.config.variant {
            Variant::Equation => Equation::random(index, &mut self.rng).map(|eq| (Challenge::Equation(eq), None)),
            Variant::Teams => {
                let mut n = self.config.team_size;
                if self.pending_increment && self.config.auto_increment {
                    n = clamp_team_size(n + 1);
                }
                TeamSplit::random(index, n, &mut self.rng).map(|t| (Challenge::Teams(t), Some(n)))
            }
        };
        let (challenge, team_size) = built.map_err(|e| {
            warn!(error = %e, "cannot start round");
            e
        })?;

        if let Some(n) = team_size {
            self.config.team_size = n;
        }
        self.install(challenge)
    }

    /// Put a caller-built challenge on the board.
    pub fn start_with(&mut self, challenge: Challenge) -> Result<ChallengeView> {
        if self.index.is_none() {
            return Err(EngineError::NotLoaded);
        }
        self.install(challenge)
    }

    fn install(&mut self, challenge: Challenge) -> Result<ChallengeView> {
        let view = challenge.view();
        match &view {
            ChallengeView::Equation { text, .. } => info!(equation = %text, "round ready"),
            ChallengeView::Teams { yours, .. } => info!(n = yours.len(), "round ready"),
        }
        self.challenge = Some(challenge);
        self.last_scored = None;
        self.pending_increment = false;
        self.phase = Phase::InRound;
        Ok(view)
    }

    /// Score a guess against the current challenge.
    ///
    /// Repeating the word that was just scored starts the next round instead.
    pub fn submit_guess(&mut self, input: &str) -> Result<GuessOutcome> {
        let index = self.index.as_ref().ok_or(EngineError::NotLoaded)?;
        let challenge = match (self.phase, &self.challenge) {
            (Phase::InRound | Phase::Scored, Some(c)) => c,
            _ => return Err(EngineError::NoActiveRound),
        };
        let guess = index
            .resolve(input)
            .ok_or_else(|| EngineError::UnknownWord(input.trim().to_string()))?
            .to_string();

        if self.last_scored.as_deref() == Some(guess.as_str()) {
            debug!(guess = %guess, "repeat guess, advancing");
            return self.start_round().map(GuessOutcome::Advanced);
        }

        let (points, max_points, breakdown, ranking) = evaluate(index, challenge, &guess)?;
        self.score.points += u64::from(points);
        self.score.rounds += 1;
        let scored = ScoredGuess {
            round: self.score.rounds,
            guess: guess.clone(),
            points,
            max_points,
            breakdown,
            ranking,
        };
        debug!(round = scored.round, guess = %guess, points, "guess scored");

        self.history.push_front(scored.clone());
        self.last_scored = Some(guess);
        self.pending_increment = true;
        self.phase = Phase::Scored;
        Ok(GuessOutcome::Scored(scored))
    }

    /// Autocomplete candidates; empty while no table is loaded.
    pub fn query_suggestions(&self, prefix: &str) -> Vec<String> {
        self.index
            .as_ref()
            .map(|idx| {
                idx.suggest(prefix, self.config.suggestion_limit)
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn evaluate(
    index: &EmbeddingIndex,
    challenge: &Challenge,
    guess: &str,
) -> Result<(u32, u32, Breakdown, Vec<RankedWord>)> {
    let missing = |w: &str| EngineError::UnknownWord(w.to_string());
    match challenge {
        Challenge::Equation(eq) => {
            let distance = eq.distance_to(index, guess).ok_or_else(|| missing(guess))?;
            let mut decoys = Vec::with_capacity(eq.decoys.len());
            for w in &eq.decoys {
                let d = eq.distance_to(index, w).ok_or_else(|| missing(w.as_str()))?;
                decoys.push(WordDistance { word: w.clone(), distance: d });
            }

            let mut board = vec![(Side::Guess, WordDistance { word: guess.to_string(), distance })];
            board.extend(
                decoys.iter().filter(|d| d.word != guess).map(|d| (Side::Decoy, d.clone())),
            );
            let breakdown = Breakdown::Equation { equation: eq.text(), distance, decoys };
            Ok((scoring::equation_points(distance), EQUATION_MAX_POINTS, breakdown, rank_by_distance(board)))
        }
        Challenge::Teams(teams) => {
            let g = index.get(guess).ok_or_else(|| missing(guess))?;
            let to_guess = |words: &[String]| -> Result<Vec<WordDistance>> {
                words
                    .iter()
                    .map(|w| -> Result<WordDistance> {
                        let e = index.get(w).ok_or_else(|| missing(w.as_str()))?;
                        Ok(WordDistance { word: w.clone(), distance: cosine_distance(g.vector, e.vector, g.norm, e.norm) })
                    })
                    .collect()
            };
            let yours = to_guess(&teams.yours)?;
            let enemy = to_guess(&teams.enemy)?;

            let your_d: Vec<f32> = yours.iter().map(|w| w.distance).collect();
            let enemy_d: Vec<f32> = enemy.iter().map(|w| w.distance).collect();
            let points = scoring::team_points(&your_d, &enemy_d);

            let board = yours
                .iter()
                .map(|w| (Side::Yours, w.clone()))
                .chain(enemy.iter().map(|w| (Side::Enemy, w.clone())))
                .collect();
            let breakdown = Breakdown::Teams {
                nearest_enemy: scoring::min_distance(&enemy_d),
                farthest_yours: scoring::max_distance(&your_d),
                yours,
                enemy,
            };
            Ok((points, teams.size() as u32, breakdown, rank_by_distance(board)))
        }
    }
}
