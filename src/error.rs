use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Fetch failed or the source answered with a non-success status.
    #[error("transport error: {0}")]
    Transport(String),

    /// Fewer valid embedding rows than a playable table needs.
    #[error("dataset too small: {accepted} valid rows, need at least {required}")]
    DatasetTooSmall { accepted: usize, required: usize },

    /// Round setup asked for more distinct words than the pool holds.
    #[error("not enough words available for sampling: need {needed}, pool has {available}")]
    InsufficientPool { needed: usize, available: usize },

    /// Guess does not resolve to any indexed word.
    #[error("unknown word: {0:?}")]
    UnknownWord(String),

    #[error("target equation produced a zero or out-of-range vector")]
    ZeroTarget,

    #[error("no dataset loaded")]
    NotLoaded,

    #[error("no active round")]
    NoActiveRound,

    #[error("a dataset load is already in flight for {0:?}")]
    LoadInFlight(String),

    #[error("no dataset load is pending")]
    NoPendingLoad,

    #[error("dataset path is empty")]
    EmptyPath,

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Errors that abort a round start but leave the session usable.
    pub fn is_sampling_failure(&self) -> bool {
        matches!(self, EngineError::InsufficientPool { .. } | EngineError::ZeroTarget)
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
