use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Session is not running")]
    NotRunning,

    #[error("Word source exhausted: no new valid word after {attempts} draws")]
    SourceExhausted { attempts: usize },

    #[error("Corpus contains no usable words")]
    EmptyCorpus,

    #[error("Unknown corpus: {0}")]
    UnknownCorpus(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
