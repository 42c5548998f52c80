use thiserror::Error;

/// Errors surfaced by the library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("vocabulary file not found: {0}")]
    MissingVocabulary(String),
    #[error("vocabulary file {file} is malformed: {source}")]
    Vocabulary {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no vocabulary available for this session")]
    EmptyDeck,
    #[error("quiz has no missed questions to retry")]
    NothingToRetry,
    #[error(transparent)]
    Storage(#[from] rusqlite::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
