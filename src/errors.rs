use thiserror::Error;

/// Subject record is structurally unusable (missing identity or similar).
/// Raised before scoring; a malformed subject never produces a partial score.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("malformed subject: {reason}")]
pub struct MalformedSubjectError {
    pub reason: String,
}

impl MalformedSubjectError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Intent input is missing required keys or carries wrong-typed values.
/// Callers surface this as "please refine your search", not a 500.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid intent: {reason}")]
pub struct InvalidIntentError {
    pub reason: String,
}

impl InvalidIntentError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Database pool construction failures. Distinct from the per-query
/// `PoolRetrievalError`: this fires once at startup, not per request.
#[derive(Debug, Error)]
pub enum DbPoolError {
    #[error("invalid database url: {0}")]
    InvalidConfig(String),
    #[error("failed to create database pool: {0}")]
    PoolCreation(#[from] deadpool_postgres::CreatePoolError),
}

/// External store could not deliver the subject pool. Propagated to the
/// caller as-is; the engine does not retry.
#[derive(Debug, Error)]
pub enum PoolRetrievalError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
    #[error("failed to map subject row: {0}")]
    Mapping(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Internal to the enrichment side channel. Always recovered locally by
/// falling back to the deterministic insight template, never surfaced.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("enrichment call timed out after {0}s")]
    Timeout(u64),
    #[error("enrichment transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("enrichment response malformed: {0}")]
    Malformed(String),
}

/// Umbrella error for the end-to-end pipeline surface.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    MalformedSubject(#[from] MalformedSubjectError),
    #[error(transparent)]
    InvalidIntent(#[from] InvalidIntentError),
    #[error(transparent)]
    PoolRetrieval(#[from] PoolRetrievalError),
}
