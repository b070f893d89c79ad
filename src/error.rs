//! Error type shared by every stage of the snapshot pipeline.
//!
//! Only [`PrsnapError::MalformedPull`] and configuration failures are meant to
//! escape `main`; the page fetcher, rate reporter and snapshot writer log the
//! other variants and carry on.

use std::sync::Arc;

use ortho_config::OrthoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrsnapError {
    #[error("request failed when running {context}: {source}")]
    RequestContext {
        context: Box<str>,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP status {status} | body snippet: {snippet}")]
    Status { status: u16, snippet: Box<str> },
    #[error("malformed response (status {status}): {message} | snippet: {snippet}")]
    BadResponseSerde {
        status: u16,
        message: Box<str>,
        snippet: Box<str>,
    },
    #[error("empty GraphQL response (status {status}) for {operation} | snippet: {snippet}")]
    EmptyResponse {
        status: u16,
        operation: Box<str>,
        snippet: Box<str>,
    },
    #[error("malformed pull request node at {path}: {message}")]
    MalformedPull { path: Box<str>, message: Box<str> },
    #[error("repository {0} not found")]
    RepoNotFound(Box<str>),
    #[error("invalid repository '{0}', expected owner/name")]
    InvalidRepo(Box<str>),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Config(#[source] Arc<OrthoError>),
}

// Shared pointer so every `Result<_, PrsnapError>` stays small; the loader
// may already hand its errors out behind an `Arc`.
impl From<OrthoError> for PrsnapError {
    fn from(err: OrthoError) -> Self {
        Self::Config(Arc::new(err))
    }
}

impl From<Arc<OrthoError>> for PrsnapError {
    fn from(err: Arc<OrthoError>) -> Self {
        Self::Config(err)
    }
}
