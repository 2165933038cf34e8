//! Error types.
//!
//! User-facing page failures are [`PageError`]; everything else describes a
//! resource that could not be loaded and is logged, then degraded around.

use thiserror::Error;

/// Failures that put the detail page into its error state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// The URL carried no project identifier in any recognized position.
    #[error("no project specified")]
    NoProjectSpecified,

    /// The identifier does not match any known project.
    #[error("project not found: {0}")]
    ProjectNotFound(String),
}

/// A fetch that did not produce a usable body.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unexpected status {status} for {path}")]
    Status { path: String, status: u16 },

    #[error("transport error for {path}: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("i/o error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid asset path: {0}")]
    InvalidPath(String),
}

/// An image that could not be fetched or decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to decode {path}: {reason}")]
pub struct DecodeError {
    pub path: String,
    pub reason: String,
}

/// A Markdown renderer failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("markdown rendering failed: {0}")]
pub struct RenderError(pub String);

/// The persisted locale preference could not be read or written.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("locale store i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("locale store holds an unknown value: {0:?}")]
    Invalid(String),
}

/// The embedded or supplied project catalog could not be parsed.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate project id in catalog: {0}")]
    DuplicateId(String),
}
