//! Error type for the housing-model library.
//!
//! Every failure in the pipeline is fatal: there is no retry and no partial
//! result. A single [`ModelError`] enum covers the whole surface so callers
//! (and the training binaries) can propagate with `?` and report once.

use thiserror::Error;

/// All errors returned by the housing-model library.
#[derive(Debug, Error)]
pub enum ModelError {
    // ── Dataset acquisition ───────────────────────────────────────────────
    /// HTTP request failed or returned a non-success status.
    #[error("Failed to download dataset from '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// The download did not finish within the configured timeout.
    #[error("Dataset download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    /// A line of the raw dataset could not be parsed.
    #[error("Malformed dataset at line {line}: {detail}")]
    MalformedData { line: usize, detail: String },

    // ── Data shape ────────────────────────────────────────────────────────
    /// A required column is not part of the dataset.
    #[error("Column '{name}' not found in dataset")]
    MissingColumn { name: String },

    /// Two inputs that must line up do not.
    #[error("Shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A NaN or infinite value reached a model.
    #[error("Non-finite value in {what}")]
    NonFinite { what: &'static str },

    /// An operation needs at least one row but got none.
    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    /// Train/test split parameters cannot produce two non-empty sets.
    #[error("Invalid train/test split: {0}")]
    InvalidSplit(String),

    /// Fold count is incompatible with the number of rows.
    #[error("Cannot split {rows} rows into {folds} folds (need 2 <= folds <= rows)")]
    InvalidFoldCount { folds: usize, rows: usize },

    // ── Models ────────────────────────────────────────────────────────────
    /// `predict` or `score` called before `fit`.
    #[error("Model '{model}' must be fitted before predicting")]
    NotFitted { model: String },

    /// The kernel system could not be solved.
    #[error("Linear algebra failure: {0}")]
    Linalg(String),

    /// A cross-validation round failed; the whole run is aborted.
    #[error("Cross-validation fold {fold} failed: {source}")]
    FoldFailed {
        fold: usize,
        #[source]
        source: Box<ModelError>,
    },

    /// A user-supplied scoring function rejected its inputs.
    #[error("Scoring failed: {0}")]
    Scoring(String),

    // ── Config ────────────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ModelError {
    pub(crate) fn shape(what: &'static str, expected: usize, actual: usize) -> Self {
        ModelError::ShapeMismatch {
            what,
            expected,
            actual,
        }
    }
}
