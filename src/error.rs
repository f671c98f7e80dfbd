//! Error types for ferro-acmg.
//!
//! Classification of a single criterion can fail without aborting the
//! variant's evaluation as a whole; see [`crate::classify`] for how failures
//! are collected into the final result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse error category, attached to per-criterion failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Unresolvable criterion/evaluator binding.
    Configuration,
    /// A criterion explicitly required an annotation field that is absent.
    MissingAnnotation,
    /// The multifactorial path lacks its minimum number of inputs.
    InsufficientEvidence,
    /// A criterion was invoked against a consequence type it cannot evaluate.
    UnsupportedVariantType,
    /// Serialization failure.
    Json,
}

impl ErrorKind {
    /// Get a brief description of this error kind.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "unresolvable configuration",
            ErrorKind::MissingAnnotation => "required annotation missing",
            ErrorKind::InsufficientEvidence => "insufficient multifactorial evidence",
            ErrorKind::UnsupportedVariantType => "unsupported variant type",
            ErrorKind::Json => "JSON serialization error",
        }
    }
}

/// Main error type for ferro-acmg operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AcmgError {
    /// A criterion or evaluator binding in the rule configuration could not
    /// be resolved.
    #[error("Configuration error: {msg}")]
    Configuration { msg: String },

    /// A criterion was configured to require an annotation field that is
    /// absent from the bundle.
    #[error("{criterion} requires annotation field '{field}' which is absent")]
    MissingAnnotation { criterion: String, field: String },

    /// Fewer independent likelihood ratios were supplied than the configured
    /// minimum for the multifactorial combination.
    #[error("insufficient evidence for multifactorial combination: {available} likelihood ratio(s) available, {required} required")]
    InsufficientEvidence { available: usize, required: usize },

    /// A criterion was invoked against a consequence type it cannot
    /// evaluate and that was not filtered by its applicability check.
    #[error("{criterion} cannot evaluate consequence type(s): {found}")]
    UnsupportedVariantType { criterion: String, found: String },

    /// Result serialization failed.
    #[error("JSON error: {msg}")]
    Json { msg: String },
}

impl AcmgError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        AcmgError::Configuration { msg: msg.into() }
    }

    /// Get the error kind for failure reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AcmgError::Configuration { .. } => ErrorKind::Configuration,
            AcmgError::MissingAnnotation { .. } => ErrorKind::MissingAnnotation,
            AcmgError::InsufficientEvidence { .. } => ErrorKind::InsufficientEvidence,
            AcmgError::UnsupportedVariantType { .. } => ErrorKind::UnsupportedVariantType,
            AcmgError::Json { .. } => ErrorKind::Json,
        }
    }
}

impl From<serde_json::Error> for AcmgError {
    fn from(err: serde_json::Error) -> Self {
        AcmgError::Json {
            msg: err.to_string(),
        }
    }
}
