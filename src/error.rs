//! Error types for release metadata validation and invocation building

use std::path::PathBuf;
use thiserror::Error;

use crate::validate::Violation;

#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Failed to load metadata from {path}: {reason}")]
    LoadError { path: String, reason: String },

    #[error("Metadata does not satisfy the release schema ({} violation(s))", .violations.len())]
    SchemaMismatch { violations: Vec<Violation> },

    #[error("Missing root dataset entity in crate metadata")]
    MissingRootEntity,

    #[error("Unknown flag in invocation: {0}")]
    UnknownFlag(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(PathBuf),
}
