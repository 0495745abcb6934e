//! Defines the custom error types for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the `core` module.
///
/// Every variant is returned as data. None of them is allowed to take down the
/// session: the shell decides how each one is presented.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The supplied folder does not exist or is not a directory.
    #[error("Path is not a valid directory: {0}")]
    InvalidPath(PathBuf),

    /// A release note could not be read or decoded as UTF-8.
    #[error("Failed to read {1}: {0}")]
    Read(#[source] std::io::Error, PathBuf),

    /// The version stamp or note body was rejected before any file was touched.
    #[error("Invalid update: {0}")]
    Validation(#[from] ValidationError),

    /// A release note could not be written.
    #[error("Failed to write {1}: {0}")]
    Write(#[source] std::io::Error, PathBuf),

    /// The directory walk itself failed.
    #[error("Directory scan failed: {0}")]
    Scan(#[from] ignore::Error),
}

/// Reasons an update request is refused up front.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("the sequence number must not be empty")]
    EmptySequence,

    #[error("the sequence number must be at most {max} characters")]
    SequenceTooLong { max: usize },

    #[error("the release note body must not be empty")]
    EmptyBody,
}
