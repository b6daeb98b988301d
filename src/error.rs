//! Error taxonomy for the recognition pipeline
//!
//! One variant per failure class so callers can tell a fatal engine problem
//! apart from a single bad image or a corrupt dataset file.

use std::path::PathBuf;
use thiserror::Error;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Disk I/O failure while writing images, scanning folders, or loading fonts
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The OCR engine failed to initialize or has been shut down
    #[error("OCR engine is not ready (not initialized or already shut down)")]
    EngineNotReady,

    /// A single image could not be recognized
    #[error("could not process image {path}: {message}")]
    Recognition { path: PathBuf, message: String },

    /// Dataset file could not be read, written, or parsed
    #[error("dataset persistence failed at {path}: {message}")]
    Persistence { path: PathBuf, message: String },

    /// An explicitly requested file does not exist
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },
}

impl Error {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn recognition(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Recognition {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Persistence {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
