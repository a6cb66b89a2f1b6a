//! Error types for dirsizer.
//!
//! Library calls return [`SizerError`]; the CLI wraps it in `anyhow`. Filesystem implementations
//! report failures as a [`BoxError`] so any error type can flow through the sizer unchanged and be
//! recovered with `source()` / `downcast_ref`.

use thiserror::Error;

use crate::context::Cancelled;

/// Error type returned by [`FileSystem`](crate::fs::FileSystem) implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum SizerError {
    /// The filesystem failed to enumerate a directory.
    #[error("listing directory {dir} failed: {source}")]
    Listing {
        dir: String,
        #[source]
        source: BoxError,
    },

    /// The filesystem failed to report a file's size.
    #[error("stat of file {file} failed: {source}")]
    Stat {
        file: String,
        #[source]
        source: BoxError,
    },

    /// The caller's context was cancelled or its deadline passed before traversal completed.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    #[error("{0} thread panicked")]
    WorkerPanicked(&'static str),
}

impl SizerError {
    pub fn listing(dir: &impl std::fmt::Debug, source: BoxError) -> Self {
        SizerError::Listing {
            dir: format!("{dir:?}"),
            source,
        }
    }

    pub fn stat(file: &impl std::fmt::Debug, source: BoxError) -> Self {
        SizerError::Stat {
            file: format!("{file:?}"),
            source,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, SizerError::Cancelled(_))
    }
}

/// The cancellation cause carried by a filesystem error, if that is what it is.
pub fn cancellation_cause(err: &BoxError) -> Option<Cancelled> {
    err.downcast_ref::<Cancelled>().copied()
}
