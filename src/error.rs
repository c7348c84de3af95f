//! Error types shared across the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for linter operations.
///
/// Diagnostics produced while walking a file are never surfaced through this
/// type; only operational failures (bad paths, unreadable input) are.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a file or directory")]
    InvalidPath { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn file_read(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.to_path_buf(),
            source,
        }
    }
}
