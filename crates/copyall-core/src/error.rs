//! Error types for aggregation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AggregationError>;

/// Failures that abort an aggregation.
///
/// Unreadable files below the root do not abort; they are recorded as
/// [`SkippedFile`](crate::SkippedFile)s and logged instead.
#[derive(Debug, Error)]
pub enum AggregationError {
    /// The root could not be stat'ed, listed, or read.
    #[error("cannot access {}", path.display())]
    RootAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directory below the root could not be listed.
    #[error("cannot list {}", path.display())]
    SubdirectoryAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The root exists but is neither a regular file nor a directory.
    #[error("{} is not a regular file or directory", path.display())]
    UnsupportedRoot { path: PathBuf },
}

impl AggregationError {
    pub(crate) fn root_access(path: &std::path::Path, source: io::Error) -> Self {
        Self::RootAccess {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn subdirectory_access(path: &std::path::Path, source: io::Error) -> Self {
        Self::SubdirectoryAccess {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The path the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::RootAccess { path, .. }
            | Self::SubdirectoryAccess { path, .. }
            | Self::UnsupportedRoot { path } => path,
        }
    }

    /// True when the root simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RootAccess { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}
