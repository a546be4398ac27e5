//! Core VFS traits and types.

use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::path::Path;

/// Kind of directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Symlinks, sockets, pipes, devices.
    Other,
}

/// A directory entry as returned by `list()` and `stat()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Name of the entry (not full path), exactly as the filesystem stores it.
    pub name: OsString,
    /// Kind of entry.
    pub kind: EntryKind,
}

impl DirEntry {
    /// Create a new directory entry.
    pub fn directory(name: impl Into<OsString>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }

    /// Create a new file entry.
    pub fn file(name: impl Into<OsString>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    /// Create an entry that is neither file nor directory.
    pub fn other(name: impl Into<OsString>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Other,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Read-only filesystem interface consumed by the aggregator.
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Get metadata for a path, following symlinks.
    ///
    /// Fails with `NotFound` if nothing exists at `path`.
    async fn stat(&self, path: &Path) -> io::Result<DirEntry>;

    /// List the immediate children of a directory.
    ///
    /// Entries come back in whatever order the backend enumerates them.
    /// Callers that need a stable order must sort themselves.
    async fn list(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Read the entire contents of a file.
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}
