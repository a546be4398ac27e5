//! Local filesystem backend.
//!
//! Paths are used as given: relative paths resolve against the process
//! working directory, absolute paths are taken verbatim.

use super::traits::{DirEntry, EntryKind, Filesystem};
use async_trait::async_trait;
use std::ffi::{OsStr, OsString};
use std::fs::FileType;
use std::io;
use std::path::Path;
use tokio::fs;

/// Local filesystem backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }

    fn classify(file_type: FileType) -> EntryKind {
        if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            // Symlinks (when not followed), sockets, pipes, devices.
            EntryKind::Other
        }
    }

    fn entry_name(path: &Path) -> OsString {
        path.file_name()
            .map(OsStr::to_os_string)
            .unwrap_or_else(|| path.as_os_str().to_os_string())
    }
}

#[async_trait]
impl Filesystem for LocalFs {
    async fn stat(&self, path: &Path) -> io::Result<DirEntry> {
        // stat follows symlinks
        let meta = fs::metadata(path).await?;

        Ok(DirEntry {
            name: Self::entry_name(path),
            kind: Self::classify(meta.file_type()),
        })
    }

    async fn list(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        let mut dir = fs::read_dir(path).await?;

        while let Some(entry) = dir.next_entry().await? {
            // DirEntry::file_type does not follow symlinks, so links land in Other.
            let kind = match entry.file_type().await {
                Ok(ft) => Self::classify(ft),
                Err(e) => {
                    tracing::debug!(path = %entry.path().display(), error = %e, "cannot determine entry type");
                    EntryKind::Other
                }
            };
            entries.push(DirEntry {
                name: entry.file_name(),
                kind,
            });
        }

        // No sort: native enumeration order is part of the contract.
        Ok(entries)
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path).await
    }
}
