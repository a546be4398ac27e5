//! In-memory filesystem implementation.
//!
//! Used for testing and for callers that want to aggregate content that never
//! touched a disk. Directory children keep insertion order, which makes the
//! "native listing order" fully controllable.

use super::traits::{DirEntry, Filesystem};
use async_trait::async_trait;
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Node in the memory filesystem.
#[derive(Debug, Clone)]
enum Node {
    File { data: Vec<u8>, readable: bool },
    Directory { children: Vec<OsString>, listable: bool },
    /// Stands in for symlinks, devices and the like.
    Special,
}

impl Node {
    fn empty_dir() -> Self {
        Node::Directory {
            children: Vec::new(),
            listable: true,
        }
    }
}

/// In-memory filesystem.
///
/// Thread-safe via internal `RwLock`. All data is lost when dropped.
#[derive(Debug)]
pub struct MemoryFs {
    nodes: RwLock<HashMap<PathBuf, Node>>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// Create a new empty in-memory filesystem.
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        // Root directory always exists
        nodes.insert(PathBuf::new(), Node::empty_dir());
        Self {
            nodes: RwLock::new(nodes),
        }
    }

    /// Normalize a path: remove leading `/`, resolve `.` and `..`.
    fn normalize(path: &Path) -> PathBuf {
        let mut result = PathBuf::new();
        for component in path.components() {
            match component {
                std::path::Component::RootDir => {}
                std::path::Component::CurDir => {}
                std::path::Component::ParentDir => {
                    result.pop();
                }
                std::path::Component::Normal(s) => {
                    result.push(s);
                }
                std::path::Component::Prefix(_) => {}
            }
        }
        result
    }

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("not found: {}", path.display()),
        )
    }

    /// Create `path` (and missing parent directories), appending it to its
    /// parent's child list the first time it appears.
    fn insert(nodes: &mut HashMap<PathBuf, Node>, path: &Path, node: Node) -> io::Result<()> {
        let mut current = PathBuf::new();
        let components: Vec<_> = path.components().collect();

        for (i, component) in components.iter().enumerate() {
            let std::path::Component::Normal(name) = component else {
                continue;
            };
            let parent = current.clone();
            current.push(name);
            let is_last = i + 1 == components.len();

            match nodes.get(&current) {
                Some(Node::Directory { .. }) if !is_last => continue,
                Some(Node::File { .. } | Node::Special) if !is_last => {
                    return Err(io::Error::new(
                        io::ErrorKind::NotADirectory,
                        format!("not a directory: {}", current.display()),
                    ));
                }
                Some(Node::Directory { .. }) if !matches!(node, Node::Directory { .. }) => {
                    return Err(io::Error::new(
                        io::ErrorKind::IsADirectory,
                        format!("is a directory: {}", current.display()),
                    ));
                }
                Some(Node::Directory { .. }) => return Ok(()),
                Some(_) if matches!(node, Node::Directory { .. }) => {
                    return Err(io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        format!("file exists: {}", current.display()),
                    ));
                }
                Some(_) => {
                    // Overwrite a file or special node in place; keeps its slot.
                    nodes.insert(current.clone(), node.clone());
                    return Ok(());
                }
                None => {}
            }

            let fresh = if is_last {
                node.clone()
            } else {
                Node::empty_dir()
            };
            nodes.insert(current.clone(), fresh);
            if let Some(Node::Directory { children, .. }) = nodes.get_mut(&parent) {
                children.push(name.to_os_string());
            }
        }
        Ok(())
    }

    /// Write a file, creating parent directories as needed.
    pub async fn write(&self, path: impl AsRef<Path>, data: impl Into<Vec<u8>>) -> io::Result<()> {
        let normalized = Self::normalize(path.as_ref());
        let mut nodes = self.nodes.write().await;
        Self::insert(
            &mut nodes,
            &normalized,
            Node::File {
                data: data.into(),
                readable: true,
            },
        )
    }

    /// Create a directory (and parent directories if needed).
    pub async fn mkdir(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let normalized = Self::normalize(path.as_ref());
        let mut nodes = self.nodes.write().await;
        Self::insert(&mut nodes, &normalized, Node::empty_dir())
    }

    /// Add an entry that is neither file nor directory.
    pub async fn add_special(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let normalized = Self::normalize(path.as_ref());
        let mut nodes = self.nodes.write().await;
        Self::insert(&mut nodes, &normalized, Node::Special)
    }

    /// Make subsequent reads of an existing file fail with `PermissionDenied`.
    pub async fn deny_read(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let normalized = Self::normalize(path);
        let mut nodes = self.nodes.write().await;
        match nodes.get_mut(&normalized) {
            Some(Node::File { readable, .. }) => {
                *readable = false;
                Ok(())
            }
            Some(_) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a file: {}", path.display()),
            )),
            None => Err(Self::not_found(path)),
        }
    }

    /// Make subsequent listings of an existing directory fail with `PermissionDenied`.
    pub async fn deny_list(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        let normalized = Self::normalize(path);
        let mut nodes = self.nodes.write().await;
        match nodes.get_mut(&normalized) {
            Some(Node::Directory { listable, .. }) => {
                *listable = false;
                Ok(())
            }
            Some(_) => Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("not a directory: {}", path.display()),
            )),
            None => Err(Self::not_found(path)),
        }
    }
}

#[async_trait]
impl Filesystem for MemoryFs {
    async fn stat(&self, path: &Path) -> io::Result<DirEntry> {
        let normalized = Self::normalize(path);
        let nodes = self.nodes.read().await;

        let name = normalized
            .file_name()
            .map(OsStr::to_os_string)
            .unwrap_or_else(|| OsString::from("/"));

        match nodes.get(&normalized) {
            Some(Node::File { .. }) => Ok(DirEntry::file(name)),
            Some(Node::Directory { .. }) => Ok(DirEntry::directory(name)),
            Some(Node::Special) => Ok(DirEntry::other(name)),
            None => Err(Self::not_found(path)),
        }
    }

    async fn list(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let normalized = Self::normalize(path);
        let nodes = self.nodes.read().await;

        let children = match nodes.get(&normalized) {
            Some(Node::Directory {
                children,
                listable: true,
            }) => children,
            Some(Node::Directory { listable: false, .. }) => {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("permission denied: {}", path.display()),
                ))
            }
            Some(_) => {
                return Err(io::Error::new(
                    io::ErrorKind::NotADirectory,
                    format!("not a directory: {}", path.display()),
                ))
            }
            None => return Err(Self::not_found(path)),
        };

        let mut result = Vec::with_capacity(children.len());
        for name in children {
            let entry = match nodes.get(&normalized.join(name)) {
                Some(Node::File { .. }) => DirEntry::file(name.clone()),
                Some(Node::Directory { .. }) => DirEntry::directory(name.clone()),
                Some(Node::Special) | None => DirEntry::other(name.clone()),
            };
            result.push(entry);
        }
        Ok(result)
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let normalized = Self::normalize(path);
        let nodes = self.nodes.read().await;

        match nodes.get(&normalized) {
            Some(Node::File { data, readable: true }) => Ok(data.clone()),
            Some(Node::File { readable: false, .. }) => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            )),
            Some(Node::Directory { .. }) => Err(io::Error::new(
                io::ErrorKind::IsADirectory,
                format!("is a directory: {}", path.display()),
            )),
            Some(Node::Special) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            )),
            None => Err(Self::not_found(path)),
        }
    }
}
