//! The aggregator: walk a root and render every file into one text blob.
//!
//! For a directory root, each regular file becomes a *file block*:
//!
//! ```text
//! \n\n\n\n\nfile: /full/path/to/file\n\n<content>\n
//! ```
//!
//! Blocks appear in depth-first order: a subdirectory's blocks are inlined
//! at the subdirectory's position among its siblings, with no header of its
//! own. A file root yields its content verbatim, with no block around it.
//!
//! Any directory that cannot be listed fails the whole call, root or not.
//! Unreadable files are logged, recorded in [`Aggregation::skipped`], and
//! contribute nothing to the text.

use std::path::{Path, PathBuf};

use crate::error::{AggregationError, Result};
use crate::vfs::{DirEntry, EntryKind, Filesystem};

const BLOCK_LEAD: &str = "\n\n\n\n\n";
const HEADER_PREFIX: &str = "file: ";

/// Order in which a directory's children are visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryOrder {
    /// Whatever order the filesystem lists entries in.
    #[default]
    Native,
    /// Sorted by entry name (byte-wise), for output that matches across platforms.
    ByName,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateOptions {
    pub order: EntryOrder,
}

/// A file below the root that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of a successful aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// The rendered output.
    pub text: String,
    /// Number of files whose content made it into `text`.
    pub files: usize,
    /// Files dropped because they failed to read.
    pub skipped: Vec<SkippedFile>,
}

impl Aggregation {
    fn push_file(&mut self, path: &Path, content: &str) {
        push_file_block(&mut self.text, path, content);
        self.files += 1;
    }

    fn skip(&mut self, path: PathBuf, error: &std::io::Error) {
        tracing::warn!(path = %path.display(), error = %error, "skipping unreadable file");
        self.skipped.push(SkippedFile {
            path,
            reason: error.to_string(),
        });
    }
}

/// Render a single file block.
pub fn file_block(path: &Path, content: &str) -> String {
    let mut out = String::new();
    push_file_block(&mut out, path, content);
    out
}

fn push_file_block(out: &mut String, path: &Path, content: &str) {
    let path = path.display().to_string();
    out.reserve(BLOCK_LEAD.len() + HEADER_PREFIX.len() + path.len() + content.len() + 3);
    out.push_str(BLOCK_LEAD);
    out.push_str(HEADER_PREFIX);
    out.push_str(&path);
    out.push_str("\n\n");
    out.push_str(content);
    out.push('\n');
}

/// Decode file bytes as UTF-8.
///
/// Invalid sequences become U+FFFD and a leading byte-order mark is dropped,
/// so decoding never fails.
fn decode(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    };
    const BOM: char = '\u{feff}';
    if text.starts_with(BOM) {
        text[BOM.len_utf8()..].to_string()
    } else {
        text
    }
}

/// Gathers file contents from a [`Filesystem`].
#[derive(Debug, Clone)]
pub struct Aggregator<F> {
    fs: F,
    options: AggregateOptions,
}

impl<F: Filesystem> Aggregator<F> {
    pub fn new(fs: F) -> Self {
        Self::with_options(fs, AggregateOptions::default())
    }

    pub fn with_options(fs: F, options: AggregateOptions) -> Self {
        Self { fs, options }
    }

    /// Aggregate everything reachable from `root` into one string.
    pub async fn aggregate(&self, root: &Path) -> Result<String> {
        self.collect(root).await.map(|agg| agg.text)
    }

    /// Like [`aggregate`](Self::aggregate), but also reports what was copied
    /// and what was skipped.
    pub async fn collect(&self, root: &Path) -> Result<Aggregation> {
        let entry = self
            .fs
            .stat(root)
            .await
            .map_err(|e| AggregationError::root_access(root, e))?;

        match entry.kind {
            EntryKind::File => {
                let bytes = self
                    .fs
                    .read(root)
                    .await
                    .map_err(|e| AggregationError::root_access(root, e))?;
                Ok(Aggregation {
                    text: decode(bytes),
                    files: 1,
                    skipped: Vec::new(),
                })
            }
            EntryKind::Directory => self.collect_tree(root).await,
            EntryKind::Other => Err(AggregationError::UnsupportedRoot {
                path: root.to_path_buf(),
            }),
        }
    }

    /// Depth-first walk with an explicit stack.
    ///
    /// Children are pushed in reverse so they pop in listing order, which
    /// matches the recursive definition without its depth limit.
    async fn collect_tree(&self, root: &Path) -> Result<Aggregation> {
        let children = self
            .list(root)
            .await
            .map_err(|e| AggregationError::root_access(root, e))?;

        let mut agg = Aggregation::default();
        let mut stack: Vec<(PathBuf, EntryKind)> = Vec::new();
        push_children(&mut stack, root, children);

        while let Some((path, kind)) = stack.pop() {
            match kind {
                EntryKind::Directory => {
                    let children = self
                        .list(&path)
                        .await
                        .map_err(|e| AggregationError::subdirectory_access(&path, e))?;
                    push_children(&mut stack, &path, children);
                }
                EntryKind::File => match self.fs.read(&path).await {
                    Ok(bytes) => agg.push_file(&path, &decode(bytes)),
                    Err(e) => agg.skip(path, &e),
                },
                EntryKind::Other => {
                    tracing::debug!(path = %path.display(), "skipping non-regular entry");
                }
            }
        }

        tracing::debug!(
            root = %root.display(),
            files = agg.files,
            skipped = agg.skipped.len(),
            bytes = agg.text.len(),
            "aggregation complete"
        );
        Ok(agg)
    }

    async fn list(&self, path: &Path) -> std::io::Result<Vec<DirEntry>> {
        let mut entries = self.fs.list(path).await?;
        if self.options.order == EntryOrder::ByName {
            entries.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(entries)
    }
}

fn push_children(stack: &mut Vec<(PathBuf, EntryKind)>, dir: &Path, children: Vec<DirEntry>) {
    stack.extend(
        children
            .into_iter()
            .rev()
            .map(|entry| (dir.join(&entry.name), entry.kind)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::MemoryFs;
    use rstest::rstest;

    fn block(path: &str, content: &str) -> String {
        format!("\n\n\n\n\nfile: {path}\n\n{content}\n")
    }

    #[test]
    fn file_block_format() {
        assert_eq!(
            file_block(Path::new("/p/a.txt"), "hello"),
            "\n\n\n\n\nfile: /p/a.txt\n\nhello\n"
        );
        assert_eq!(file_block(Path::new("/p/e"), ""), "\n\n\n\n\nfile: /p/e\n\n\n");
    }

    #[rstest]
    #[case::plain(b"hello".to_vec(), "hello")]
    #[case::bom_stripped(b"\xEF\xBB\xBFhi".to_vec(), "hi")]
    #[case::invalid_utf8(vec![b'a', 0xFF, b'b'], "a\u{FFFD}b")]
    #[case::empty(Vec::new(), "")]
    fn decode_cases(#[case] bytes: Vec<u8>, #[case] expected: &str) {
        assert_eq!(decode(bytes), expected);
    }

    #[tokio::test]
    async fn single_file_root_is_verbatim() {
        let fs = MemoryFs::new();
        fs.write("/notes.md", "# Title\n\nbody").await.unwrap();

        let out = Aggregator::new(fs)
            .aggregate(Path::new("/notes.md"))
            .await
            .unwrap();
        assert_eq!(out, "# Title\n\nbody");
    }

    #[tokio::test]
    async fn flat_directory_in_listing_order() {
        let fs = MemoryFs::new();
        fs.write("/p/b.txt", "B").await.unwrap();
        fs.write("/p/a.txt", "A").await.unwrap();

        let out = Aggregator::new(fs).aggregate(Path::new("/p")).await.unwrap();
        assert_eq!(out, block("/p/b.txt", "B") + &block("/p/a.txt", "A"));
    }

    #[tokio::test]
    async fn by_name_order_sorts_each_level() {
        let fs = MemoryFs::new();
        fs.write("/p/b.txt", "B").await.unwrap();
        fs.write("/p/sub/z.txt", "Z").await.unwrap();
        fs.write("/p/sub/y.txt", "Y").await.unwrap();
        fs.write("/p/a.txt", "A").await.unwrap();

        let options = AggregateOptions {
            order: EntryOrder::ByName,
        };
        let out = Aggregator::with_options(fs, options)
            .aggregate(Path::new("/p"))
            .await
            .unwrap();
        let expected = [
            block("/p/a.txt", "A"),
            block("/p/b.txt", "B"),
            block("/p/sub/y.txt", "Y"),
            block("/p/sub/z.txt", "Z"),
        ]
        .concat();
        assert_eq!(out, expected);
    }

    #[tokio::test]
    async fn subdirectory_is_inlined_without_header() {
        let fs = MemoryFs::new();
        fs.write("/p/d/x.txt", "X").await.unwrap();
        fs.write("/p/y.txt", "Y").await.unwrap();
        let agg = Aggregator::new(fs);

        let sub = agg.aggregate(Path::new("/p/d")).await.unwrap();
        let whole = agg.aggregate(Path::new("/p")).await.unwrap();
        assert_eq!(whole, sub + &block("/p/y.txt", "Y"));
        assert_eq!(whole, block("/p/d/x.txt", "X") + &block("/p/y.txt", "Y"));
    }

    #[tokio::test]
    async fn deep_nesting_is_depth_first() {
        let fs = MemoryFs::new();
        fs.write("/r/1.txt", "1").await.unwrap();
        fs.write("/r/a/2.txt", "2").await.unwrap();
        fs.write("/r/a/b/3.txt", "3").await.unwrap();
        fs.write("/r/a/4.txt", "4").await.unwrap();
        fs.write("/r/5.txt", "5").await.unwrap();

        let out = Aggregator::new(fs).aggregate(Path::new("/r")).await.unwrap();
        let expected = [
            block("/r/1.txt", "1"),
            block("/r/a/2.txt", "2"),
            block("/r/a/b/3.txt", "3"),
            block("/r/a/4.txt", "4"),
            block("/r/5.txt", "5"),
        ]
        .concat();
        assert_eq!(out, expected);
    }

    #[tokio::test]
    async fn empty_directory_yields_empty_string() {
        let fs = MemoryFs::new();
        fs.mkdir("/empty/nested").await.unwrap();

        let agg = Aggregator::new(fs).collect(Path::new("/empty")).await.unwrap();
        assert_eq!(agg, Aggregation::default());
    }

    #[tokio::test]
    async fn unreadable_file_is_skipped() {
        let fs = MemoryFs::new();
        fs.write("/p/bad.txt", "secret").await.unwrap();
        fs.write("/p/good.txt", "ok").await.unwrap();
        fs.deny_read("/p/bad.txt").await.unwrap();

        let agg = Aggregator::new(fs).collect(Path::new("/p")).await.unwrap();
        assert_eq!(agg.text, block("/p/good.txt", "ok"));
        assert!(!agg.text.contains("secret"));
        assert!(!agg.text.contains("denied"));
        assert_eq!(agg.files, 1);
        assert_eq!(agg.skipped.len(), 1);
        assert_eq!(agg.skipped[0].path, Path::new("/p/bad.txt"));
        assert!(agg.skipped[0].reason.contains("permission denied"));
    }

    #[tokio::test]
    async fn special_entries_are_ignored() {
        let fs = MemoryFs::new();
        fs.add_special("/p/link").await.unwrap();
        fs.write("/p/real.txt", "r").await.unwrap();

        let agg = Aggregator::new(fs).collect(Path::new("/p")).await.unwrap();
        assert_eq!(agg.text, block("/p/real.txt", "r"));
        assert!(agg.skipped.is_empty());
    }

    #[tokio::test]
    async fn missing_root_is_root_access_error() {
        let fs = MemoryFs::new();
        let err = Aggregator::new(fs)
            .aggregate(Path::new("/nope"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, AggregationError::RootAccess { .. }));
    }

    #[tokio::test]
    async fn unreadable_file_root_is_fatal() {
        let fs = MemoryFs::new();
        fs.write("/f.txt", "x").await.unwrap();
        fs.deny_read("/f.txt").await.unwrap();

        let err = Aggregator::new(fs)
            .aggregate(Path::new("/f.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, AggregationError::RootAccess { .. }));
    }

    #[tokio::test]
    async fn special_root_is_unsupported() {
        let fs = MemoryFs::new();
        fs.add_special("/dev/null").await.unwrap();

        let err = Aggregator::new(fs)
            .aggregate(Path::new("/dev/null"))
            .await
            .unwrap_err();
        assert!(matches!(err, AggregationError::UnsupportedRoot { .. }));
    }

    #[tokio::test]
    async fn aggregation_is_repeatable() {
        let fs = MemoryFs::new();
        fs.write("/p/a.txt", "A").await.unwrap();
        fs.write("/p/q/b.txt", "B").await.unwrap();
        let agg = Aggregator::new(fs);

        let first = agg.aggregate(Path::new("/p")).await.unwrap();
        let second = agg.aggregate(Path::new("/p")).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unlistable_subdirectory_fails_the_call() {
        let fs = MemoryFs::new();
        fs.write("/p/locked/x.txt", "x").await.unwrap();
        fs.write("/p/y.txt", "y").await.unwrap();
        fs.deny_list("/p/locked").await.unwrap();

        let err = Aggregator::new(fs)
            .aggregate(Path::new("/p"))
            .await
            .unwrap_err();
        assert!(matches!(err, AggregationError::SubdirectoryAccess { .. }));
        assert_eq!(err.path(), Path::new("/p/locked"));
    }

    #[tokio::test]
    async fn unlistable_root_is_root_access_error() {
        let fs = MemoryFs::new();
        fs.write("/p/y.txt", "y").await.unwrap();
        fs.deny_list("/p").await.unwrap();

        let err = Aggregator::new(fs)
            .aggregate(Path::new("/p"))
            .await
            .unwrap_err();
        assert!(matches!(err, AggregationError::RootAccess { .. }));
    }
}
