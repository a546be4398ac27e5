//! Destinations for aggregated text.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::SinkKind;

/// A clipboard-like destination.
pub trait Sink {
    /// Short human-readable name, used in status lines.
    fn name(&self) -> &str;

    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Writes to standard output.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn name(&self) -> &str {
        "stdout"
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(text.as_bytes()).context("writing to stdout")?;
        out.flush().context("flushing stdout")
    }
}

/// Writes (truncating) to a file.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    label: String,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = path.display().to_string();
        Self { path, label }
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        &self.label
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        std::fs::write(&self.path, text).with_context(|| format!("writing {}", self.path.display()))
    }
}

/// Resolved destination: config/flag choice plus an optional output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkTarget {
    Clipboard,
    Stdout,
    File(PathBuf),
}

impl From<SinkKind> for SinkTarget {
    fn from(kind: SinkKind) -> Self {
        match kind {
            SinkKind::Clipboard => SinkTarget::Clipboard,
            SinkKind::Stdout => SinkTarget::Stdout,
        }
    }
}

impl SinkTarget {
    pub fn open(&self) -> Result<Box<dyn Sink>> {
        match self {
            SinkTarget::Stdout => Ok(Box::new(StdoutSink)),
            SinkTarget::File(path) => Ok(Box::new(FileSink::new(path))),
            #[cfg(feature = "clipboard")]
            SinkTarget::Clipboard => Ok(Box::new(crate::clipboard::ClipboardSink)),
            #[cfg(not(feature = "clipboard"))]
            SinkTarget::Clipboard => {
                anyhow::bail!("clipboard support not compiled in; use --stdout or --output")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sink_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old content that is longer").unwrap();

        let mut sink = FileSink::new(&path);
        sink.write_text("new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(sink.name(), path.display().to_string());
    }

    #[test]
    fn file_sink_missing_parent_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::new(dir.path().join("no/such/dir/out.txt"));
        assert!(sink.write_text("x").is_err());
    }

    #[test]
    fn target_from_kind() {
        assert_eq!(SinkTarget::from(SinkKind::Stdout), SinkTarget::Stdout);
        assert_eq!(SinkTarget::from(SinkKind::Clipboard), SinkTarget::Clipboard);
    }

    #[test]
    fn open_non_clipboard_targets() {
        assert_eq!(SinkTarget::Stdout.open().unwrap().name(), "stdout");
        let sink = SinkTarget::File(PathBuf::from("/tmp/x.txt")).open().unwrap();
        assert_eq!(sink.name(), "/tmp/x.txt");
    }
}
