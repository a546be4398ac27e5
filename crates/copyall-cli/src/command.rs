//! The copy command: selection in, aggregated text out to a sink.

use std::path::{Path, PathBuf};

use anyhow::Context;
use copyall_core::{Aggregator, Filesystem, SkippedFile};

use crate::sink::Sink;

pub const NO_SELECTION: &str = "Please select a file or folder to copy";
pub const COPIED: &str = "Copied content successfully";

/// What one invocation of the command did.
#[derive(Debug)]
pub enum Outcome {
    Copied(Report),
    NoSelection,
    Failed(anyhow::Error),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Copied(_))
    }

    /// One-line message for the user.
    pub fn message(&self) -> String {
        match self {
            Outcome::Copied(_) => COPIED.to_string(),
            Outcome::NoSelection => NO_SELECTION.to_string(),
            Outcome::Failed(e) => format!("Error copying file: {e:#}"),
        }
    }
}

#[derive(Debug)]
pub struct Report {
    pub root: PathBuf,
    pub files: usize,
    pub bytes: usize,
    pub skipped: Vec<SkippedFile>,
    pub sink: String,
}

/// Turn a user-supplied path into a fully-qualified one without touching
/// the filesystem. Falls back to the path as given.
pub fn qualify(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Aggregate `selection` and hand the text to `sink`.
///
/// Nothing is written to the sink unless aggregation succeeds.
pub async fn copy_selection<F: Filesystem>(
    aggregator: &Aggregator<F>,
    selection: Option<&Path>,
    sink: &mut dyn Sink,
) -> Outcome {
    let Some(selection) = selection else {
        return Outcome::NoSelection;
    };
    let root = qualify(selection);
    tracing::info!(root = %root.display(), sink = sink.name(), "copying");

    let aggregation = match aggregator.collect(&root).await {
        Ok(aggregation) => aggregation,
        Err(e) => return Outcome::Failed(e.into()),
    };

    if let Err(e) = sink
        .write_text(&aggregation.text)
        .with_context(|| format!("delivering to {}", sink.name()))
    {
        return Outcome::Failed(e);
    }

    Outcome::Copied(Report {
        root,
        files: aggregation.files,
        bytes: aggregation.text.len(),
        skipped: aggregation.skipped,
        sink: sink.name().to_string(),
    })
}
