//! copyall command-line front end.
//!
//! Wires the aggregator to a sink (system clipboard, stdout, or a file) and
//! reports the outcome on stderr.

#[cfg(feature = "clipboard")]
pub mod clipboard;
pub mod command;
pub mod config;
pub mod sink;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use copyall_core::{AggregateOptions, Aggregator, EntryOrder, LocalFs};
use owo_colors::{OwoColorize, Stream};

pub use command::{copy_selection, Outcome, Report};
pub use config::Config;
pub use sink::{Sink, SinkTarget};

/// Copy the text of a file, or of every file under a folder, to the clipboard.
#[derive(Debug, Clone, Parser)]
#[command(name = "copyall", version, about)]
pub struct Cli {
    /// File or folder to copy.
    pub path: Option<PathBuf>,

    /// Write to stdout instead of the clipboard.
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Write to a file instead of the clipboard.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Visit directory entries sorted by name instead of filesystem order.
    #[arg(long)]
    pub sort: bool,

    /// Config file (default: $XDG_CONFIG_HOME/copyall/config.toml).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Effective settings after merging flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub target: SinkTarget,
    pub order: EntryOrder,
}

impl Settings {
    pub fn resolve(cli: &Cli, config: &Config) -> Self {
        let target = if let Some(path) = &cli.output {
            SinkTarget::File(path.clone())
        } else if cli.stdout {
            SinkTarget::Stdout
        } else {
            config.sink.into()
        };
        let order = if cli.sort || config.sort {
            EntryOrder::ByName
        } else {
            EntryOrder::Native
        };
        Self { target, order }
    }
}

/// Run one copy and print the status line.
pub async fn run(cli: &Cli, config: &Config) -> Result<Outcome> {
    let settings = Settings::resolve(cli, config);
    tracing::debug!(?settings, "resolved settings");

    let mut sink = settings.target.open()?;
    let aggregator = Aggregator::with_options(
        LocalFs::new(),
        AggregateOptions {
            order: settings.order,
        },
    );

    let outcome = copy_selection(&aggregator, cli.path.as_deref(), sink.as_mut()).await;
    report(&outcome);
    Ok(outcome)
}

fn report(outcome: &Outcome) {
    let message = outcome.message();
    match outcome {
        Outcome::Copied(report) => {
            eprintln!(
                "{} ({}: {} file{}, {} bytes → {})",
                message.if_supports_color(Stream::Stderr, |m| m.green()),
                report.root.display(),
                report.files,
                if report.files == 1 { "" } else { "s" },
                report.bytes,
                report.sink,
            );
            for skipped in &report.skipped {
                eprintln!(
                    "  {} {}: {}",
                    "skipped".if_supports_color(Stream::Stderr, |s| s.yellow()),
                    skipped.path.display(),
                    skipped.reason
                );
            }
        }
        Outcome::NoSelection | Outcome::Failed(_) => {
            eprintln!("{}", message.if_supports_color(Stream::Stderr, |m| m.red()));
        }
    }
}
