//! copyall entry point.
//!
//! ```bash
//! copyall src/            # folder → clipboard
//! copyall --stdout README.md
//! copyall -o bundle.txt crates/
//! ```

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use copyall_cli::{Cli, Config};

const DEFAULT_LOG: &str = "copyall_cli=warn,copyall_core=warn";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    if let Some(held) = run_clipboard_holder() {
        held?;
        return Ok(ExitCode::SUCCESS);
    }

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // RUST_LOG wins over the config file's `log` directive.
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.log.as_deref().unwrap_or(DEFAULT_LOG))
            .context("invalid log directive")?,
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let outcome = copyall_cli::run(&cli, &config).await?;
    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Serve the clipboard selection when launched as the holder process.
#[cfg(all(feature = "clipboard", target_os = "linux"))]
fn run_clipboard_holder() -> Option<Result<()>> {
    std::env::var_os(copyall_cli::clipboard::HOLDER_ENV)
        .map(|_| copyall_cli::clipboard::hold_from_stdin())
}

#[cfg(not(all(feature = "clipboard", target_os = "linux")))]
fn run_clipboard_holder() -> Option<Result<()>> {
    None
}
