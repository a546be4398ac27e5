//! User configuration.
//!
//! Read from `$XDG_CONFIG_HOME/copyall/config.toml` unless overridden by
//! `--config` or `COPYALL_CONFIG`. Every key is optional:
//!
//! ```toml
//! sink = "stdout"      # or "clipboard"
//! sort = true          # visit directory entries by name
//! log = "copyall_core=debug"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "COPYALL_CONFIG";

/// Where aggregated text goes when no `--stdout`/`--output` flag is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Clipboard,
    Stdout,
}

impl Default for SinkKind {
    fn default() -> Self {
        if cfg!(feature = "clipboard") {
            SinkKind::Clipboard
        } else {
            SinkKind::Stdout
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sink: SinkKind,
    pub sort: bool,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log: Option<String>,
}

impl Config {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid config")
    }

    /// Load configuration.
    ///
    /// An explicit path (argument or `COPYALL_CONFIG`) must exist. The default
    /// location is optional and falls back to built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        match explicit {
            Some(path) => Self::load_file(&path),
            None => {
                let path = default_path();
                if path.exists() {
                    Self::load_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing {}", path.display()))
    }
}

/// Get the config directory.
///
/// Uses `$XDG_CONFIG_HOME/copyall` or falls back to `~/.config/copyall`.
pub fn config_dir() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/tmp"))
                .join(".config")
        })
        .join("copyall")
}

pub fn default_path() -> PathBuf {
    config_dir().join("config.toml")
}
