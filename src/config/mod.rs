//! Tool configuration from `flatdim.toml` and the command line.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error      # ConfigError
//! ├── util       # find_config_file
//! └── mod.rs     # ToolConfig (this file)
//! ```
//!
//! # Example
//!
//! ```toml
//! [paths]
//! input = "~/art/not_available.psd"
//! output = "media/not_available.png"
//! log = "flatdim.log"
//! ```
//!
//! The file is optional. Relative paths resolve against its directory, and
//! every value can be overridden from the command line. The recolor threshold
//! and replacement color are fixed and have no config keys.

mod error;
mod util;

pub use error::ConfigError;
pub use util::find_config_file;

use crate::{
    cli::Cli,
    log,
    utils::path::{default_output_path, expand_path, normalize_path},
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file name searched for when `--config` is not given.
pub const DEFAULT_CONFIG_NAME: &str = "flatdim.toml";

/// Log file name used when neither CLI nor config names one.
pub const DEFAULT_LOG_NAME: &str = "flatdim.log";

// ============================================================================
// root configuration
// ============================================================================

/// `[paths]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Layered document to read
    pub input: Option<PathBuf>,
    /// PNG file to write (default: input with `.png` extension)
    pub output: Option<PathBuf>,
    /// Plain-text log file
    pub log: Option<PathBuf>,
}

/// Root configuration structure representing flatdim.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Directory relative config paths resolve against (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Input, output and log locations
    #[serde(default)]
    pub paths: PathsConfig,
}

impl ToolConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. A missing default config
    /// is fine; a missing `--config` path is an error.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        Self::load_from(cli, &cwd)
    }

    /// Same as [`ToolConfig::load`] with an explicit working directory.
    pub fn load_from(cli: &Cli, cwd: &Path) -> Result<Self> {
        let mut config = match Self::resolve_config_path(cli, cwd)? {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.to_path_buf());
                config.config_path = Some(path);
                config
            }
            None => Self {
                root: cwd.to_path_buf(),
                ..Self::default()
            },
        };

        config.normalize_paths();
        config.apply_cli(cli, cwd);
        config.validate()?;
        Ok(config)
    }

    /// Locate the config file, if any.
    fn resolve_config_path(cli: &Cli, cwd: &Path) -> Result<Option<PathBuf>> {
        match &cli.config {
            Some(explicit) => {
                let path = if explicit.is_absolute() {
                    explicit.clone()
                } else {
                    cwd.join(explicit)
                };
                if !path.is_file() {
                    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
                    return Err(ConfigError::Io(path, err).into());
                }
                Ok(Some(path))
            }
            None => Ok(find_config_file(Path::new(DEFAULT_CONFIG_NAME), cwd)),
        }
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    // ========================================================================
    // path handling
    // ========================================================================

    /// Resolve config-file paths against the config directory.
    fn normalize_paths(&mut self) {
        let root = self.root.clone();
        for path in [
            &mut self.paths.input,
            &mut self.paths.output,
            &mut self.paths.log,
        ] {
            if let Some(p) = path.take() {
                *path = Some(expand_path(&p, &root));
            }
        }
    }

    /// CLI values override config values. CLI paths are relative to cwd.
    fn apply_cli(&mut self, cli: &Cli, cwd: &Path) {
        let from_cwd = |p: &PathBuf| normalize_path(&cwd.join(p));

        if let Some(input) = cli.input() {
            self.paths.input = Some(from_cwd(input));
        }
        if let Some(output) = cli.output() {
            self.paths.output = Some(from_cwd(output));
        }
        if let Some(log) = &cli.log {
            self.paths.log = Some(from_cwd(log));
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Every run needs an input document.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.paths.input {
            None => Err(ConfigError::Validation(format!(
                "no input document given (pass INPUT or set `paths.input` in {DEFAULT_CONFIG_NAME})"
            ))),
            Some(input) if input.is_dir() => Err(ConfigError::Validation(format!(
                "input `{}` is a directory",
                input.display()
            ))),
            Some(_) => Ok(()),
        }
    }

    // ========================================================================
    // accessors
    // ========================================================================

    /// Input document path (present after [`ToolConfig::validate`]).
    pub fn input(&self) -> &Path {
        self.paths.input.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Output PNG path, defaulting to a sibling of the input.
    pub fn output(&self) -> PathBuf {
        self.paths
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(self.input()))
    }

    /// Log file path, defaulting to `flatdim.log` in the config root.
    pub fn log_path(&self) -> PathBuf {
        self.paths
            .log
            .clone()
            .unwrap_or_else(|| self.root.join(DEFAULT_LOG_NAME))
    }

    /// Log file path when no config could be loaded: `--log`, else
    /// `flatdim.log` in the cwd.
    pub fn fallback_log_path(cli: &Cli) -> PathBuf {
        cli.log
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_NAME))
    }
}

// ============================================================================
// tests
// ============================================================================
