use clap::{CommandFactory, Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{KeystatsError, Result};

/// Where the key logger moves finished log files.
pub const DEFAULT_STORE_DIR: &str = "/var/opt/keystats/previous";
/// The log file the key logger is currently writing.
pub const DEFAULT_CURRENT_FILE: &str = "/var/opt/keystats/keys";
/// Entries listed per ranked section (modifiers are always listed in full).
pub const DEFAULT_TOP: u32 = 10;

// ── ErrorPolicy ────────────────────────────────────────────────────────────────

/// What to do when a log file cannot be read or a line cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop the run at the first unreadable file or malformed line.
    #[default]
    Abort,
    /// Log the problem, skip the file or line, and keep going.
    Skip,
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Ranked key-press statistics from key logger output
#[derive(Parser, Debug, Clone)]
#[command(
    name = "keystats",
    about = "Ranked key-press statistics from key logger output",
    version
)]
pub struct Settings {
    /// Directory of finished log files
    #[arg(long, env = "KEYSTATS_STORE_DIR", default_value = DEFAULT_STORE_DIR)]
    pub store_dir: PathBuf,

    /// Log file currently being written
    #[arg(long, env = "KEYSTATS_CURRENT_FILE", default_value = DEFAULT_CURRENT_FILE)]
    pub current_file: PathBuf,

    /// Behaviour on unreadable files or malformed lines
    #[arg(long, value_enum, default_value_t = ErrorPolicy::Abort)]
    pub on_error: ErrorPolicy,

    /// Entries shown per ranked section (1-1000)
    #[arg(long, default_value_t = DEFAULT_TOP, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub top: u32,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Config file path (defaults to ~/.keystats/config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

// ── FileConfig ─────────────────────────────────────────────────────────────────

/// Optional settings read from `~/.keystats/config.json`.
///
/// Every field is optional; anything given on the command line or through
/// the environment takes precedence.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_error: Option<ErrorPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl FileConfig {
    /// Return the default path to the config file.
    /// Uses `~/.keystats/config.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".keystats").join("config.json")
    }

    /// Load the config from an explicit path.
    ///
    /// A missing file yields `Ok(None)`. A file that exists but cannot be
    /// read, parsed, or validated is an error.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(KeystatsError::FileRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config: FileConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(Some(config))
    }

    fn validate(&self) -> Result<()> {
        if let Some(top) = self.top {
            if !(1..=1000).contains(&top) {
                return Err(KeystatsError::Config(format!(
                    "top must be between 1 and 1000, got {top}"
                )));
            }
        }
        if let Some(level) = &self.log_level {
            if !matches!(level.as_str(), "DEBUG" | "INFO" | "WARNING" | "ERROR") {
                return Err(KeystatsError::Config(format!("unknown log_level {level}")));
            }
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments and merge in the config file for every value that
    /// was left at its default.
    pub fn load() -> Result<Self> {
        Self::load_from_args(std::env::args_os().collect())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args(args: Vec<std::ffi::OsString>) -> Result<Self> {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        let config_path = settings
            .config
            .clone()
            .unwrap_or_else(FileConfig::config_path);

        if let Some(file) = FileConfig::load_from(&config_path)? {
            settings.apply_file_config(file, &matches);
        }

        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        Ok(settings)
    }

    /// Fill in values from `file` for every arg that still holds its default.
    ///
    /// NOTE: clap stores the arg id using the *field name* (underscores),
    /// not the long-flag spelling (hyphens).
    fn apply_file_config(&mut self, file: FileConfig, matches: &clap::ArgMatches) {
        if is_defaulted(matches, "store_dir") {
            if let Some(v) = file.store_dir {
                self.store_dir = v;
            }
        }
        if is_defaulted(matches, "current_file") {
            if let Some(v) = file.current_file {
                self.current_file = v;
            }
        }
        if is_defaulted(matches, "on_error") {
            if let Some(v) = file.on_error {
                self.on_error = v;
            }
        }
        if is_defaulted(matches, "top") {
            if let Some(v) = file.top {
                self.top = v;
            }
        }
        if is_defaulted(matches, "log_level") {
            if let Some(v) = file.log_level {
                self.log_level = v;
            }
        }
    }
}

// ── Helper: check whether an arg still holds its default ───────────────────────

/// Returns `true` when `name` was neither supplied on the command line nor
/// through its environment variable.
fn is_defaulted(matches: &clap::ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        None | Some(clap::parser::ValueSource::DefaultValue)
    )
}

// ── Tests ──────────────────────────────────────────────────────────────────────
