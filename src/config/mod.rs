//! Configuration management

use crate::logging::DEFAULT_LOG_FILE;
use crate::types::{IoResultExt, SyncError};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Seconds between cycles when neither the CLI nor a config file sets it
pub const DEFAULT_INTERVAL_SECS: f64 = 1.0;

/// Command-line arguments
#[derive(Debug, Clone, Parser)]
#[command(
    name = "treesync",
    version,
    about = "Keep a replica directory identical to a source directory"
)]
pub struct Cli {
    /// Source folder path
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Replica folder path
    #[arg(short, long)]
    pub replica: Option<PathBuf>,

    /// Log file path (appended to). Defaults to ./log_file, truncated on start.
    #[arg(short, long, alias = "log_file")]
    pub log_file: Option<PathBuf>,

    /// Synchronization interval in seconds
    #[arg(short, long, allow_negative_numbers = true)]
    pub interval: Option<f64>,

    /// TOML file providing defaults for the options above
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run a single cycle and exit with its status
    #[arg(long)]
    pub once: bool,

    /// Stop after this many cycles
    #[arg(long)]
    pub max_cycles: Option<u64>,

    /// Debug-level console and file output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Options read from a `--config` TOML file
///
/// ```toml
/// source = "/data/photos"
/// replica = "/mnt/backup/photos"
/// interval = 30.0
/// log_file = "/var/log/treesync.log"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub source: Option<PathBuf>,
    pub replica: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub interval: Option<f64>,
    pub max_cycles: Option<u64>,
}

impl FileConfig {
    /// Read and parse a TOML config file
    pub fn load(path: &Path) -> Result<Self, SyncError> {
        let text = fs::read_to_string(path).at(path)?;
        Self::parse(&text).map_err(|e| match e {
            SyncError::Config(msg) => {
                SyncError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse TOML text
    pub fn parse(text: &str) -> Result<Self, SyncError> {
        toml::from_str(text).map_err(|e| SyncError::Config(format!("Invalid config file: {e}")))
    }
}

/// Validated runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Source directory (absolute)
    pub source: PathBuf,

    /// Replica directory (absolute)
    pub replica: PathBuf,

    /// Pause between the end of one cycle and the start of the next
    pub interval: Duration,

    /// Explicit log file; `None` means [`DEFAULT_LOG_FILE`]
    pub log_file: Option<PathBuf>,

    /// Run one cycle, report its error through the exit status
    pub once: bool,

    /// Upper bound on cycles (`None` = run until terminated)
    pub max_cycles: Option<u64>,

    /// Debug-level logging
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            replica: PathBuf::new(),
            interval: Duration::from_secs_f64(DEFAULT_INTERVAL_SECS),
            log_file: None,
            once: false,
            max_cycles: None,
            verbose: false,
        }
    }
}

impl Config {
    /// Validate configuration
    ///
    /// Both roots must be existing directories, distinct, and neither may
    /// contain the other (mirroring into yourself never converges). An
    /// explicit log file must live in an existing directory.
    pub fn validate(&self) -> Result<(), SyncError> {
        require_directory(&self.source, "Source")?;
        require_directory(&self.replica, "Replica")?;

        let source = fs::canonicalize(&self.source).at(&self.source)?;
        let replica = fs::canonicalize(&self.replica).at(&self.replica)?;

        if source == replica {
            return Err(SyncError::Config(
                "Source and replica cannot be the same".to_string(),
            ));
        }

        if replica.starts_with(&source) || source.starts_with(&replica) {
            return Err(SyncError::Config(format!(
                "Source {:?} and replica {:?} must not be nested inside each other",
                source, replica
            )));
        }

        if let Some(log_file) = &self.log_file {
            let parent = match log_file.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            if !parent.is_dir() {
                return Err(SyncError::Config(format!(
                    "Log file directory does not exist: {:?}",
                    parent
                )));
            }
        }

        Ok(())
    }

    /// Log file to open, and whether to append to it
    pub fn log_target(&self) -> (PathBuf, bool) {
        match &self.log_file {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from(DEFAULT_LOG_FILE), false),
        }
    }
}

impl TryFrom<Cli> for Config {
    type Error = SyncError;

    /// Merge CLI arguments over the optional config file, validate, and
    /// resolve both roots to absolute paths
    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let source = cli
            .source
            .or(file.source)
            .ok_or_else(|| SyncError::Config("Missing source folder (--source)".to_string()))?;
        let replica = cli
            .replica
            .or(file.replica)
            .ok_or_else(|| SyncError::Config("Missing replica folder (--replica)".to_string()))?;

        let interval = parse_interval(cli.interval.or(file.interval).unwrap_or(DEFAULT_INTERVAL_SECS))?;

        let config = Config {
            source,
            replica,
            interval,
            log_file: cli.log_file.or(file.log_file),
            once: cli.once,
            max_cycles: cli.max_cycles.or(file.max_cycles),
            verbose: cli.verbose,
        };

        config.validate()?;

        Ok(Config {
            source: fs::canonicalize(&config.source).at(&config.source)?,
            replica: fs::canonicalize(&config.replica).at(&config.replica)?,
            ..config
        })
    }
}

/// Convert an interval in seconds, rejecting negative and non-finite values
pub fn parse_interval(seconds: f64) -> Result<Duration, SyncError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(SyncError::Config(format!(
            "Interval must be a non-negative number of seconds, got {seconds}"
        )));
    }

    Duration::try_from_secs_f64(seconds)
        .map_err(|e| SyncError::Config(format!("Interval {seconds} is out of range: {e}")))
}

fn require_directory(path: &Path, label: &str) -> Result<(), SyncError> {
    if !path.exists() {
        return Err(SyncError::Validation(format!(
            "{label} path does not exist: {:?}",
            path
        )));
    }
    if !path.is_dir() {
        return Err(SyncError::Validation(format!(
            "{label} path is not a directory: {:?}",
            path
        )));
    }
    Ok(())
}
