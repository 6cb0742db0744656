//! Error types for bannerscan.
//!
//! Uses `thiserror` for ergonomic error definitions. Per-port transport
//! failures never show up here: they are folded into
//! [`ProbeOutcome`](crate::scanner::ProbeOutcome) and absent banners.

use crate::types::{PortError, TargetError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a scan before any probing starts.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid port specification: {0}")]
    InvalidPorts(#[from] PortError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Target(#[from] TargetError),
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),

    #[error("invalid UTC offset: {0:?}")]
    InvalidTimezone(String),
}

/// Errors raised while writing result files.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read answer: {0}")]
    Prompt(String),
}

/// Top-level CLI error.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("invalid port specification: {0}")]
    Port(#[from] PortError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ExportResult<T> = Result<T, ExportError>;
pub type CliResult<T> = Result<T, CliError>;
