//! Error types.
//!
//! None of these carry the password or its full digest.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported immediately for unusable input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("Password is not valid UTF-8 (invalid byte at offset {0})")]
    InvalidUtf8(usize),
}

/// Failure loading a list file or preparing the breach cache directory.
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("List file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read list file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("List file is empty: {0}")]
    EmptyFile(PathBuf),
    #[error("Cache directory unusable {path}: {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A resource that failed to load. Analysis continues with an empty list
/// or, for the breach cache, an in-memory cache.
#[derive(Debug)]
pub struct ResourceWarning {
    pub resource: &'static str,
    pub error: ResourceError,
}

impl std::fmt::Display for ResourceWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} unavailable: {}", self.resource, self.error)
    }
}

/// Breach cache storage failure.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cache entry is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Breach lookup failure. Never escapes the oracle; it becomes an unknown status.
#[derive(Error, Debug)]
pub enum BreachError {
    #[error("Breach service request failed: {0}")]
    Request(String),
    #[error("Breach service returned HTTP {0}")]
    Status(u16),
    #[error("Breach service response is malformed: {0}")]
    Malformed(String),
}

/// Policy construction or loading failure, raised before any password is checked.
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Unknown policy preset: {0}")]
    UnknownPreset(String),
    #[error("Failed to read policy file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid policy file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid rule `{rule}` in policy `{policy}`: {reason}")]
    InvalidRule {
        policy: String,
        rule: &'static str,
        reason: String,
    },
    #[error("Policy name must not be empty")]
    EmptyName,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("Password length must be at least {min} characters")]
    TooShort { min: usize },
    #[error("At least one character type must be enabled")]
    NoCharacterClasses,
    #[error("Count must be between 1 and {max}")]
    InvalidCount { max: usize },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

/// Failure compiling the pattern matchers.
#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("Failed to compile date matcher: {0}")]
    Regex(#[from] regex::Error),
    #[error("Failed to build word matcher: {0}")]
    Automaton(#[from] aho_corasick::BuildError),
}

/// Failure constructing an analyzer.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error(transparent)]
    Detector(#[from] DetectorError),
    #[error("Failed to build breach client: {0}")]
    BreachClient(String),
}
