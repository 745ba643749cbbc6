//! Error Types
//!
//! Fallible surfaces are construction-time only: compiling user-authored
//! filter configuration, initializing logging, and loading replay scenarios.
//! The traversal engine itself reports absence through sentinels rather than
//! `Result`; a malformed tree is a host bug, not a recoverable condition.

use thiserror::Error;

/// Errors raised while turning user-facing configuration into runtime state.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A name-filter pattern failed to compile.
    #[error("invalid filter pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A type-filter category is not one of the known categories.
    #[error("unknown filter category `{0}` (expected dom, fragment, hoc or root)")]
    UnknownCategory(String),

    /// A per-module log directive could not be parsed.
    #[error("invalid log directive: {0}")]
    InvalidLogDirective(String),

    /// Log format must be `text` or `json`.
    #[error("invalid log format: {0} (must be 'text' or 'json')")]
    InvalidLogFormat(String),

    /// Installing the global subscriber failed, usually because one is
    /// already set.
    #[error("failed to install logger: {0}")]
    LoggerInstall(String),
}

/// Errors raised while loading or replaying a scenario file.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Two nodes in one pass description claim the same logical id.
    #[error("duplicate logical id {0} in tree description")]
    DuplicateLogicalId(u32),

    /// A timing or reason entry names a logical id absent from the pass tree.
    #[error("timing or reason entry references unknown logical id {0}")]
    UnknownLogicalId(u32),

    /// A scenario must contain at least one pass.
    #[error("scenario contains no passes")]
    Empty,
}
