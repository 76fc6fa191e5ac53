//! Unified error types for the TankMon firmware.
//!
//! Numeric and parse degeneracies never reach this module: the sampler and
//! codec absorb them as `unknown` sentinels.  What remains are link
//! failures ([`CommsError`], reported per tick and never fatal) and start-up
//! failures ([`Error`], surfaced once from `main`).

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible start-up operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral or transport initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

/// Transient link failures.  A tick that hits one of these still completes;
/// the reading is dropped, not retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// The peer (or the radio module) did not acknowledge within the timeout.
    NotAcknowledged,
    /// No peer is connected / the link is closed.
    LinkDown,
    /// The encoded line does not fit the fixed line buffer.
    LineTooLong,
    /// Low-level write failure reported by the driver.
    Io,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAcknowledged => write!(f, "not acknowledged within timeout"),
            Self::LinkDown => write!(f, "link down"),
            Self::LineTooLong => write!(f, "line exceeds buffer"),
            Self::Io => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for CommsError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from loading or validating [`MonitorConfig`](crate::config::MonitorConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The config source could not be read.
    Unreadable,
    /// The config source is not valid JSON for `MonitorConfig`.
    Malformed,
    /// A field failed range validation.  Names the field and the rule.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable => write!(f, "config unreadable"),
            Self::Malformed => write!(f, "config malformed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Unreadable => Self::Config("unreadable"),
            ConfigError::Malformed => Self::Config("malformed"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
