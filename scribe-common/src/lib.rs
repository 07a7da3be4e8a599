//! Common types shared across the ticket-scribe crates.
//!
//! This crate holds the error taxonomy every layer reports through and the
//! observability bootstrap used by the binary and integration tests. It stays
//! small so the driver, extractor and app crates can all depend on it.
//!
//! # Overview
//!
//! - [`ScribeError`] and [`Result`]: failures a scrape can end with
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use scribe_common::ScribeError;
//!
//! let err = ScribeError::InvalidUrl("ftp://example.com/ticket".into());
//! assert!(err.is_input_error());
//! assert!(err.to_string().contains("http://"));
//! ```
use std::time::Duration;

pub mod observability;

/// Failures surfaced to the caller of a scrape.
///
/// Field-level misses and a total structural mismatch are not errors; the
/// extractor resolves those with defaults and the raw-text fallback.
#[derive(thiserror::Error, Debug)]
pub enum ScribeError {
    /// The ticket URL was rejected before any browser was launched.
    #[error("invalid ticket URL {0:?}: must start with http:// or https://")]
    InvalidUrl(String),

    /// The rendering engine could not be started or connected to.
    #[error("browser launch failed: {0:#}")]
    Launch(#[source] anyhow::Error),

    /// Navigation to the ticket page failed.
    #[error("navigation failed: {0:#}")]
    Navigation(#[source] anyhow::Error),

    /// A fatal step (navigation, stabilization, body read) ran out of time.
    #[error("{step} timed out after {}ms", .after.as_millis())]
    Timeout {
        step: &'static str,
        after: Duration,
    },

    /// A driver (browser, webdriver session) reported an error.
    #[error("Driver error: {0:#}")]
    Driver(#[from] anyhow::Error),
}

impl ScribeError {
    /// True for failures detected before any resource was acquired.
    pub fn is_input_error(&self) -> bool {
        matches!(self, ScribeError::InvalidUrl(_))
    }
}

/// Convenient alias for results that use [`ScribeError`].
pub type Result<T> = std::result::Result<T, ScribeError>;
