//! Core error type.
//!
//! Sub-crates define their own error enums and either convert into
//! `CoreError` via `From` impls or wrap it as one variant.  Prefer whichever
//! keeps error sites clean.

use thiserror::Error;

/// The top-level error type for `gp-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `gp-core`.
pub type CoreResult<T> = Result<T, CoreError>;
