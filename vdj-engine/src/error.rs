//! Error types for vdj-engine
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation. Nothing here is fatal to a session: every failure path in
//! the engine falls back to a safe default and the session continues.

use thiserror::Error;

/// Main error type for the mix session engine
#[derive(Error, Debug)]
pub enum Error {
    /// Queue mutation errors (unknown id, bad permutation, locked view)
    #[error("Queue error: {0}")]
    Queue(String),

    /// Invalid state for the requested operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Transition/suggestion provider errors
    #[error("Provider error: {0}")]
    Provider(String),

    /// Audio sink errors (device, sample decode)
    #[error("Audio error: {0}")]
    Audio(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Errors from the common crate
    #[error(transparent)]
    Common(#[from] vdj_common::Error),
}

/// Convenience Result type using the engine Error
pub type Result<T> = std::result::Result<T, Error>;
