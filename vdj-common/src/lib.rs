//! # Virtual DJ Common Library (vdj-common)
//!
//! Shared vocabulary for the mix session engine: core data model,
//! mix-event types and the session-log wire format, error types, engine
//! configuration, and the built-in starter library.

pub mod config;
pub mod error;
pub mod events;
pub mod library;
pub mod types;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use events::{MixEvent, MixEventKind};
pub use types::{GeneratedPlaylist, SoundEffect, Track, TransitionResult};
