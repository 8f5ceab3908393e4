//! # moodtag common library
//!
//! Shared code for the moodtag crates:
//! - Error type
//! - TOML bootstrap configuration and config file discovery
//! - Input folder resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
