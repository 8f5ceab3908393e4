//! Shared test utilities for moodtag integration tests

#![allow(dead_code)]

pub mod audio_generator;
pub mod flac_fixture;
pub mod log_capture;
pub mod mocks;

pub use audio_generator::{generate_click_wav, ClickTrack};
pub use flac_fixture::write_minimal_flac;
pub use log_capture::LogCapture;
pub use mocks::{MemoryTags, StubExtractor};
