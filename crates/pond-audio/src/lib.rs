//! Pond Audio - sound effects through Kira
//!
//! [`GameAudio`] loads a fixed set of named sounds at startup and plays them
//! on demand. It implements [`pond_runtime::AudioOutput`] so gameplay code
//! never touches Kira directly.

pub mod engine;

pub use engine::{GameAudio, SoundDescriptor};
