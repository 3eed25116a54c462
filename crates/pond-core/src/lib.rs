//! Pond Core - Foundational types for the Pond 2D engine
//!
//! This crate provides the types every other Pond crate depends on:
//! - `Vector2` - 2D vector math in screen space (y grows downward)
//! - `ObjectId`, `SceneId` - Unique identifiers for game objects and scenes
//! - `Color`, `Rect` - Drawing primitives
//! - `Rng` - Small deterministic PRNG shared by gameplay and particles
//! - Error types and Result alias

mod error;
mod id;
mod rand;
mod types;
mod vector;

pub use error::{PondError, Result};
pub use id::{ObjectId, SceneId};
pub use rand::Rng;
pub use types::{Color, Rect};
pub use vector::Vector2;
