//! Pond Particles - sprite particle emitters
//!
//! Provides timer-driven emitters whose particles are drawn with a sprite:
//! - Kinematic integration with acceleration and friction
//! - Fade in/out and size-over-lifetime
//! - One free-list [`ParticlePool`] shared by every emitter in a game

pub mod curves;
pub mod emitter;
pub mod particle;
pub mod pool;

pub use emitter::{EmitterConfig, ParticleEmitter};
pub use particle::Particle;
pub use pool::ParticlePool;
