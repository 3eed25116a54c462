//! Pond Runtime - Game loop infrastructure
//!
//! Provides the building blocks a `Game` drives once per frame:
//! - `FrameClock` / `clamp_delta` - variable-step clock with a capped delta
//! - `InputState` - polled keyboard and mouse state with single-press semantics
//! - `Signal` - typed listener list for game events
//! - `CookieStore` - small expiring key-value store persisted as TOML
//! - `AudioOutput` - the seam between gameplay and a sound backend

mod audio;
mod clock;
mod input;
mod persist;
mod signal;

pub use audio::{AudioOutput, SilentAudio};
pub use clock::{clamp_delta, FrameClock, MAX_DELTA};
pub use input::{InputState, MouseButton, MouseButtons};
pub use persist::{CookieStore, DEFAULT_EXPIRE_DAYS};
pub use signal::{ListenerId, Signal};
