//! Pond Animation - scalar tweens
//!
//! A [`Tweens`] manager owns every running tween and is stepped once per frame
//! by the game loop. Owners keep the returned [`TweenId`] and read the current
//! value each frame instead of having fields written behind their back.

mod easing;
mod tween;

pub use easing::Easing;
pub use tween::{Repeat, Tween, TweenId, Tweens};
