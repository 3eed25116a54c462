//! Per-object gameplay for the Frog scene

mod frog;
mod fruit;
mod juice;
mod tile;

pub use frog::{Frog, TongueBase, TongueState, TongueTip};
pub use fruit::Fruit;
pub use juice::JuiceBurst;
pub use tile::FloorTile;

pub const FROG_TAG: &str = "frog";
pub const TONGUE_TAG: &str = "tongue";
pub const FRUIT_TAG: &str = "fruit";
pub const TILE_TAG: &str = "tile";
pub const JUICE_TAG: &str = "juice";

/// The tongue tip touched a falling fruit (`other` is the fruit)
pub const FRUIT_EATEN: &str = "fruit_eaten";
/// A fruit hit a floor tile (`other` is the fruit)
pub const FRUIT_LANDED: &str = "fruit_landed";
/// A fruit fell past the bottom of the scene
pub const FRUIT_MISSED: &str = "fruit_missed";

/// Input action names bound in [`crate::bind_controls`]
pub mod actions {
    pub const LEFT: &str = "left";
    pub const RIGHT: &str = "right";
    pub const TONGUE: &str = "tongue";
    pub const START: &str = "start";
}
