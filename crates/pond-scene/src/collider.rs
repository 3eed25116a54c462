//! Axis-aligned box overlap between objects of one scene

use pond_core::{Rect, Vector2};

/// Which side of an overlapping pair hears about it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CollisionDispatch {
    /// Only the object earlier in the scene list gets `on_collision`
    #[default]
    FirstOnly,
    /// Both objects get `on_collision` in the same pass
    Symmetric,
}

/// Box collider sized from the object's transform and sprite
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Collider {
    /// Disabled colliders neither check nor get checked
    pub enabled: bool,
}

impl Collider {
    pub fn enabled() -> Self {
        Self { enabled: true }
    }
}

/// Full diagonal of a box
pub fn widest_diagonal(size: Vector2) -> f32 {
    size.length()
}

/// Cheap rejection: two boxes whose centers are farther apart than the sum of
/// their diagonals cannot overlap.
pub fn broad_phase_rejects(a_pos: Vector2, a_size: Vector2, b_pos: Vector2, b_size: Vector2) -> bool {
    widest_diagonal(a_size) + widest_diagonal(b_size) < a_pos.distance_to(b_pos)
}

/// Closed overlap test between two center-positioned boxes
pub fn boxes_overlap(a_pos: Vector2, a_size: Vector2, b_pos: Vector2, b_size: Vector2) -> bool {
    Rect::centered(a_pos, a_size).overlaps(&Rect::centered(b_pos, b_size))
}

/// Open containment test of `point` in a center-positioned box
pub fn point_in_box(pos: Vector2, size: Vector2, point: Vector2) -> bool {
    Rect::centered(pos, size).contains_open(point)
}
