//! Per-object placement and motion

use pond_core::Vector2;

/// Position, scale, and rotation of a game object, plus its velocities.
///
/// Rotation is in degrees. The object's size is not stored here; it is
/// `scale` times the sprite cell size (see [`crate::ObjectCore::size`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector2,
    pub scale: Vector2,
    pub rotation: f32,
    pub velocity: Vector2,
    pub angular_velocity: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector2::ZERO,
            scale: Vector2::ONE,
            rotation: 0.0,
            velocity: Vector2::ZERO,
            angular_velocity: 0.0,
        }
    }
}

impl Transform {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vector2::new(x, y),
            ..Default::default()
        }
    }

    /// Integrate velocity and angular velocity over `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.position += self.velocity.stretch(dt);
        self.rotation += self.angular_velocity * dt;
    }

    pub fn point_towards(&mut self, point: Vector2) {
        self.rotation = (point - self.position).to_angle();
    }

    pub fn left(&self) -> Vector2 {
        self.direction(0.0)
    }

    pub fn right(&self) -> Vector2 {
        self.direction(180.0)
    }

    pub fn forward(&self) -> Vector2 {
        self.direction(90.0)
    }

    pub fn back(&self) -> Vector2 {
        self.direction(270.0)
    }

    fn direction(&self, offset: f32) -> Vector2 {
        let radians = (self.rotation + offset).to_radians();
        Vector2::new(-radians.cos(), -radians.sin())
    }
}
