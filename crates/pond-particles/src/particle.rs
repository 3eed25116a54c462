//! Per-particle simulation state

use pond_core::Vector2;

use crate::curves::{fade_in_alpha, fade_out_alpha, lerp_f32};

/// Sign used for friction: zero velocity feels no friction
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Particle {
    pub position: Vector2,
    pub velocity: Vector2,
    pub acceleration: Vector2,
    /// Per-axis deceleration opposing the velocity
    pub friction: Vector2,
    /// Degrees
    pub rotation: f32,
    pub angular_velocity: f32,
    pub angular_acceleration: f32,
    pub angular_friction: f32,
    pub start_size: Vector2,
    pub end_size: Vector2,
    /// Seconds left to live
    pub lifetime: f32,
    pub lifetime_start: f32,
    /// Seconds of fade-in remaining
    pub fade_in: f32,
    pub fade_in_start: f32,
    pub fade_out: f32,
    pub sub_image: u32,
    /// Seconds per sprite frame; 0 disables frame animation
    pub animation_speed: f32,
    pub animation_timer: f32,
}

impl Particle {
    /// Integrate one step. `sub_images` is the frame count of the sprite used.
    pub fn update(&mut self, dt: f32, sub_images: u32) {
        self.position += self.velocity * dt;
        self.velocity += self.acceleration * dt;

        self.velocity.x += self.friction.x * dt * -sign(self.velocity.x);
        self.velocity.y += self.friction.y * dt * -sign(self.velocity.y);

        self.rotation += self.angular_velocity * dt;
        self.angular_velocity += self.angular_acceleration * dt;
        self.angular_velocity += self.angular_friction * dt * -sign(self.angular_velocity);

        self.lifetime -= dt;

        if self.fade_in > 0.0 {
            self.fade_in -= dt;
        }

        if self.animation_speed > 0.0 {
            self.animation_timer -= dt;
            if self.animation_timer <= 0.0 {
                self.animation_timer = self.animation_speed;
                self.sub_image = (self.sub_image + 1) % sub_images.max(1);
            }
        }
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0.0
    }

    /// Combined fade-in/fade-out opacity in `[0, 1]`
    pub fn alpha(&self) -> f32 {
        let fade_in = fade_in_alpha(self.fade_in, self.fade_in_start);
        let fade_out = fade_out_alpha(self.lifetime, self.fade_out);
        fade_in.min(fade_out).clamp(0.0, 1.0)
    }

    /// Size interpolated from end size (at death) to start size (at birth)
    pub fn size(&self) -> Vector2 {
        let t = if self.lifetime_start > 0.0 {
            (self.lifetime / self.lifetime_start).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Vector2::new(
            lerp_f32(self.end_size.x, self.start_size.x, t),
            lerp_f32(self.end_size.y, self.start_size.y, t),
        )
    }
}
