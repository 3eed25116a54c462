//! Engine-wide service objects shared by every scene

use std::sync::Arc;

use pond_animation::Tweens;
use pond_core::{Rng, Vector2};
use pond_particles::ParticlePool;
use pond_render::{Sprite, SpriteLibrary};
use pond_runtime::{AudioOutput, CookieStore, InputState, SilentAudio};

use crate::collider::CollisionDispatch;

/// Everything gameplay code may reach besides its own scene
pub struct Services {
    pub input: InputState,
    pub images: SpriteLibrary,
    pub audio: Box<dyn AudioOutput>,
    pub particles: ParticlePool,
    pub tweens: Tweens,
    pub rng: Rng,
    pub cookies: CookieStore,
    /// Size that relative scenes without a parent lay out against
    pub viewport: Vector2,
    pub collision_dispatch: CollisionDispatch,
}

impl Default for Services {
    fn default() -> Self {
        Self::new()
    }
}

impl Services {
    /// Silent audio, in-memory cookies, an empty image library, a time-seeded RNG
    pub fn new() -> Self {
        Self {
            input: InputState::new(),
            images: SpriteLibrary::new(),
            audio: Box::new(SilentAudio),
            particles: ParticlePool::new(),
            tweens: Tweens::new(),
            rng: Rng::from_time(),
            cookies: CookieStore::in_memory(),
            viewport: Vector2::new(800.0, 600.0),
            collision_dispatch: CollisionDispatch::default(),
        }
    }

    /// Look up a loaded image, warning when it is missing
    pub fn sprite(&self, name: &str) -> Option<Arc<Sprite>> {
        let sprite = self.images.get(name);
        if sprite.is_none() {
            log::warn!("[scene] image '{name}' is not loaded");
        }
        sprite
    }

    pub fn play_sound(&mut self, name: &str) {
        self.audio.play(name);
    }
}
