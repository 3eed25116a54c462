use pond_core::Vector2;
use pond_particles::ParticleEmitter;
use pond_render::Canvas;
use pond_scene::{Behavior, ObjectContext, ObjectCore};

/// A one-shot particle burst that removes itself when the last particle dies
pub struct JuiceBurst {
    emitter: ParticleEmitter,
    amount: usize,
}

impl JuiceBurst {
    pub fn new(emitter: ParticleEmitter, amount: usize) -> Self {
        Self { emitter, amount }
    }
}

impl Behavior for JuiceBurst {
    fn added_to_scene(&mut self, me: &mut ObjectCore, ctx: &mut ObjectContext) {
        let services = &mut *ctx.services;
        self.emitter.position = me.position();
        self.emitter.emit(self.amount, &mut services.particles, &mut services.rng);
    }

    fn update(&mut self, me: &mut ObjectCore, ctx: &mut ObjectContext, dt: f32) {
        let services = &mut *ctx.services;
        self.emitter.update(dt, &mut services.particles, &mut services.rng);
        if self.emitter.active_count() == 0 {
            ctx.destroy(me.id());
        }
    }

    fn on_destroy(&mut self, _me: &mut ObjectCore, ctx: &mut ObjectContext) {
        self.emitter.release(&mut ctx.services.particles);
    }

    fn draw(&self, _me: &ObjectCore, canvas: &mut dyn Canvas, scene_size: Vector2) {
        self.emitter.draw(canvas, scene_size);
    }
}
