use pond_scene::{Behavior, ObjectContext, ObjectCore, SceneEvent};

use super::{FRUIT_LANDED, FRUIT_TAG};

/// Seconds per frame of the explosion
const EXPLOSION_FRAME_TIME: f32 = 0.05;

/// A floor tile. The first fruit to land on it blows it up.
#[derive(Default)]
pub struct FloorTile {
    exploding: bool,
}

impl FloorTile {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Behavior for FloorTile {
    fn update(&mut self, me: &mut ObjectCore, ctx: &mut ObjectContext, _dt: f32) {
        if self.exploding && me.renderer.is_cycle_finished() {
            ctx.destroy(me.id());
        }
    }

    fn on_collision(&mut self, me: &mut ObjectCore, other: &mut ObjectCore, ctx: &mut ObjectContext) {
        if self.exploding || other.tag != FRUIT_TAG {
            return;
        }
        ctx.emit(SceneEvent::new(FRUIT_LANDED, me.id()).with_other(other.id()));

        self.exploding = true;
        me.collider.enabled = false;
        me.renderer.set_sprite(ctx.services.sprite("tile_floor_explosion"));
        if me.renderer.set_animation("destroy", 0, EXPLOSION_FRAME_TIME).is_err() {
            ctx.destroy(me.id());
        }
    }
}
