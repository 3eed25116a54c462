use pond_scene::{Behavior, ObjectContext, ObjectCore, SceneEvent};

use super::FRUIT_MISSED;

/// Falling fruit. The scene pools these; a pooled fruit has its collider off.
pub struct Fruit;

impl Behavior for Fruit {
    fn update(&mut self, me: &mut ObjectCore, ctx: &mut ObjectContext, _dt: f32) {
        if !me.collider.enabled {
            return;
        }
        let top = me.position().y - me.size().y * 0.5;
        if top > ctx.scene().size.y {
            ctx.emit(SceneEvent::new(FRUIT_MISSED, me.id()));
        }
    }
}
