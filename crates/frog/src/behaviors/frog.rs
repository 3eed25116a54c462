//! The player frog and its two-part tongue

use std::cell::Cell;
use std::rc::Rc;

use pond_core::{ObjectId, Vector2};
use pond_scene::{Behavior, GameObject, ObjectContext, ObjectCore, SceneEvent};

use super::{actions, FRUIT_EATEN, FRUIT_TAG, TONGUE_TAG};
use crate::config::GameplayConfig;

/// Written by the frog every frame, read by the tongue pieces
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TongueState {
    /// The frog's mouth
    pub origin: Vector2,
    /// How far the tongue reaches above the mouth
    pub length: f32,
}

impl TongueState {
    pub fn is_out(&self) -> bool {
        self.length > 0.0
    }

    pub fn tip(&self) -> Vector2 {
        self.origin - Vector2::new(0.0, self.length)
    }
}

pub struct Frog {
    tongue: Rc<Cell<TongueState>>,
    tongue_parts: Vec<ObjectId>,
    speed: f32,
    walk_frame_time: f32,
    tongue_speed: f32,
    tongue_max: f32,
}

impl Frog {
    pub fn new(gameplay: &GameplayConfig) -> Self {
        Self {
            tongue: Rc::new(Cell::new(TongueState::default())),
            tongue_parts: Vec::new(),
            speed: gameplay.frog_speed,
            walk_frame_time: gameplay.walk_frame_time,
            tongue_speed: gameplay.tongue_speed,
            tongue_max: gameplay.tongue_max,
        }
    }

    fn mouth(me: &ObjectCore) -> Vector2 {
        me.position() - Vector2::new(0.0, me.size().y * 0.5)
    }
}

impl Behavior for Frog {
    fn added_to_scene(&mut self, me: &mut ObjectCore, ctx: &mut ObjectContext) {
        // Idle until the first step
        if let Err(e) = me.renderer.set_animation("walk", 0, 0.0) {
            log::warn!("[frog] frog will not animate: {e}");
        }

        let mouth = Self::mouth(me);
        self.tongue.set(TongueState {
            origin: mouth,
            length: 0.0,
        });

        // Spawned right after the frog so both update after it and before any fruit
        let mut base = GameObject::new(mouth.x, mouth.y, ctx.services.sprite("frog_tongue_base"))
            .with_tag(TONGUE_TAG)
            .with_behavior(TongueBase {
                tongue: self.tongue.clone(),
            });
        base.core.renderer.visible = false;

        let mut tip = GameObject::new(mouth.x, mouth.y, ctx.services.sprite("frog_tongue_tip"))
            .with_tag(TONGUE_TAG)
            .with_behavior(TongueTip {
                tongue: self.tongue.clone(),
            });
        tip.core.renderer.visible = false;

        self.tongue_parts = vec![ctx.spawn(base), ctx.spawn(tip)];
    }

    fn update(&mut self, me: &mut ObjectCore, ctx: &mut ObjectContext, dt: f32) {
        let input = &ctx.services.input;
        let mut direction = 0.0;
        if input.is_action_held(actions::LEFT) {
            direction -= 1.0;
        }
        if input.is_action_held(actions::RIGHT) {
            direction += 1.0;
        }
        let licking = input.is_action_held(actions::TONGUE);

        me.transform.velocity.x = direction * self.speed;
        if direction != 0.0 {
            me.renderer.mirror_x = direction < 0.0;
            me.renderer.set_animation_speed(self.walk_frame_time);
        } else {
            me.renderer.set_animation_speed(0.0);
        }

        let half_width = me.size().x * 0.5;
        let scene_width = ctx.scene().size.x;
        me.transform.position.x = me
            .transform
            .position
            .x
            .min(scene_width - half_width)
            .max(half_width);

        let mut state = self.tongue.get();
        state.origin = Self::mouth(me);
        state.length = if licking {
            (state.length + self.tongue_speed * dt).min(self.tongue_max)
        } else {
            (state.length - self.tongue_speed * 2.0 * dt).max(0.0)
        };
        self.tongue.set(state);
    }

    fn on_destroy(&mut self, _me: &mut ObjectCore, ctx: &mut ObjectContext) {
        for id in self.tongue_parts.drain(..) {
            ctx.destroy(id);
        }
    }
}

/// The stretched segment between mouth and tip
pub struct TongueBase {
    tongue: Rc<Cell<TongueState>>,
}

impl Behavior for TongueBase {
    fn update(&mut self, me: &mut ObjectCore, _ctx: &mut ObjectContext, _dt: f32) {
        let state = self.tongue.get();
        me.renderer.visible = state.is_out();
        me.transform.position = state.origin - Vector2::new(0.0, state.length * 0.5);

        let cell_height = me.renderer.cell_size().y;
        if cell_height > 0.0 {
            me.transform.scale.y = state.length / cell_height;
        }
    }
}

/// The sticky end. Eats fruit while the tongue is out.
pub struct TongueTip {
    tongue: Rc<Cell<TongueState>>,
}

impl Behavior for TongueTip {
    fn update(&mut self, me: &mut ObjectCore, _ctx: &mut ObjectContext, _dt: f32) {
        let state = self.tongue.get();
        me.transform.position = state.tip();
        me.renderer.visible = state.is_out();
        me.collider.enabled = state.is_out();
    }

    fn on_collision(&mut self, me: &mut ObjectCore, other: &mut ObjectCore, ctx: &mut ObjectContext) {
        if other.tag == FRUIT_TAG && self.tongue.get().is_out() {
            ctx.emit(SceneEvent::new(FRUIT_EATEN, me.id()).with_other(other.id()));
        }
    }
}
