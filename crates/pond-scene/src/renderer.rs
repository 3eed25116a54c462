//! Per-object sprite drawing and animation cycles

use std::sync::Arc;

use pond_core::{PondError, Result, Vector2};
use pond_render::{Canvas, DrawParams, Sprite};

use crate::transform::Transform;

/// Speed used by `set_animation` when the caller passes a negative speed
pub const DEFAULT_ANIMATION_SPEED: f32 = 1.0;

/// The cycle a renderer is currently playing
#[derive(Clone, Debug, PartialEq)]
struct ActiveCycle {
    label: String,
    frames: Vec<u32>,
    default_index: usize,
    current: usize,
    /// Seconds per frame; zero or less freezes on the default frame
    speed: f32,
    looping: bool,
    chain: Option<String>,
    chain_default_index: Option<usize>,
    chain_speed: Option<f32>,
    timer: f32,
    finished: bool,
}

#[derive(Clone, Debug)]
pub struct Renderer {
    sprite: Option<Arc<Sprite>>,
    /// Sub-image drawn next; fractional values are rounded when drawing
    pub sub_image: f32,
    last_valid_sub_image: f32,
    pub alpha: f32,
    pub mirror_x: bool,
    pub mirror_y: bool,
    pub visible: bool,
    pub default_animation_speed: f32,
    cycle: Option<ActiveCycle>,
}

impl Renderer {
    pub fn new(sprite: Option<Arc<Sprite>>) -> Self {
        Self {
            sprite,
            sub_image: 0.0,
            last_valid_sub_image: 0.0,
            alpha: 1.0,
            mirror_x: false,
            mirror_y: false,
            visible: true,
            default_animation_speed: DEFAULT_ANIMATION_SPEED,
            cycle: None,
        }
    }

    pub fn sprite(&self) -> Option<&Arc<Sprite>> {
        self.sprite.as_ref()
    }

    /// Swap the sprite. Any running cycle belongs to the old sheet and is dropped.
    pub fn set_sprite(&mut self, sprite: Option<Arc<Sprite>>) {
        self.sprite = sprite;
        self.cycle = None;
    }

    /// Cell size of the sprite, or zero without one
    pub fn cell_size(&self) -> Vector2 {
        self.sprite
            .as_ref()
            .map(|s| s.cell_size())
            .unwrap_or(Vector2::ZERO)
    }

    /// Start the cycle `label` from `default_index`, advancing one frame every
    /// `speed` seconds. A negative speed uses `default_animation_speed`.
    ///
    /// Requesting the cycle that is already playing only updates its default
    /// index and speed. Unknown labels keep the current cycle.
    pub fn set_animation(&mut self, label: &str, default_index: usize, speed: f32) -> Result<()> {
        let speed = if speed < 0.0 {
            self.default_animation_speed
        } else {
            speed
        };

        if let Some(cycle) = &mut self.cycle {
            if cycle.label == label {
                cycle.default_index = default_index;
                cycle.speed = speed;
                return Ok(());
            }
        }

        let definition = self
            .sprite
            .as_ref()
            .and_then(|s| s.animation_cycle(label))
            .filter(|c| !c.frames.is_empty());
        let Some(definition) = definition else {
            log::warn!("[scene] unknown animation cycle '{label}', keeping current");
            return Err(PondError::AnimationError(format!(
                "no animation cycle named '{label}'"
            )));
        };

        let current = default_index.min(definition.frames.len() - 1);
        let cycle = ActiveCycle {
            label: label.to_string(),
            frames: definition.frames.clone(),
            default_index,
            current,
            speed,
            looping: definition.looping,
            chain: definition.chain.clone(),
            chain_default_index: definition.chain_default_index,
            chain_speed: definition.chain_speed,
            timer: 0.0,
            finished: false,
        };
        self.sub_image = cycle.frames[current] as f32;
        self.cycle = Some(cycle);
        Ok(())
    }

    pub fn set_animation_speed(&mut self, speed: f32) {
        if let Some(cycle) = &mut self.cycle {
            cycle.speed = speed;
        }
    }

    /// Show a fixed sub-image and drop the running cycle
    pub fn set_sub_image(&mut self, sub_image: f32) {
        self.sub_image = sub_image;
        self.cycle = None;
    }

    pub fn current_animation_name(&self) -> Option<&str> {
        self.cycle.as_ref().map(|c| c.label.as_str())
    }

    /// True once a non-looping cycle without a chain has shown its last frame
    /// for a full period
    pub fn is_cycle_finished(&self) -> bool {
        self.cycle.as_ref().is_some_and(|c| c.finished)
    }

    pub fn update(&mut self, dt: f32) {
        let Some(cycle) = &mut self.cycle else {
            return;
        };

        if cycle.speed <= 0.0 {
            let index = cycle.default_index.min(cycle.frames.len() - 1);
            cycle.current = index;
            self.sub_image = cycle.frames[index] as f32;
            return;
        }
        if cycle.finished {
            return;
        }

        cycle.timer += dt;
        if cycle.timer <= cycle.speed {
            return;
        }

        // Whole periods elapsed; a period ending exactly on the timer waits a frame
        let mut periods = (cycle.timer / cycle.speed).floor();
        if periods * cycle.speed >= cycle.timer {
            periods -= 1.0;
        }
        cycle.timer = (cycle.timer - periods * cycle.speed).max(0.0);
        let steps = periods as usize;

        let len = cycle.frames.len();
        let mut chain_to = None;
        if cycle.looping {
            cycle.current = (cycle.current + steps % len) % len;
        } else if cycle.current + steps < len {
            cycle.current += steps;
        } else {
            cycle.current = len - 1;
            match &cycle.chain {
                Some(chain) => {
                    chain_to = Some((
                        chain.clone(),
                        cycle.chain_default_index.unwrap_or(cycle.default_index),
                        cycle.chain_speed.unwrap_or(cycle.speed),
                    ));
                }
                None => cycle.finished = true,
            }
        }
        self.sub_image = cycle.frames[cycle.current] as f32;

        if let Some((label, default_index, speed)) = chain_to {
            if self.set_animation(&label, default_index, speed).is_err() {
                if let Some(cycle) = &mut self.cycle {
                    cycle.finished = true;
                }
            }
        }
    }

    /// Draw at the transform's rounded position shifted by `camera`.
    /// Returns whether anything was drawn.
    pub fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        scene_size: Vector2,
        transform: &Transform,
        camera: Vector2,
    ) -> bool {
        let Some(sprite) = &self.sprite else {
            return false;
        };

        if self.sub_image.is_finite() {
            self.last_valid_sub_image = self.sub_image;
        } else {
            self.sub_image = self.last_valid_sub_image;
        }

        let size = transform.scale.multiply(sprite.cell_size());
        let position = transform.position + camera;
        let params = DrawParams {
            x: position.x.round(),
            y: position.y.round(),
            width: size.x,
            height: size.y,
            rotation: transform.rotation,
            mirror_x: self.mirror_x,
            mirror_y: self.mirror_y,
            alpha: self.alpha,
        };
        sprite.draw(canvas, scene_size, &params, self.sub_image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use pond_render::{AnimationCycle, RecordingCanvas};

    fn frog_sheet() -> Arc<Sprite> {
        let mut sprite = Sprite::new(Arc::new(RgbaImage::new(64, 16)), 4, 4);
        sprite.add_animation_cycle("walk", AnimationCycle::looping(vec![0, 1, 2, 3]));
        sprite.add_animation_cycle("once", AnimationCycle::once(vec![0, 1, 2]).chained("idle"));
        sprite.add_animation_cycle("idle", AnimationCycle::looping(vec![3]));
        sprite.add_animation_cycle("end", AnimationCycle::once(vec![1, 2]));
        Arc::new(sprite)
    }

    #[test]
    fn several_frames_advance_in_one_update() {
        let mut r = Renderer::new(Some(frog_sheet()));
        r.set_animation("walk", 1, 0.1).unwrap();
        r.update(0.35);
        // (1 + 3) mod 4
        assert_eq!(r.sub_image, 0.0);
    }

    #[test]
    fn looping_cycle_wraps() {
        let mut r = Renderer::new(Some(frog_sheet()));
        r.set_animation("walk", 0, 0.1).unwrap();
        for _ in 0..5 {
            r.update(0.101);
        }
        assert_eq!(r.sub_image, 1.0);
    }

    #[test]
    fn tiny_speed_advances_in_one_step() {
        let mut r = Renderer::new(Some(frog_sheet()));
        r.set_animation("walk", 0, 1e-9).unwrap();
        r.update(0.1);
        assert!((0.0..4.0).contains(&r.sub_image));
        assert_eq!(r.current_animation_name(), Some("walk"));

        r.set_animation("end", 0, 1e-9).unwrap();
        r.update(0.1);
        assert!(r.is_cycle_finished());
        assert_eq!(r.sub_image, 2.0);
    }

    #[test]
    fn long_frame_wraps_many_times() {
        let mut r = Renderer::new(Some(frog_sheet()));
        r.set_animation("walk", 0, 0.1).unwrap();
        // 41 periods
        r.update(4.15);
        assert_eq!(r.sub_image, 1.0);
    }

    #[test]
    fn zero_speed_freezes_on_default() {
        let mut r = Renderer::new(Some(frog_sheet()));
        r.set_animation("walk", 2, 0.0).unwrap();
        r.update(5.0);
        assert_eq!(r.sub_image, 2.0);
    }

    #[test]
    fn negative_speed_uses_default_speed() {
        let mut r = Renderer::new(Some(frog_sheet()));
        r.default_animation_speed = 0.5;
        r.set_animation("walk", 0, -1.0).unwrap();
        r.update(0.4);
        assert_eq!(r.sub_image, 0.0);
        r.update(0.2);
        assert_eq!(r.sub_image, 1.0);
    }

    #[test]
    fn same_label_only_updates_settings() {
        let mut r = Renderer::new(Some(frog_sheet()));
        r.set_animation("walk", 0, 0.1).unwrap();
        r.update(0.25);
        assert_eq!(r.sub_image, 2.0);
        r.set_animation("walk", 0, 0.2).unwrap();
        assert_eq!(r.sub_image, 2.0);
        r.update(0.1);
        assert_eq!(r.sub_image, 2.0);
        r.update(0.1);
        assert_eq!(r.sub_image, 3.0);
    }

    #[test]
    fn non_looping_chains_with_fallbacks() {
        let mut r = Renderer::new(Some(frog_sheet()));
        r.set_animation("once", 0, 0.1).unwrap();
        r.update(0.25);
        assert_eq!(r.sub_image, 2.0);
        assert_eq!(r.current_animation_name(), Some("once"));
        r.update(0.1);
        assert_eq!(r.current_animation_name(), Some("idle"));
        assert_eq!(r.sub_image, 3.0);
    }

    #[test]
    fn non_looping_without_chain_finishes() {
        let mut r = Renderer::new(Some(frog_sheet()));
        r.set_animation("end", 0, 0.1).unwrap();
        r.update(0.15);
        assert_eq!(r.sub_image, 2.0);
        assert!(!r.is_cycle_finished());
        r.update(0.1);
        assert!(r.is_cycle_finished());
        assert_eq!(r.sub_image, 2.0);
    }

    #[test]
    fn unknown_label_keeps_current_cycle() {
        let mut r = Renderer::new(Some(frog_sheet()));
        r.set_animation("walk", 0, 0.1).unwrap();
        assert!(r.set_animation("jump", 0, 0.1).is_err());
        assert_eq!(r.current_animation_name(), Some("walk"));
    }

    #[test]
    fn set_sub_image_discards_cycle() {
        let mut r = Renderer::new(Some(frog_sheet()));
        r.set_animation("walk", 0, 0.1).unwrap();
        r.set_sub_image(3.0);
        assert_eq!(r.current_animation_name(), None);
        r.update(1.0);
        assert_eq!(r.sub_image, 3.0);
    }

    #[test]
    fn draw_rounds_position_and_recovers_from_nan() {
        let mut r = Renderer::new(Some(frog_sheet()));
        r.set_sub_image(2.0);
        let mut canvas = RecordingCanvas::new();
        let mut t = Transform::at(10.4, 20.6);
        t.scale = Vector2::new(2.0, 1.0);
        assert!(r.draw(&mut canvas, Vector2::new(100.0, 100.0), &t, Vector2::new(5.0, 0.0)));

        r.sub_image = f32::NAN;
        r.draw(&mut canvas, Vector2::new(100.0, 100.0), &t, Vector2::ZERO);
        assert_eq!(r.sub_image, 2.0);

        let first = &canvas.draws[0];
        assert_eq!((first.params.x, first.params.y), (15.0, 21.0));
        assert_eq!((first.params.width, first.params.height), (32.0, 16.0));
        assert_eq!(canvas.draws[1].src, canvas.draws[0].src);
    }
}
