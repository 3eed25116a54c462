//! Sprite sheets and their named animation cycles

use std::collections::HashMap;
use std::sync::Arc;

use image::RgbaImage;

use pond_core::{PondError, Result, Vector2};

use crate::canvas::{Canvas, DrawParams, SubImageRect};

/// A named frame sequence on a sprite sheet
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationCycle {
    /// Sub-image indices, played in order
    pub frames: Vec<u32>,
    pub looping: bool,
    /// Cycle to switch to when a non-looping cycle ends
    pub chain: Option<String>,
    /// Start position within the chained cycle; defaults to this cycle's default
    pub chain_default_index: Option<usize>,
    /// Speed of the chained cycle; defaults to this cycle's speed
    pub chain_speed: Option<f32>,
}

impl AnimationCycle {
    pub fn looping(frames: Vec<u32>) -> Self {
        Self {
            frames,
            looping: true,
            chain: None,
            chain_default_index: None,
            chain_speed: None,
        }
    }

    pub fn once(frames: Vec<u32>) -> Self {
        Self {
            looping: false,
            ..Self::looping(frames)
        }
    }

    pub fn chained(mut self, next: impl Into<String>) -> Self {
        self.chain = Some(next.into());
        self
    }
}

/// A bitmap divided into a grid of equally sized sub-images
#[derive(Clone, Debug)]
pub struct Sprite {
    bitmap: Arc<RgbaImage>,
    sub_images: u32,
    per_row: u32,
    cycles: HashMap<String, AnimationCycle>,
}

impl Sprite {
    /// Zero counts are treated as 1.
    pub fn new(bitmap: Arc<RgbaImage>, sub_images: u32, per_row: u32) -> Self {
        Self {
            bitmap,
            sub_images: sub_images.max(1),
            per_row: per_row.max(1),
            cycles: HashMap::new(),
        }
    }

    /// A sheet holding a single image
    pub fn single(bitmap: Arc<RgbaImage>) -> Self {
        Self::new(bitmap, 1, 1)
    }

    pub fn bitmap(&self) -> &RgbaImage {
        &self.bitmap
    }

    pub fn sub_images(&self) -> u32 {
        self.sub_images
    }

    pub fn per_row(&self) -> u32 {
        self.per_row
    }

    fn rows(&self) -> u32 {
        self.sub_images.div_ceil(self.per_row)
    }

    /// Width of one cell
    pub fn width(&self) -> f32 {
        self.bitmap.width() as f32 / self.per_row as f32
    }

    /// Height of one cell
    pub fn height(&self) -> f32 {
        self.bitmap.height() as f32 / self.rows() as f32
    }

    pub fn cell_size(&self) -> Vector2 {
        Vector2::new(self.width(), self.height())
    }

    pub fn add_animation_cycle(&mut self, label: impl Into<String>, cycle: AnimationCycle) {
        self.cycles.insert(label.into(), cycle);
    }

    pub fn animation_cycle(&self, label: &str) -> Option<&AnimationCycle> {
        self.cycles.get(label)
    }

    /// Source rectangle for a sub-image. The index is rounded and wraps.
    pub fn sub_image_rect(&self, index: f32) -> SubImageRect {
        let rounded = if index.is_finite() { index.round() as i64 } else { 0 };
        let i = rounded.rem_euclid(self.sub_images as i64) as u32;
        let column = i % self.per_row;
        let row = i / self.per_row;
        let sw = self.width();
        let sh = self.height();
        SubImageRect {
            sx: sw * column as f32,
            sy: sh * row as f32,
            sw,
            sh,
        }
    }

    /// True when a draw centered at `params.x/y` lies entirely outside the scene
    /// by more than the drawn diagonal.
    pub fn is_culled(scene_size: Vector2, params: &DrawParams) -> bool {
        let diagonal = (params.width * params.width + params.height * params.height).sqrt();
        params.x < -diagonal
            || params.y < -diagonal
            || params.x > scene_size.x + diagonal
            || params.y > scene_size.y + diagonal
    }

    /// Draw one sub-image unless it is culled. Returns whether it was drawn.
    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        scene_size: Vector2,
        params: &DrawParams,
        sub_image: f32,
    ) -> bool {
        if Self::is_culled(scene_size, params) {
            return false;
        }
        canvas.draw_image(&self.bitmap, self.sub_image_rect(sub_image), params);
        true
    }
}

/// Loaded sprites by name
#[derive(Default)]
pub struct SpriteLibrary {
    sprites: HashMap<String, Arc<Sprite>>,
}

impl SpriteLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sprite, returning the one it replaced
    pub fn insert(&mut self, name: impl Into<String>, sprite: Sprite) -> Option<Arc<Sprite>> {
        self.sprites.insert(name.into(), Arc::new(sprite))
    }

    pub fn get(&self, name: &str) -> Option<Arc<Sprite>> {
        self.sprites.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sprites.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sprites.keys().map(|k| k.as_str())
    }

    /// Define a cycle on a loaded sprite. Renderers created earlier keep the
    /// sprite they were given.
    pub fn add_animation_cycle(
        &mut self,
        sprite: &str,
        label: impl Into<String>,
        cycle: AnimationCycle,
    ) -> Result<()> {
        let entry = self
            .sprites
            .get_mut(sprite)
            .ok_or_else(|| PondError::AssetError(format!("no image named '{sprite}'")))?;
        Arc::make_mut(entry).add_animation_cycle(label, cycle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;

    fn sheet(w: u32, h: u32, sub_images: u32, per_row: u32) -> Sprite {
        Sprite::new(Arc::new(RgbaImage::new(w, h)), sub_images, per_row)
    }

    #[test]
    fn cell_size_from_layout() {
        // 15 sub-images at 8 per row need two rows
        let fruit = sheet(128, 32, 15, 8);
        assert_eq!(fruit.width(), 16.0);
        assert_eq!(fruit.height(), 16.0);
    }

    #[test]
    fn zero_layout_treated_as_one() {
        let s = sheet(10, 10, 0, 0);
        assert_eq!(s.sub_images(), 1);
        assert_eq!(s.cell_size(), Vector2::new(10.0, 10.0));
    }

    #[test]
    fn sub_image_rect_wraps_and_rounds() {
        let s = sheet(80, 32, 10, 5);
        let r = s.sub_image_rect(7.0);
        assert_eq!((r.sx, r.sy, r.sw, r.sh), (32.0, 16.0, 16.0, 16.0));
        assert_eq!(s.sub_image_rect(17.0), r);
        assert_eq!(s.sub_image_rect(6.6), r);
        assert_eq!(s.sub_image_rect(-3.0), r);
    }

    #[test]
    fn culling_uses_diagonal_margin() {
        let scene = Vector2::new(100.0, 100.0);
        let at = |x: f32, y: f32| DrawParams {
            x,
            y,
            width: 3.0,
            height: 4.0,
            ..Default::default()
        };
        assert!(!Sprite::is_culled(scene, &at(-5.0, 50.0)));
        assert!(Sprite::is_culled(scene, &at(-5.1, 50.0)));
        assert!(!Sprite::is_culled(scene, &at(50.0, 105.0)));
        assert!(Sprite::is_culled(scene, &at(50.0, 105.1)));
    }

    #[test]
    fn draw_skips_culled() {
        let s = sheet(16, 16, 1, 1);
        let mut canvas = RecordingCanvas::new();
        let params = DrawParams {
            x: 500.0,
            y: 10.0,
            width: 16.0,
            height: 16.0,
            ..Default::default()
        };
        assert!(!s.draw(&mut canvas, Vector2::new(100.0, 100.0), &params, 0.0));
        assert!(canvas.draws.is_empty());
    }

    #[test]
    fn library_cycles_and_overwrite() {
        let mut lib = SpriteLibrary::new();
        assert!(lib.insert("frog", sheet(64, 16, 4, 4)).is_none());
        lib.add_animation_cycle("frog", "walk", AnimationCycle::looping(vec![0, 1, 2, 1]))
            .unwrap();
        assert!(lib.get("frog").unwrap().animation_cycle("walk").is_some());
        assert!(lib.add_animation_cycle("toad", "walk", AnimationCycle::once(vec![0])).is_err());
        assert!(lib.insert("frog", sheet(8, 8, 1, 1)).is_some());
        assert_eq!(lib.len(), 1);
    }
}
