//! Drawing surfaces
//!
//! A [`Canvas`] is the per-scene drawing target. [`PixelCanvas`] rasterizes
//! into an RGBA buffer; [`RecordingCanvas`] only records calls, which is what
//! scene-level tests assert against.

use image::{Rgba, RgbaImage};

use pond_core::Color;

/// Source rectangle of one sprite-sheet cell, in bitmap pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubImageRect {
    pub sx: f32,
    pub sy: f32,
    pub sw: f32,
    pub sh: f32,
}

/// Where and how to draw an image. `x`/`y` is the center of the destination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawParams {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Clockwise rotation in degrees
    pub rotation: f32,
    pub mirror_x: bool,
    pub mirror_y: bool,
    pub alpha: f32,
}

impl Default for DrawParams {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            mirror_x: false,
            mirror_y: false,
            alpha: 1.0,
        }
    }
}

pub trait Canvas {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Resize the surface. Contents after a resize are unspecified.
    fn resize(&mut self, width: u32, height: u32);

    /// Reset every pixel to transparent
    fn clear(&mut self);

    fn fill(&mut self, color: Color);

    fn draw_image(&mut self, image: &RgbaImage, src: SubImageRect, params: &DrawParams);

    /// The rasterized contents, if this canvas keeps any
    fn pixels(&self) -> Option<&RgbaImage> {
        None
    }
}

/// Source-over blend of a straight-alpha `src` pixel onto `dst`
pub(crate) fn blend_pixel(dst: &mut Rgba<u8>, src: Rgba<u8>, alpha: f32) {
    let sa = src[3] as f32 / 255.0 * alpha;
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let sc = src[c] as f32;
        let dc = dst[c] as f32;
        dst[c] = ((sc * sa + dc * da * (1.0 - sa)) / out_a).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Software canvas over an RGBA buffer with nearest-neighbor sampling
pub struct PixelCanvas {
    buffer: RgbaImage,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: RgbaImage::new(width, height),
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.buffer
    }
}

impl Canvas for PixelCanvas {
    fn width(&self) -> u32 {
        self.buffer.width()
    }

    fn height(&self) -> u32 {
        self.buffer.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.buffer = RgbaImage::new(width, height);
    }

    fn clear(&mut self) {
        for p in self.buffer.pixels_mut() {
            *p = Rgba([0, 0, 0, 0]);
        }
    }

    fn fill(&mut self, color: Color) {
        let rgba = Rgba(color.to_rgba8());
        for p in self.buffer.pixels_mut() {
            *p = rgba;
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, src: SubImageRect, params: &DrawParams) {
        let alpha = params.alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 || params.width == 0.0 || params.height == 0.0 {
            return;
        }
        if image.width() == 0 || image.height() == 0 {
            return;
        }

        let (sin, cos) = params.rotation.to_radians().sin_cos();
        let w = params.width.abs();
        let h = params.height.abs();
        let reach = (w * w + h * h).sqrt() * 0.5;

        let x0 = (params.x - reach).floor().max(0.0) as u32;
        let y0 = (params.y - reach).floor().max(0.0) as u32;
        let x1 = ((params.x + reach).ceil().max(0.0) as u32).min(self.buffer.width());
        let y1 = ((params.y + reach).ceil().max(0.0) as u32).min(self.buffer.height());

        let max_x = (image.width() - 1) as f32;
        let max_y = (image.height() - 1) as f32;

        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - params.x;
                let dy = py as f32 + 0.5 - params.y;

                // Undo the rotation to land in the sprite's local frame
                let lx = cos * dx + sin * dy;
                let ly = -sin * dx + cos * dy;

                let mut u = lx / w + 0.5;
                let mut v = ly / h + 0.5;
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    continue;
                }
                if params.mirror_x {
                    u = 1.0 - u;
                }
                if params.mirror_y {
                    v = 1.0 - v;
                }

                let sx = (src.sx + u * src.sw).floor().clamp(src.sx, src.sx + src.sw - 1.0);
                let sy = (src.sy + v * src.sh).floor().clamp(src.sy, src.sy + src.sh - 1.0);
                let texel = *image.get_pixel(sx.clamp(0.0, max_x) as u32, sy.clamp(0.0, max_y) as u32);

                blend_pixel(self.buffer.get_pixel_mut(px, py), texel, alpha);
            }
        }
    }

    fn pixels(&self) -> Option<&RgbaImage> {
        Some(&self.buffer)
    }
}

/// One recorded [`Canvas::draw_image`] call
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub image_size: (u32, u32),
    pub src: SubImageRect,
    pub params: DrawParams,
}

/// Canvas that keeps a log of calls instead of pixels
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub width: u32,
    pub height: u32,
    pub resizes: u32,
    pub clears: u32,
    pub fills: Vec<Color>,
    pub draws: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.resizes += 1;
    }

    fn clear(&mut self) {
        self.clears += 1;
    }

    fn fill(&mut self, color: Color) {
        self.fills.push(color);
    }

    fn draw_image(&mut self, image: &RgbaImage, src: SubImageRect, params: &DrawParams) {
        self.draws.push(DrawCall {
            image_size: image.dimensions(),
            src,
            params: *params,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tone() -> RgbaImage {
        // Left half red, right half blue
        RgbaImage::from_fn(4, 2, |x, _| {
            if x < 2 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        })
    }

    fn full(image: &RgbaImage) -> SubImageRect {
        SubImageRect {
            sx: 0.0,
            sy: 0.0,
            sw: image.width() as f32,
            sh: image.height() as f32,
        }
    }

    #[test]
    fn draw_centered() {
        let image = two_tone();
        let mut canvas = PixelCanvas::new(10, 10);
        let params = DrawParams {
            x: 5.0,
            y: 5.0,
            width: 4.0,
            height: 2.0,
            ..Default::default()
        };
        canvas.draw_image(&image, full(&image), &params);

        let px = canvas.pixels().unwrap();
        assert_eq!(px.get_pixel(3, 4), &Rgba([255, 0, 0, 255]));
        assert_eq!(px.get_pixel(6, 5), &Rgba([0, 0, 255, 255]));
        assert_eq!(px.get_pixel(2, 4)[3], 0);
        assert_eq!(px.get_pixel(5, 6)[3], 0);
    }

    #[test]
    fn mirror_x_swaps_halves() {
        let image = two_tone();
        let mut canvas = PixelCanvas::new(10, 10);
        let params = DrawParams {
            x: 5.0,
            y: 5.0,
            width: 4.0,
            height: 2.0,
            mirror_x: true,
            ..Default::default()
        };
        canvas.draw_image(&image, full(&image), &params);

        let px = canvas.pixels().unwrap();
        assert_eq!(px.get_pixel(3, 4), &Rgba([0, 0, 255, 255]));
        assert_eq!(px.get_pixel(6, 5), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn half_turn_matches_double_mirror() {
        let image = two_tone();
        let mut rotated = PixelCanvas::new(10, 10);
        let mut mirrored = PixelCanvas::new(10, 10);
        let base = DrawParams {
            x: 5.0,
            y: 5.0,
            width: 4.0,
            height: 2.0,
            ..Default::default()
        };
        rotated.draw_image(&image, full(&image), &DrawParams { rotation: 180.0, ..base });
        mirrored.draw_image(
            &image,
            full(&image),
            &DrawParams {
                mirror_x: true,
                mirror_y: true,
                ..base
            },
        );
        assert_eq!(rotated.pixels(), mirrored.pixels());
    }

    #[test]
    fn alpha_blends_over_fill() {
        let image = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255]));
        let mut canvas = PixelCanvas::new(1, 1);
        canvas.fill(Color::BLACK);
        let params = DrawParams {
            x: 0.5,
            y: 0.5,
            width: 1.0,
            height: 1.0,
            alpha: 0.5,
            ..Default::default()
        };
        canvas.draw_image(&image, full(&image), &params);
        let p = canvas.pixels().unwrap().get_pixel(0, 0);
        assert_eq!(p[3], 255);
        assert!((p[0] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn offscreen_draw_is_clipped() {
        let image = two_tone();
        let mut canvas = PixelCanvas::new(4, 4);
        let params = DrawParams {
            x: -50.0,
            y: 100.0,
            width: 4.0,
            height: 2.0,
            ..Default::default()
        };
        canvas.draw_image(&image, full(&image), &params);
        assert!(canvas.pixels().unwrap().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn recording_canvas_logs_calls() {
        let image = two_tone();
        let mut canvas = RecordingCanvas::new();
        canvas.resize(8, 8);
        canvas.fill(Color::WHITE);
        canvas.draw_image(&image, full(&image), &DrawParams::default());
        assert_eq!(canvas.resizes, 1);
        assert_eq!(canvas.fills, vec![Color::WHITE]);
        assert_eq!(canvas.draws[0].image_size, (4, 2));
        assert!(canvas.pixels().is_none());
    }
}
