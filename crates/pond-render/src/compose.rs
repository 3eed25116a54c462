//! Stacks scene canvases into one window-sized frame

use std::path::Path;

use image::{Rgba, RgbaImage};

use pond_core::{Color, PondError, Result, Vector2};

use crate::canvas::blend_pixel;

pub struct Compositor {
    frame: RgbaImage,
    clear_color: Color,
}

impl Compositor {
    pub fn new(width: u32, height: u32, clear_color: Color) -> Self {
        Self {
            frame: RgbaImage::new(width, height),
            clear_color,
        }
    }

    /// Start a new frame of the given size, filled with the clear color
    pub fn begin(&mut self, width: u32, height: u32) {
        if self.frame.dimensions() != (width, height) {
            self.frame = RgbaImage::new(width, height);
        }
        let clear = Rgba(self.clear_color.to_rgba8());
        for p in self.frame.pixels_mut() {
            *p = clear;
        }
    }

    /// Blend a layer over the frame with its top-left corner at `position`
    pub fn layer(&mut self, position: Vector2, pixels: &RgbaImage) {
        let ox = position.x.round() as i64;
        let oy = position.y.round() as i64;
        let (fw, fh) = (self.frame.width() as i64, self.frame.height() as i64);

        for (x, y, p) in pixels.enumerate_pixels() {
            let fx = ox + x as i64;
            let fy = oy + y as i64;
            if fx < 0 || fy < 0 || fx >= fw || fy >= fh {
                continue;
            }
            blend_pixel(self.frame.get_pixel_mut(fx as u32, fy as u32), *p, 1.0);
        }
    }

    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.frame
            .save(path)
            .map_err(|e| PondError::RenderError(format!("failed to write {}: {e}", path.display())))
    }
}
