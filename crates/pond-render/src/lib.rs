//! Pond Render - 2D drawing for the Pond engine
//!
//! Scenes draw into a [`Canvas`]. The software [`PixelCanvas`] rasterizes
//! sprites into an RGBA buffer; the [`Compositor`] stacks scene canvases into
//! a window-sized frame; the [`Presenter`] uploads that frame to a wgpu
//! surface.

mod canvas;
mod compose;
mod present;
mod sprite;

pub use canvas::{Canvas, DrawCall, DrawParams, PixelCanvas, RecordingCanvas, SubImageRect};
pub use compose::Compositor;
pub use present::{Presenter, RenderError};
pub use sprite::{AnimationCycle, Sprite, SpriteLibrary};

#[cfg(test)]
mod tests {
    #[test]
    fn blit_shader_wgsl_parses() {
        let source = include_str!("blit_shader.wgsl");
        naga::front::wgsl::parse_str(source).expect("blit_shader.wgsl failed to parse");
    }
}
