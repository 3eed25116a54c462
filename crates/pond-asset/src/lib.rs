//! Pond Asset - image manifest and preloading
//!
//! Images are listed as [`ImageDescriptor`]s (usually `[[images]]` in a game
//! config), decoded concurrently through an [`ImageSource`], and collected
//! into a [`pond_render::SpriteLibrary`] once every decode has finished.

mod preload;
mod source;
mod types;

pub use preload::{checker_placeholder, preload_images, PreloadReport};
pub use source::{FileImageSource, ImageSource, MemoryImageSource};
pub use types::{ImageDescriptor, LoadPolicy};
