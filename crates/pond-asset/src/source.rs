//! Where image bytes come from

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use pond_core::{PondError, Result};

use crate::types::ImageDescriptor;

/// Decodes the bitmap for a manifest entry. Called from worker threads.
pub trait ImageSource: Sync {
    fn load(&self, descriptor: &ImageDescriptor) -> Result<RgbaImage>;
}

/// Decodes PNG/JPEG files relative to an asset root
#[derive(Debug, Clone)]
pub struct FileImageSource {
    root: PathBuf,
}

impl FileImageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ImageSource for FileImageSource {
    fn load(&self, descriptor: &ImageDescriptor) -> Result<RgbaImage> {
        let path = self.root.join(&descriptor.path);
        let img = image::open(&path).map_err(|e| PondError::ImageDecodeError {
            name: descriptor.name.clone(),
            reason: format!("{}: {e}", path.display()),
        })?;
        Ok(img.to_rgba8())
    }
}

/// Serves pre-built bitmaps keyed by manifest path
#[derive(Debug, Clone, Default)]
pub struct MemoryImageSource {
    images: HashMap<String, RgbaImage>,
}

impl MemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, image: RgbaImage) {
        self.images.insert(path.into(), image);
    }

    pub fn with(mut self, path: impl Into<String>, image: RgbaImage) -> Self {
        self.insert(path, image);
        self
    }
}

impl ImageSource for MemoryImageSource {
    fn load(&self, descriptor: &ImageDescriptor) -> Result<RgbaImage> {
        self.images
            .get(&descriptor.path)
            .cloned()
            .ok_or_else(|| PondError::ImageDecodeError {
                name: descriptor.name.clone(),
                reason: format!("no image at '{}'", descriptor.path),
            })
    }
}
