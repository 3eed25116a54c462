//! Manifest types

use serde::{Deserialize, Serialize};

/// One entry of the image manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub name: String,
    pub path: String,
    /// Number of cells in the sheet
    #[serde(default = "one")]
    pub sub_images: u32,
    /// Cells per row in the sheet
    #[serde(default = "one")]
    pub per_row: u32,
}

fn one() -> u32 {
    1
}

impl ImageDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            sub_images: 1,
            per_row: 1,
        }
    }

    pub fn sheet(mut self, sub_images: u32, per_row: u32) -> Self {
        self.sub_images = sub_images;
        self.per_row = per_row;
        self
    }
}

/// What preloading does with images that failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPolicy {
    /// Fail the whole preload
    Abort,
    /// Leave failed images out of the library
    Skip,
    /// Substitute a generated checker sheet with the requested layout
    #[default]
    Placeholder,
}
