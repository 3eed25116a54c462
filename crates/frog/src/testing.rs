//! Shared fixtures for unit tests

use std::sync::Arc;

use image::{Rgba, RgbaImage};
use pond_render::Sprite;
use pond_scene::Services;

use crate::config::FrogConfig;

pub const SCENE_W: f32 = 416.0;
pub const SCENE_H: f32 = 320.0;

fn sheet(width: u32, height: u32) -> Arc<RgbaImage> {
    Arc::new(RgbaImage::from_pixel(width, height, Rgba([40, 160, 60, 255])))
}

/// Services holding every Frog image (16px cells) and the stock cycles
pub fn services_with_sheets() -> Services {
    let mut services = Services::new();
    let images = &mut services.images;
    images.insert("frog_basic", Sprite::new(sheet(64, 16), 4, 4));
    images.insert("frog_tongue_base", Sprite::single(sheet(4, 16)));
    images.insert("frog_tongue_tip", Sprite::single(sheet(8, 8)));
    images.insert("tile_floor_brown", Sprite::single(sheet(16, 16)));
    images.insert("tile_floor_explosion", Sprite::new(sheet(80, 32), 10, 5));
    images.insert("fruit", Sprite::new(sheet(128, 32), 15, 8));
    images.insert("spacebar", Sprite::single(sheet(48, 16)));
    images.insert("label_press", Sprite::single(sheet(60, 20)));
    images.insert("label_to_lick", Sprite::single(sheet(84, 20)));

    for def in FrogConfig::default().animations {
        images
            .add_animation_cycle(&def.image, def.label.clone(), def.cycle())
            .unwrap();
    }
    services
}
