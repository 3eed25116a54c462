//! Frog - catch the falling fruit with your tongue before it smashes the floor
//!
//! The library holds everything but the process entry point so the game can
//! be driven headless from tests:
//! - `config` - `frog.toml` parsing
//! - `behaviors` - the frog, its tongue, fruit, floor tiles, juice bursts
//! - `scene` - the scene script (menu, spawning, score, game over)
//! - `app` - the winit window loop

pub mod app;
pub mod behaviors;
pub mod config;
pub mod scene;

#[cfg(test)]
mod testing;

use std::path::Path;

use winit::keyboard::KeyCode;

use pond_asset::{preload_images, ImageSource};
use pond_core::{Color, Result};
use pond_render::Compositor;
use pond_runtime::InputState;
use pond_scene::{DisplayMode, Game, Scene, Services};

pub use app::FrogApp;
pub use config::FrogConfig;
pub use scene::FrogScene;

use behaviors::actions;
use config::WindowConfig;

/// Color behind every scene in the composited frame
pub const CLEAR_COLOR: Color = Color::BLACK;

pub fn bind_controls(input: &mut InputState) {
    input.bind_action(actions::LEFT, vec![KeyCode::ArrowLeft, KeyCode::KeyA]);
    input.bind_action(actions::RIGHT, vec![KeyCode::ArrowRight, KeyCode::KeyD]);
    input.bind_action(actions::TONGUE, vec![KeyCode::Space, KeyCode::ArrowUp, KeyCode::KeyW]);
    input.bind_action(actions::START, vec![KeyCode::Space]);
}

/// Preload the image manifest, register animation cycles, and bind controls.
///
/// Fails only when the load policy is `abort` and an image is unreadable.
pub fn prepare_services(
    config: &FrogConfig,
    source: &dyn ImageSource,
    mut services: Services,
) -> Result<Services> {
    let report = preload_images(source, &config.images, config.assets.policy, &mut services.images)?;
    if !report.failed.is_empty() {
        log::warn!("[frog] missing images: {}", report.failed.join(", "));
    }

    for def in &config.animations {
        if let Err(e) = services
            .images
            .add_animation_cycle(&def.image, def.label.clone(), def.cycle())
        {
            log::warn!("[frog] cycle '{}' not registered: {e}", def.label);
        }
    }

    bind_controls(&mut services.input);
    Ok(services)
}

/// Create the running game with the Frog scene loaded as primary
pub fn build_game(config: &FrogConfig, services: Services, script: FrogScene) -> Game {
    let mut game = Game::new(services);
    game.set_viewport(config.window.width as f32, config.window.height as f32);

    let mut scene = Scene::new(
        config.scene.x,
        config.scene.y,
        config.scene.width,
        config.scene.height,
        DisplayMode::Absolute,
    )
    .with_script(script);
    scene.render_background = config.scene.render_background;
    scene.background = config.scene.background;

    game.load_scene(scene);
    game.start();
    game
}

/// Step `frames` fixed frames, then composite the last one and optionally
/// write it out as a PNG
pub fn run_headless(
    game: &mut Game,
    frames: u32,
    step: f64,
    window: &WindowConfig,
    screenshot: Option<&Path>,
) -> Result<Compositor> {
    log::info!("[frog] running {frames} headless frames of {step}s");
    for _ in 0..frames {
        game.tick_with(step);
    }

    let mut compositor = Compositor::new(window.width, window.height, CLEAR_COLOR);
    game.composite(&mut compositor, window.width, window.height);
    if let Some(path) = screenshot {
        compositor.save_png(path)?;
        log::info!("[frog] wrote {}", path.display());
    }
    Ok(compositor)
}
