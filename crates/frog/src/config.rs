//! `frog.toml`: window, scene, asset manifest, gameplay tuning, audio, and storage
//!
//! Every section and field is optional. A missing file gives the stock game.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use pond_asset::{ImageDescriptor, LoadPolicy};
use pond_audio::SoundDescriptor;
use pond_core::{Color, PondError, Result};
use pond_particles::EmitterConfig;
use pond_render::AnimationCycle;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrogConfig {
    pub window: WindowConfig,
    pub scene: SceneConfig,
    pub assets: AssetsConfig,
    pub images: Vec<ImageDescriptor>,
    pub animations: Vec<AnimationDef>,
    pub gameplay: GameplayConfig,
    pub audio: AudioConfig,
    pub storage: StorageConfig,
    /// Named emitter tables, e.g. `[particles.juice]`
    pub particles: HashMap<String, toml::value::Table>,
}

impl Default for FrogConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            scene: SceneConfig::default(),
            assets: AssetsConfig::default(),
            images: default_images(),
            animations: default_animations(),
            gameplay: GameplayConfig::default(),
            audio: AudioConfig::default(),
            storage: StorageConfig::default(),
            particles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Frog".to_string(),
            width: 816,
            height: 720,
        }
    }
}

/// Absolute placement of the game scene inside the window
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub render_background: bool,
    pub background: Color,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            x: 200.0,
            y: 200.0,
            width: 416.0,
            height: 320.0,
            render_background: false,
            background: Color::WHITE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory image paths are relative to
    pub root: PathBuf,
    pub policy: LoadPolicy,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("assets"),
            policy: LoadPolicy::Placeholder,
        }
    }
}

/// An animation cycle registered on a loaded image
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnimationDef {
    pub image: String,
    pub label: String,
    pub frames: Vec<u32>,
    #[serde(rename = "loop", default)]
    pub looping: bool,
    #[serde(default)]
    pub chain: Option<String>,
}

impl AnimationDef {
    pub fn new(image: &str, label: &str, frames: Vec<u32>, looping: bool) -> Self {
        Self {
            image: image.to_string(),
            label: label.to_string(),
            frames,
            looping,
            chain: None,
        }
    }

    pub fn cycle(&self) -> AnimationCycle {
        let cycle = if self.looping {
            AnimationCycle::looping(self.frames.clone())
        } else {
            AnimationCycle::once(self.frames.clone())
        };
        match &self.chain {
            Some(next) => cycle.chained(next.clone()),
            None => cycle,
        }
    }
}

/// Spawn rates, difficulty ramp, and movement tuning
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Spawning is possible once the timer drops below this
    pub spawn_rate_min: f32,
    /// The timer restarts from this after every spawn
    pub spawn_rate_max: f32,
    /// Chance per frame to spawn before the timer runs out
    pub spawn_chance: f32,
    /// Falling fruit allowed at once
    pub fruits_max: usize,
    /// `fruits_max` never grows past this
    pub fruits_cap: usize,
    /// `fruits_max` grows by one every this many fruits eaten
    pub fruits_growth_every: usize,
    /// Both spawn rates shrink by this per fruit eaten
    pub spawn_rate_step: f32,
    /// `spawn_rate_max` stops shrinking at or below this
    pub spawn_rate_max_floor: f32,
    /// Game speed added per fruit eaten
    pub speed_step: f32,
    /// Fall speed is `random(fall_min, fall_max) * game_speed * fall_scale` px/s
    pub fall_min: f32,
    pub fall_max: f32,
    pub fall_scale: f32,
    /// Frog walking speed, px/s
    pub frog_speed: f32,
    /// Seconds per frame of the walk cycle
    pub walk_frame_time: f32,
    /// Tongue growth, px/s (it retracts twice as fast)
    pub tongue_speed: f32,
    pub tongue_max: f32,
    /// Particles in one juice burst
    pub juice_particles: usize,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            spawn_rate_min: 1.0,
            spawn_rate_max: 2.0,
            spawn_chance: 0.2,
            fruits_max: 5,
            fruits_cap: 20,
            fruits_growth_every: 5,
            spawn_rate_step: 0.2,
            spawn_rate_max_floor: 0.1,
            speed_step: 0.05,
            fall_min: 10.0,
            fall_max: 20.0,
            fall_scale: 10.0,
            frog_speed: 120.0,
            walk_frame_time: 0.15,
            tongue_speed: 480.0,
            tongue_max: 220.0,
            juice_particles: 12,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub folder: PathBuf,
    pub sounds: Vec<SoundDescriptor>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            folder: PathBuf::from("assets/sounds"),
            sounds: vec![SoundDescriptor {
                name: "munch".to_string(),
                file: "munch.ogg".to_string(),
                volume: 1.0,
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Cookie file; defaults to `<data dir>/frog/cookies.toml`
    pub cookie_file: Option<PathBuf>,
}

impl StorageConfig {
    pub fn cookie_path(&self) -> Option<PathBuf> {
        self.cookie_file
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("frog").join("cookies.toml")))
    }
}

fn default_images() -> Vec<ImageDescriptor> {
    vec![
        ImageDescriptor::new("frog_basic", "images/character/frog/frog_basic.png").sheet(4, 4),
        ImageDescriptor::new("frog_tongue_base", "images/character/frog/frog_tongue_base.png"),
        ImageDescriptor::new("frog_tongue_tip", "images/character/frog/frog_tongue_tip.png"),
        ImageDescriptor::new("tile_floor_brown", "images/tile/tile_floor_brown.png"),
        ImageDescriptor::new("tile_floor_explosion", "images/tile/tile_floor_explosion_anim.png")
            .sheet(10, 5),
        ImageDescriptor::new("fruit", "images/object/fruit.png").sheet(15, 8),
        ImageDescriptor::new("spacebar", "images/spacebar.png"),
        ImageDescriptor::new("label_press", "images/text/press.png"),
        ImageDescriptor::new("label_to_lick", "images/text/to_lick.png"),
    ]
}

fn default_animations() -> Vec<AnimationDef> {
    vec![
        AnimationDef::new("frog_basic", "walk", vec![0, 1, 2, 1], true),
        AnimationDef::new("tile_floor_explosion", "destroy", (0..10).collect(), false),
    ]
}

impl FrogConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| PondError::ConfigError(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            PondError::ConfigError(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Load `path`, or fall back to the built-in game when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("[frog] no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Emitter settings for the juice burst
    pub fn juice_emitter(&self) -> EmitterConfig {
        match self.particles.get("juice") {
            Some(table) => EmitterConfig::from_toml(table),
            None => default_juice(),
        }
    }
}

fn default_juice() -> EmitterConfig {
    EmitterConfig {
        emission_angle: 0.0,
        emission_spread: 360.0,
        start_velocity: 90.0,
        acceleration: pond_core::Vector2::new(0.0, 300.0),
        start_size: pond_core::Vector2::new(8.0, 8.0),
        end_size: pond_core::Vector2::new(2.0, 2.0),
        lifetime_min: 0.4,
        lifetime_max: 0.8,
        fade_out: 0.3,
        ..EmitterConfig::default()
    }
}
