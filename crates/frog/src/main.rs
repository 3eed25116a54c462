//! Frog - standalone game binary
//!
//! Usage:
//!   frog [--config frog.toml] [--assets DIR]
//!   frog --headless [--frames N] [--step SECS] [--screenshot out.png]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use winit::event_loop::{ControlFlow, EventLoop};

use frog::{FrogApp, FrogConfig, FrogScene};
use pond_asset::FileImageSource;
use pond_audio::GameAudio;
use pond_runtime::CookieStore;
use pond_scene::{CollisionDispatch, Services};

#[derive(Parser)]
#[command(name = "frog")]
#[command(about = "Frog - catch falling fruit with your tongue")]
struct Args {
    /// Path to the game config
    #[arg(long, default_value = "frog.toml")]
    config: PathBuf,

    /// Asset directory (overrides [assets] root)
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Run without a window or audio
    #[arg(long)]
    headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Seconds per headless frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    step: f64,

    /// Write the last headless frame to a PNG
    #[arg(long)]
    screenshot: Option<PathBuf>,

    /// Report every collision to both objects instead of the earlier one only
    #[arg(long)]
    symmetric_collisions: bool,
}

fn open_cookies(config: &FrogConfig) -> CookieStore {
    let Some(path) = config.storage.cookie_path() else {
        log::warn!("[cookies] no data directory, high scores will not be kept");
        return CookieStore::in_memory();
    };
    match CookieStore::open(&path) {
        Ok(store) => store,
        Err(e) => {
            log::warn!("[cookies] ignoring unreadable {}: {e}", path.display());
            CookieStore::in_memory()
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = FrogConfig::load_or_default(&args.config)
        .with_context(|| format!("Failed to load config {}", args.config.display()))?;
    if let Some(assets) = args.assets {
        config.assets.root = assets;
    }

    let mut services = Services::new();
    services.cookies = open_cookies(&config);
    if config.audio.enabled && !args.headless {
        services.audio = Box::new(GameAudio::init(&config.audio.sounds, &config.audio.folder));
    }
    if args.symmetric_collisions {
        services.collision_dispatch = CollisionDispatch::Symmetric;
    }

    let source = FileImageSource::new(config.assets.root.clone());
    let services =
        frog::prepare_services(&config, &source, services).context("Failed to load images")?;

    let mut script = FrogScene::from_config(&config);
    script
        .score_changed
        .add(|score| log::info!("[frog] score: {score}"));
    let mut game = frog::build_game(&config, services, script);

    if args.headless {
        frog::run_headless(
            &mut game,
            args.frames,
            args.step,
            &config.window,
            args.screenshot.as_deref(),
        )
        .context("Headless run failed")?;
        return Ok(());
    }

    println!("Controls:");
    println!("  Space        - Start / stick out tongue");
    println!("  Left/Right   - Walk (or A/D)");
    println!("  Escape       - Quit");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = FrogApp::new(game, config.window.clone());
    event_loop.run_app(&mut app)?;

    Ok(())
}
