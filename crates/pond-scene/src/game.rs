//! The frame loop over active scenes

use pond_core::{SceneId, Vector2};
use pond_render::Compositor;
use pond_runtime::FrameClock;

use crate::removal::PendingRemoval;
use crate::scene::Scene;
use crate::services::Services;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Idle,
    Running,
}

/// Owns the active scenes and the services they share.
///
/// The host calls [`Game::tick`] (or [`Game::tick_with`]) once per display
/// frame after [`Game::start`].
pub struct Game {
    scenes: Vec<Scene>,
    pending: PendingRemoval,
    pub services: Services,
    clock: FrameClock,
    state: GameState,
}

impl Game {
    pub fn new(services: Services) -> Self {
        Self {
            scenes: Vec::new(),
            pending: PendingRemoval::new(),
            services,
            clock: FrameClock::new(),
            state: GameState::Idle,
        }
    }

    pub fn start(&mut self) {
        if self.state == GameState::Idle {
            log::info!("[scene] game started with {} scene(s)", self.scenes.len());
            self.state = GameState::Running;
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Add a scene to the end of the active list. The first scene loaded
    /// becomes primary.
    pub fn load_scene(&mut self, mut scene: Scene) -> SceneId {
        if self.scenes.is_empty() {
            scene.set_primary(true);
        }
        let id = scene.id();
        self.scenes.push(scene);
        if let Some(scene) = self.scenes.last_mut() {
            scene.load(&mut self.services);
        }
        log::debug!("[scene] loaded {id}");
        id
    }

    /// Load `scene` laid out relative to `parent`
    pub fn load_child_scene(&mut self, parent: SceneId, mut scene: Scene) -> SceneId {
        scene.set_parent(parent);
        self.load_scene(scene)
    }

    /// Make `id` the only primary scene. Unknown ids are ignored.
    pub fn set_primary_scene(&mut self, id: SceneId) {
        if !self.scenes.iter().any(|s| s.id() == id) {
            return;
        }
        for scene in &mut self.scenes {
            scene.set_primary(scene.id() == id);
        }
    }

    pub fn primary_scene(&self) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.is_primary())
    }

    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id() == id)
    }

    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.id() == id)
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Record a live scene for removal at the end of the frame
    pub fn remove_scene(&mut self, id: SceneId) {
        if let Some(index) = self.scenes.iter().position(|s| s.id() == id) {
            if !self.scenes[index].is_destroyed() {
                self.pending.mark(index);
            }
        }
    }

    /// Destroy every object of the scene, clear its canvas, and remove it at
    /// the end of the frame
    pub fn destroy_scene(&mut self, id: SceneId) {
        self.remove_scene(id);
        if let Some(scene) = self.scenes.iter_mut().find(|s| s.id() == id) {
            scene.destroy(&mut self.services);
        }
    }

    /// Tick using the wall clock
    pub fn tick(&mut self) -> f32 {
        if self.state != GameState::Running {
            return 0.0;
        }
        let dt = self.clock.tick() as f32;
        self.step(dt)
    }

    /// Tick with an externally measured frame time. Returns the clamped step.
    pub fn tick_with(&mut self, raw_elapsed: f64) -> f32 {
        if self.state != GameState::Running {
            return 0.0;
        }
        let dt = self.clock.tick_with(raw_elapsed) as f32;
        self.step(dt)
    }

    fn step(&mut self, dt: f32) -> f32 {
        self.services.input.begin_frame();

        for index in 0..self.scenes.len() {
            let parent = self.scenes[index].parent().and_then(|parent_id| {
                self.scenes
                    .iter()
                    .find(|s| s.id() == parent_id)
                    .map(|p| (p.real_position(), p.real_size()))
            });
            let viewport = self.services.viewport;

            let scene = &mut self.scenes[index];
            scene.resolve_layout(parent, viewport);
            scene.update(dt, &mut self.services);
            scene.draw(&self.services);
        }

        let removed = self.pending.sweep(&mut self.scenes, |s| s.is_destroyed());
        for scene in &removed {
            log::debug!("[scene] removed {}", scene.id());
        }

        self.services.tweens.update(dt);
        dt
    }

    /// Stack every live scene's canvas into `compositor` at its screen position
    pub fn composite(&self, compositor: &mut Compositor, width: u32, height: u32) {
        compositor.begin(width, height);
        for scene in &self.scenes {
            if scene.is_destroyed() {
                continue;
            }
            if let Some(pixels) = scene.canvas().pixels() {
                compositor.layer(scene.real_position(), pixels);
            }
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.services.viewport = Vector2::new(width, height);
    }
}
