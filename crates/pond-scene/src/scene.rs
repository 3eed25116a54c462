//! Scenes: an ordered object list drawn onto one canvas

use pond_core::{Color, ObjectId, SceneId, Vector2};
use pond_render::{Canvas, PixelCanvas};

use crate::collider::{broad_phase_rejects, boxes_overlap, CollisionDispatch};
use crate::object::{GameObject, ObjectContext, ObjectCore, SceneCommand, SceneEvent};
use crate::removal::PendingRemoval;
use crate::services::Services;

/// How a scene's `position`/`size` map to its on-screen rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Pixels
    #[default]
    Absolute,
    /// Fractions of the parent scene's rectangle (or the viewport without one)
    RelativeToParent,
}

/// A scene's placement for the current frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneView {
    pub id: SceneId,
    /// On-screen top-left corner
    pub position: Vector2,
    /// On-screen size
    pub size: Vector2,
    pub camera: Vector2,
}

/// Scene-level gameplay logic
#[allow(unused_variables)]
pub trait SceneScript {
    /// Called when the game loads the scene
    fn on_load(&mut self, scene: &mut Scene, services: &mut Services) {}

    /// Called after every object has been updated
    fn update(&mut self, scene: &mut Scene, services: &mut Services, dt: f32) {}

    /// An object emitted `event` during this frame
    fn on_event(&mut self, scene: &mut Scene, services: &mut Services, event: SceneEvent) {}

    /// Overlay drawing after every object
    fn draw(&mut self, canvas: &mut dyn Canvas, view: &SceneView, services: &Services) {}
}

pub struct Scene {
    id: SceneId,
    pub position: Vector2,
    pub size: Vector2,
    real_position: Vector2,
    real_size: Vector2,
    /// Where the canvas was last placed
    placed_at: Option<Vector2>,
    pub camera: Vector2,
    pub display_mode: DisplayMode,
    pub render_background: bool,
    pub background: Color,
    primary: bool,
    destroyed: bool,
    parent: Option<SceneId>,
    objects: Vec<GameObject>,
    pending: PendingRemoval,
    canvas: Box<dyn Canvas>,
    script: Option<Box<dyn SceneScript>>,
    commands: Vec<SceneCommand>,
    events: Vec<SceneEvent>,
}

impl Scene {
    pub fn new(x: f32, y: f32, width: f32, height: f32, display_mode: DisplayMode) -> Self {
        let canvas_w = width.max(0.0).round() as u32;
        let canvas_h = height.max(0.0).round() as u32;
        Self {
            id: SceneId::new(),
            position: Vector2::new(x, y),
            size: Vector2::new(width, height),
            real_position: Vector2::new(x, y),
            real_size: Vector2::new(width, height),
            placed_at: None,
            camera: Vector2::ZERO,
            display_mode,
            render_background: true,
            background: Color::WHITE,
            primary: false,
            destroyed: false,
            parent: None,
            objects: Vec::new(),
            pending: PendingRemoval::new(),
            canvas: Box::new(PixelCanvas::new(canvas_w, canvas_h)),
            script: None,
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn with_canvas(mut self, canvas: Box<dyn Canvas>) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn with_script(mut self, script: impl SceneScript + 'static) -> Self {
        self.script = Some(Box::new(script));
        self
    }

    pub fn id(&self) -> SceneId {
        self.id
    }

    pub fn view(&self) -> SceneView {
        SceneView {
            id: self.id,
            position: self.real_position,
            size: self.real_size,
            camera: self.camera,
        }
    }

    pub fn real_position(&self) -> Vector2 {
        self.real_position
    }

    pub fn real_size(&self) -> Vector2 {
        self.real_size
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub(crate) fn set_primary(&mut self, primary: bool) {
        self.primary = primary;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn parent(&self) -> Option<SceneId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: SceneId) {
        self.parent = Some(parent);
    }

    pub fn canvas(&self) -> &dyn Canvas {
        self.canvas.as_ref()
    }

    pub fn objects(&self) -> impl Iterator<Item = &ObjectCore> {
        self.objects.iter().map(|o| &o.core)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn object(&self, id: ObjectId) -> Option<&ObjectCore> {
        self.objects.iter().find(|o| o.id() == id).map(|o| &o.core)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut ObjectCore> {
        self.objects
            .iter_mut()
            .find(|o| o.id() == id)
            .map(|o| &mut o.core)
    }

    /// Live objects carrying `tag`
    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a ObjectCore> + 'a {
        self.objects
            .iter()
            .filter(move |o| !o.is_destroyed() && o.core.tag == tag)
            .map(|o| &o.core)
    }

    fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id() == id)
    }

    /// Append an object. Returns `None` (dropping the object) on a destroyed scene.
    pub fn add_object(&mut self, object: GameObject, services: &mut Services) -> Option<ObjectId> {
        let id = self.insert_object(object, services);
        self.apply_commands(services);
        id
    }

    fn insert_object(&mut self, object: GameObject, services: &mut Services) -> Option<ObjectId> {
        if self.destroyed {
            return None;
        }
        let id = object.id();
        let view = self.view();
        self.objects.push(object);

        if let Some(object) = self.objects.last_mut() {
            if let Some(behavior) = &mut object.behavior {
                let mut ctx = ObjectContext::new(services, &view, &mut self.commands);
                behavior.added_to_scene(&mut object.core, &mut ctx);
            }
        }
        Some(id)
    }

    /// Record a live object for removal at the end of this frame
    pub fn remove_object(&mut self, id: ObjectId) {
        if let Some(index) = self.index_of(id) {
            if !self.objects[index].is_destroyed() {
                self.pending.mark(index);
            }
        }
    }

    /// Run `on_destroy`, record the removal, and mark the object destroyed
    pub fn destroy_object(&mut self, id: ObjectId, services: &mut Services) {
        if let Some(index) = self.index_of(id) {
            self.destroy_at(index, services);
        }
        self.apply_commands(services);
    }

    /// Destroy every object in the scene
    pub fn destroy_all_objects(&mut self, services: &mut Services) {
        for index in 0..self.objects.len() {
            self.destroy_at(index, services);
        }
        self.apply_commands(services);
    }

    fn destroy_at(&mut self, index: usize, services: &mut Services) {
        if self.objects[index].is_destroyed() {
            return;
        }
        self.pending.mark(index);
        let view = self.view();
        let mut ctx = ObjectContext::new(services, &view, &mut self.commands);
        self.objects[index].destroy(&mut ctx);
    }

    /// Destroy every object, clear the canvas, and mark the scene destroyed.
    /// Returns false if it already was.
    pub(crate) fn destroy(&mut self, services: &mut Services) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroy_all_objects(services);
        self.canvas.clear();
        self.destroyed = true;
        log::debug!("[scene] {} destroyed", self.id);
        true
    }

    fn apply_commands(&mut self, services: &mut Services) {
        while !self.commands.is_empty() {
            for command in std::mem::take(&mut self.commands) {
                match command {
                    SceneCommand::Spawn(object) => {
                        self.insert_object(object, services);
                    }
                    SceneCommand::Destroy(id) => {
                        if let Some(index) = self.index_of(id) {
                            self.destroy_at(index, services);
                        }
                    }
                    SceneCommand::Event(event) => self.events.push(event),
                }
            }
        }
    }

    fn run_script(&mut self, f: impl FnOnce(&mut dyn SceneScript, &mut Scene)) {
        if let Some(mut script) = self.script.take() {
            f(script.as_mut(), self);
            if self.script.is_none() {
                self.script = Some(script);
            }
        }
    }

    fn dispatch_events(&mut self, services: &mut Services) {
        for event in std::mem::take(&mut self.events) {
            if self.script.is_none() {
                log::debug!("[scene] {} dropped event '{}'", self.id, event.name);
                continue;
            }
            self.run_script(|script, scene| script.on_event(scene, services, event));
            self.apply_commands(services);
        }
    }

    pub(crate) fn load(&mut self, services: &mut Services) {
        self.run_script(|script, scene| script.on_load(scene, services));
        self.apply_commands(services);
    }

    /// Compute this frame's screen rectangle. `parent` is the parent scene's
    /// `(position, size)`; without one, relative scenes use the viewport.
    pub fn resolve_layout(&mut self, parent: Option<(Vector2, Vector2)>, viewport: Vector2) {
        match self.display_mode {
            DisplayMode::Absolute => {
                self.real_position = self.position;
                self.real_size = self.size;
            }
            DisplayMode::RelativeToParent => {
                let (parent_position, parent_size) = parent.unwrap_or((Vector2::ZERO, viewport));
                self.real_position = parent_position + self.position.multiply(parent_size);
                self.real_size = parent_size.multiply(self.size);
            }
        }
    }

    /// Update every object in list order, then the script, then sweep removals
    pub fn update(&mut self, dt: f32, services: &mut Services) {
        let view = self.view();

        // Objects spawned during the pass are appended and reached by this loop
        let mut index = 0;
        while index < self.objects.len() {
            self.update_object(index, dt, services, &view);
            self.apply_commands(services);
            index += 1;
        }

        self.dispatch_events(services);
        self.run_script(|script, scene| script.update(scene, services, dt));
        self.apply_commands(services);
        self.dispatch_events(services);

        self.pending.sweep(&mut self.objects, |o| o.is_destroyed());
    }

    fn update_object(&mut self, index: usize, dt: f32, services: &mut Services, view: &SceneView) {
        let dispatch = services.collision_dispatch;
        let (head, later) = self.objects.split_at_mut(index + 1);
        let GameObject { core, behavior } = &mut head[index];
        if core.is_destroyed() {
            return;
        }

        let mut ctx = ObjectContext::new(services, view, &mut self.commands);

        core.transform.update(dt);

        if core.collider.enabled {
            for other in later.iter_mut() {
                if !other.core.collider.enabled {
                    continue;
                }
                let (pos, size) = (core.transform.position, core.size());
                let (other_pos, other_size) = (other.core.transform.position, other.core.size());
                if broad_phase_rejects(pos, size, other_pos, other_size)
                    || !boxes_overlap(pos, size, other_pos, other_size)
                {
                    continue;
                }

                if let Some(behavior) = behavior.as_mut() {
                    behavior.on_collision(core, &mut other.core, &mut ctx);
                }
                if dispatch == CollisionDispatch::Symmetric && !other.core.is_destroyed() {
                    if let Some(other_behavior) = &mut other.behavior {
                        other_behavior.on_collision(&mut other.core, core, &mut ctx);
                    }
                }
            }
        }

        if let Some(behavior) = behavior.as_mut() {
            let pressed = ctx.services.input.mouse_pressed();
            let held = ctx.services.input.mouse_held();
            if pressed.any() || held.any() {
                let click = ctx.services.input.mouse_position() - view.position - view.camera;
                if pressed.any() && core.is_in_bounds(click) {
                    behavior.on_click(core, pressed, &mut ctx);
                }
                if held.any() && core.is_in_bounds(click) {
                    behavior.on_mouse_held(core, held, &mut ctx);
                }
            }
        }

        core.renderer.update(dt);

        if let Some(behavior) = behavior.as_mut() {
            behavior.update(core, &mut ctx, dt);
        }
    }

    /// Redraw the canvas: background, then visible objects in list order, then
    /// the script overlay
    pub fn draw(&mut self, services: &Services) {
        if self.destroyed {
            return;
        }

        let width = self.real_size.x.max(0.0).round() as u32;
        let height = self.real_size.y.max(0.0).round() as u32;
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.resize(width, height);
        }
        if self.placed_at != Some(self.real_position) {
            self.placed_at = Some(self.real_position);
            log::debug!(
                "[scene] {} placed at ({}, {})",
                self.id,
                self.real_position.x,
                self.real_position.y
            );
        }

        if self.render_background {
            self.canvas.fill(self.background);
        } else {
            self.canvas.clear();
        }

        let canvas = self.canvas.as_mut();
        for object in &mut self.objects {
            if object.is_destroyed() || !object.core.renderer.visible {
                continue;
            }
            object.core.draw(canvas, self.real_size, self.camera);
            if let Some(behavior) = &object.behavior {
                behavior.draw(&object.core, canvas, self.real_size);
            }
        }

        if let Some(mut script) = self.script.take() {
            let view = self.view();
            script.draw(self.canvas.as_mut(), &view, services);
            self.script = Some(script);
        }
    }
}
