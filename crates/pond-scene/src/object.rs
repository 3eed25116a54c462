//! Game objects and the hooks gameplay code implements

use std::sync::Arc;

use pond_core::{ObjectId, Vector2};
use pond_render::{Canvas, Sprite};
use pond_runtime::MouseButtons;

use crate::collider::{self, Collider};
use crate::renderer::Renderer;
use crate::scene::SceneView;
use crate::services::Services;
use crate::transform::Transform;

/// The engine-owned part of a game object
#[derive(Clone, Debug)]
pub struct ObjectCore {
    id: ObjectId,
    pub tag: String,
    pub transform: Transform,
    pub renderer: Renderer,
    pub collider: Collider,
    destroyed: bool,
}

impl ObjectCore {
    pub fn new(x: f32, y: f32, sprite: Option<Arc<Sprite>>) -> Self {
        Self {
            id: ObjectId::new(),
            tag: String::new(),
            transform: Transform::at(x, y),
            renderer: Renderer::new(sprite),
            collider: Collider::default(),
            destroyed: false,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn position(&self) -> Vector2 {
        self.transform.position
    }

    /// Scale times the sprite cell size
    pub fn size(&self) -> Vector2 {
        self.transform.scale.multiply(self.renderer.cell_size())
    }

    /// Open box test against a point in scene space
    pub fn is_in_bounds(&self, point: Vector2) -> bool {
        collider::point_in_box(self.transform.position, self.size(), point)
    }

    /// Closed box overlap with another object
    pub fn overlaps(&self, other: &ObjectCore) -> bool {
        collider::boxes_overlap(
            self.transform.position,
            self.size(),
            other.transform.position,
            other.size(),
        )
    }

    pub fn draw(&mut self, canvas: &mut dyn Canvas, scene_size: Vector2, camera: Vector2) -> bool {
        self.renderer.draw(canvas, scene_size, &self.transform, camera)
    }
}

/// Gameplay logic attached to an object. Every hook is optional.
///
/// Hooks receive the object's own [`ObjectCore`] and an [`ObjectContext`] for
/// everything else. Spawning and destroying go through the context and take
/// effect once the current object has finished its update.
#[allow(unused_variables)]
pub trait Behavior {
    /// Called once when the object enters a scene
    fn added_to_scene(&mut self, me: &mut ObjectCore, ctx: &mut ObjectContext) {}

    /// Called every frame after the transform, collider, and renderer
    fn update(&mut self, me: &mut ObjectCore, ctx: &mut ObjectContext, dt: f32) {}

    /// `other` overlaps `me` this frame
    fn on_collision(&mut self, me: &mut ObjectCore, other: &mut ObjectCore, ctx: &mut ObjectContext) {}

    /// A mouse button went down over the object this frame
    fn on_click(&mut self, me: &mut ObjectCore, buttons: MouseButtons, ctx: &mut ObjectContext) {}

    /// A mouse button is held over the object
    fn on_mouse_held(&mut self, me: &mut ObjectCore, buttons: MouseButtons, ctx: &mut ObjectContext) {}

    /// Called once, when the object is destroyed
    fn on_destroy(&mut self, me: &mut ObjectCore, ctx: &mut ObjectContext) {}

    /// Extra drawing after the object's sprite
    fn draw(&self, me: &ObjectCore, canvas: &mut dyn Canvas, scene_size: Vector2) {}
}

pub struct GameObject {
    pub core: ObjectCore,
    pub behavior: Option<Box<dyn Behavior>>,
}

impl GameObject {
    pub fn new(x: f32, y: f32, sprite: Option<Arc<Sprite>>) -> Self {
        Self {
            core: ObjectCore::new(x, y, sprite),
            behavior: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.core.tag = tag.into();
        self
    }

    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    pub fn with_collider(mut self) -> Self {
        self.core.collider.enabled = true;
        self
    }

    pub fn id(&self) -> ObjectId {
        self.core.id
    }

    pub fn is_destroyed(&self) -> bool {
        self.core.destroyed
    }

    /// Mark destroyed, running `on_destroy` first. Returns false if it already was.
    pub(crate) fn destroy(&mut self, ctx: &mut ObjectContext) -> bool {
        if self.core.destroyed {
            return false;
        }
        if let Some(behavior) = &mut self.behavior {
            behavior.on_destroy(&mut self.core, ctx);
        }
        self.core.destroyed = true;
        true
    }
}

/// Something an object asked its scene to do
pub enum SceneCommand {
    Spawn(GameObject),
    Destroy(ObjectId),
    Event(SceneEvent),
}

/// A named notification from an object to its scene script
#[derive(Clone, Debug, PartialEq)]
pub struct SceneEvent {
    pub name: String,
    pub source: ObjectId,
    pub other: Option<ObjectId>,
}

impl SceneEvent {
    pub fn new(name: impl Into<String>, source: ObjectId) -> Self {
        Self {
            name: name.into(),
            source,
            other: None,
        }
    }

    pub fn with_other(mut self, other: ObjectId) -> Self {
        self.other = Some(other);
        self
    }
}

/// What a behavior hook can reach besides its own object
pub struct ObjectContext<'a> {
    pub services: &'a mut Services,
    view: &'a SceneView,
    commands: &'a mut Vec<SceneCommand>,
}

impl<'a> ObjectContext<'a> {
    pub(crate) fn new(
        services: &'a mut Services,
        view: &'a SceneView,
        commands: &'a mut Vec<SceneCommand>,
    ) -> Self {
        Self {
            services,
            view,
            commands,
        }
    }

    /// Placement of the owning scene for this frame
    pub fn scene(&self) -> &SceneView {
        self.view
    }

    pub fn spawn(&mut self, object: GameObject) -> ObjectId {
        let id = object.id();
        self.commands.push(SceneCommand::Spawn(object));
        id
    }

    pub fn destroy(&mut self, id: ObjectId) {
        self.commands.push(SceneCommand::Destroy(id));
    }

    pub fn emit(&mut self, event: SceneEvent) {
        self.commands.push(SceneCommand::Event(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn sprite(w: u32, h: u32) -> Option<Arc<Sprite>> {
        Some(Arc::new(Sprite::single(Arc::new(RgbaImage::new(w, h)))))
    }

    #[test]
    fn size_is_scale_times_cell() {
        let mut core = ObjectCore::new(0.0, 0.0, sprite(16, 8));
        assert_eq!(core.size(), Vector2::new(16.0, 8.0));
        core.transform.scale = Vector2::new(0.5, 3.0);
        assert_eq!(core.size(), Vector2::new(8.0, 24.0));

        let bare = ObjectCore::new(0.0, 0.0, None);
        assert_eq!(bare.size(), Vector2::ZERO);
    }

    #[test]
    fn bounds_are_open() {
        let core = ObjectCore::new(50.0, 50.0, sprite(10, 10));
        assert!(core.is_in_bounds(Vector2::new(54.0, 46.0)));
        assert!(!core.is_in_bounds(Vector2::new(55.0, 50.0)));
    }

    #[test]
    fn builder_sets_parts() {
        let obj = GameObject::new(1.0, 2.0, None).with_tag("fruit").with_collider();
        assert_eq!(obj.core.tag, "fruit");
        assert!(obj.core.collider.enabled);
        assert!(obj.behavior.is_none());
        assert!(!obj.is_destroyed());
    }
}
