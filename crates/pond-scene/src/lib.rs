//! Pond Scene - game objects, scenes, and the frame loop
//!
//! A [`Game`] owns the active [`Scene`]s and the shared [`Services`]. Each
//! scene owns an ordered list of [`GameObject`]s; list order is both the draw
//! order and the collision pairing order. Gameplay code plugs in through the
//! [`Behavior`] trait (per object) and the [`SceneScript`] trait (per scene).

pub mod collider;
pub mod game;
pub mod object;
pub mod ray;
pub mod removal;
pub mod renderer;
pub mod scene;
pub mod services;
pub mod transform;

pub use collider::{CollisionDispatch, Collider};
pub use game::{Game, GameState};
pub use object::{Behavior, GameObject, ObjectContext, ObjectCore, SceneCommand, SceneEvent};
pub use ray::{Ray, RayHit};
pub use removal::PendingRemoval;
pub use renderer::Renderer;
pub use scene::{DisplayMode, Scene, SceneScript, SceneView};
pub use services::Services;
pub use transform::Transform;
