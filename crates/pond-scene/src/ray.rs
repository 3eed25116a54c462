//! Ray casts against object boxes

use pond_core::{ObjectId, Rect, Vector2};

use crate::scene::Scene;

/// Nearest box a ray entered
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub object: ObjectId,
    /// Entry point in scene space
    pub point: Vector2,
    /// Distance from the ray origin to `point`
    pub distance: f32,
}

pub struct Ray;

impl Ray {
    /// Cast from `origin` along `direction` against every live object with an
    /// enabled collider. A `max_length` of zero or less means unbounded.
    /// A ray starting inside a box hits it at distance zero.
    pub fn cast(scene: &Scene, origin: Vector2, direction: Vector2, max_length: f32) -> Option<RayHit> {
        let direction = direction.normalize();
        if direction == Vector2::ZERO {
            return None;
        }

        let mut nearest: Option<RayHit> = None;
        for object in scene.objects() {
            if object.is_destroyed() || !object.collider.enabled {
                continue;
            }
            let bounds = Rect::centered(object.position(), object.size());
            let Some(distance) = entry_distance(origin, direction, &bounds) else {
                continue;
            };
            if max_length > 0.0 && distance > max_length {
                continue;
            }
            if nearest.map_or(true, |hit| distance < hit.distance) {
                nearest = Some(RayHit {
                    object: object.id(),
                    point: origin + direction.stretch(distance),
                    distance,
                });
            }
        }
        nearest
    }
}

/// Slab test: distance along a unit `direction` at which the ray enters `bounds`
fn entry_distance(origin: Vector2, direction: Vector2, bounds: &Rect) -> Option<f32> {
    let mut t_enter = 0.0_f32;
    let mut t_exit = f32::INFINITY;

    let axes = [
        (origin.x, direction.x, bounds.left(), bounds.right()),
        (origin.y, direction.y, bounds.top(), bounds.bottom()),
    ];
    for (o, d, lo, hi) in axes {
        if d.abs() < f32::EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let t1 = (lo - o) / d;
        let t2 = (hi - o) / d;
        t_enter = t_enter.max(t1.min(t2));
        t_exit = t_exit.min(t1.max(t2));
        if t_enter > t_exit {
            return None;
        }
    }
    Some(t_enter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::GameObject;
    use crate::scene::DisplayMode;
    use crate::services::Services;
    use image::RgbaImage;
    use pond_render::Sprite;
    use std::sync::Arc;

    fn boxes(positions: &[(f32, f32)]) -> (Scene, Vec<ObjectId>) {
        let mut services = Services::new();
        let mut scene = Scene::new(0.0, 0.0, 200.0, 200.0, DisplayMode::Absolute);
        let sprite = Arc::new(Sprite::single(Arc::new(RgbaImage::new(10, 10))));
        let ids = positions
            .iter()
            .filter_map(|&(x, y)| {
                scene.add_object(
                    GameObject::new(x, y, Some(sprite.clone())).with_collider(),
                    &mut services,
                )
            })
            .collect();
        (scene, ids)
    }

    #[test]
    fn returns_nearest_hit() {
        let (scene, ids) = boxes(&[(100.0, 0.0), (50.0, 0.0), (50.0, 50.0)]);
        let hit = Ray::cast(&scene, Vector2::ZERO, Vector2::new(1.0, 0.0), -1.0).unwrap();
        assert_eq!(hit.object, ids[1]);
        assert!((hit.distance - 45.0).abs() < 1e-4);
        assert!((hit.point.x - 45.0).abs() < 1e-4);
    }

    #[test]
    fn max_length_limits_reach() {
        let (scene, _) = boxes(&[(50.0, 0.0)]);
        assert!(Ray::cast(&scene, Vector2::ZERO, Vector2::new(3.0, 0.0), 40.0).is_none());
        assert!(Ray::cast(&scene, Vector2::ZERO, Vector2::new(3.0, 0.0), 46.0).is_some());
    }

    #[test]
    fn diagonal_and_misses() {
        let (scene, ids) = boxes(&[(50.0, 50.0)]);
        let hit = Ray::cast(&scene, Vector2::ZERO, Vector2::new(1.0, 1.0), 0.0).unwrap();
        assert_eq!(hit.object, ids[0]);
        assert!((hit.point.x - 45.0).abs() < 1e-3);
        assert!((hit.point.y - 45.0).abs() < 1e-3);

        assert!(Ray::cast(&scene, Vector2::ZERO, Vector2::new(-1.0, 0.0), 0.0).is_none());
        assert!(Ray::cast(&scene, Vector2::ZERO, Vector2::ZERO, 0.0).is_none());
    }

    #[test]
    fn origin_inside_box() {
        let (scene, _) = boxes(&[(0.0, 0.0)]);
        let hit = Ray::cast(&scene, Vector2::ZERO, Vector2::new(0.0, 1.0), 0.0).unwrap();
        assert_eq!(hit.distance, 0.0);
    }
}
