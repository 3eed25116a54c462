//! Emitter configuration (parsed from TOML) and runtime state

use std::sync::Arc;

use pond_core::{Rng, Vector2};
use pond_render::{Canvas, DrawParams, Sprite};

use crate::particle::Particle;
use crate::pool::ParticlePool;

/// Everything a newly emitted particle starts with
#[derive(Debug, Clone, PartialEq)]
pub struct EmitterConfig {
    /// Seconds between automatic emissions while enabled
    pub emission_rate: f32,
    /// Heading in degrees (0 = up, 90 = right)
    pub emission_angle: f32,
    /// Random spread around the heading, in degrees
    pub emission_spread: f32,
    pub start_rotation: f32,
    /// Pixels per second along the heading
    pub start_velocity: f32,
    pub start_angular_velocity: f32,
    pub acceleration: Vector2,
    pub angular_acceleration: f32,
    pub friction: Vector2,
    pub angular_friction: f32,
    pub start_size: Vector2,
    pub end_size: Vector2,
    pub lifetime_min: f32,
    /// A negative maximum means "same as the minimum"
    pub lifetime_max: f32,
    pub fade_in: f32,
    pub fade_out: f32,
    pub start_frame: u32,
    /// Seconds per sprite frame; 0 disables frame animation
    pub animation_speed: f32,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            emission_rate: 0.1,
            emission_angle: 0.0,
            emission_spread: 0.0,
            start_rotation: 0.0,
            start_velocity: 50.0,
            start_angular_velocity: 0.0,
            acceleration: Vector2::ZERO,
            angular_acceleration: 0.0,
            friction: Vector2::ZERO,
            angular_friction: 0.0,
            start_size: Vector2::new(8.0, 8.0),
            end_size: Vector2::ZERO,
            lifetime_min: 1.0,
            lifetime_max: -1.0,
            fade_in: 0.0,
            fade_out: 0.0,
            start_frame: 0,
            animation_speed: 0.0,
        }
    }
}

impl EmitterConfig {
    /// Parse an EmitterConfig from a TOML table. Missing keys keep their defaults.
    pub fn from_toml(table: &toml::value::Table) -> Self {
        let mut config = Self::default();

        let f32_fields: [(&str, &mut f32); 13] = [
            ("emission_rate", &mut config.emission_rate),
            ("emission_angle", &mut config.emission_angle),
            ("emission_spread", &mut config.emission_spread),
            ("start_rotation", &mut config.start_rotation),
            ("start_velocity", &mut config.start_velocity),
            ("start_angular_velocity", &mut config.start_angular_velocity),
            ("angular_acceleration", &mut config.angular_acceleration),
            ("angular_friction", &mut config.angular_friction),
            ("lifetime_min", &mut config.lifetime_min),
            ("lifetime_max", &mut config.lifetime_max),
            ("fade_in", &mut config.fade_in),
            ("fade_out", &mut config.fade_out),
            ("animation_speed", &mut config.animation_speed),
        ];
        for (key, slot) in f32_fields {
            if let Some(v) = table.get(key) {
                *slot = toml_f32(v, *slot);
            }
        }

        let vec_fields: [(&str, &mut Vector2); 4] = [
            ("acceleration", &mut config.acceleration),
            ("friction", &mut config.friction),
            ("start_size", &mut config.start_size),
            ("end_size", &mut config.end_size),
        ];
        for (key, slot) in vec_fields {
            if let Some(v) = table.get(key) {
                *slot = toml_vec2(v, *slot);
            }
        }

        if let Some(v) = table.get("start_frame") {
            config.start_frame = v.as_integer().unwrap_or(0).max(0) as u32;
        }

        config
    }

    /// Upper lifetime bound after resolving a negative maximum
    pub fn effective_lifetime_max(&self) -> f32 {
        if self.lifetime_max < 0.0 {
            self.lifetime_min
        } else {
            self.lifetime_max
        }
    }
}

fn toml_f32(v: &toml::Value, default: f32) -> f32 {
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
        .unwrap_or(default)
}

fn toml_vec2(v: &toml::Value, default: Vector2) -> Vector2 {
    if let Some(arr) = v.as_array() {
        if arr.len() >= 2 {
            return Vector2::new(toml_f32(&arr[0], default.x), toml_f32(&arr[1], default.y));
        }
    }
    default
}

/// A positioned emitter owning its live particles
pub struct ParticleEmitter {
    pub config: EmitterConfig,
    pub position: Vector2,
    sprite: Arc<Sprite>,
    timer: f32,
    enabled: bool,
    particles: Vec<Particle>,
}

impl ParticleEmitter {
    /// Create a stopped emitter. Call [`ParticleEmitter::start`] for timed
    /// emission or [`ParticleEmitter::emit`] for bursts.
    pub fn new(config: EmitterConfig, sprite: Arc<Sprite>, position: Vector2) -> Self {
        Self {
            timer: config.emission_rate,
            config,
            position,
            sprite,
            enabled: false,
            particles: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.enabled = true;
    }

    pub fn stop(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Live particles owned by this emitter
    pub fn active_count(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Emit `amount` particles at once
    pub fn emit(&mut self, amount: usize, pool: &mut ParticlePool, rng: &mut Rng) {
        let cfg = &self.config;
        for _ in 0..amount {
            let mut p = pool.take();

            let spread = if cfg.emission_spread > 0.0 {
                rng.range(-cfg.emission_spread * 0.5, cfg.emission_spread * 0.5)
            } else {
                0.0
            };
            let lifetime_max = cfg.effective_lifetime_max();
            let lifetime = if lifetime_max > cfg.lifetime_min {
                rng.range(cfg.lifetime_min, lifetime_max)
            } else {
                cfg.lifetime_min
            };

            p.position = self.position;
            p.rotation = cfg.start_rotation;
            p.velocity = Vector2::from_angle(cfg.emission_angle + spread).stretch(cfg.start_velocity);
            p.angular_velocity = cfg.start_angular_velocity;
            p.acceleration = cfg.acceleration;
            p.angular_acceleration = cfg.angular_acceleration;
            p.friction = cfg.friction;
            p.angular_friction = cfg.angular_friction;
            p.start_size = cfg.start_size;
            p.end_size = cfg.end_size;
            p.lifetime = lifetime;
            p.lifetime_start = lifetime;
            p.fade_in = cfg.fade_in;
            p.fade_in_start = cfg.fade_in;
            p.fade_out = cfg.fade_out;
            p.sub_image = cfg.start_frame;
            p.animation_speed = cfg.animation_speed;
            p.animation_timer = cfg.animation_speed;

            self.particles.push(p);
        }
    }

    /// Run the emission timer, integrate particles, and return expired ones to the pool
    pub fn update(&mut self, dt: f32, pool: &mut ParticlePool, rng: &mut Rng) {
        if self.enabled {
            self.timer -= dt;
            if self.timer <= 0.0 {
                self.timer = self.config.emission_rate;
                self.emit(1, pool, rng);
            }
        }

        let sub_images = self.sprite.sub_images();
        let mut i = 0;
        while i < self.particles.len() {
            self.particles[i].update(dt, sub_images);
            if self.particles[i].is_expired() {
                pool.give_back(self.particles.remove(i));
            } else {
                i += 1;
            }
        }
    }

    /// Return every live particle to the pool, e.g. when the owner is destroyed
    pub fn release(&mut self, pool: &mut ParticlePool) {
        if !self.particles.is_empty() {
            log::debug!("[particles] releasing {} live particles", self.particles.len());
        }
        for p in self.particles.drain(..) {
            pool.give_back(p);
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, scene_size: Vector2) {
        for p in &self.particles {
            let size = p.size();
            let params = DrawParams {
                x: p.position.x.round(),
                y: p.position.y.round(),
                width: size.x,
                height: size.y,
                rotation: p.rotation,
                mirror_x: false,
                mirror_y: false,
                alpha: p.alpha(),
            };
            self.sprite.draw(canvas, scene_size, &params, p.sub_image as f32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;
    use pond_render::RecordingCanvas;

    fn dot() -> Arc<Sprite> {
        Arc::new(Sprite::single(Arc::new(RgbaImage::new(4, 4))))
    }

    #[test]
    fn from_toml_coerces_numbers() {
        let table: toml::value::Table = toml::from_str(
            r#"
            emission_rate = 1
            start_velocity = 120.5
            lifetime_min = 0.5
            acceleration = [0, 300]
            start_size = [6.0, 6]
            start_frame = 2
            "#,
        )
        .unwrap();
        let config = EmitterConfig::from_toml(&table);
        assert_eq!(config.emission_rate, 1.0);
        assert_eq!(config.start_velocity, 120.5);
        assert_eq!(config.acceleration, Vector2::new(0.0, 300.0));
        assert_eq!(config.start_size, Vector2::new(6.0, 6.0));
        assert_eq!(config.start_frame, 2);
        assert_eq!(config.effective_lifetime_max(), 0.5);
        assert_eq!(config.fade_out, 0.0);
    }

    #[test]
    fn timer_emits_only_while_enabled() {
        let mut pool = ParticlePool::new();
        let mut rng = Rng::new(1);
        let config = EmitterConfig {
            emission_rate: 0.1,
            lifetime_min: 10.0,
            ..Default::default()
        };
        let mut emitter = ParticleEmitter::new(config, dot(), Vector2::ZERO);

        emitter.update(0.5, &mut pool, &mut rng);
        assert_eq!(emitter.active_count(), 0);

        emitter.start();
        emitter.update(0.05, &mut pool, &mut rng);
        assert_eq!(emitter.active_count(), 0);
        emitter.update(0.05, &mut pool, &mut rng);
        assert_eq!(emitter.active_count(), 1);

        emitter.stop();
        emitter.update(1.0, &mut pool, &mut rng);
        assert_eq!(emitter.active_count(), 1);
    }

    #[test]
    fn emitted_particles_all_return_to_pool() {
        let mut pool = ParticlePool::new();
        let mut rng = Rng::new(9);
        let config = EmitterConfig {
            lifetime_min: 0.2,
            lifetime_max: 0.6,
            ..Default::default()
        };
        let mut emitter = ParticleEmitter::new(config, dot(), Vector2::new(50.0, 50.0));

        emitter.emit(25, &mut pool, &mut rng);
        assert_eq!(emitter.active_count(), 25);
        for _ in 0..10 {
            emitter.update(0.1, &mut pool, &mut rng);
        }
        assert_eq!(emitter.active_count(), 0);
        assert_eq!(pool.available(), 25);
        assert_eq!(pool.returned(), 25);

        // A second burst reuses the same storage
        emitter.emit(25, &mut pool, &mut rng);
        assert_eq!(pool.allocated(), 25);
    }

    #[test]
    fn expiry_keeps_emission_order() {
        let mut pool = ParticlePool::new();
        let mut rng = Rng::new(7);
        let config = EmitterConfig {
            lifetime_min: 0.1,
            lifetime_max: 1.0,
            ..Default::default()
        };
        let mut emitter = ParticleEmitter::new(config.clone(), dot(), Vector2::ZERO);
        emitter.emit(10, &mut pool, &mut rng);
        // One short-lived particle in the middle of the burst
        emitter.config.lifetime_min = 0.05;
        emitter.config.lifetime_max = -1.0;
        emitter.emit(1, &mut pool, &mut rng);
        emitter.config = config;
        emitter.emit(10, &mut pool, &mut rng);

        let expected: Vec<f32> = emitter
            .particles()
            .iter()
            .map(|p| p.lifetime_start)
            .filter(|l| l - 0.3 > 0.0)
            .collect();
        emitter.update(0.3, &mut pool, &mut rng);

        let survivors: Vec<f32> = emitter.particles().iter().map(|p| p.lifetime_start).collect();
        assert!(survivors.len() < 21);
        assert_eq!(survivors, expected);
    }

    #[test]
    fn velocity_follows_heading() {
        let mut pool = ParticlePool::new();
        let mut rng = Rng::new(3);
        let config = EmitterConfig {
            emission_angle: 90.0,
            start_velocity: 10.0,
            ..Default::default()
        };
        let mut emitter = ParticleEmitter::new(config, dot(), Vector2::ZERO);
        emitter.emit(1, &mut pool, &mut rng);
        let v = emitter.particles()[0].velocity;
        assert!((v.x - 10.0).abs() < 1e-3);
        assert!(v.y.abs() < 1e-3);
    }

    #[test]
    fn draw_one_call_per_particle() {
        let mut pool = ParticlePool::new();
        let mut rng = Rng::new(5);
        let mut emitter =
            ParticleEmitter::new(EmitterConfig::default(), dot(), Vector2::new(10.0, 10.0));
        emitter.emit(3, &mut pool, &mut rng);

        let mut canvas = RecordingCanvas::new();
        emitter.draw(&mut canvas, Vector2::new(100.0, 100.0));
        assert_eq!(canvas.draws.len(), 3);

        emitter.release(&mut pool);
        assert_eq!(pool.available(), 3);
    }
}
