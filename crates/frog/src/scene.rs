//! The Frog scene: menu, fruit spawning, scoring, and game over

use pond_animation::{Easing, Repeat, Tween, TweenId};
use pond_core::{ObjectId, Rng, Vector2};
use pond_particles::{EmitterConfig, ParticleEmitter};
use pond_render::{Canvas, DrawParams};
use pond_runtime::Signal;
use pond_scene::{GameObject, Scene, SceneEvent, SceneScript, SceneView, Services};

use crate::behaviors::{
    actions, FloorTile, Frog, Fruit, JuiceBurst, FROG_TAG, FRUIT_EATEN, FRUIT_LANDED,
    FRUIT_MISSED, FRUIT_TAG, JUICE_TAG, TILE_TAG,
};
use crate::config::{FrogConfig, GameplayConfig};

pub const HIGH_SCORE_COOKIE: &str = "high_score";

/// Pooled fruit is parked here, far outside any scene
const PARKED_X: f32 = 50000.0;

/// Menu sprites and their resting height as a fraction of the scene height
const MENU_LABELS: [(&str, f32); 2] = [("label_press", 0.3), ("label_to_lick", 0.62)];
const SPACEBAR_Y: f32 = 0.45;

pub struct FrogScene {
    gameplay: GameplayConfig,
    juice: EmitterConfig,

    started: bool,
    spawn_rate_min: f32,
    spawn_rate_max: f32,
    spawn_timer: f32,
    fruits_max: usize,
    game_speed: f32,

    /// Falling fruit, oldest first
    fruits: Vec<ObjectId>,
    /// Parked fruit waiting for reuse
    fruit_pool: Vec<ObjectId>,
    /// Sub-image of every fruit eaten this round
    eaten: Vec<u32>,
    high_score: u32,

    /// Menu slide: 0 hidden above, 1 in place, above 2 gone
    pos_scale_y: f32,
    spacebar_rotation: f32,
    menu_tween: Option<TweenId>,
    spacebar_tween: Option<TweenId>,

    /// Fires with the new score whenever it changes
    pub score_changed: Signal<u32>,
}

impl FrogScene {
    pub fn new(gameplay: GameplayConfig, juice: EmitterConfig) -> Self {
        Self {
            started: false,
            spawn_rate_min: gameplay.spawn_rate_min,
            spawn_rate_max: gameplay.spawn_rate_max,
            spawn_timer: gameplay.spawn_rate_max,
            fruits_max: gameplay.fruits_max,
            game_speed: 1.0,
            fruits: Vec::new(),
            fruit_pool: Vec::new(),
            eaten: Vec::new(),
            high_score: 0,
            pos_scale_y: 0.0,
            spacebar_rotation: -1.0,
            menu_tween: None,
            spacebar_tween: None,
            score_changed: Signal::new(),
            gameplay,
            juice,
        }
    }

    pub fn from_config(config: &FrogConfig) -> Self {
        Self::new(config.gameplay.clone(), config.juice_emitter())
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn score(&self) -> u32 {
        self.eaten.len() as u32
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn game_speed(&self) -> f32 {
        self.game_speed
    }

    pub fn fruits_max(&self) -> usize {
        self.fruits_max
    }

    fn menu_in(&mut self, services: &mut Services) {
        self.menu_tween = Some(
            services
                .tweens
                .add(Tween::new(0.0, 1.0, 0.8).easing(Easing::ElasticOut)),
        );
        self.spacebar_tween = Some(
            services.tweens.add(
                Tween::new(-1.0, 1.0, 0.5)
                    .easing(Easing::SinusoidalInOut)
                    .yoyo(true)
                    .repeat(Repeat::Forever),
            ),
        );
    }

    fn start_game(&mut self, scene: &mut Scene, services: &mut Services) {
        if let Some(id) = self.spacebar_tween.take() {
            services.tweens.stop(id);
        }
        services.tweens.remove_all();

        // Slide the menu away from wherever it is
        self.menu_tween = Some(
            services
                .tweens
                .add(Tween::new(self.pos_scale_y, 2.5, 0.8).easing(Easing::ElasticInOut)),
        );

        let size = scene.real_size();
        let tile_sprite = services.sprite("tile_floor_brown");
        let tile_width = tile_sprite.as_ref().map_or(0.0, |s| s.width() - 2.0);
        if tile_width > 0.0 {
            let mut tx = tile_width / 2.0 - 4.0;
            while tx < size.x {
                let tile = GameObject::new(tx, size.y - 30.0, tile_sprite.clone())
                    .with_tag(TILE_TAG)
                    .with_behavior(FloorTile::new())
                    .with_collider();
                scene.add_object(tile, services);
                tx += tile_width;
            }
        } else {
            log::warn!("[frog] floor tiles have no width, the frog will fall");
        }

        let frog = GameObject::new(60.0, size.y - 50.0, services.sprite("frog_basic"))
            .with_tag(FROG_TAG)
            .with_behavior(Frog::new(&self.gameplay));
        scene.add_object(frog, services);

        self.started = true;
        log::info!("[frog] game started");
    }

    fn reset(&mut self, scene: &mut Scene, services: &mut Services) {
        if let Some(id) = self.spacebar_tween.take() {
            services.tweens.stop(id);
        }
        services.tweens.remove_all();
        self.menu_tween = None;

        self.started = false;
        scene.destroy_all_objects(services);

        self.pos_scale_y = 0.0;
        self.spacebar_rotation = -1.0;
        self.spawn_rate_min = self.gameplay.spawn_rate_min;
        self.spawn_rate_max = self.gameplay.spawn_rate_max;
        self.spawn_timer = 0.0;
        self.fruits_max = self.gameplay.fruits_max;
        self.game_speed = 1.0;

        self.fruits.clear();
        self.fruit_pool.clear();
        self.eaten.clear();
        self.score_changed.dispatch(&0);

        self.menu_in(services);
    }

    fn game_over(&mut self, scene: &mut Scene, services: &mut Services) {
        let score = self.score();
        log::info!("[frog] game over with {score} fruit eaten");
        if score > self.high_score {
            self.high_score = score;
            services.cookies.set_cookie(HIGH_SCORE_COOKIE, score.to_string());
            log::info!("[frog] new high score: {score}");
        }
        self.reset(scene, services);
    }

    fn increase_difficulty(&mut self) {
        let g = &self.gameplay;
        self.game_speed += g.speed_step;

        if self.spawn_rate_max > g.spawn_rate_max_floor {
            self.spawn_rate_max -= g.spawn_rate_step;
        }
        if self.spawn_rate_min > 0.0 {
            self.spawn_rate_min -= g.spawn_rate_step;
        }

        if self.fruits_max < g.fruits_cap
            && g.fruits_growth_every > 0
            && self.eaten.len() % g.fruits_growth_every == 0
        {
            self.fruits_max += 1;
        }
    }

    fn should_spawn(&self, rng: &mut Rng) -> bool {
        self.fruits.len() < self.fruits_max
            && (rng.chance(self.gameplay.spawn_chance) || self.spawn_timer < 0.0)
    }

    fn spawn_fruits(&mut self, scene: &mut Scene, services: &mut Services, dt: f32) {
        self.spawn_timer -= dt;
        if self.spawn_timer >= self.spawn_rate_min || !self.should_spawn(&mut services.rng) {
            return;
        }
        let Some(id) = self.take_fruit(scene, services) else {
            return;
        };

        let g = &self.gameplay;
        let x = services.rng.range(0.0, scene.real_size().x).floor();
        let fall = services.rng.range(g.fall_min, g.fall_max) * self.game_speed * g.fall_scale;
        if let Some(fruit) = scene.object_mut(id) {
            fruit.collider.enabled = true;
            fruit.transform.position = Vector2::new(x, 0.0);
            fruit.transform.velocity = Vector2::new(0.0, fall);
            let cells = fruit.renderer.sprite().map_or(1, |s| s.sub_images());
            fruit.renderer.set_sub_image(services.rng.index(cells as usize) as f32);
        }

        self.fruits.push(id);
        self.spawn_timer = self.spawn_rate_max;
    }

    fn take_fruit(&mut self, scene: &mut Scene, services: &mut Services) -> Option<ObjectId> {
        if let Some(id) = self.fruit_pool.pop() {
            return Some(id);
        }
        let fruit = GameObject::new(0.0, 0.0, services.sprite("fruit"))
            .with_tag(FRUIT_TAG)
            .with_behavior(Fruit)
            .with_collider();
        scene.add_object(fruit, services)
    }

    /// Park a falling fruit for reuse. False if it was not falling.
    fn recycle_fruit(&mut self, scene: &mut Scene, id: ObjectId) -> bool {
        let Some(index) = self.fruits.iter().position(|f| *f == id) else {
            return false;
        };
        self.fruits.remove(index);
        self.fruit_pool.push(id);
        if let Some(fruit) = scene.object_mut(id) {
            fruit.transform.position.x = PARKED_X;
            fruit.transform.velocity = Vector2::ZERO;
            fruit.collider.enabled = false;
        }
        true
    }

    fn consume_fruit(&mut self, scene: &mut Scene, services: &mut Services, id: ObjectId) {
        let Some(fruit) = scene.object(id) else {
            return;
        };
        let position = fruit.position();
        let sub_image = fruit.renderer.sub_image.max(0.0) as u32;
        if !self.recycle_fruit(scene, id) {
            return;
        }

        self.eaten.push(sub_image);
        self.increase_difficulty();

        let score = self.score();
        log::debug!("[frog] ate fruit {sub_image}, score {score}");
        self.score_changed.dispatch(&score);
        services.play_sound("munch");

        self.spawn_juice(scene, services, position, sub_image);
    }

    fn spawn_juice(&self, scene: &mut Scene, services: &mut Services, at: Vector2, frame: u32) {
        let Some(sprite) = services.images.get("fruit") else {
            return;
        };
        let config = EmitterConfig {
            start_frame: frame,
            ..self.juice.clone()
        };
        let emitter = ParticleEmitter::new(config, sprite, at);
        let burst = GameObject::new(at.x, at.y, None)
            .with_tag(JUICE_TAG)
            .with_behavior(JuiceBurst::new(emitter, self.gameplay.juice_particles));
        scene.add_object(burst, services);
    }

    /// Whether a tile that is still intact sits under the frog
    fn frog_has_floor(scene: &Scene) -> bool {
        let Some(frog) = scene.tagged(FROG_TAG).next() else {
            return true;
        };
        let x = frog.position().x;
        scene
            .tagged(TILE_TAG)
            .filter(|tile| tile.collider.enabled)
            .any(|tile| (tile.position().x - x).abs() <= tile.size().x * 0.5)
    }
}

impl SceneScript for FrogScene {
    fn on_load(&mut self, _scene: &mut Scene, services: &mut Services) {
        self.high_score = services
            .cookies
            .get_cookie(HIGH_SCORE_COOKIE)
            .parse()
            .unwrap_or(0);
        if self.high_score > 0 {
            log::info!("[frog] high score to beat: {}", self.high_score);
        }
        self.menu_in(services);
    }

    fn update(&mut self, scene: &mut Scene, services: &mut Services, dt: f32) {
        if let Some(value) = self.menu_tween.and_then(|id| services.tweens.value(id)) {
            self.pos_scale_y = value;
        }
        if let Some(value) = self.spacebar_tween.and_then(|id| services.tweens.value(id)) {
            self.spacebar_rotation = value;
        }

        if self.started {
            self.spawn_fruits(scene, services, dt);
            if !Self::frog_has_floor(scene) {
                self.game_over(scene, services);
            }
        } else if services.input.is_action_held(actions::START) {
            self.start_game(scene, services);
        }
    }

    fn on_event(&mut self, scene: &mut Scene, services: &mut Services, event: SceneEvent) {
        match event.name.as_str() {
            FRUIT_EATEN => {
                if let Some(fruit) = event.other {
                    self.consume_fruit(scene, services, fruit);
                }
            }
            FRUIT_LANDED => {
                if let Some(fruit) = event.other {
                    self.recycle_fruit(scene, fruit);
                }
            }
            FRUIT_MISSED => {
                self.recycle_fruit(scene, event.source);
            }
            other => log::debug!("[frog] ignoring event '{other}'"),
        }
    }

    fn draw(&mut self, canvas: &mut dyn Canvas, view: &SceneView, services: &Services) {
        if self.pos_scale_y < 2.0 {
            // Labels are optional art; the menu works without them
            for (name, y) in MENU_LABELS {
                let Some(label) = services.images.get(name) else {
                    continue;
                };
                let params = DrawParams {
                    x: view.size.x * 0.5,
                    y: view.size.y * y * self.pos_scale_y,
                    width: label.width(),
                    height: label.height(),
                    ..DrawParams::default()
                };
                label.draw(canvas, view.size, &params, 0.0);
            }

            if let Some(space) = services.images.get("spacebar") {
                let params = DrawParams {
                    x: view.size.x * 0.5,
                    y: view.size.y * SPACEBAR_Y * self.pos_scale_y,
                    width: space.width(),
                    height: space.height(),
                    rotation: self.spacebar_rotation * 3.0,
                    ..DrawParams::default()
                };
                space.draw(canvas, view.size, &params, 0.0);
            }
        }

        // Eaten fruit along the top edge at half size, newest first
        let Some(fruit) = services.images.get("fruit") else {
            return;
        };
        let cell = fruit.cell_size() * 0.5;
        if cell.x <= 0.0 {
            return;
        }
        let fits = (view.size.x / cell.x) as usize;
        for (slot, sub_image) in self.eaten.iter().rev().take(fits).enumerate() {
            let params = DrawParams {
                x: cell.x * (slot as f32 + 0.5),
                y: cell.y * 0.5,
                width: cell.x,
                height: cell.y,
                ..DrawParams::default()
            };
            fruit.draw(canvas, view.size, &params, *sub_image as f32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind_controls;
    use crate::testing::{services_with_sheets, SCENE_H, SCENE_W};
    use pond_render::RecordingCanvas;
    use pond_scene::DisplayMode;
    use std::cell::Cell;
    use std::rc::Rc;
    use winit::keyboard::KeyCode;

    /// Drives the script by hand so tests can inspect it
    struct Harness {
        script: FrogScene,
        scene: Scene,
        services: Services,
    }

    impl Harness {
        fn new(gameplay: GameplayConfig) -> Self {
            let mut services = services_with_sheets();
            services.rng = Rng::new(99);
            bind_controls(&mut services.input);
            let mut scene = Scene::new(0.0, 0.0, SCENE_W, SCENE_H, DisplayMode::Absolute);
            let mut script = FrogScene::new(gameplay, EmitterConfig::default());
            script.on_load(&mut scene, &mut services);
            Self {
                script,
                scene,
                services,
            }
        }

        fn started() -> Self {
            let mut h = Self::new(GameplayConfig {
                spawn_chance: 0.0,
                ..GameplayConfig::default()
            });
            h.script.start_game(&mut h.scene, &mut h.services);
            h
        }

        fn script_update(&mut self, dt: f32) {
            self.script.update(&mut self.scene, &mut self.services, dt);
        }

        fn event(&mut self, event: SceneEvent) {
            self.script.on_event(&mut self.scene, &mut self.services, event);
        }

        fn tagged(&self, tag: &str) -> Vec<ObjectId> {
            self.scene.tagged(tag).map(|o| o.id()).collect()
        }

        /// Run the spawn timer out and return the new fruit
        fn spawn_one(&mut self) -> ObjectId {
            let before = self.script.fruits.len();
            while self.script.fruits.len() == before {
                self.script_update(0.25);
            }
            *self.script.fruits.last().unwrap()
        }
    }

    #[test]
    fn menu_tweens_run_on_load() {
        let h = Harness::new(GameplayConfig::default());
        assert!(!h.script.is_started());
        assert_eq!(h.services.tweens.len(), 2);
        assert!(h.scene.is_empty());
    }

    #[test]
    fn holding_space_lays_the_floor_and_places_the_frog() {
        let mut h = Harness::new(GameplayConfig::default());
        h.services.input.process_key_down(KeyCode::Space);
        h.services.input.begin_frame();
        h.script_update(0.016);

        assert!(h.script.is_started());
        // 16px tiles overlap by 2px, starting at x = 3
        let tiles = h.tagged(TILE_TAG);
        assert_eq!(tiles.len(), 30);
        let first = h.scene.object(tiles[0]).unwrap();
        assert_eq!(first.position(), Vector2::new(3.0, SCENE_H - 30.0));

        let frog = h.tagged(FROG_TAG);
        assert_eq!(frog.len(), 1);
        assert_eq!(
            h.scene.object(frog[0]).unwrap().position(),
            Vector2::new(60.0, SCENE_H - 50.0)
        );
        // Only the slide-away tween is left
        assert_eq!(h.services.tweens.len(), 1);
    }

    #[test]
    fn spawns_only_after_the_timer_runs_out_without_luck() {
        let mut h = Harness::started();
        // Timer starts at 2.0 and spawning needs it below zero
        for _ in 0..8 {
            h.script_update(0.25);
        }
        assert!(h.script.fruits.is_empty());

        h.script_update(0.25);
        assert_eq!(h.script.fruits.len(), 1);
        assert_eq!(h.script.spawn_timer, 2.0);

        let fruit = h.scene.object(h.script.fruits[0]).unwrap();
        assert!(fruit.collider.enabled);
        assert_eq!(fruit.position().y, 0.0);
        assert_eq!(fruit.position().x, fruit.position().x.floor());
        assert!((100.0..200.0).contains(&fruit.transform.velocity.y));
        assert!((0.0..15.0).contains(&fruit.renderer.sub_image));
    }

    #[test]
    fn fruit_cap_limits_spawning() {
        let mut h = Harness::new(GameplayConfig {
            spawn_chance: 1.0,
            fruits_max: 2,
            ..GameplayConfig::default()
        });
        h.script.start_game(&mut h.scene, &mut h.services);
        for _ in 0..40 {
            h.script_update(0.25);
        }
        assert_eq!(h.script.fruits.len(), 2);
    }

    #[test]
    fn eating_scores_recycles_and_bursts() {
        let mut h = Harness::started();
        let seen = Rc::new(Cell::new(0));
        let sink = seen.clone();
        h.script.score_changed.add(move |score| sink.set(*score));

        let fruit = h.spawn_one();
        let tip = ObjectId::from_raw(u64::MAX);
        h.event(SceneEvent::new(FRUIT_EATEN, tip).with_other(fruit));

        assert_eq!(h.script.score(), 1);
        assert_eq!(seen.get(), 1);
        assert!(h.script.fruits.is_empty());
        assert_eq!(h.script.fruit_pool, vec![fruit]);

        let parked = h.scene.object(fruit).unwrap();
        assert!(!parked.collider.enabled);
        assert_eq!(parked.position().x, PARKED_X);
        assert_eq!(h.tagged(JUICE_TAG).len(), 1);

        assert!((h.script.game_speed() - 1.05).abs() < 1e-6);
        assert!((h.script.spawn_rate_max - 1.8).abs() < 1e-6);
        assert!((h.script.spawn_rate_min - 0.8).abs() < 1e-6);
        assert_eq!(h.script.fruits_max(), 5);

        // A second hit on the same fruit in one frame does nothing
        h.event(SceneEvent::new(FRUIT_EATEN, tip).with_other(fruit));
        assert_eq!(h.script.score(), 1);
    }

    #[test]
    fn pooled_fruit_is_reused() {
        let mut h = Harness::started();
        let first = h.spawn_one();
        h.event(SceneEvent::new(FRUIT_MISSED, first));
        assert!(h.script.fruits.is_empty());

        let second = h.spawn_one();
        assert_eq!(first, second);
        assert_eq!(h.tagged(FRUIT_TAG).len(), 1);
        assert!(h.scene.object(second).unwrap().collider.enabled);
    }

    #[test]
    fn landing_recycles_the_fruit() {
        let mut h = Harness::started();
        let fruit = h.spawn_one();
        let tile = h.tagged(TILE_TAG)[0];
        h.event(SceneEvent::new(FRUIT_LANDED, tile).with_other(fruit));
        assert!(h.script.fruits.is_empty());
        assert_eq!(h.script.score(), 0);
    }

    #[test]
    fn every_fifth_fruit_raises_the_cap() {
        let mut h = Harness::started();
        for _ in 0..5 {
            h.script.eaten.push(0);
            h.script.increase_difficulty();
        }
        assert_eq!(h.script.fruits_max(), 6);
        assert!((h.script.game_speed() - 1.25).abs() < 1e-5);
    }

    #[test]
    fn losing_the_floor_ends_the_round() {
        let mut h = Harness::started();
        let scores = Rc::new(Cell::new(99));
        let sink = scores.clone();
        h.script.score_changed.add(move |score| sink.set(*score));
        h.script.eaten.push(4);

        let frog_x = 60.0;
        let under: Vec<ObjectId> = h
            .scene
            .tagged(TILE_TAG)
            .filter(|t| (t.position().x - frog_x).abs() <= t.size().x * 0.5)
            .map(|t| t.id())
            .collect();
        assert!(!under.is_empty());
        for id in under {
            h.scene.object_mut(id).unwrap().collider.enabled = false;
        }

        h.script_update(0.016);
        assert!(!h.script.is_started());
        assert_eq!(scores.get(), 0);
        assert_eq!(h.script.high_score(), 1);
        assert_eq!(h.services.cookies.get_cookie(HIGH_SCORE_COOKIE), "1");
        assert!(h.scene.objects().all(|o| o.is_destroyed()));
        assert_eq!(h.services.tweens.len(), 2);
    }

    #[test]
    fn high_score_read_from_cookie() {
        let mut services = services_with_sheets();
        services.cookies.set_cookie(HIGH_SCORE_COOKIE, "7");
        let mut scene = Scene::new(0.0, 0.0, SCENE_W, SCENE_H, DisplayMode::Absolute);
        let mut script = FrogScene::new(GameplayConfig::default(), EmitterConfig::default());
        script.on_load(&mut scene, &mut services);
        assert_eq!(script.high_score(), 7);
    }

    #[test]
    fn overlay_draws_menu_then_eaten_fruit() {
        let mut h = Harness::new(GameplayConfig::default());
        let view = h.scene.view();

        let mut canvas = RecordingCanvas::new();
        h.script.draw(&mut canvas, &view, &h.services);
        // Press, To Lick, spacebar
        assert_eq!(canvas.draws.len(), 3);
        assert_eq!(canvas.draws[0].image_size, (60, 20));
        assert_eq!(canvas.draws[1].image_size, (84, 20));
        assert!(canvas.draws.iter().all(|d| d.params.x == SCENE_W * 0.5));
        assert_eq!(canvas.draws[2].params.rotation, -3.0);

        // Halfway in, each piece sits at half its resting height
        h.script.pos_scale_y = 0.5;
        let mut canvas = RecordingCanvas::new();
        h.script.draw(&mut canvas, &view, &h.services);
        assert!((canvas.draws[0].params.y - SCENE_H * 0.15).abs() < 1e-4);
        assert!((canvas.draws[1].params.y - SCENE_H * 0.31).abs() < 1e-4);
        assert!((canvas.draws[2].params.y - SCENE_H * 0.225).abs() < 1e-4);

        h.script.pos_scale_y = 2.5;
        h.script.eaten = vec![3, 9];
        let mut canvas = RecordingCanvas::new();
        h.script.draw(&mut canvas, &view, &h.services);
        assert_eq!(canvas.draws.len(), 2);
        // Newest first, half of a 16px cell
        assert_eq!(canvas.draws[0].params.width, 8.0);
        assert_eq!(canvas.draws[0].params.x, 4.0);
        assert_eq!(canvas.draws[1].params.x, 12.0);
    }
}
