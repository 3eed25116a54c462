//! Tween registry and per-frame stepping

use std::collections::HashMap;

use crate::easing::Easing;

/// Handle to a tween owned by [`Tweens`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(u64);

/// How many extra times a tween plays after its first run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Repeat {
    #[default]
    Never,
    Times(u32),
    Forever,
}

/// Description of a scalar animation from `from` to `to`
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    /// Seconds for one run
    pub duration: f32,
    pub easing: Easing,
    /// Seconds to wait before the first run and before each repeat
    pub delay: f32,
    pub repeat: Repeat,
    /// Reverse direction on every repeat
    pub yoyo: bool,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration,
            easing: Easing::Linear,
            delay: 0.0,
            repeat: Repeat::Never,
            yoyo: false,
        }
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = seconds;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }
}

#[derive(Debug)]
struct Playback {
    tween: Tween,
    value: f32,
    elapsed: f32,
    delay_left: f32,
    repeats_left: Repeat,
    reversed: bool,
    running: bool,
    finished: bool,
    chained: Vec<TweenId>,
}

impl Playback {
    fn new(tween: Tween) -> Self {
        Self {
            value: tween.from,
            elapsed: 0.0,
            delay_left: tween.delay,
            repeats_left: tween.repeat,
            reversed: false,
            running: false,
            finished: false,
            chained: Vec::new(),
            tween,
        }
    }

    fn restart(&mut self) {
        self.value = self.tween.from;
        self.elapsed = 0.0;
        self.delay_left = self.tween.delay;
        self.repeats_left = self.tween.repeat;
        self.reversed = false;
        self.running = true;
        self.finished = false;
    }

    /// Advance by `dt`. Returns true when the tween completed during this step.
    fn step(&mut self, dt: f32) -> bool {
        let mut dt = dt;
        if self.delay_left > 0.0 {
            self.delay_left -= dt;
            if self.delay_left > 0.0 {
                return false;
            }
            dt = -self.delay_left;
            self.delay_left = 0.0;
        }

        self.elapsed += dt;
        let t = if self.tween.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.tween.duration).min(1.0)
        };

        let k = self.tween.easing.apply(t);
        let (start, end) = if self.reversed {
            (self.tween.to, self.tween.from)
        } else {
            (self.tween.from, self.tween.to)
        };
        self.value = start + (end - start) * k;

        if t < 1.0 {
            return false;
        }

        let again = match self.repeats_left {
            Repeat::Never => false,
            Repeat::Forever => true,
            Repeat::Times(0) => false,
            Repeat::Times(n) => {
                self.repeats_left = Repeat::Times(n - 1);
                true
            }
        };

        if again {
            if self.tween.yoyo {
                self.reversed = !self.reversed;
            }
            self.elapsed = 0.0;
            self.delay_left = self.tween.delay;
            false
        } else {
            self.running = false;
            self.finished = true;
            true
        }
    }
}

/// Owns every tween. Finished tweens keep reporting their end value until
/// they are removed.
#[derive(Debug, Default)]
pub struct Tweens {
    playbacks: HashMap<TweenId, Playback>,
    next_id: u64,
}

impl Tweens {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, tween: Tween, running: bool) -> TweenId {
        self.next_id += 1;
        let id = TweenId(self.next_id);
        let mut playback = Playback::new(tween);
        playback.running = running;
        self.playbacks.insert(id, playback);
        id
    }

    /// Add a tween and start it immediately
    pub fn add(&mut self, tween: Tween) -> TweenId {
        self.insert(tween, true)
    }

    /// Add a tween that waits for [`Tweens::start`] or a chain
    pub fn add_paused(&mut self, tween: Tween) -> TweenId {
        self.insert(tween, false)
    }

    /// (Re)start a tween from its beginning
    pub fn start(&mut self, id: TweenId) {
        match self.playbacks.get_mut(&id) {
            Some(p) => p.restart(),
            None => log::debug!("[tween] start ignored, {id:?} was removed"),
        }
    }

    /// Start `next` when `id` completes
    pub fn chain(&mut self, id: TweenId, next: TweenId) {
        match self.playbacks.get_mut(&id) {
            Some(p) => p.chained.push(next),
            None => log::debug!("[tween] cannot chain {next:?} after unknown {id:?}"),
        }
    }

    /// Freeze a tween at its current value
    pub fn stop(&mut self, id: TweenId) {
        if let Some(p) = self.playbacks.get_mut(&id) {
            p.running = false;
        }
    }

    pub fn remove(&mut self, id: TweenId) {
        self.playbacks.remove(&id);
    }

    pub fn remove_all(&mut self) {
        self.playbacks.clear();
    }

    /// Current value, or `None` for an unknown or removed tween
    pub fn value(&self, id: TweenId) -> Option<f32> {
        self.playbacks.get(&id).map(|p| p.value)
    }

    pub fn is_running(&self, id: TweenId) -> bool {
        self.playbacks.get(&id).is_some_and(|p| p.running)
    }

    pub fn is_finished(&self, id: TweenId) -> bool {
        self.playbacks.get(&id).is_some_and(|p| p.finished)
    }

    pub fn len(&self) -> usize {
        self.playbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playbacks.is_empty()
    }

    /// Advance every running tween by `dt` seconds. Chained tweens start on
    /// the step after their predecessor completes.
    pub fn update(&mut self, dt: f32) {
        let mut to_start = Vec::new();
        for playback in self.playbacks.values_mut() {
            if playback.running && playback.step(dt) {
                to_start.extend(playback.chained.iter().copied());
            }
        }
        for id in to_start {
            self.start(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn linear_progress_and_finish() {
        let mut tweens = Tweens::new();
        let id = tweens.add(Tween::new(0.0, 10.0, 1.0));

        tweens.update(0.25);
        assert!(approx(tweens.value(id).unwrap(), 2.5));

        tweens.update(1.0);
        assert_eq!(tweens.value(id), Some(10.0));
        assert!(tweens.is_finished(id));
        assert!(!tweens.is_running(id));

        tweens.update(1.0);
        assert_eq!(tweens.value(id), Some(10.0));
    }

    #[test]
    fn delay_postpones_start() {
        let mut tweens = Tweens::new();
        let id = tweens.add(Tween::new(0.0, 1.0, 1.0).delay(0.5));
        tweens.update(0.4);
        assert_eq!(tweens.value(id), Some(0.0));
        tweens.update(0.2);
        assert!(approx(tweens.value(id).unwrap(), 0.1));
    }

    #[test]
    fn yoyo_forever_bounces() {
        let mut tweens = Tweens::new();
        let id = tweens.add(
            Tween::new(-1.0, 1.0, 0.5)
                .easing(Easing::SinusoidalInOut)
                .yoyo(true)
                .repeat(Repeat::Forever),
        );

        tweens.update(0.5);
        assert!(approx(tweens.value(id).unwrap(), 1.0));
        tweens.update(0.5);
        assert!(approx(tweens.value(id).unwrap(), -1.0));
        for _ in 0..100 {
            tweens.update(0.1);
        }
        assert!(tweens.is_running(id));
    }

    #[test]
    fn repeat_count_then_finish() {
        let mut tweens = Tweens::new();
        let id = tweens.add(Tween::new(0.0, 1.0, 1.0).repeat(Repeat::Times(2)));
        tweens.update(1.0);
        tweens.update(1.0);
        assert!(tweens.is_running(id));
        tweens.update(1.0);
        assert!(tweens.is_finished(id));
    }

    #[test]
    fn chain_starts_next() {
        let mut tweens = Tweens::new();
        let first = tweens.add(Tween::new(0.0, 1.0, 0.5));
        let second = tweens.add_paused(Tween::new(5.0, 6.0, 1.0));
        tweens.chain(first, second);

        tweens.update(0.3);
        assert!(!tweens.is_running(second));
        tweens.update(0.3);
        assert!(tweens.is_finished(first));
        assert!(tweens.is_running(second));
        assert_eq!(tweens.value(second), Some(5.0));

        tweens.update(0.5);
        assert!(approx(tweens.value(second).unwrap(), 5.5));
    }

    #[test]
    fn removed_tweens_ignore_start_and_chain() {
        let mut tweens = Tweens::new();
        let gone = tweens.add(Tween::new(0.0, 1.0, 0.5));
        let next = tweens.add_paused(Tween::new(0.0, 1.0, 0.5));
        tweens.remove(gone);

        tweens.chain(gone, next);
        tweens.start(gone);
        tweens.update(1.0);
        assert_eq!(tweens.len(), 1);
        assert_eq!(tweens.value(gone), None);
        assert!(!tweens.is_running(next));

        // Chaining onto a removed tween does nothing when it completes
        let first = tweens.add(Tween::new(0.0, 1.0, 0.1));
        tweens.chain(first, gone);
        tweens.update(0.2);
        tweens.update(0.2);
        assert!(tweens.is_finished(first));
        assert_eq!(tweens.len(), 2);
    }

    #[test]
    fn stop_freezes_and_remove_all_clears() {
        let mut tweens = Tweens::new();
        let id = tweens.add(Tween::new(0.0, 1.0, 1.0));
        tweens.update(0.5);
        tweens.stop(id);
        tweens.update(0.5);
        assert!(approx(tweens.value(id).unwrap(), 0.5));

        tweens.remove_all();
        assert!(tweens.is_empty());
        assert_eq!(tweens.value(id), None);
    }

    #[test]
    fn zero_duration_jumps_to_end() {
        let mut tweens = Tweens::new();
        let id = tweens.add(Tween::new(3.0, 4.0, 0.0));
        tweens.update(0.0);
        assert_eq!(tweens.value(id), Some(4.0));
    }
}
