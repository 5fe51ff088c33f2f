//! Adversary spawning on a randomized accumulator.

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Animation, Enemy, EnemyKind, FlightProfile};

const ENEMY_FPS: f32 = 30.0;
const ENEMY_MAX_FRAME: u32 = 7;

/// Accumulates elapsed time and releases one adversary whenever it exceeds
/// the current interval.
///
/// The interval is redrawn every tick, not once per spawn, so in practice
/// each tick spawns with a probability that grows with the accumulator.
#[derive(Clone, Debug, Default)]
pub struct Spawner {
    /// Milliseconds since the last spawn.
    pub timer: f32,
    /// Interval drawn on the most recent tick.
    pub interval: f32,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, dt: f32, config: &GameConfig, rng: &mut impl Rng) -> Option<Enemy> {
        self.interval = rng.gen_range(config.spawn_interval_min..config.spawn_interval_max);

        if self.timer > self.interval {
            self.timer = 0.0;
            let enemy = spawn_enemy(config, rng);
            tracing::debug!(
                kind = ?enemy.kind,
                x = enemy.x,
                y = enemy.y,
                speed = enemy.speed_x,
                "spawned adversary"
            );
            Some(enemy)
        } else {
            self.timer += dt;
            tracing::trace!(timer = self.timer, interval = self.interval, "spawn pending");
            None
        }
    }
}

/// Pick a variant by `config.crawler_chance` and build it.
pub fn spawn_enemy(config: &GameConfig, rng: &mut impl Rng) -> Enemy {
    if rng.gen_bool(config.crawler_chance) {
        crawling_enemy(config, rng)
    } else {
        flying_enemy(config, rng)
    }
}

/// Bat: enters off the right edge somewhere in the upper half and wobbles.
pub fn flying_enemy(config: &GameConfig, rng: &mut impl Rng) -> Enemy {
    let mut animation = Animation::new(ENEMY_MAX_FRAME, ENEMY_FPS, true);
    animation.row = 1;
    Enemy {
        kind: EnemyKind::Flying,
        x: config.width + rng.gen::<f32>() * config.width * 0.5,
        y: rng.gen::<f32>() * config.height * 0.5,
        width: 120.0,
        height: 104.0,
        speed_x: rng.gen::<f32>() * 10.0 + 1.0,
        speed_y: 0.0,
        flight: Some(FlightProfile {
            angle: 0.0,
            angle_velocity: (rng.gen::<f32>() * 0.1 - 0.01) / 1.2,
        }),
        animation,
        retired: false,
    }
}

/// Slime: enters off the right edge on the ground line.
pub fn crawling_enemy(config: &GameConfig, rng: &mut impl Rng) -> Enemy {
    let height = 88.0;
    Enemy {
        kind: EnemyKind::Crawling,
        x: config.width + rng.gen::<f32>() * config.width * 0.5,
        y: config.ground_for(height),
        width: 120.0,
        height,
        speed_x: rng.gen::<f32>() * 10.0 + 1.0,
        speed_y: 0.0,
        flight: None,
        animation: Animation::new(ENEMY_MAX_FRAME, ENEMY_FPS, true),
        retired: false,
    }
}
