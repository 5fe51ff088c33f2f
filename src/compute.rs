//! Frame orchestration.
//!
//! [`World`] owns every piece of mutable simulation state. The host calls
//! [`World::tick`] once per display frame with the real elapsed time and the
//! held controls, then draws [`World::snapshot`]. All randomness comes
//! through the injected RNG so callers control determinism (tests use a
//! seeded one).

use rand::Rng;

use crate::config::GameConfig;
use crate::controls::ControlSet;
use crate::effects::{self, TickContext};
use crate::entities::{
    Animation, Background, CollisionBurst, Enemy, FloatingMessage, GameStatus, Particle, Player,
};
use crate::physics::{self, is_on_ground, overlaps};
use crate::scheduler::{Deferred, Scheduler};
use crate::snapshot::FrameSnapshot;
use crate::spawner::Spawner;
use crate::states::{transition, InputSummary, Kinematics, PlayerState, Sheet};

/// Box the player carries before the first state is entered.
const START_SIZE: f32 = 192.0;
const START_X: f32 = 300.0;

/// The whole simulation: player, adversaries, transient visuals, scroll,
/// score and the deferred-effect queue.
#[derive(Clone, Debug)]
pub struct World {
    pub config: GameConfig,
    pub player: Player,
    pub background: Background,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub collisions: Vec<CollisionBurst>,
    pub messages: Vec<FloatingMessage>,
    pub spawner: Spawner,
    pub scheduler: Scheduler,
    /// Scroll rate subtracted from every non-player entity; only state
    /// transitions change it.
    pub world_speed: f32,
    pub score: u32,
    pub status: GameStatus,
    /// Ask the renderer for bounding boxes.
    pub debug: bool,
    pub frame: u64,
    game_over_scheduled: bool,
    torn_down: bool,
}

impl World {
    /// Build a fresh world with the player standing in `Idle`.
    pub fn new(config: GameConfig) -> Self {
        let player = Player {
            x: START_X,
            y: config.ground_for(START_SIZE),
            width: START_SIZE,
            height: START_SIZE,
            speed: 0.0,
            max_speed: config.player_max_speed,
            velocity_y: 0.0,
            weight: config.gravity,
            hit_points: config.max_hit_points,
            state: PlayerState::Idle,
            sheet: Sheet::Idle,
            animation: Animation::new(2, 20.0, true),
        };
        let mut world = Self {
            background: Background::new(config.width, config.height),
            player,
            enemies: Vec::new(),
            particles: Vec::new(),
            collisions: Vec::new(),
            messages: Vec::new(),
            spawner: Spawner::new(),
            scheduler: Scheduler::new(),
            world_speed: 0.0,
            score: 0,
            status: GameStatus::Playing,
            debug: false,
            frame: 0,
            game_over_scheduled: false,
            torn_down: false,
            config,
        };
        world.enter(PlayerState::Idle);
        tracing::debug!("world initialised");
        world
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Advance one frame.
    ///
    /// Order: deferred effects due by now, background scroll, player
    /// (collisions → state input → physics → animation), adversaries
    /// (spawn → update → filter), then particles, bursts and messages.
    /// Once the game is over only the deferred queue keeps running.
    pub fn tick(&mut self, dt_ms: f32, controls: ControlSet, rng: &mut impl Rng) {
        if self.torn_down {
            return;
        }
        let dt = if dt_ms.is_finite() && dt_ms > 0.0 { dt_ms } else { 0.0 };

        self.run_deferred(f64::from(dt));
        if self.is_game_over() {
            return;
        }

        self.frame += 1;
        self.scroll_background();
        self.update_player(dt, controls, rng);
        self.handle_enemies(dt, rng);

        let ctx = self.tick_context(dt);
        effects::refresh(&mut self.particles, &ctx);
        effects::refresh(&mut self.collisions, &ctx);
        effects::refresh(&mut self.messages, &ctx);
    }

    /// Advance the deferred-effect clock and apply whatever is due.
    pub fn run_deferred(&mut self, elapsed_ms: f64) {
        for effect in self.scheduler.advance(elapsed_ms) {
            self.apply_deferred(effect);
        }
    }

    fn apply_deferred(&mut self, effect: Deferred) {
        if self.torn_down || self.is_game_over() {
            tracing::info!(?effect, "game already over, dropping deferred effect");
            return;
        }
        match effect {
            Deferred::AddScore(points) => {
                self.score = self.score.saturating_add(points);
                tracing::debug!(score = self.score, "score increased");
            }
            Deferred::GameOver => {
                self.status = GameStatus::GameOver;
                tracing::info!(score = self.score, frame = self.frame, "game over");
            }
        }
    }

    /// Stop the simulation and discard pending effects and entities.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.scheduler.clear();
        self.enemies.clear();
        self.particles.clear();
        self.collisions.clear();
        self.messages.clear();
        tracing::debug!("world torn down");
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(self)
    }

    fn tick_context(&self, dt: f32) -> TickContext {
        TickContext {
            dt,
            world_speed: self.world_speed,
        }
    }

    // ── Background ───────────────────────────────────────────────────────────

    fn scroll_background(&mut self) {
        for layer in &mut self.background.layers {
            if layer.x < -layer.width {
                layer.x = 0.0;
            } else {
                layer.x -= self.world_speed * layer.speed_modifier;
            }
        }
    }

    // ── Player ───────────────────────────────────────────────────────────────

    fn update_player(&mut self, dt: f32, controls: ControlSet, rng: &mut impl Rng) {
        self.resolve_collisions(rng);
        self.handle_input(controls, rng);

        physics::move_horizontal(&mut self.player, controls, &self.config);
        physics::move_vertical(&mut self.player, &self.config);
        physics::advance_animation(&mut self.player.animation, dt);
    }

    /// Switch the active state and rescale the world scroll.
    ///
    /// Requesting the state that is already active changes nothing.
    pub fn set_state(&mut self, state: PlayerState, speed: f32) {
        let from = self.player.state;
        if from == state {
            tracing::trace!(state = state.name(), "already active");
            return;
        }
        self.enter(state);
        self.world_speed = self.config.max_world_speed * speed;
        tracing::debug!(
            from = from.name(),
            to = state.name(),
            world_speed = self.world_speed,
            "state transition"
        );
    }

    /// Apply a state's profile to the player.
    ///
    /// The frame index always restarts at the profile's first frame,
    /// Idle included, so an Idle entry never carries over the previous
    /// state's frame.
    fn enter(&mut self, state: PlayerState) {
        let on_ground = is_on_ground(&self.player, &self.config);
        let profile = state.profile();
        let p = &mut self.player;

        if state == PlayerState::Jumping && on_ground {
            p.velocity_y -= self.config.jump_impulse;
        }

        p.state = state;
        p.sheet = profile.sheet;
        p.width = profile.width;
        p.height = profile.height;
        p.animation.frame = profile.first_frame;
        p.animation.max_frame = profile.max_frame;
        p.animation.fps = profile.fps;
        p.animation.looping = profile.looping;
        if let Some(max_speed) = profile.max_speed {
            p.max_speed = max_speed;
        }
        p.y -= profile.lift;

        if state == PlayerState::Dying {
            p.hit_points = 0;
        }
    }

    fn handle_input(&mut self, controls: ControlSet, rng: &mut impl Rng) {
        let state = self.player.state;

        if let Some(puff) = state.dust() {
            let p = &self.player;
            let x = p.x + p.width * 0.5 + puff.dx;
            let y = p.y + puff.dy;
            self.particles
                .push(Particle::dust(x, y, puff.speed_x, puff.speed_y, rng));
        }

        if state == PlayerState::Dying {
            self.dying_finale(rng);
            return;
        }

        let input = InputSummary::from_controls(controls);
        let kin = Kinematics {
            on_ground: is_on_ground(&self.player, &self.config),
            velocity_y: self.player.velocity_y,
            weight: self.player.weight,
            at_last_frame: self.player.animation.at_last_frame(),
        };
        if let Some(t) = transition(state, &input, &kin) {
            self.set_state(t.to, t.speed);
        }
    }

    /// Once the death animation has played out, blow up every adversary;
    /// when none are left, schedule the end of the game.
    fn dying_finale(&mut self, rng: &mut impl Rng) {
        if !self.player.animation.at_last_frame() {
            return;
        }

        for enemy in self.enemies.iter_mut().filter(|e| !e.retired) {
            enemy.retired = true;
            let (cx, cy) = enemy.bounds().center();
            self.collisions.push(CollisionBurst::new(cx, cy, rng));
        }

        if self.enemies.is_empty() && !self.game_over_scheduled {
            self.game_over_scheduled = true;
            self.scheduler
                .schedule(self.config.game_over_delay_ms, Deferred::GameOver);
            tracing::info!(
                delay_ms = self.config.game_over_delay_ms,
                "arena cleared, game over scheduled"
            );
        }
    }

    // ── Collisions ───────────────────────────────────────────────────────────

    /// Test the player against every live adversary and apply the outcome
    /// for the player's current state.
    ///
    /// Every adversary is judged against the state the tick started with;
    /// running out of hit points forces Dying only once all are resolved.
    pub fn resolve_collisions(&mut self, rng: &mut impl Rng) {
        for i in 0..self.enemies.len() {
            if self.enemies[i].retired {
                continue;
            }
            let enemy_box = self.enemies[i].bounds();
            if !overlaps(&enemy_box, &self.player.bounds()) {
                continue;
            }
            let (cx, cy) = enemy_box.center();

            match self.player.state {
                PlayerState::Fighting => {
                    self.enemies[i].retired = true;
                    self.collisions.push(CollisionBurst::new(cx, cy, rng));
                    self.messages.push(FloatingMessage::new(
                        "+1",
                        enemy_box.x,
                        enemy_box.y,
                        self.config.message_target,
                    ));
                    self.scheduler
                        .schedule(self.config.score_delay_ms, Deferred::AddScore(1));
                    tracing::debug!(x = cx, y = cy, "adversary defeated");
                }
                state if state.is_vulnerable() => {
                    self.enemies[i].retired = true;
                    let splash_x = self.player.x + self.player.width * 0.5;
                    let splash_y = self.player.y;
                    self.particles
                        .insert(0, Particle::splash(splash_x, splash_y, rng));
                    self.collisions.push(CollisionBurst::new(cx, cy, rng));
                    self.player.hit_points = self.player.hit_points.saturating_sub(1);
                    tracing::debug!(
                        state = self.player.state.name(),
                        hit_points = self.player.hit_points,
                        "player hit"
                    );
                }
                // Dashing and Dying pass through untouched.
                _ => {}
            }
        }

        if self.player.hit_points == 0 && self.player.state != PlayerState::Dying {
            self.set_state(PlayerState::Dying, 0.0);
        }
    }

    // ── Adversaries ──────────────────────────────────────────────────────────

    fn handle_enemies(&mut self, dt: f32, rng: &mut impl Rng) {
        if let Some(enemy) = self.spawner.update(dt, &self.config, rng) {
            self.enemies.push(enemy);
        }
        let ctx = self.tick_context(dt);
        effects::refresh(&mut self.enemies, &ctx);
    }
}
