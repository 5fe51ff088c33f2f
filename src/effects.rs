//! Transient entity lifecycle: create → update → retire.
//!
//! Particles, collision bursts, floating messages and adversaries all go
//! through the same per-frame [`refresh`]: update every member, then keep
//! only the ones not marked retired. Nothing is ever removed by index.

use rand::Rng;

use crate::entities::{
    Animation, CollisionBurst, Enemy, FloatingMessage, Particle, ParticleKind,
};
use crate::physics::{advance_animation, step_timer};

/// Per-tick inputs shared by every transient update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickContext {
    /// Elapsed milliseconds.
    pub dt: f32,
    /// Current world scroll speed.
    pub world_speed: f32,
}

pub trait Transient {
    fn update(&mut self, ctx: &TickContext);
    fn is_retired(&self) -> bool;
}

/// Update all members, then drop the retired ones.
pub fn refresh<T: Transient>(items: &mut Vec<T>, ctx: &TickContext) {
    for item in items.iter_mut() {
        item.update(ctx);
    }
    retain_live(items);
}

/// Drop retired members, preserving insertion order.
pub fn retain_live<T: Transient>(items: &mut Vec<T>) {
    items.retain(|item| !item.is_retired());
}

// ── Particles ─────────────────────────────────────────────────────────────────

const PARTICLE_DECAY: f32 = 0.95;
const PARTICLE_MIN_SIZE: f32 = 0.5;
const SPLASH_GRAVITY: f32 = 0.1;

impl Particle {
    /// Motion dust. A missing or zero drift is replaced by a random one.
    pub fn dust(
        x: f32,
        y: f32,
        speed_x: Option<f32>,
        speed_y: Option<f32>,
        rng: &mut impl Rng,
    ) -> Self {
        let size = rng.gen::<f32>() * 20.0 + 20.0;
        let speed_x = speed_x.filter(|v| *v != 0.0).unwrap_or_else(|| rng.gen());
        let speed_y = speed_y.filter(|v| *v != 0.0).unwrap_or_else(|| rng.gen());
        Self {
            kind: ParticleKind::Dust,
            x,
            y,
            size,
            speed_x,
            speed_y,
            retired: false,
        }
    }

    /// Damage splash centred slightly up-left of `(x, y)`.
    pub fn splash(x: f32, y: f32, rng: &mut impl Rng) -> Self {
        let size = rng.gen::<f32>() * 100.0 + 100.0;
        Self {
            kind: ParticleKind::Splash { gravity: 0.0 },
            x: x - size * 0.4,
            y: y - size * 0.4,
            size,
            speed_x: rng.gen::<f32>() * 6.0 - 3.0,
            speed_y: rng.gen::<f32>() * 2.0 + 2.0,
            retired: false,
        }
    }
}

impl Transient for Particle {
    fn update(&mut self, ctx: &TickContext) {
        self.x -= self.speed_x + ctx.world_speed;
        self.y -= self.speed_y;
        self.size *= PARTICLE_DECAY;

        if self.size < PARTICLE_MIN_SIZE {
            self.retired = true;
        }

        if let ParticleKind::Splash { gravity } = &mut self.kind {
            *gravity += SPLASH_GRAVITY;
            self.y += *gravity;
        }
    }

    fn is_retired(&self) -> bool {
        self.retired
    }
}

// ── Collision bursts ──────────────────────────────────────────────────────────

const BURST_FRAME_WIDTH: f32 = 100.0;
const BURST_FRAME_HEIGHT: f32 = 90.0;
const BURST_MAX_FRAME: u32 = 4;
const BURST_FPS: f32 = 15.0;

impl CollisionBurst {
    /// A burst centred on `(cx, cy)`, scaled by a random factor in [0.5, 1.5).
    pub fn new(cx: f32, cy: f32, rng: &mut impl Rng) -> Self {
        let scale = rng.gen::<f32>() + 0.5;
        let width = BURST_FRAME_WIDTH * scale;
        let height = BURST_FRAME_HEIGHT * scale;
        Self {
            x: cx - width * 0.5,
            y: cy - height * 0.5,
            width,
            height,
            animation: Animation::new(BURST_MAX_FRAME, BURST_FPS, false),
            retired: false,
        }
    }
}

impl Transient for CollisionBurst {
    fn update(&mut self, ctx: &TickContext) {
        self.x -= ctx.world_speed;

        // Plays once: the frame runs past the sheet and retires.
        if step_timer(&mut self.animation, ctx.dt) {
            self.animation.frame += 1;
        }

        if self.animation.frame > self.animation.max_frame {
            self.retired = true;
        }
    }

    fn is_retired(&self) -> bool {
        self.retired
    }
}

// ── Floating messages ─────────────────────────────────────────────────────────

const MESSAGE_EASING: f32 = 0.03;
const MESSAGE_LIFETIME: u32 = 100;

impl FloatingMessage {
    pub fn new(text: impl Into<String>, x: f32, y: f32, target: (f32, f32)) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            target_x: target.0,
            target_y: target.1,
            age: 0,
            retired: false,
        }
    }
}

impl Transient for FloatingMessage {
    fn update(&mut self, _ctx: &TickContext) {
        self.x += (self.target_x - self.x) * MESSAGE_EASING;
        self.y += (self.target_y - self.y) * MESSAGE_EASING;
        self.age += 1;

        if self.age > MESSAGE_LIFETIME {
            self.retired = true;
        }
    }

    fn is_retired(&self) -> bool {
        self.retired
    }
}

// ── Adversaries ───────────────────────────────────────────────────────────────

impl Transient for Enemy {
    fn update(&mut self, ctx: &TickContext) {
        advance_animation(&mut self.animation, ctx.dt);

        self.x -= self.speed_x + ctx.world_speed;
        self.y += self.speed_y;

        if self.x + self.width < 0.0 {
            self.retired = true;
        }

        if let Some(flight) = &mut self.flight {
            flight.angle += flight.angle_velocity;
            self.y += flight.angle.sin();
        }
    }

    fn is_retired(&self) -> bool {
        self.retired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ctx() -> TickContext {
        TickContext { dt: 16.0, world_speed: 0.0 }
    }

    #[test]
    fn dust_keeps_explicit_drift() {
        let mut rng = StdRng::seed_from_u64(42);
        let p = Particle::dust(0.0, 0.0, Some(5.0), Some(1.7), &mut rng);
        assert_eq!(p.speed_x, 5.0);
        assert_eq!(p.speed_y, 1.7);
        assert!((20.0..40.0).contains(&p.size));
    }

    #[test]
    fn dust_replaces_zero_drift() {
        let mut rng = StdRng::seed_from_u64(42);
        let p = Particle::dust(0.0, 0.0, Some(0.0), None, &mut rng);
        assert!((0.0..1.0).contains(&p.speed_x));
        assert!((0.0..1.0).contains(&p.speed_y));
    }

    #[test]
    fn particle_decays_until_retired() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut items = vec![Particle::dust(0.0, 0.0, None, None, &mut rng)];
        let mut ticks = 0;
        while !items.is_empty() {
            refresh(&mut items, &ctx());
            ticks += 1;
            assert!(ticks < 200, "particle never retired");
        }
        // 40 × 0.95^n < 0.5 needs at most 86 ticks
        assert!(ticks <= 86);
    }

    #[test]
    fn burst_retires_after_last_frame() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut items = vec![CollisionBurst::new(100.0, 100.0, &mut rng)];
        for _ in 0..200 {
            refresh(&mut items, &TickContext { dt: 40.0, world_speed: 0.0 });
        }
        assert!(items.is_empty());
    }

    #[test]
    fn burst_is_centred() {
        let mut rng = StdRng::seed_from_u64(7);
        let b = CollisionBurst::new(200.0, 300.0, &mut rng);
        assert!((b.x + b.width * 0.5 - 200.0).abs() < 1e-3);
        assert!((b.y + b.height * 0.5 - 300.0).abs() < 1e-3);
    }

    #[test]
    fn message_eases_toward_target_and_expires() {
        let mut items = vec![FloatingMessage::new("+1", 1000.0, 500.0, (90.0, 120.0))];
        refresh(&mut items, &ctx());
        let m = &items[0];
        assert!((m.x - (1000.0 - 910.0 * 0.03)).abs() < 1e-3);
        for _ in 0..99 {
            refresh(&mut items, &ctx());
        }
        assert_eq!(items.len(), 1, "still alive at age 100");
        refresh(&mut items, &ctx());
        assert!(items.is_empty());
    }

    #[test]
    fn retain_live_is_idempotent() {
        let mut items = vec![
            FloatingMessage::new("a", 0.0, 0.0, (0.0, 0.0)),
            FloatingMessage::new("b", 0.0, 0.0, (0.0, 0.0)),
            FloatingMessage::new("c", 0.0, 0.0, (0.0, 0.0)),
        ];
        items[1].retired = true;
        retain_live(&mut items);
        let once: Vec<_> = items.iter().map(|m| m.text.clone()).collect();
        retain_live(&mut items);
        let twice: Vec<_> = items.iter().map(|m| m.text.clone()).collect();
        assert_eq!(once, vec!["a", "c"]);
        assert_eq!(once, twice);
    }
}
