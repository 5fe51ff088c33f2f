//! All simulation entity types: pure data, no logic.
//!
//! Behaviour lives in `physics`, `effects`, `spawner` and `compute`.

use serde::Serialize;

use crate::states::{PlayerState, Sheet};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned box, origin at the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

// ── Animation ─────────────────────────────────────────────────────────────────

/// Sprite-sheet cursor advanced on an fps timer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Animation {
    /// Current column in the sheet.
    pub frame: u32,
    /// Last valid column.
    pub max_frame: u32,
    /// Sheet row.
    pub row: u32,
    pub fps: f32,
    /// Milliseconds accumulated since the last frame change.
    pub timer: f32,
    /// Wrap to 0 after the last frame, or hold on it.
    pub looping: bool,
}

impl Animation {
    pub fn new(max_frame: u32, fps: f32, looping: bool) -> Self {
        Self {
            frame: 0,
            max_frame,
            row: 0,
            fps,
            timer: 0.0,
            looping,
        }
    }

    /// Milliseconds per frame.
    pub fn interval(&self) -> f32 {
        1000.0 / self.fps
    }

    pub fn at_last_frame(&self) -> bool {
        self.frame == self.max_frame
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Horizontal displacement applied next tick.
    pub speed: f32,
    pub max_speed: f32,
    pub velocity_y: f32,
    /// Gravity added to `velocity_y` while airborne.
    pub weight: f32,
    pub hit_points: u32,
    pub state: PlayerState,
    pub sheet: Sheet,
    pub animation: Animation,
}

impl Player {
    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

// ── Adversaries ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EnemyKind {
    Flying,
    Crawling,
}

/// Sinusoidal vertical wobble carried by flying adversaries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FlightProfile {
    pub angle: f32,
    pub angle_velocity: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Leftward speed on top of the world scroll.
    pub speed_x: f32,
    pub speed_y: f32,
    pub flight: Option<FlightProfile>,
    pub animation: Animation,
    pub retired: bool,
}

impl Enemy {
    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

// ── Transient visuals ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum ParticleKind {
    /// Motion dust trailing the player.
    Dust,
    /// Damage splash; carries its own falling speed.
    Splash { gravity: f32 },
}

#[derive(Clone, Debug, Serialize)]
pub struct Particle {
    pub kind: ParticleKind,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub speed_x: f32,
    pub speed_y: f32,
    pub retired: bool,
}

/// Explosion sprite played where an adversary was consumed.
#[derive(Clone, Debug, Serialize)]
pub struct CollisionBurst {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub animation: Animation,
    pub retired: bool,
}

/// Combat text drifting toward a fixed screen point.
#[derive(Clone, Debug, Serialize)]
pub struct FloatingMessage {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub target_x: f32,
    pub target_y: f32,
    /// Ticks lived so far.
    pub age: u32,
    pub retired: bool,
}

// ── Background ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Layer {
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Multiplier on the world speed; larger is closer to the camera.
    pub speed_modifier: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Background {
    pub layers: Vec<Layer>,
}

impl Background {
    pub fn new(width: f32, height: f32) -> Self {
        let layers = [1.0, 1.2, 1.4, 1.8, 2.0]
            .into_iter()
            .map(|speed_modifier| Layer {
                x: 0.0,
                width,
                height,
                speed_modifier,
            })
            .collect();
        Self { layers }
    }
}
