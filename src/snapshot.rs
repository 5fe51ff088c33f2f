//! Per-frame draw data handed to the renderer.
//!
//! A snapshot is a plain copy of everything visible. The renderer may draw
//! it however it likes; nothing it does feeds back into the simulation.

use serde::Serialize;

use crate::compute::World;
use crate::entities::{
    CollisionBurst, Enemy, FloatingMessage, GameStatus, Layer, Particle, Rect,
};
use crate::states::{PlayerState, Sheet};

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    pub bounds: Rect,
    pub state: PlayerState,
    pub sheet: Sheet,
    pub frame: u32,
    pub row: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    /// Logical viewport size the coordinates live in.
    pub width: f32,
    pub height: f32,
    pub ground_y: f32,
    pub player: PlayerView,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub collisions: Vec<CollisionBurst>,
    pub messages: Vec<FloatingMessage>,
    pub layers: Vec<Layer>,
    pub score: u32,
    pub hit_points: u32,
    pub max_hit_points: u32,
    pub world_speed: f32,
    pub debug: bool,
    pub status: GameStatus,
}

impl FrameSnapshot {
    pub fn capture(world: &World) -> Self {
        let p = &world.player;
        Self {
            frame: world.frame,
            width: world.config.width,
            height: world.config.height,
            ground_y: world.config.height - world.config.ground_margin,
            player: PlayerView {
                bounds: p.bounds(),
                state: p.state,
                sheet: p.sheet,
                frame: p.animation.frame,
                row: p.animation.row,
            },
            enemies: world.enemies.clone(),
            particles: world.particles.clone(),
            collisions: world.collisions.clone(),
            messages: world.messages.clone(),
            layers: world.background.layers.clone(),
            score: world.score,
            hit_points: p.hit_points,
            max_hit_points: world.config.max_hit_points,
            world_speed: world.world_speed,
            debug: world.debug,
            status: world.status,
        }
    }

    /// Serialize for external renderers or debugging dumps.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
