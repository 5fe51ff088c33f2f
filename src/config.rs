//! Tunable simulation constants.
//!
//! `GameConfig::default()` reproduces the stock game. A JSON file can
//! override any subset of fields; missing fields keep their defaults.

use std::path::Path;

use serde::Deserialize;

use crate::GameError;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Logical viewport width in world pixels.
    pub width: f32,
    /// Logical viewport height in world pixels.
    pub height: f32,
    /// Distance between the viewport bottom and the ground line.
    pub ground_margin: f32,
    /// Upper bound of the world scroll speed; transitions scale it.
    pub max_world_speed: f32,

    /// Horizontal travel band for the player.
    pub travel_min: f32,
    pub travel_max: f32,
    /// Player max speed before any state overrides it.
    pub player_max_speed: f32,
    /// Downward acceleration added to vertical velocity each airborne tick.
    pub gravity: f32,
    /// Upward impulse applied when entering Jumping from the ground.
    pub jump_impulse: f32,
    pub max_hit_points: u32,

    /// Spawn interval in ms, re-drawn uniformly from this range every tick.
    pub spawn_interval_min: f32,
    pub spawn_interval_max: f32,
    /// Probability that a spawn is a ground crawler instead of a flyer.
    pub crawler_chance: f64,

    /// Delay before a Fighting kill adds to the score.
    pub score_delay_ms: f64,
    /// Delay between the Dying finale and the game-over flag.
    pub game_over_delay_ms: f64,

    /// Screen position the "+1" messages drift toward.
    pub message_target: (f32, f32),

    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// File the binary writes its trace log to.
    pub log_file: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            ground_margin: 120.0,
            max_world_speed: 1.5,
            travel_min: 0.0,
            travel_max: 300.0,
            player_max_speed: 10.0,
            gravity: 0.5,
            jump_impulse: 25.0,
            max_hit_points: 3,
            spawn_interval_min: 0.0,
            spawn_interval_max: 200_000.0,
            crawler_chance: 0.0,
            score_delay_ms: 1000.0,
            game_over_delay_ms: 2000.0,
            message_target: (90.0, 120.0),
            seed: None,
            log_file: "side_scroller.log".to_string(),
        }
    }
}

impl GameConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GameError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|e| match e {
            GameError::ConfigParse { source, .. } => GameError::ConfigParse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> Result<Self, GameError> {
        let config: Self = serde_json::from_str(text).map_err(|source| GameError::ConfigParse {
            path: "<inline>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(GameError::InvalidConfig {
                field: "width/height",
                reason: format!("viewport must be positive, got {}x{}", self.width, self.height),
            });
        }
        if self.ground_margin < 0.0 || self.ground_margin >= self.height {
            return Err(GameError::InvalidConfig {
                field: "ground_margin",
                reason: format!("must lie in [0, {}), got {}", self.height, self.ground_margin),
            });
        }
        if self.travel_min > self.travel_max {
            return Err(GameError::InvalidConfig {
                field: "travel_min/travel_max",
                reason: format!("{} > {}", self.travel_min, self.travel_max),
            });
        }
        if !(self.spawn_interval_min >= 0.0 && self.spawn_interval_min < self.spawn_interval_max) {
            return Err(GameError::InvalidConfig {
                field: "spawn_interval_min/spawn_interval_max",
                reason: format!(
                    "range [{}, {}) is empty",
                    self.spawn_interval_min, self.spawn_interval_max
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.crawler_chance) {
            return Err(GameError::InvalidConfig {
                field: "crawler_chance",
                reason: format!("must be a probability, got {}", self.crawler_chance),
            });
        }
        if self.max_hit_points == 0 {
            return Err(GameError::InvalidConfig {
                field: "max_hit_points",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Ground line for an actor of the given height.
    pub fn ground_for(&self, actor_height: f32) -> f32 {
        self.height - actor_height - self.ground_margin
    }
}
