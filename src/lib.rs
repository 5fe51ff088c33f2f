//! Side-scrolling action simulation core.
//!
//! The library holds the whole simulation: a player driven by a ten-state
//! machine, physics integration, adversary spawning, collision resolution,
//! short-lived visual entities and a deferred-effect queue. The terminal
//! binary in `main.rs` feeds it elapsed time and held controls each frame
//! and draws the [`snapshot::FrameSnapshot`] it hands back.

#![deny(unsafe_code)]

pub mod compute;
pub mod config;
pub mod controls;
pub mod display;
pub mod effects;
pub mod entities;
pub mod physics;
pub mod scheduler;
pub mod snapshot;
pub mod spawner;
pub mod states;

/// Errors raised at the edges of the simulation.
///
/// The tick itself never fails; only loading and validating a configuration
/// can.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The configuration file could not be read.
    #[error("failed to read config '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`config::GameConfig`].
    #[error("failed to parse config '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A configuration value is out of range.
    #[error("invalid config value for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

/// Convenience re-exports for driving the simulation.
pub mod prelude {
    pub use crate::compute::World;
    pub use crate::config::GameConfig;
    pub use crate::controls::{Action, Bindings, ControlSet};
    pub use crate::entities::GameStatus;
    pub use crate::snapshot::FrameSnapshot;
    pub use crate::states::PlayerState;
    pub use crate::GameError;
}
