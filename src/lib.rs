//! Star Scramble - A multiplayer 2D star-collecting platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game rules)
//! - `input`: Device-independent per-player intents and the key binding table
//! - `settings`: Validated session configuration

pub mod input;
pub mod settings;
pub mod sim;

pub use input::{Horizontal, Intent, Key, RawInput, Vertical, map_intent};
pub use settings::{PlatformSpec, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per rendered frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    pub const GRAVITY: f32 = 300.0;

    /// Player defaults
    pub const PLAYER_COUNT: u32 = 5;
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;
    pub const PLAYER_BOUNCE: f32 = 0.2;
    pub const MOVE_SPEED: f32 = 160.0;
    pub const JUMP_IMPULSE: f32 = 330.0;
    /// Players never spawn inside this band above the floor
    pub const SPAWN_FLOOR_MARGIN: f32 = 200.0;

    /// Collectible (star) defaults
    pub const COLLECTIBLE_COUNT: u32 = 12;
    pub const COLLECTIBLE_REWARD: u32 = 10;
    pub const COLLECTIBLE_WIDTH: f32 = 24.0;
    pub const COLLECTIBLE_HEIGHT: f32 = 22.0;
    pub const COLLECTIBLE_FIRST_X: f32 = 12.0;
    pub const COLLECTIBLE_STEP_X: f32 = 70.0;
    pub const COLLECTIBLE_BOUNCE_MIN: f32 = 0.4;
    pub const COLLECTIBLE_BOUNCE_MAX: f32 = 0.8;

    /// Hazard (bomb) defaults
    pub const MAX_HAZARDS: u32 = 16;
    pub const HAZARD_SIZE: f32 = 14.0;
    pub const HAZARD_MAX_SPEED: f32 = 200.0;
    pub const HAZARD_SPAWN_Y: f32 = 16.0;
    pub const HAZARD_SPAWN_VY: f32 = 20.0;
    pub const HAZARD_BOUNCE: f32 = 1.0;

    /// Rebounds slower than this come to rest instead of jittering on a platform
    pub const SETTLE_SPEED: f32 = 10.0;
    /// Symmetric solid passes are repeated at most this many times per tick
    /// before the final settle
    pub const SOLVER_ITERATIONS: u32 = 4;
}
