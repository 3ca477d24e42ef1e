//! Session configuration
//!
//! Supplied once at startup. Everything is validated before the first tick;
//! an invalid configuration never produces a world.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Configuration rejected at startup
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("player count must be at least 1")]
    NoPlayers,

    #[error("`{field}` must be positive")]
    NonPositive { field: &'static str },

    #[error("player bounce must lie in [0, 1], got {0}")]
    BounceOutOfRange(f32),

    #[error("platform {index} has a non-positive or non-finite size")]
    BadPlatform { index: usize },

    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A static platform, centre plus size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformSpec {
    pub center: Vec2,
    pub size: Vec2,
}

impl PlatformSpec {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            center: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }
}

/// Classic map: a double-height ground strip plus three ledges
pub fn default_platforms() -> Vec<PlatformSpec> {
    vec![
        PlatformSpec::new(400.0, 568.0, 800.0, 64.0),
        PlatformSpec::new(600.0, 400.0, 400.0, 32.0),
        PlatformSpec::new(50.0, 250.0, 400.0, 32.0),
        PlatformSpec::new(750.0, 220.0, 400.0, 32.0),
    ]
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of players (ids 0..player_count)
    pub player_count: u32,
    pub world_width: f32,
    pub world_height: f32,
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Size of the collectible pool (one wave)
    pub collectible_count: u32,
    /// No more hazards spawn once this many exist
    pub max_hazards: u32,
    /// Horizontal speed while a direction is held
    pub move_speed: f32,
    /// Upward speed applied by a grounded jump
    pub jump_impulse: f32,
    /// Points per collectible
    pub collectible_reward: u32,
    /// Player restitution against world bounds
    pub player_bounce: f32,
    /// Spawned hazards get |vx| <= this
    pub hazard_max_speed: f32,
    /// RNG seed for spawn points, collectible bounce and hazard launch
    pub seed: u64,
    pub platforms: Vec<PlatformSpec>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_count: PLAYER_COUNT,
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            gravity: GRAVITY,
            collectible_count: COLLECTIBLE_COUNT,
            max_hazards: MAX_HAZARDS,
            move_speed: MOVE_SPEED,
            jump_impulse: JUMP_IMPULSE,
            collectible_reward: COLLECTIBLE_REWARD,
            player_bounce: PLAYER_BOUNCE,
            hazard_max_speed: HAZARD_MAX_SPEED,
            seed: 0,
            platforms: default_platforms(),
        }
    }
}

impl Settings {
    /// Default settings with a different player count
    pub fn with_players(player_count: u32) -> Self {
        Self {
            player_count,
            ..Self::default()
        }
    }

    /// Check every startup parameter
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.player_count == 0 {
            return Err(SettingsError::NoPlayers);
        }

        let floats = [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("gravity", self.gravity),
            ("move_speed", self.move_speed),
            ("jump_impulse", self.jump_impulse),
            ("hazard_max_speed", self.hazard_max_speed),
        ];
        for (field, value) in floats {
            // NaN fails this comparison too
            if !(value > 0.0 && value.is_finite()) {
                return Err(SettingsError::NonPositive { field });
            }
        }

        let counts = [
            ("collectible_count", self.collectible_count),
            ("max_hazards", self.max_hazards),
            ("collectible_reward", self.collectible_reward),
        ];
        for (field, value) in counts {
            if value == 0 {
                return Err(SettingsError::NonPositive { field });
            }
        }

        if !(0.0..=1.0).contains(&self.player_bounce) {
            return Err(SettingsError::BounceOutOfRange(self.player_bounce));
        }

        for (index, platform) in self.platforms.iter().enumerate() {
            let ok = platform.size.x > 0.0
                && platform.size.y > 0.0
                && platform.size.is_finite()
                && platform.center.is_finite();
            if !ok {
                return Err(SettingsError::BadPlatform { index });
            }
        }

        Ok(())
    }

    /// World extent as a vector
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.world_width, self.world_height)
    }

    /// Parse and validate settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate a JSON settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }
}
