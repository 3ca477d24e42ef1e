//! World state and entity types
//!
//! The [`World`] owns every entity plus the seeded RNG. Components borrow it
//! mutably for the duration of a tick; nothing lives in globals.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use crate::consts::*;
use crate::settings::{Settings, SettingsError};

/// Global game status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Active gameplay
    Running,
    /// Session ended; terminal
    Over { winner: u32 },
}

/// Player animation state, driven by the horizontal intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anim {
    #[default]
    Idle,
    MovingLeft,
    MovingRight,
}

/// Events emitted during the most recent tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A player picked up a collectible; `score` is the player's new total
    Collected {
        player: u32,
        collectible: u32,
        score: u32,
    },
    /// The pool was emptied and respawned; `wave` counts completed waves
    WaveCleared { wave: u32 },
    HazardSpawned { hazard: u32 },
    /// `hit_by` touched a hazard
    GameOver { winner: u32, hit_by: u32 },
    /// A body held non-finite state and was restored
    InvariantRecovered { entity: EntityRef },
}

/// Which body an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityRef {
    Player(u32),
    Collectible(u32),
    Hazard(u32),
}

/// Kinematic body shared by every moving entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Box centre
    pub pos: Vec2,
    pub vel: Vec2,
    /// Full box size
    pub size: Vec2,
    /// Restitution on contact (0 = stop dead, 1 = perfect rebound)
    pub bounce: f32,
    /// Whether gravity accelerates this body
    pub gravity: bool,
    /// Resting on a solid surface after the last resolution
    pub grounded: bool,
    /// Last position known to be finite
    pub last_valid: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2, bounce: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            bounce,
            gravity: true,
            grounded: false,
            last_valid: pos,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Teleport, resetting motion
    pub fn reset_at(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.grounded = false;
        self.last_valid = pos;
    }
}

/// A player avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub body: Body,
    pub score: u32,
    /// Marked when this player ended the game
    pub tinted: bool,
    pub anim: Anim,
}

impl Player {
    pub fn new(id: u32, pos: Vec2, bounce: f32) -> Self {
        Self {
            id,
            body: Body::new(pos, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT), bounce),
            score: 0,
            tinted: false,
            anim: Anim::Idle,
        }
    }

    /// HUD label, e.g. `"2:30"`
    pub fn score_label(&self) -> String {
        format!("{}:{}", self.id, self.score)
    }
}

/// A static platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub aabb: Aabb,
}

/// A collectible star
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub body: Body,
    pub active: bool,
    /// Column the collectible returns to when a wave respawns
    pub spawn_x: f32,
}

impl Collectible {
    /// Reactivate at the top of its column
    pub fn respawn(&mut self) {
        self.body.reset_at(Vec2::new(self.spawn_x, 0.0));
        self.active = true;
    }
}

/// A bouncing hazard (bomb)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub body: Body,
    pub active: bool,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub settings: Settings,
    /// Players, indexed by id
    pub players: Vec<Player>,
    pub platforms: Vec<Platform>,
    /// Collectible pool, indexed by id
    pub collectibles: Vec<Collectible>,
    /// Hazards in spawn order (id == index)
    pub hazards: Vec<Hazard>,
    pub status: GameStatus,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Completed waves
    pub wave: u32,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
}

impl World {
    /// Build a fresh session. Fails only on invalid settings.
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;

        let mut rng = Pcg32::seed_from_u64(settings.seed);

        let spawn_height = (settings.world_height - SPAWN_FLOOR_MARGIN).max(0.0);
        let players = (0..settings.player_count)
            .map(|id| {
                let x = rng.random_range(0.0..=settings.world_width);
                let y = rng.random_range(0.0..=spawn_height);
                Player::new(id, Vec2::new(x, y), settings.player_bounce)
            })
            .collect();

        let platforms = settings
            .platforms
            .iter()
            .enumerate()
            .map(|(id, spec)| Platform {
                id: id as u32,
                aabb: Aabb::from_center(spec.center, spec.size),
            })
            .collect();

        let size = Vec2::new(COLLECTIBLE_WIDTH, COLLECTIBLE_HEIGHT);
        let collectibles = (0..settings.collectible_count)
            .map(|id| {
                // Large pools wrap back across the world
                let spawn_x = (COLLECTIBLE_FIRST_X + COLLECTIBLE_STEP_X * id as f32)
                    % settings.world_width;
                let bounce = rng.random_range(COLLECTIBLE_BOUNCE_MIN..=COLLECTIBLE_BOUNCE_MAX);
                Collectible {
                    id,
                    body: Body::new(Vec2::new(spawn_x, 0.0), size, bounce),
                    active: true,
                    spawn_x,
                }
            })
            .collect();

        log::info!(
            "New session: {} players, {} collectibles, seed {}",
            settings.player_count,
            settings.collectible_count,
            settings.seed
        );

        Ok(Self {
            settings,
            players,
            platforms,
            collectibles,
            hazards: Vec::new(),
            status: GameStatus::Running,
            time_ticks: 0,
            wave: 0,
            events: Vec::new(),
            rng,
        })
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, GameStatus::Over { .. })
    }

    pub fn winner(&self) -> Option<u32> {
        match self.status {
            GameStatus::Over { winner } => Some(winner),
            GameStatus::Running => None,
        }
    }

    /// Game-over banner, present once a winner is declared
    pub fn winner_text(&self) -> Option<String> {
        self.winner().map(|id| format!("player {} wins!", id))
    }

    pub fn player(&self, id: u32) -> Option<&Player> {
        self.players.get(id as usize)
    }

    pub fn player_mut(&mut self, id: u32) -> Option<&mut Player> {
        self.players.get_mut(id as usize)
    }

    /// Number of collectibles still waiting to be picked up
    pub fn active_collectibles(&self) -> usize {
        self.collectibles.iter().filter(|c| c.active).count()
    }

    /// Allocate the next hazard id
    pub(crate) fn next_hazard_id(&self) -> u32 {
        self.hazards.len() as u32
    }
}
