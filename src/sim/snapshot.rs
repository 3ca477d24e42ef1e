//! Read-only view handed to the renderer after each tick

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Anim, GameEvent, GameStatus, World};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub anim: Anim,
    pub score: u32,
    pub tinted: bool,
}

/// Position and visibility of a collectible or hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropView {
    pub id: u32,
    pub pos: Vec2,
    pub active: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub wave: u32,
    pub status: GameStatus,
    pub winner: Option<u32>,
    pub players: Vec<PlayerView>,
    pub collectibles: Vec<PropView>,
    pub hazards: Vec<PropView>,
    pub events: Vec<GameEvent>,
}

impl World {
    /// Capture the completed tick
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.time_ticks,
            wave: self.wave,
            status: self.status,
            winner: self.winner(),
            players: self
                .players
                .iter()
                .map(|p| PlayerView {
                    id: p.id,
                    pos: p.body.pos,
                    vel: p.body.vel,
                    anim: p.anim,
                    score: p.score,
                    tinted: p.tinted,
                })
                .collect(),
            collectibles: self
                .collectibles
                .iter()
                .map(|c| PropView {
                    id: c.id,
                    pos: c.body.pos,
                    active: c.active,
                })
                .collect(),
            hazards: self
                .hazards
                .iter()
                .map(|h| PropView {
                    id: h.id,
                    pos: h.body.pos,
                    active: h.active,
                })
                .collect(),
            events: self.events.clone(),
        }
    }
}

impl Snapshot {
    /// Per-player HUD labels in id order
    pub fn score_labels(&self) -> Vec<String> {
        self.players
            .iter()
            .map(|p| format!("{}:{}", p.id, p.score))
            .collect()
    }
}
