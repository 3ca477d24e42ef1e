//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod collision;
pub mod physics;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use aabb::{Aabb, Axis, Penetration};
pub use collision::ContactResponse;
pub use physics::{InvariantViolation, PhysicsParams, apply_intent, integrate};
pub use snapshot::{PlayerView, PropView, Snapshot};
pub use state::{
    Anim, Body, Collectible, EntityRef, GameEvent, GameStatus, Hazard, Platform, Player, World,
};
pub use tick::{find_winner, tick};
