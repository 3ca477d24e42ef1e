//! Fixed timestep simulation tick
//!
//! Core game loop that advances the world deterministically:
//! intents, integration, solid resolution, then the game rules for
//! collectibles and hazards.

use glam::Vec2;
use rand::Rng;

use super::collision::{
    collectible_overlaps, first_hazard_hit, resolve_props_platforms, resolve_solids,
};
use super::physics::{PhysicsParams, apply_intent, integrate};
use super::state::{Anim, Body, EntityRef, GameEvent, GameStatus, Hazard, Player, World};
use crate::consts::*;
use crate::input::{RawInput, map_intent};

/// Advance the world by one tick
///
/// `inputs` is indexed by player id; players without an entry stand still.
/// Once the game is over this does nothing at all.
pub fn tick(world: &mut World, inputs: &[RawInput], dt: f32) {
    if world.is_over() {
        return;
    }

    world.events.clear();
    world.time_ticks += 1;

    let params = PhysicsParams::from_settings(&world.settings);

    for player in &mut world.players {
        let raw = inputs.get(player.id as usize).copied().unwrap_or_default();
        apply_intent(player, map_intent(raw), &params);
    }

    // Kinematics
    let mut recovered = Vec::new();
    for player in &mut world.players {
        if let Some(violation) = integrate(&mut player.body, &params, dt) {
            recovered.push((EntityRef::Player(player.id), violation));
        }
    }
    for c in world.collectibles.iter_mut().filter(|c| c.active) {
        if let Some(violation) = integrate(&mut c.body, &params, dt) {
            recovered.push((EntityRef::Collectible(c.id), violation));
        }
    }
    for h in world.hazards.iter_mut().filter(|h| h.active) {
        if let Some(violation) = integrate(&mut h.body, &params, dt) {
            recovered.push((EntityRef::Hazard(h.id), violation));
        }
    }
    for (entity, violation) in recovered {
        log::warn!("Recovered {:?}: {}", entity, violation);
        world.events.push(GameEvent::InvariantRecovered { entity });
    }

    // Solid contacts: platforms then player pairs
    resolve_solids(&mut world.players, &world.platforms, params.world);

    // Overlap contacts
    collect_pass(world);

    if let Some((player, hazard)) = first_hazard_hit(&world.players, &world.hazards) {
        end_game(world, player, hazard);
        return;
    }

    resolve_props_platforms(&mut world.collectibles, &mut world.hazards, &world.platforms);
}

impl World {
    /// One tick at the fixed frame timestep
    pub fn update(&mut self, inputs: &[RawInput]) {
        tick(self, inputs, SIM_DT);
    }
}

/// Hand out collectibles to the players touching them
///
/// A collectible taken this pass stays taken even if the wave respawns it
/// mid-pass, so at most one wave clear happens per tick.
fn collect_pass(world: &mut World) {
    let pairs = collectible_overlaps(&world.players, &world.collectibles);
    if pairs.is_empty() {
        return;
    }

    let reward = world.settings.collectible_reward;
    let mut taken = vec![false; world.collectibles.len()];
    let mut cleared = false;

    for (player_id, collectible_id) in pairs {
        let idx = collectible_id as usize;
        if taken[idx] || !world.collectibles[idx].active {
            continue;
        }
        taken[idx] = true;
        world.collectibles[idx].active = false;

        let player = &mut world.players[player_id as usize];
        player.score = player.score.saturating_add(reward);
        let score = player.score;
        let collector_x = player.body.pos.x;

        log::debug!("Player {} collected {} (score {})", player_id, collectible_id, score);
        world.events.push(GameEvent::Collected {
            player: player_id,
            collectible: collectible_id,
            score,
        });

        if !cleared && world.active_collectibles() == 0 {
            cleared = true;
            clear_wave(world, collector_x);
        }
    }
}

/// Respawn the whole pool and, if under the cap, launch a hazard
fn clear_wave(world: &mut World, collector_x: f32) {
    for c in &mut world.collectibles {
        c.respawn();
    }
    world.wave += 1;
    log::info!("Wave {} cleared", world.wave);
    world.events.push(GameEvent::WaveCleared { wave: world.wave });

    if (world.hazards.len() as u32) < world.settings.max_hazards {
        spawn_hazard(world, collector_x);
    } else {
        log::debug!("Hazard cap {} reached", world.settings.max_hazards);
    }
}

/// Launch a hazard on the half of the world away from the collector
fn spawn_hazard(world: &mut World, collector_x: f32) {
    let width = world.settings.world_width;
    let half_width = width / 2.0;
    let max_speed = world.settings.hazard_max_speed;

    let x = if collector_x < half_width {
        world.rng.random_range(half_width..=width)
    } else {
        world.rng.random_range(0.0..=half_width)
    };
    let inset = HAZARD_SIZE / 2.0;
    let x = x.clamp(inset, (width - inset).max(inset));
    let vx = world.rng.random_range(-max_speed..=max_speed);

    let id = world.next_hazard_id();
    let pos = Vec2::new(x, HAZARD_SPAWN_Y);
    let mut body = Body::new(pos, Vec2::splat(HAZARD_SIZE), HAZARD_BOUNCE);
    body.gravity = false;
    body.vel = Vec2::new(vx, HAZARD_SPAWN_VY);

    log::debug!("Hazard {} spawned at x={:.1} vx={:.1}", id, x, vx);
    world.hazards.push(Hazard {
        id,
        body,
        active: true,
    });
    world.events.push(GameEvent::HazardSpawned { hazard: id });
}

/// Running -> Over: mark the player who touched the hazard and pick a winner
fn end_game(world: &mut World, hit_by: u32, hazard: u32) {
    if let Some(player) = world.player_mut(hit_by) {
        player.tinted = true;
        player.anim = Anim::Idle;
    }

    let winner = find_winner(&world.players);
    world.status = GameStatus::Over { winner };
    world.events.push(GameEvent::GameOver { winner, hit_by });
    log::info!(
        "Player {} hit hazard {} on tick {}; player {} wins!",
        hit_by,
        hazard,
        world.time_ticks,
        winner
    );
}

/// Highest score wins; on a tie the first player scanned (lowest id) keeps it
pub fn find_winner(players: &[Player]) -> u32 {
    let mut winner = 0;
    let mut best = 0;
    for player in players {
        if player.score > best {
            winner = player.id;
            best = player.score;
        }
    }
    winner
}
