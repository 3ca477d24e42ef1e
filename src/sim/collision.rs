//! Collision detection and response
//!
//! Solid contacts (platforms, other players) push bodies apart along the
//! axis of least penetration. Overlap contacts (collectibles, hazards) never
//! move anything; they only report which pairs touch so the rules engine can
//! act on them. All passes walk entities in id order.

use glam::Vec2;

use super::aabb::{Aabb, Axis, Penetration};
use super::physics::clamp_to_world;
use super::state::{Body, Collectible, Hazard, Platform, Player};
use crate::consts::{SETTLE_SPEED, SOLVER_ITERATIONS};

/// What a solid contact does to the velocity along the contact axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactResponse {
    /// Zero the component
    Stop,
    /// Reflect scaled by the body's bounce coefficient
    Bounce,
}

/// Zero or reflect the velocity component along `pen`, but only if the body is
/// moving into the surface
fn respond(body: &mut Body, pen: &Penetration, response: ContactResponse) {
    let v = match pen.axis {
        Axis::X => &mut body.vel.x,
        Axis::Y => &mut body.vel.y,
    };
    // Moving into the surface means moving against the push direction
    if *v * pen.sign >= 0.0 {
        return;
    }
    *v = match response {
        ContactResponse::Stop => 0.0,
        ContactResponse::Bounce => {
            let rebound = -*v * body.bounce;
            if rebound.abs() < SETTLE_SPEED { 0.0 } else { rebound }
        }
    };
}

/// Push a body out of one box that does not move
///
/// Resolving onto a top face marks the body grounded.
fn push_out(body: &mut Body, obstacle: &Aabb, response: ContactResponse) -> bool {
    let Some(pen) = body.aabb().penetration(obstacle) else {
        return false;
    };
    body.pos += pen.push();
    respond(body, &pen, response);
    if pen.is_top_face() {
        body.grounded = true;
    }
    true
}

/// Push one body out of every platform it overlaps
///
/// Returns true if any contact was resolved.
pub fn resolve_body_platforms(
    body: &mut Body,
    platforms: &[Platform],
    response: ContactResponse,
) -> bool {
    let mut hit = false;
    for platform in platforms {
        hit |= push_out(body, &platform.aabb, response);
    }
    hit
}

/// Pass 1: players against platforms
pub fn resolve_players_platforms(players: &mut [Player], platforms: &[Platform]) -> bool {
    let mut hit = false;
    for player in players.iter_mut() {
        hit |= resolve_body_platforms(&mut player.body, platforms, ContactResponse::Stop);
    }
    hit
}

/// Separate a pair of players, half the push each
///
/// The player left on top becomes grounded. Returns true if they overlapped.
pub fn resolve_player_pair(a: &mut Player, b: &mut Player) -> bool {
    let Some(pen) = a.body.aabb().penetration(&b.body.aabb()) else {
        return false;
    };
    let half = pen.push() * 0.5;
    a.body.pos += half;
    b.body.pos -= half;

    let mirrored = Penetration {
        sign: -pen.sign,
        ..pen
    };
    respond(&mut a.body, &pen, ContactResponse::Stop);
    respond(&mut b.body, &mirrored, ContactResponse::Stop);

    if pen.is_top_face() {
        a.body.grounded = true;
    } else if mirrored.is_top_face() {
        b.body.grounded = true;
    }
    true
}

/// Pass 2: every unordered pair of players, lower id first
pub fn resolve_player_pairs(players: &mut [Player]) -> bool {
    let mut hit = false;
    for i in 0..players.len() {
        let (head, tail) = players.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            hit |= resolve_player_pair(a, b);
        }
    }
    hit
}

/// Passes 1 and 2, then a settle that leaves no solid overlap
///
/// The symmetric passes repeat a bounded number of times and handle the
/// common cases. Whatever they leave behind in a pile is cleared by
/// [`settle_players`].
pub fn resolve_solids(players: &mut [Player], platforms: &[Platform], world: Vec2) {
    for _ in 0..SOLVER_ITERATIONS {
        resolve_players_platforms(players, platforms);
        if !resolve_player_pairs(players) {
            break;
        }
        for player in players.iter_mut() {
            clamp_to_world(&mut player.body, world);
        }
    }
    settle_players(players, platforms, world);
}

/// Place players one at a time, lowest first (ties by id)
///
/// Each player is pushed out of the platforms, the world edges and the
/// players already placed. Placed players never move again, so a push cannot
/// undo an earlier one and every pair ends separated. A player that cannot
/// slide free is lifted onto whatever it overlaps.
pub fn settle_players(players: &mut [Player], platforms: &[Platform], world: Vec2) {
    let mut order: Vec<usize> = (0..players.len()).collect();
    order.sort_by(|&a, &b| {
        let (pa, pb) = (&players[a], &players[b]);
        pb.body
            .aabb()
            .max
            .y
            .total_cmp(&pa.body.aabb().max.y)
            .then(pa.id.cmp(&pb.id))
    });

    let mut placed: Vec<Aabb> = Vec::with_capacity(players.len());
    for idx in order {
        let obstacles: Vec<Aabb> = platforms
            .iter()
            .map(|p| p.aabb)
            .chain(placed.iter().copied())
            .collect();
        let id = players[idx].id;
        let body = &mut players[idx].body;

        clamp_to_world(body, world);
        let mut free = false;
        for _ in 0..2 * obstacles.len() + 2 {
            if !obstacles
                .iter()
                .any(|o| push_out(body, o, ContactResponse::Stop))
            {
                free = true;
                break;
            }
            clamp_to_world(body, world);
        }

        if !free && obstacles.iter().any(|o| body.aabb().overlaps(o)) {
            log::debug!("Player {} wedged; lifting", id);
            lift_clear(body, &obstacles);
            if body.aabb().min.y < 0.0 {
                log::warn!("Player {} has no room above the pile", id);
                clamp_to_world(body, world);
            }
        }
        placed.push(body.aabb());
    }
}

/// Raise a body straight up until it rests on top of everything it overlapped
fn lift_clear(body: &mut Body, obstacles: &[Aabb]) {
    let half_height = body.size.y * 0.5;
    // Each step moves strictly upward past at least one box
    for _ in 0..=obstacles.len() {
        let bounds = body.aabb();
        let Some(top) = obstacles
            .iter()
            .filter(|o| bounds.overlaps(o))
            .map(|o| o.min.y)
            .reduce(f32::min)
        else {
            return;
        };
        body.pos.y = top - half_height;
        body.vel.y = body.vel.y.min(0.0);
        body.grounded = true;
    }
}

/// Pass 3 detection: (player id, collectible id) pairs touching right now
///
/// Only active collectibles are considered. Pairs come out player-major in id
/// order, so when two players reach the same star the lower id gets it.
pub fn collectible_overlaps(players: &[Player], collectibles: &[Collectible]) -> Vec<(u32, u32)> {
    let mut pairs = Vec::new();
    for player in players {
        let bounds = player.body.aabb();
        for c in collectibles.iter().filter(|c| c.active) {
            if bounds.overlaps(&c.body.aabb()) {
                pairs.push((player.id, c.id));
            }
        }
    }
    pairs
}

/// Pass 4 detection: first (player id, hazard id) pair touching, in id order
pub fn first_hazard_hit(players: &[Player], hazards: &[Hazard]) -> Option<(u32, u32)> {
    players.iter().find_map(|player| {
        let bounds = player.body.aabb();
        hazards
            .iter()
            .filter(|h| h.active)
            .find(|h| bounds.overlaps(&h.body.aabb()))
            .map(|h| (player.id, h.id))
    })
}

/// Pass 5: collectibles and hazards bounce off platforms
pub fn resolve_props_platforms(
    collectibles: &mut [Collectible],
    hazards: &mut [Hazard],
    platforms: &[Platform],
) {
    for c in collectibles.iter_mut().filter(|c| c.active) {
        resolve_body_platforms(&mut c.body, platforms, ContactResponse::Bounce);
    }
    for h in hazards.iter_mut().filter(|h| h.active) {
        resolve_body_platforms(&mut h.body, platforms, ContactResponse::Bounce);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::aabb::Aabb;

    fn ground() -> Vec<Platform> {
        vec![Platform {
            id: 0,
            aabb: Aabb::from_center(Vec2::new(400.0, 568.0), Vec2::new(800.0, 64.0)),
        }]
    }

    fn player_at(id: u32, x: f32, y: f32) -> Player {
        Player::new(id, Vec2::new(x, y), PLAYER_BOUNCE)
    }

    #[test]
    fn test_player_lands_on_platform() {
        let platforms = ground();
        // Feet 3px into the ground top at y=536
        let mut players = vec![player_at(0, 400.0, 536.0 - 24.0 + 3.0)];
        players[0].body.vel.y = 80.0;

        assert!(resolve_players_platforms(&mut players, &platforms));
        let body = &players[0].body;
        assert!((body.aabb().max.y - 536.0).abs() < 1e-3);
        assert_eq!(body.vel.y, 0.0);
        assert!(body.grounded);
    }

    #[test]
    fn test_side_contact_is_not_grounded() {
        let platforms = vec![Platform {
            id: 0,
            aabb: Aabb::from_center(Vec2::new(600.0, 400.0), Vec2::new(400.0, 32.0)),
        }];
        // Overlapping the left edge by 2px, vertically centred on the ledge
        let mut players = vec![player_at(0, 400.0 - 16.0 + 2.0, 400.0)];
        players[0].body.vel.x = MOVE_SPEED;

        resolve_players_platforms(&mut players, &platforms);
        assert!((players[0].body.aabb().max.x - 400.0).abs() < 1e-3);
        assert_eq!(players[0].body.vel.x, 0.0);
        assert!(!players[0].body.grounded);
    }

    #[test]
    fn test_player_pair_split_evenly() {
        let mut a = player_at(0, 100.0, 300.0);
        let mut b = player_at(1, 120.0, 300.0);
        a.body.vel.x = MOVE_SPEED;
        b.body.vel.x = -MOVE_SPEED;

        assert!(resolve_player_pair(&mut a, &mut b));
        // 12px overlap, 6px each
        assert!((a.body.pos.x - 94.0).abs() < 1e-3);
        assert!((b.body.pos.x - 126.0).abs() < 1e-3);
        assert_eq!(a.body.vel.x, 0.0);
        assert_eq!(b.body.vel.x, 0.0);
        assert!(!a.body.aabb().overlaps(&b.body.aabb()));
    }

    #[test]
    fn test_player_standing_on_player_is_grounded() {
        let mut lower = player_at(0, 100.0, 300.0);
        let mut upper = player_at(1, 100.0, 300.0 - 46.0);

        resolve_player_pair(&mut lower, &mut upper);
        assert!(upper.body.grounded);
        assert!(!lower.body.grounded);
    }

    #[test]
    fn test_resolve_solids_leaves_no_overlap() {
        let platforms = ground();
        // Two players dropped into each other just above the ground
        let mut players = vec![player_at(0, 300.0, 505.0), player_at(1, 310.0, 490.0)];

        resolve_solids(&mut players, &platforms, Vec2::new(WORLD_WIDTH, WORLD_HEIGHT));

        let a = players[0].body.aabb();
        let b = players[1].body.aabb();
        let eps = 1e-3;
        let shrink = |bb: Aabb| Aabb {
            min: bb.min + Vec2::splat(eps),
            max: bb.max - Vec2::splat(eps),
        };
        assert!(!shrink(a).overlaps(&shrink(b)));
        for p in &players {
            assert!(!shrink(p.body.aabb()).overlaps(&platforms[0].aabb));
        }
    }

    /// Depth of the shallower overlap axis, 0 when apart
    fn overlap_depth(a: &Aabb, b: &Aabb) -> f32 {
        let x = a.max.x.min(b.max.x) - a.min.x.max(b.min.x);
        let y = a.max.y.min(b.max.y) - a.min.y.max(b.min.y);
        x.min(y).max(0.0)
    }

    #[test]
    fn test_corner_pile_fully_separated() {
        let platforms = ground();
        let world = Vec2::new(WORLD_WIDTH, WORLD_HEIGHT);
        // Eight players crammed into the left corner, all pressing left
        let mut players: Vec<Player> = (0..8)
            .map(|id| {
                let mut p = player_at(id, 16.0 + 2.0 * id as f32, 536.0 - 24.0);
                p.body.vel.x = -MOVE_SPEED;
                p
            })
            .collect();

        resolve_solids(&mut players, &platforms, world);

        for (i, a) in players.iter().enumerate() {
            let bounds = a.body.aabb();
            assert!(bounds.min.x >= 0.0 && bounds.max.x <= WORLD_WIDTH);
            assert!(bounds.min.y >= 0.0 && bounds.max.y <= WORLD_HEIGHT);
            assert!(overlap_depth(&bounds, &platforms[0].aabb) < 1e-3);
            for b in &players[i + 1..] {
                let depth = overlap_depth(&bounds, &b.body.aabb());
                assert!(depth < 1e-3, "players {} and {} overlap by {}", a.id, b.id, depth);
            }
        }
    }

    #[test]
    fn test_wedged_player_is_lifted_on_top() {
        let platforms = ground();
        let world = Vec2::new(WORLD_WIDTH, WORLD_HEIGHT);
        // A third player dropped into a 16px gap between two standing ones
        let mut players = vec![
            player_at(0, 16.0, 512.0),
            player_at(1, 64.0, 512.0),
            player_at(2, 36.0, 508.0),
        ];
        players[2].body.vel.y = 60.0;

        settle_players(&mut players, &platforms, world);

        let top = &players[2].body;
        assert!((top.aabb().max.y - (536.0 - PLAYER_HEIGHT)).abs() < 1e-3);
        assert!(top.grounded);
        assert_eq!(top.vel.y, 0.0);
        assert_eq!(players[0].body.pos, Vec2::new(16.0, 512.0));
        assert_eq!(players[1].body.pos, Vec2::new(64.0, 512.0));
    }

    #[test]
    fn test_collectible_overlaps_in_id_order() {
        let players = vec![player_at(0, 100.0, 100.0), player_at(1, 100.0, 100.0)];
        let size = Vec2::new(COLLECTIBLE_WIDTH, COLLECTIBLE_HEIGHT);
        let mut collectibles: Vec<Collectible> = (0..3)
            .map(|id| Collectible {
                id,
                body: Body::new(Vec2::new(90.0 + id as f32 * 10.0, 100.0), size, 0.5),
                active: true,
                spawn_x: 0.0,
            })
            .collect();
        collectibles[1].active = false;

        let pairs = collectible_overlaps(&players, &collectibles);
        assert_eq!(pairs, vec![(0, 0), (0, 2), (1, 0), (1, 2)]);
    }

    #[test]
    fn test_first_hazard_hit_prefers_lowest_player() {
        let players = vec![
            player_at(0, 100.0, 100.0),
            player_at(1, 500.0, 100.0),
            player_at(2, 700.0, 100.0),
        ];
        let hazards: Vec<Hazard> = [700.0, 500.0]
            .iter()
            .enumerate()
            .map(|(id, &x)| Hazard {
                id: id as u32,
                body: Body::new(Vec2::new(x, 100.0), Vec2::splat(HAZARD_SIZE), 1.0),
                active: true,
            })
            .collect();

        assert_eq!(first_hazard_hit(&players, &hazards), Some((1, 1)));
        assert_eq!(first_hazard_hit(&players[..1], &hazards), None);
    }

    #[test]
    fn test_hazard_bounces_off_platform() {
        let platforms = ground();
        let mut hazards = vec![Hazard {
            id: 0,
            body: Body::new(Vec2::new(400.0, 536.0 - 7.0 + 1.0), Vec2::splat(HAZARD_SIZE), 1.0),
            active: true,
        }];
        hazards[0].body.gravity = false;
        hazards[0].body.vel = Vec2::new(50.0, 120.0);

        resolve_props_platforms(&mut [], &mut hazards, &platforms);
        let body = &hazards[0].body;
        assert!((body.aabb().max.y - 536.0).abs() < 1e-3);
        assert_eq!(body.vel, Vec2::new(50.0, -120.0));
    }

    #[test]
    fn test_slow_rebound_settles() {
        let platforms = ground();
        let mut body = Body::new(Vec2::new(400.0, 536.0 - 11.0 + 0.5), Vec2::new(24.0, 22.0), 0.5);
        body.vel.y = 5.0;

        resolve_body_platforms(&mut body, &platforms, ContactResponse::Bounce);
        assert_eq!(body.vel.y, 0.0);
        assert!(body.grounded);
    }
}
