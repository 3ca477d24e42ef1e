//! Per-tick kinematics
//!
//! Arcade model: horizontal velocity is assigned from the intent, vertical
//! velocity accumulates gravity, and world bounds reflect with the body's
//! bounce coefficient.

use glam::Vec2;
use thiserror::Error;

use super::state::{Anim, Body, Player};
use crate::input::{Horizontal, Intent, Vertical};
use crate::settings::Settings;

/// Constants the integrator needs, pulled out of [`Settings`] once per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsParams {
    pub gravity: f32,
    pub move_speed: f32,
    pub jump_impulse: f32,
    /// World extent; bodies are kept inside [0, world.x] x [0, world.y]
    pub world: Vec2,
}

impl PhysicsParams {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            gravity: settings.gravity,
            move_speed: settings.move_speed,
            jump_impulse: settings.jump_impulse,
            world: settings.world_size(),
        }
    }
}

/// Body state that had to be discarded
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("non-finite body state (pos {pos}, vel {vel}); restored to {restored}")]
pub struct InvariantViolation {
    pub pos: Vec2,
    pub vel: Vec2,
    pub restored: Vec2,
}

/// Apply a player's intent to its velocity and animation
///
/// Returns true if a jump was taken. A jump only happens from the ground;
/// the grounded flag comes from the previous tick's resolution.
pub fn apply_intent(player: &mut Player, intent: Intent, params: &PhysicsParams) -> bool {
    let body = &mut player.body;
    match intent.horizontal {
        Horizontal::MoveLeft => {
            body.vel.x = -params.move_speed;
            player.anim = Anim::MovingLeft;
        }
        Horizontal::MoveRight => {
            body.vel.x = params.move_speed;
            player.anim = Anim::MovingRight;
        }
        Horizontal::Idle => {
            body.vel.x = 0.0;
            player.anim = Anim::Idle;
        }
    }

    if intent.vertical == Vertical::Jump && body.grounded {
        body.vel.y = -params.jump_impulse;
        true
    } else {
        false
    }
}

/// Advance one body by `dt`: gravity, motion, world bounds
///
/// Never fails. Non-finite state is replaced by the last valid position at
/// rest, and the discarded state is returned so the caller can log it.
pub fn integrate(body: &mut Body, params: &PhysicsParams, dt: f32) -> Option<InvariantViolation> {
    // Contacts are re-established by this tick's bounds check and resolution
    body.grounded = false;

    if body.gravity {
        body.vel.y += params.gravity * dt;
    }
    body.pos += body.vel * dt;

    if !body.pos.is_finite() || !body.vel.is_finite() {
        let violation = InvariantViolation {
            pos: body.pos,
            vel: body.vel,
            restored: body.last_valid,
        };
        body.pos = body.last_valid;
        body.vel = Vec2::ZERO;
        clamp_to_world(body, params.world);
        return Some(violation);
    }

    clamp_to_world(body, params.world);
    body.last_valid = body.pos;
    None
}

/// Keep the body's box inside the world, reflecting velocity on contact
///
/// Only velocity heading out of the world is reflected. Touching the world
/// floor counts as grounded.
pub fn clamp_to_world(body: &mut Body, world: Vec2) {
    let half = body.size * 0.5;
    // A body larger than the world is pinned to the near edge
    let max = (world - half).max(half);

    if body.pos.x < half.x {
        body.pos.x = half.x;
        if body.vel.x < 0.0 {
            body.vel.x = -body.vel.x * body.bounce;
        }
    } else if body.pos.x > max.x {
        body.pos.x = max.x;
        if body.vel.x > 0.0 {
            body.vel.x = -body.vel.x * body.bounce;
        }
    }

    if body.pos.y < half.y {
        body.pos.y = half.y;
        if body.vel.y < 0.0 {
            body.vel.y = -body.vel.y * body.bounce;
        }
    } else if body.pos.y > max.y {
        body.pos.y = max.y;
        if body.vel.y > 0.0 {
            body.vel.y = -body.vel.y * body.bounce;
        }
        body.grounded = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::input::{RawInput, map_intent};

    fn params() -> PhysicsParams {
        PhysicsParams::from_settings(&Settings::default())
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(0, Vec2::new(x, y), PLAYER_BOUNCE)
    }

    #[test]
    fn test_horizontal_velocity_is_assigned() {
        let p = params();
        let mut player = player_at(400.0, 100.0);

        let right = map_intent(RawInput {
            right: true,
            ..Default::default()
        });
        apply_intent(&mut player, right, &p);
        assert_eq!(player.body.vel.x, MOVE_SPEED);
        assert_eq!(player.anim, Anim::MovingRight);

        // Assignment, not accumulation
        apply_intent(&mut player, right, &p);
        assert_eq!(player.body.vel.x, MOVE_SPEED);

        let left = map_intent(RawInput {
            left: true,
            ..Default::default()
        });
        apply_intent(&mut player, left, &p);
        assert_eq!(player.body.vel.x, -MOVE_SPEED);
        assert_eq!(player.anim, Anim::MovingLeft);

        apply_intent(&mut player, Intent::default(), &p);
        assert_eq!(player.body.vel.x, 0.0);
        assert_eq!(player.anim, Anim::Idle);
    }

    #[test]
    fn test_jump_requires_ground() {
        let p = params();
        let jump = map_intent(RawInput {
            jump: true,
            ..Default::default()
        });

        let mut player = player_at(400.0, 100.0);
        player.body.vel.y = 42.0;
        assert!(!apply_intent(&mut player, jump, &p));
        assert_eq!(player.body.vel.y, 42.0);

        player.body.grounded = true;
        assert!(apply_intent(&mut player, jump, &p));
        assert_eq!(player.body.vel.y, -JUMP_IMPULSE);
    }

    #[test]
    fn test_gravity_accumulates() {
        let p = params();
        let mut body = Body::new(Vec2::new(400.0, 100.0), Vec2::splat(10.0), 0.0);

        integrate(&mut body, &p, SIM_DT);
        integrate(&mut body, &p, SIM_DT);
        assert!((body.vel.y - 2.0 * GRAVITY * SIM_DT).abs() < 1e-3);
        assert!(body.pos.y > 100.0);
    }

    #[test]
    fn test_gravity_disabled() {
        let p = params();
        let mut body = Body::new(Vec2::new(400.0, 100.0), Vec2::splat(10.0), 1.0);
        body.gravity = false;
        body.vel = Vec2::new(50.0, 20.0);

        integrate(&mut body, &p, SIM_DT);
        assert_eq!(body.vel, Vec2::new(50.0, 20.0));
    }

    #[test]
    fn test_floor_bounce_scales_velocity() {
        let p = params();
        let mut body = Body::new(Vec2::new(400.0, 590.0), Vec2::new(32.0, 48.0), 0.2);
        body.vel.y = 100.0;

        integrate(&mut body, &p, SIM_DT);
        let impact = 100.0 + GRAVITY * SIM_DT;
        assert_eq!(body.aabb().max.y, WORLD_HEIGHT);
        assert!((body.vel.y + 0.2 * impact).abs() < 1e-3);
        assert!(body.grounded);
    }

    #[test]
    fn test_side_wall_reflects() {
        let p = params();
        let mut body = Body::new(Vec2::new(5.0, 300.0), Vec2::splat(14.0), 1.0);
        body.gravity = false;
        body.vel = Vec2::new(-200.0, 0.0);

        integrate(&mut body, &p, SIM_DT);
        assert_eq!(body.pos.x, 7.0);
        assert_eq!(body.vel.x, 200.0);
    }

    #[test]
    fn test_clamp_keeps_inward_velocity() {
        // Respawned at the very top but already falling
        let mut body = Body::new(Vec2::new(100.0, 0.0), Vec2::new(24.0, 22.0), 0.5);
        body.vel.y = 30.0;

        clamp_to_world(&mut body, Vec2::new(WORLD_WIDTH, WORLD_HEIGHT));
        assert_eq!(body.pos.y, 11.0);
        assert_eq!(body.vel.y, 30.0);
    }

    #[test]
    fn test_non_finite_state_restored() {
        let p = params();
        let mut body = Body::new(Vec2::new(100.0, 100.0), Vec2::splat(10.0), 0.0);
        integrate(&mut body, &p, SIM_DT);
        let good = body.pos;

        body.vel = Vec2::new(f32::NAN, 0.0);
        let violation = integrate(&mut body, &p, SIM_DT).expect("violation reported");
        assert_eq!(violation.restored, good);
        assert_eq!(body.pos, good);
        assert_eq!(body.vel, Vec2::ZERO);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn airborne_jump_leaves_vertical_velocity(
                vy in -500.0f32..500.0,
                left in any::<bool>(),
                right in any::<bool>()
            ) {
                let mut player = player_at(400.0, 100.0);
                player.body.vel.y = vy;
                let intent = map_intent(RawInput { left, right, jump: true });

                prop_assert!(!apply_intent(&mut player, intent, &params()));
                prop_assert_eq!(player.body.vel.y, vy);
            }
        }
    }
}
