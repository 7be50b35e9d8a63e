//! Player integration: input, gravity, damping and the speed boost
//!
//! Explicit Euler at one step per display frame. Velocities are in world
//! units per tick, so there is no `dt`.

use super::state::{Facing, GameEvent, Player, SpeedBoost};
use super::tick::TickInput;
use crate::tuning::{Tuning, ViewTuning};

/// Horizontal intent resolved from the held directions (left wins ties)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Left,
    Right,
    None,
}

impl Heading {
    pub fn from_input(input: &TickInput) -> Self {
        if input.move_left {
            Heading::Left
        } else if input.move_right {
            Heading::Right
        } else {
            Heading::None
        }
    }
}

/// Current horizontal speed including any active boost
pub fn move_speed(t: &Tuning, boost: &SpeedBoost) -> f32 {
    let mult = if boost.is_active() {
        t.round.boost_multiplier
    } else {
        1.0
    };
    t.physics.horizontal_speed * mult
}

/// Advance the player one tick and return the feet height before the move
///
/// Support against platforms and the floor is resolved afterwards by
/// [`super::collision::resolve_support`].
pub fn integrate(
    player: &mut Player,
    boost: &mut SpeedBoost,
    input: &TickInput,
    elapsed_ms: f64,
    t: &Tuning,
    events: &mut Vec<GameEvent>,
) -> f32 {
    let p = &t.physics;
    player.ducking = input.duck;

    if boost.expire(elapsed_ms) {
        events.push(GameEvent::BoostExpired);
    }

    let speed = move_speed(t, boost);
    player.vel.x = match Heading::from_input(input) {
        Heading::Left => -speed,
        Heading::Right => speed,
        Heading::None => player.vel.x * p.damping,
    };

    // Jump impulse only from support; no double jump
    if input.jump && player.grounded {
        player.vel.y = p.jump_force;
        player.grounded = false;
        events.push(GameEvent::Jumped);
    }

    player.vel.y += p.gravity;

    let prev_y = player.pos.y;
    player.pos += player.vel;

    // World origin is a hard left wall
    if player.pos.x < 0.0 {
        player.pos.x = 0.0;
        player.vel.x = player.vel.x.max(0.0);
    }

    if player.vel.x < 0.0 {
        player.facing = Facing::Left;
    } else if player.vel.x > 0.0 {
        player.facing = Facing::Right;
    }
    animate(player, &t.view);

    prev_y
}

/// Step the run cycle while moving or ducking
fn animate(player: &mut Player, view: &ViewTuning) {
    if player.ducking || player.vel.x.abs() > 0.5 {
        player.anim_ticks += 1;
        if player.anim_ticks % view.run_frame_ticks.max(1) == 0 && !player.ducking {
            player.run_frame = (player.run_frame + 1) % 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn grounded_player() -> Player {
        Player::spawn(FLOOR_HEIGHT)
    }

    #[test]
    fn test_run_right_snaps_to_speed() {
        let t = Tuning::default();
        let mut player = grounded_player();
        let mut boost = SpeedBoost::default();
        let mut events = Vec::new();
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        integrate(&mut player, &mut boost, &input, 0.0, &t, &mut events);
        assert_eq!(player.vel.x, HORIZONTAL_SPEED);
        assert_eq!(player.pos.x, HORIZONTAL_SPEED);
        assert_eq!(player.facing, Facing::Right);
    }

    #[test]
    fn test_left_wins_over_right() {
        let input = TickInput {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        assert_eq!(Heading::from_input(&input), Heading::Left);
    }

    #[test]
    fn test_release_decays_exponentially() {
        let t = Tuning::default();
        let mut player = grounded_player();
        player.pos.x = 100.0;
        player.vel.x = 5.0;
        let mut boost = SpeedBoost::default();
        let mut events = Vec::new();
        let idle = TickInput::default();
        integrate(&mut player, &mut boost, &idle, 0.0, &t, &mut events);
        assert!((player.vel.x - 4.0).abs() < 1e-6);
        integrate(&mut player, &mut boost, &idle, 0.0, &t, &mut events);
        assert!((player.vel.x - 3.2).abs() < 1e-6);
        assert!(player.vel.x > 0.0);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let t = Tuning::default();
        let mut player = grounded_player();
        let mut boost = SpeedBoost::default();
        let mut events = Vec::new();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        integrate(&mut player, &mut boost, &jump, 0.0, &t, &mut events);
        assert_eq!(player.vel.y, JUMP_FORCE + GRAVITY);
        assert!(!player.grounded);
        assert_eq!(events, vec![GameEvent::Jumped]);

        // Airborne: a second press does nothing
        integrate(&mut player, &mut boost, &jump, 0.0, &t, &mut events);
        assert_eq!(player.vel.y, JUMP_FORCE + 2.0 * GRAVITY);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_gravity_applies_while_grounded() {
        let t = Tuning::default();
        let mut player = grounded_player();
        let mut boost = SpeedBoost::default();
        let mut events = Vec::new();
        let prev = integrate(&mut player, &mut boost, &TickInput::default(), 0.0, &t, &mut events);
        assert_eq!(prev, FLOOR_HEIGHT);
        assert_eq!(player.vel.y, GRAVITY);
        assert_eq!(player.pos.y, FLOOR_HEIGHT + GRAVITY);
    }

    #[test]
    fn test_boost_multiplies_and_expires() {
        let t = Tuning::default();
        let mut player = grounded_player();
        let mut boost = SpeedBoost::default();
        boost.activate(0.0, SPEEDBOOST_DURATION_MS);
        let mut events = Vec::new();
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        integrate(&mut player, &mut boost, &input, 100.0, &t, &mut events);
        assert!((player.vel.x - HORIZONTAL_SPEED * SPEEDBOOST_MULTIPLIER).abs() < 1e-5);

        integrate(&mut player, &mut boost, &input, SPEEDBOOST_DURATION_MS, &t, &mut events);
        assert_eq!(player.vel.x, HORIZONTAL_SPEED);
        assert!(!boost.is_active());
        assert_eq!(events, vec![GameEvent::BoostExpired]);
    }

    #[test]
    fn test_left_wall_clamp() {
        let t = Tuning::default();
        let mut player = grounded_player();
        let mut boost = SpeedBoost::default();
        let mut events = Vec::new();
        let input = TickInput {
            move_left: true,
            ..Default::default()
        };
        integrate(&mut player, &mut boost, &input, 0.0, &t, &mut events);
        assert_eq!(player.pos.x, 0.0);
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_run_frame_toggles() {
        let t = Tuning::default();
        let mut player = grounded_player();
        let mut boost = SpeedBoost::default();
        let mut events = Vec::new();
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        for _ in 0..RUN_FRAME_TICKS {
            integrate(&mut player, &mut boost, &input, 0.0, &t, &mut events);
        }
        assert_eq!(player.run_frame, 1);
    }
}
