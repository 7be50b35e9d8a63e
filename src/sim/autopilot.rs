//! Demo autopilot
//!
//! Runs right and dodges: ducks under anything that clears a crouch, jumps
//! anything that doesn't. Good enough for attract mode and soak runs, not a
//! perfect player.

use super::aabb::Aabb;
use super::state::{Player, World};
use super::tick::TickInput;
use crate::tuning::Tuning;

/// How close an incoming hazard gets before the bull reacts
const DUCK_RANGE: f32 = 160.0;
const JUMP_RANGE: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dodge {
    Duck,
    Jump,
}

fn dodge_for(threat: &Aabb, player: &Player, t: &Tuning) -> Dodge {
    if threat.bottom() >= player.pos.y + t.physics.player_duck_height {
        Dodge::Duck
    } else {
        Dodge::Jump
    }
}

/// Decide this tick's input from the current world
pub fn drive(world: &World) -> TickInput {
    let t = &world.tuning;
    let player = &world.player;
    let p = &t.physics;
    // Standing box, whatever the current pose
    let body = Aabb::from_edges(
        player.pos.x + p.hit_box_left,
        player.pos.x + p.hit_box_right,
        player.pos.y,
        player.pos.y + p.player_height,
    );

    // (gap to the hazard along its approach, hazard box)
    let lasers = world.lasers.iter().map(|l| {
        let core = l.bounds().inset_x(t.lasers.hit_inset_left, t.lasers.hit_inset_right);
        (core.left() - body.right(), core)
    });
    let darts = world.darts.iter().map(|d| {
        let b = d.bounds();
        let gap = if d.from_left {
            body.left() - b.right()
        } else {
            b.left() - body.right()
        };
        (gap, b)
    });

    let mut input = TickInput {
        move_right: true,
        ..Default::default()
    };
    for (gap, threat) in lasers.chain(darts) {
        let passed = gap < -(threat.width() + body.width());
        if passed || gap > DUCK_RANGE || !threat.overlaps_y(&body) {
            continue;
        }
        match dodge_for(&threat, player, t) {
            Dodge::Duck => input.duck = true,
            Dodge::Jump if gap <= JUMP_RANGE => input.jump = true,
            Dodge::Jump => {}
        }
    }
    input
}
