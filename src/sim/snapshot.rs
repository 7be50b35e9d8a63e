//! Per-tick render snapshot
//!
//! A read-only copy of everything a presenter needs: world-space boxes with
//! stable ids, the player pose, round status, and a camera that maps world
//! coordinates to a y-down view.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::round::{EndCause, RoundPhase};
use super::state::{EntityId, EntityKind, Facing, Removed, World};

/// Camera centered horizontally on the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World x shown at the horizontal middle of the view
    pub center_x: f32,
    pub width: f32,
    pub height: f32,
    pub parallax: f32,
}

impl Camera {
    /// World point (y up) to view point (y down, origin top-left)
    pub fn world_to_view(&self, p: Vec2) -> Vec2 {
        Vec2::new(self.width / 2.0 + (p.x - self.center_x), self.height - p.y)
    }

    /// Top-left corner of a world box in view space
    pub fn box_to_view(&self, b: &Aabb) -> Vec2 {
        self.world_to_view(Vec2::new(b.left(), b.top()))
    }

    /// Horizontal background offset
    pub fn background_offset(&self) -> f32 {
        -self.center_x * self.parallax
    }
}

/// One live entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    /// World-space box, including any idle bob
    pub bounds: Aabb,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerPose {
    /// Left edge (x) and feet (y)
    pub pos: Vec2,
    pub vel: Vec2,
    pub height: f32,
    pub grounded: bool,
    pub ducking: bool,
    pub facing: Facing,
    pub run_frame: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostView {
    pub active: bool,
    pub remaining_ms: f64,
}

/// Everything the render bridge needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: RoundPhase,
    pub end_cause: Option<EndCause>,
    pub score: u32,
    pub elapsed_ms: f64,
    pub remaining_ms: f64,
    pub display_seconds: u32,
    pub player: PlayerPose,
    pub boost: BoostView,
    pub camera: Camera,
    pub platforms: Vec<EntityView>,
    pub bears: Vec<EntityView>,
    pub orbs: Vec<EntityView>,
    pub lasers: Vec<EntityView>,
    pub darts: Vec<EntityView>,
    /// Entities that left the world since the last simulated tick
    pub removed: Vec<Removed>,
}

impl Snapshot {
    pub fn capture(world: &World, now: f64) -> Self {
        let t = &world.tuning;
        let elapsed_ms = world.round.elapsed_ms(now);
        let player = &world.player;

        Self {
            tick: world.time_ticks,
            phase: world.round.phase,
            end_cause: world.round.end_cause,
            score: world.round.score,
            elapsed_ms,
            remaining_ms: world.round.remaining_ms(now),
            display_seconds: world.round.display_seconds(now),
            player: PlayerPose {
                pos: player.pos,
                vel: player.vel,
                height: player.height(&t.physics),
                grounded: player.grounded,
                ducking: player.ducking,
                facing: player.facing,
                run_frame: player.run_frame,
            },
            boost: BoostView {
                active: world.boost.is_active(),
                remaining_ms: world.boost.remaining_ms(elapsed_ms),
            },
            camera: Camera {
                center_x: player.pos.x,
                width: t.view.width,
                height: t.view.height,
                parallax: t.view.parallax,
            },
            platforms: views(EntityKind::Platform, world.platforms.iter().map(|p| (p.id, p.bounds()))),
            bears: views(EntityKind::Bear, world.bears.iter().map(|c| (c.id, c.bounds()))),
            orbs: views(EntityKind::Orb, world.orbs.iter().map(|c| (c.id, c.bounds()))),
            lasers: views(EntityKind::Laser, world.lasers.iter().map(|l| (l.id, l.bounds()))),
            darts: views(EntityKind::Dart, world.darts.iter().map(|d| (d.id, d.bounds()))),
            removed: world.removed.clone(),
        }
    }

    /// All live entities in draw order
    pub fn entities(&self) -> impl Iterator<Item = &EntityView> {
        self.platforms
            .iter()
            .chain(&self.bears)
            .chain(&self.orbs)
            .chain(&self.lasers)
            .chain(&self.darts)
    }
}

fn views(kind: EntityKind, items: impl Iterator<Item = (EntityId, Aabb)>) -> Vec<EntityView> {
    items
        .map(|(id, bounds)| EntityView { id, kind, bounds })
        .collect()
}
