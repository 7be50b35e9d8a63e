//! Entity lifecycle: fill each collection up to its horizon, move what
//! moves, and cull what has fallen out of the live window
//!
//! Every collection goes through the same two routines, parameterized by a
//! [`KindSpec`] descriptor.

use super::state::{Collectible, Dart, EntityId, EntityKind, Laser, Platform, Removed, World};
use crate::consts::FLOAT_SPEED;
use crate::tuning::Tuning;

/// Anything the lifecycle manager tracks by id and world x
pub trait Tracked {
    fn id(&self) -> EntityId;
    /// Reference x used for despawn decisions
    fn world_x(&self) -> f32;
}

impl Tracked for Platform {
    fn id(&self) -> EntityId {
        self.id
    }
    fn world_x(&self) -> f32 {
        self.x
    }
}

impl Tracked for Collectible {
    fn id(&self) -> EntityId {
        self.id
    }
    fn world_x(&self) -> f32 {
        self.x
    }
}

impl Tracked for Laser {
    fn id(&self) -> EntityId {
        self.id
    }
    fn world_x(&self) -> f32 {
        self.x
    }
}

impl Tracked for Dart {
    fn id(&self) -> EntityId {
        self.id
    }
    fn world_x(&self) -> f32 {
        self.pos.x
    }
}

/// When an entity leaves the live window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Despawn {
    /// More than this far behind the player
    Behind(f32),
    /// Outside `player.x ± half_width` on either side
    OutsideView { half_width: f32 },
}

impl Despawn {
    pub fn is_out(&self, x: f32, player_x: f32) -> bool {
        match *self {
            Despawn::Behind(distance) => x < player_x - distance,
            Despawn::OutsideView { half_width } => {
                x < player_x - half_width || x > player_x + half_width
            }
        }
    }
}

/// Per-kind lifecycle descriptor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindSpec {
    pub kind: EntityKind,
    pub cap: usize,
    pub despawn: Despawn,
}

impl KindSpec {
    pub fn for_kind(kind: EntityKind, t: &Tuning) -> Self {
        let (cap, despawn) = match kind {
            EntityKind::Platform => (usize::MAX, Despawn::Behind(t.platforms.despawn_behind)),
            EntityKind::Bear => (t.bears.cap, Despawn::Behind(t.bears.despawn_behind)),
            EntityKind::Orb => (t.orbs.cap, Despawn::Behind(t.orbs.despawn_behind)),
            EntityKind::Laser => (t.lasers.cap, Despawn::Behind(t.lasers.despawn_behind)),
            EntityKind::Dart => (
                t.darts.cap,
                Despawn::OutsideView {
                    half_width: t.view.width / 2.0 + t.darts.despawn_margin,
                },
            ),
        };
        Self { kind, cap, despawn }
    }
}

/// Spawn while the frontier is short of `horizon` and the cap allows
///
/// `spawn` receives the current frontier and returns the new entity plus the
/// next frontier. The frontier never moves backwards; a spawn that fails to
/// advance it ends the pass.
pub fn fill_to_horizon<T: Tracked>(
    items: &mut Vec<T>,
    frontier: &mut f32,
    horizon: f32,
    spec: &KindSpec,
    mut spawn: impl FnMut(f32) -> (T, f32),
) -> usize {
    let mut spawned = 0;
    while *frontier < horizon && items.len() < spec.cap {
        let (item, next) = spawn(*frontier);
        log::debug!(
            "Spawned {:?} {:?} at x {:.0}",
            spec.kind,
            item.id(),
            item.world_x()
        );
        items.push(item);
        spawned += 1;
        if next <= *frontier {
            log::warn!("{:?} frontier stalled at {:.0}", spec.kind, *frontier);
            break;
        }
        *frontier = next;
    }
    spawned
}

/// Remove entities outside the live window, reporting each removal
pub fn cull<T: Tracked>(
    items: &mut Vec<T>,
    spec: &KindSpec,
    player_x: f32,
    removed: &mut Vec<Removed>,
) -> usize {
    let before = items.len();
    items.retain(|item| {
        let out = spec.despawn.is_out(item.world_x(), player_x);
        if out {
            removed.push(Removed {
                id: item.id(),
                kind: spec.kind,
            });
        }
        !out
    });
    let culled = before - items.len();
    if culled > 0 {
        log::debug!("Despawned {} {:?}", culled, spec.kind);
    }
    culled
}

/// Speed multiplier for darts after `elapsed_ms` of round time
pub fn dart_accel(t: &Tuning, elapsed_ms: f64) -> f32 {
    let ramp = (elapsed_ms / t.darts.accel_ramp_ms) as f32;
    1.0 + ramp.min(t.darts.accel_max)
}

/// Per-tick motion and culling for every collection
pub fn advance(world: &mut World, elapsed_ms: f64) {
    for c in world.bears.iter_mut().chain(world.orbs.iter_mut()) {
        c.phase += FLOAT_SPEED;
    }
    for laser in &mut world.lasers {
        laser.x += laser.vx;
    }
    let accel = dart_accel(&world.tuning, elapsed_ms);
    for dart in &mut world.darts {
        dart.pos.x += dart.vx * accel;
    }

    let px = world.player.pos.x;
    let t = &world.tuning;
    let removed = &mut world.removed;
    cull(&mut world.platforms, &KindSpec::for_kind(EntityKind::Platform, t), px, removed);
    cull(&mut world.bears, &KindSpec::for_kind(EntityKind::Bear, t), px, removed);
    cull(&mut world.orbs, &KindSpec::for_kind(EntityKind::Orb, t), px, removed);
    cull(&mut world.lasers, &KindSpec::for_kind(EntityKind::Laser, t), px, removed);
    cull(&mut world.darts, &KindSpec::for_kind(EntityKind::Dart, t), px, removed);
}
