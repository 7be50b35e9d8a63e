//! World generation
//!
//! Platforms, bears and orbs are laid out ahead of the player along three
//! independent x frontiers. Lasers are gated on distance travelled and darts
//! on round time; both wait out the opening grace period.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::lifecycle::{KindSpec, fill_to_horizon};
use super::state::{Collectible, Dart, EntityIds, EntityKind, Laser, Platform, World};
use crate::consts::{SURFACE_WINDOW_EXTRA, SURFACE_WINDOW_START, SURFACE_WIGGLE};
use crate::tuning::{PlatformTuning, SurfaceSpawn, Tuning};

/// Height above the floor for a uniform roll in [0, 1)
pub fn platform_level(t: &PlatformTuning, roll: f32) -> f32 {
    t.level_cumulative
        .iter()
        .position(|&edge| roll < edge)
        .and_then(|i| t.levels.get(i))
        .or(t.levels.last())
        .copied()
        .unwrap_or(0.0)
}

/// Build one platform with its left edge at `x`
pub fn spawn_platform(rng: &mut Pcg32, ids: &mut EntityIds, t: &Tuning, x: f32) -> Platform {
    let level = platform_level(&t.platforms, rng.random::<f32>());
    Platform {
        id: ids.next_id(),
        x,
        y: t.physics.floor_height + level,
        width: t.platforms.width,
        height: t.platforms.height,
    }
}

/// Where a bear or orb ends up: center x, resting surface, and whether that
/// surface is a platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub base_y: f32,
    pub on_platform: bool,
}

/// Pick a surface for a collectible planned at `planned_x`
///
/// Platforms overlapping the forward window are eligible. With probability
/// `platform_prob` one of them is chosen at random and the x is pulled inside
/// its usable span, then nudged by a small wiggle. Otherwise the collectible
/// stays on the floor at the planned x.
pub fn place_on_surface(
    rng: &mut Pcg32,
    spec: &SurfaceSpawn,
    planned_x: f32,
    player_x: f32,
    platforms: &[Platform],
    t: &Tuning,
) -> Placement {
    let ahead_start = player_x + SURFACE_WINDOW_START;
    let ahead_end = player_x + t.view.width + SURFACE_WINDOW_EXTRA;
    let margin = spec.platform_margin;
    let candidates: Vec<&Platform> = platforms
        .iter()
        .filter(|p| p.x + margin < ahead_end && p.x + p.width - margin > ahead_start)
        .collect();

    if candidates.is_empty() || rng.random::<f32>() >= spec.platform_prob {
        return Placement {
            x: planned_x,
            base_y: t.physics.floor_height,
            on_platform: false,
        };
    }

    let p = candidates[rng.random_range(0..candidates.len())];
    let inset = spec.edge_inset();
    let (left, right) = (p.x + inset, p.x + p.width - inset);
    let clamp = |x: f32| x.max(left).min(right);

    let wiggle = rng.random_range(-SURFACE_WIGGLE..=SURFACE_WIGGLE) as f32;
    Placement {
        x: clamp(clamp(planned_x) + wiggle),
        base_y: p.top(),
        on_platform: true,
    }
}

/// Build one bear or orb; returns it with the next frontier
fn spawn_collectible(
    rng: &mut Pcg32,
    ids: &mut EntityIds,
    spec: &SurfaceSpawn,
    frontier: f32,
    player_x: f32,
    platforms: &[Platform],
    t: &Tuning,
) -> (Collectible, f32) {
    let planned = frontier.max(player_x + spec.min_ahead);
    let placed = place_on_surface(rng, spec, planned, player_x, platforms, t);
    let bob = if placed.on_platform {
        spec.platform_bob
    } else {
        spec.ground_bob
    };
    let collectible = Collectible {
        id: ids.next_id(),
        x: placed.x,
        base_y: placed.base_y,
        phase: rng.random::<f32>() * TAU,
        bob,
        size: spec.size,
        on_platform: placed.on_platform,
    };
    // A platform clamp may pull x behind the plan; the frontier must not follow
    let gap = spec.min_gap + rng.random::<f32>() * (spec.max_gap - spec.min_gap);
    let next = placed.x.max(planned) + gap;
    (collectible, next)
}

/// Extend platforms, bears and orbs up to their horizons
pub fn extend_surfaces(world: &mut World) {
    let px = world.player.pos.x;
    let t = &world.tuning;
    let rng = &mut world.rng;
    let ids = &mut world.ids;

    let spec = KindSpec::for_kind(EntityKind::Platform, t);
    let horizon = px + t.view.width + t.platforms.lookahead;
    fill_to_horizon(
        &mut world.platforms,
        &mut world.frontiers.platform_x,
        horizon,
        &spec,
        |x| {
            let platform = spawn_platform(rng, ids, t, x);
            let next = x + t.platforms.spacing + rng.random::<f32>() * t.platforms.spacing_jitter;
            (platform, next)
        },
    );

    let platforms = &world.platforms;
    for (kind, items, frontier, surface) in [
        (EntityKind::Bear, &mut world.bears, &mut world.frontiers.bear_x, &t.bears),
        (EntityKind::Orb, &mut world.orbs, &mut world.frontiers.orb_x, &t.orbs),
    ] {
        let spec = KindSpec::for_kind(kind, t);
        let horizon = px + t.view.width + surface.lookahead;
        fill_to_horizon(items, frontier, horizon, &spec, |x| {
            spawn_collectible(rng, ids, surface, x, px, platforms, t)
        });
    }
}

/// Spawn a laser once the player passes the laser frontier
pub fn maybe_spawn_laser(world: &mut World, elapsed_ms: f64) -> bool {
    let t = &world.tuning;
    let lt = &t.lasers;
    let px = world.player.pos.x;
    if elapsed_ms <= t.round.hazard_grace_ms
        || px <= world.frontiers.laser_x
        || world.lasers.len() >= lt.cap
    {
        return false;
    }

    let rng = &mut world.rng;
    let floor = t.physics.floor_height;
    let y = floor + lt.min_y + rng.random::<f32>() * (lt.max_y - lt.min_y);
    let laser = Laser {
        id: world.ids.next_id(),
        x: px + t.view.width + lt.spawn_offset,
        y,
        width: lt.width,
        height: lt.height,
        vx: -lt.speed,
        created_at_ms: elapsed_ms,
    };
    log::debug!("Spawned laser {:?} at ({:.0}, {:.0})", laser.id, laser.x, laser.y);
    world.lasers.push(laser);

    let next = px + lt.gap + rng.random::<f32>() * lt.gap_jitter;
    world.frontiers.laser_x = world.frontiers.laser_x.max(next);
    true
}

/// Fire a dart from a random edge once its timer is due
///
/// The timer is rescheduled whenever it comes due, even when the cap
/// blocks the spawn.
pub fn maybe_spawn_dart(world: &mut World, elapsed_ms: f64) -> bool {
    let t = &world.tuning;
    let dt = &t.darts;
    if elapsed_ms <= t.round.hazard_grace_ms || elapsed_ms < world.frontiers.dart_at_ms {
        return false;
    }

    let rng = &mut world.rng;
    let mut spawned = false;
    if world.darts.len() < dt.cap {
        let player = &world.player;
        let floor = t.physics.floor_height;
        let from_left = rng.random::<f32>() < 0.5;
        let aim = if player.ducking {
            dt.aim_ducking
        } else {
            dt.aim_standing
        };
        let target_y = (player.pos.y + aim)
            .max(floor + dt.aim_min)
            .min(floor + dt.aim_max);
        let half_view = t.view.width / 2.0;
        let (x, vx) = if from_left {
            (player.pos.x - half_view - dt.edge_offset, dt.speed)
        } else {
            (player.pos.x + half_view + dt.edge_offset, -dt.speed)
        };
        let dart = Dart {
            id: world.ids.next_id(),
            pos: Vec2::new(x, target_y),
            size: Vec2::new(dt.width, dt.height),
            vx,
            from_left,
        };
        log::debug!(
            "Spawned dart {:?} from the {} at y {:.0}",
            dart.id,
            if from_left { "left" } else { "right" },
            target_y
        );
        world.darts.push(dart);
        spawned = true;
    }

    let delay = dt.min_delay_ms + rng.random::<f64>() * (dt.max_delay_ms - dt.min_delay_ms);
    world.frontiers.dart_at_ms = elapsed_ms + delay;
    spawned
}

/// One generator pass
pub fn extend_world(world: &mut World, elapsed_ms: f64) {
    extend_surfaces(world);
    maybe_spawn_laser(world, elapsed_ms);
    maybe_spawn_dart(world, elapsed_ms);
}
