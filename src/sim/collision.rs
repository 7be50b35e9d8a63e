//! Collision resolution
//!
//! Two jobs run each tick. Platform support snaps the player onto tops or
//! bumps them off bottoms. Contact detection then reports which bears, orbs
//! and hazards the player's hit box overlaps.

use super::state::{EntityId, HazardKind, Platform, Player, World};
use crate::tuning::Tuning;

/// Resolve the player against platform faces after integration
///
/// `prev_y` is the feet height before this tick's move. Returns the
/// platform the player now stands on, if any. A ceiling bump zeroes vertical
/// velocity but never counts as support.
pub fn resolve_platforms(
    player: &mut Player,
    prev_y: f32,
    platforms: &[Platform],
    t: &Tuning,
) -> Option<EntityId> {
    let p = &t.physics;
    let height = player.height(p);
    let me = player.platform_box(p);

    let bottom_prev = prev_y;
    let bottom_new = player.pos.y;
    let top_prev = prev_y + height;
    let top_new = bottom_new + height;
    let vy = player.vel.y;

    let mut support: Option<(f32, EntityId)> = None;
    let mut hit_ceiling = false;

    for platform in platforms {
        let solid = platform.solid_bounds(&t.platforms);
        if !me.overlaps_x(&solid) {
            continue;
        }
        let top = solid.top();
        let bottom = solid.bottom();

        // Rising head crosses the underside this tick
        if vy > 0.0 && top_prev - bottom < -p.eps && top_new - bottom >= -p.eps {
            player.pos.y = (bottom - height).max(p.floor_height);
            hit_ceiling = true;
            continue;
        }

        let crossed_top = vy <= 0.0 && bottom_prev - top > p.eps && bottom_new - top <= p.eps;
        let sticky_top =
            vy <= 0.0 && bottom_new <= top + p.snap_tol && bottom_new >= top - p.hang_tol;

        if (crossed_top || sticky_top) && support.is_none_or(|(best, _)| top > best) {
            support = Some((top, platform.id));
        }
    }

    if hit_ceiling {
        player.vel.y = 0.0;
    }

    let (top, id) = support?;
    player.pos.y = top;
    player.vel.y = 0.0;
    player.grounded = true;
    Some(id)
}

/// Platform support, then the floor plane, then drift cleanup
pub fn resolve_support(
    player: &mut Player,
    prev_y: f32,
    platforms: &[Platform],
    t: &Tuning,
) -> Option<EntityId> {
    let on = resolve_platforms(player, prev_y, platforms, t);

    if on.is_none() {
        let floor = t.physics.floor_height;
        if player.pos.y <= floor {
            player.pos.y = floor;
            player.vel.y = 0.0;
            player.grounded = true;
        } else {
            player.grounded = false;
        }
    }

    if player.grounded && player.vel.y < 0.0 {
        player.vel.y = 0.0;
    }

    on
}

/// Everything the player touched this tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contacts {
    /// First hazard found (lasers are checked before darts)
    pub hazard: Option<(HazardKind, EntityId)>,
    pub bears: Vec<EntityId>,
    pub orbs: Vec<EntityId>,
}

impl Contacts {
    pub fn is_empty(&self) -> bool {
        self.hazard.is_none() && self.bears.is_empty() && self.orbs.is_empty()
    }
}

/// Overlap tests between the player's hit box and every live entity
pub fn detect_contacts(world: &World) -> Contacts {
    let t = &world.tuning;
    let hit = world.player.hit_box(&t.physics);
    let px = world.player.pos.x;

    // Only lasers near the view are considered
    let range = t.lasers.hit_range;
    let near = |x: f32| x >= px - range && x <= px + t.view.width + range;

    let laser = world
        .lasers
        .iter()
        .filter(|l| near(l.x))
        .find(|l| {
            l.bounds()
                .inset_x(t.lasers.hit_inset_left, t.lasers.hit_inset_right)
                .overlaps(&hit)
        })
        .map(|l| (HazardKind::Laser, l.id));

    let hazard = laser.or_else(|| {
        world
            .darts
            .iter()
            .find(|d| d.bounds().overlaps(&hit))
            .map(|d| (HazardKind::Dart, d.id))
    });

    let touching = |items: &[super::state::Collectible], hit_bob: f32| {
        items
            .iter()
            .filter(|c| c.hit_bounds(hit_bob).overlaps(&hit))
            .map(|c| c.id)
            .collect::<Vec<_>>()
    };

    Contacts {
        hazard,
        bears: touching(&world.bears, t.bears.hit_bob),
        orbs: touching(&world.orbs, t.orbs.hit_bob),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{Collectible, Dart, Laser};
    use glam::Vec2;

    fn platform(id: u32, x: f32, top: f32) -> Platform {
        Platform {
            id: EntityId(id),
            x,
            y: top,
            width: PLATFORM_WIDTH,
            height: PLATFORM_HEIGHT,
        }
    }

    fn falling(prev_y: f32, y: f32, vy: f32) -> (Player, f32) {
        let mut player = Player::spawn(FLOOR_HEIGHT);
        player.pos.y = y;
        player.vel.y = vy;
        player.grounded = false;
        (player, prev_y)
    }

    #[test]
    fn test_swept_landing_snaps_to_top() {
        let t = Tuning::default();
        let (mut player, prev) = falling(210.0, 195.0, -8.0);
        let on = resolve_support(&mut player, prev, &[platform(1, 0.0, 200.0)], &t);
        assert_eq!(on, Some(EntityId(1)));
        assert_eq!(player.pos.y, 200.0);
        assert_eq!(player.vel.y, 0.0);
        assert!(player.grounded);
    }

    #[test]
    fn test_sticky_standing() {
        let t = Tuning::default();
        // Resting on a top: gravity pulls the feet half a unit under it
        let (mut player, prev) = falling(200.0, 199.5, -0.5);
        let on = resolve_support(&mut player, prev, &[platform(1, 0.0, 200.0)], &t);
        assert_eq!(on, Some(EntityId(1)));
        assert_eq!(player.pos.y, 200.0);

        // Already below the top and sunk past the hang tolerance: no support
        let (mut player, prev) = falling(190.0, 200.0 - SUPPORT_HANG_TOL - 1.0, -4.0);
        let on = resolve_platforms(&mut player, prev, &[platform(1, 0.0, 200.0)], &t);
        assert_eq!(on, None);
    }

    #[test]
    fn test_highest_top_wins() {
        let t = Tuning::default();
        let (mut player, prev) = falling(210.0, 195.0, -15.0);
        let platforms = [platform(1, 0.0, 200.0), platform(2, -20.0, 205.0)];
        let on = resolve_support(&mut player, prev, &platforms, &t);
        assert_eq!(on, Some(EntityId(2)));
        assert_eq!(player.pos.y, 205.0);
    }

    #[test]
    fn test_ceiling_bump() {
        let t = Tuning::default();
        let mut player = Player::spawn(FLOOR_HEIGHT);
        player.pos.y = 135.0;
        player.vel.y = 10.0;
        player.grounded = false;
        // Underside at 270: head goes from 265 to 275
        let on = resolve_support(&mut player, 125.0, &[platform(1, 0.0, 300.0)], &t);
        assert_eq!(on, None);
        assert_eq!(player.pos.y, 270.0 - PLAYER_HEIGHT);
        assert_eq!(player.vel.y, 0.0);
        assert!(!player.grounded);
    }

    #[test]
    fn test_rising_never_lands() {
        let t = Tuning::default();
        let (mut player, prev) = falling(195.0, 201.0, 6.0);
        let on = resolve_support(&mut player, prev, &[platform(1, 0.0, 200.0)], &t);
        assert_eq!(on, None);
        assert_eq!(player.pos.y, 201.0);
        assert!(!player.grounded);
    }

    #[test]
    fn test_platform_edges_trimmed() {
        let t = Tuning::default();
        // Solid span starts at x + 92; player box ends at 130
        let (mut player, prev) = falling(210.0, 195.0, -8.0);
        let on = resolve_support(&mut player, prev, &[platform(1, 38.0, 200.0)], &t);
        assert_eq!(on, None);
        assert!(!player.grounded);
    }

    #[test]
    fn test_floor_fallback() {
        let t = Tuning::default();
        let (mut player, prev) = falling(84.0, 76.0, -8.0);
        let on = resolve_support(&mut player, prev, &[], &t);
        assert_eq!(on, None);
        assert_eq!(player.pos.y, FLOOR_HEIGHT);
        assert_eq!(player.vel.y, 0.0);
        assert!(player.grounded);
    }

    fn bear_at(world: &mut World, x: f32) -> EntityId {
        let id = world.ids.next_id();
        world.bears.push(Collectible {
            id,
            x,
            base_y: FLOOR_HEIGHT,
            phase: 0.0,
            bob: BEAR_GROUND_BOB,
            size: BEAR_SIZE,
            on_platform: false,
        });
        id
    }

    #[test]
    fn test_bear_overlap_detected() {
        let mut world = World::new(3, Tuning::default());
        let near = bear_at(&mut world, 50.0);
        bear_at(&mut world, 600.0);
        let contacts = detect_contacts(&world);
        assert_eq!(contacts.bears, vec![near]);
        assert!(contacts.orbs.is_empty());
        assert!(contacts.hazard.is_none());
    }

    fn laser_at(world: &mut World, x: f32) -> EntityId {
        let id = world.ids.next_id();
        world.lasers.push(Laser {
            id,
            x,
            y: FLOOR_HEIGHT + 60.0,
            width: LASER_WIDTH,
            height: LASER_HEIGHT,
            vx: 0.0,
            created_at_ms: 0.0,
        });
        id
    }

    #[test]
    fn test_laser_hit_box_inset() {
        let mut world = World::new(3, Tuning::default());
        // Raw box starts at 110 but the core only at 134, past the hit box
        laser_at(&mut world, 110.0);
        assert!(detect_contacts(&world).hazard.is_none());

        let id = laser_at(&mut world, 100.0);
        assert_eq!(detect_contacts(&world).hazard, Some((HazardKind::Laser, id)));
    }

    #[test]
    fn test_ducking_clears_high_laser() {
        let mut world = World::new(3, Tuning::default());
        let id = world.ids.next_id();
        world.lasers.push(Laser {
            id,
            x: 0.0,
            y: FLOOR_HEIGHT + 100.0,
            width: LASER_WIDTH,
            height: LASER_HEIGHT,
            vx: 0.0,
            created_at_ms: 0.0,
        });
        assert!(detect_contacts(&world).hazard.is_some());
        world.player.ducking = true;
        assert!(detect_contacts(&world).hazard.is_none());
    }

    #[test]
    fn test_dart_hit() {
        let mut world = World::new(3, Tuning::default());
        let id = world.ids.next_id();
        world.darts.push(Dart {
            id,
            pos: Vec2::new(60.0, FLOOR_HEIGHT + 90.0),
            size: Vec2::new(DART_WIDTH, DART_HEIGHT),
            vx: -DART_SPEED,
            from_left: false,
        });
        let contacts = detect_contacts(&world);
        assert_eq!(contacts.hazard, Some((HazardKind::Dart, id)));
        assert!(!contacts.is_empty());
    }

    #[test]
    fn test_laser_outside_hit_range_ignored() {
        let mut tuning = Tuning::default();
        tuning.lasers.hit_range = 50.0;
        let mut world = World::new(3, tuning);
        world.player.pos.x = 1000.0;
        // Core 924..1076 overlaps the hit box, but x is 100 behind the player
        laser_at(&mut world, 900.0);
        assert!(detect_contacts(&world).hazard.is_none());

        world.tuning.lasers.hit_range = LASER_HIT_RANGE;
        assert!(detect_contacts(&world).hazard.is_some());
    }

    #[test]
    fn test_bear_hit_box_bobs_wider_than_sprite() {
        let mut world = World::new(3, Tuning::default());
        world.player.ducking = true;
        let id = bear_at(&mut world, 50.0);
        let bear = &mut world.bears[0];
        bear.base_y = FLOOR_HEIGHT + PLAYER_DUCK_HEIGHT + 10.0;
        bear.phase = -std::f32::consts::FRAC_PI_2;

        // Drawn bottom sits 7 above the crouch, the hit box dips 5 into it
        assert!(!bear.bounds().overlaps(&world.player.hit_box(&world.tuning.physics)));
        assert_eq!(detect_contacts(&world).bears, vec![id]);
    }

    #[test]
    fn test_orb_hit_box_does_not_bob() {
        let mut world = World::new(3, Tuning::default());
        let id = world.ids.next_id();
        world.orbs.push(Collectible {
            id,
            x: 75.0,
            base_y: FLOOR_HEIGHT + PLAYER_HEIGHT + 1.0,
            phase: -std::f32::consts::FRAC_PI_2,
            bob: ORB_BOB,
            size: ORB_SIZE,
            on_platform: false,
        });
        let orb = &world.orbs[0];
        assert!(orb.bounds().overlaps(&world.player.hit_box(&world.tuning.physics)));
        assert!(detect_contacts(&world).orbs.is_empty());
    }
}
