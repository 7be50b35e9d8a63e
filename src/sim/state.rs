//! Game state and core simulation types
//!
//! Everything one round mutates lives in [`World`]. Subsystems receive it by
//! `&mut` and hold no state of their own.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::round::{EndCause, Round};
use crate::tuning::{PhysicsTuning, PlatformTuning, Tuning};

/// Stable identity of a spawned entity (never reused within a world)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Entity collections the world tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Platform,
    Bear,
    Orb,
    Laser,
    Dart,
}

/// Which hazard ended the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    Laser,
    Dart,
}

impl HazardKind {
    pub fn entity_kind(self) -> EntityKind {
        match self {
            HazardKind::Laser => EntityKind::Laser,
            HazardKind::Dart => EntityKind::Dart,
        }
    }
}

/// Direction the player sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// The player-controlled bull
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Left edge of the sprite (x) and feet (y)
    pub pos: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
    pub ducking: bool,
    pub facing: Facing,
    /// Ticks spent animating (running or ducking)
    pub anim_ticks: u32,
    /// Current run cycle frame (0 or 1)
    pub run_frame: u8,
}

impl Player {
    /// Standing on the floor at the world origin
    pub fn spawn(floor: f32) -> Self {
        Self {
            pos: Vec2::new(0.0, floor),
            vel: Vec2::ZERO,
            grounded: true,
            ducking: false,
            facing: Facing::Right,
            anim_ticks: 0,
            run_frame: 0,
        }
    }

    /// Box height, shrunk while ducking
    pub fn height(&self, t: &PhysicsTuning) -> f32 {
        if self.ducking {
            t.player_duck_height
        } else {
            t.player_height
        }
    }

    /// Box tested against platforms
    pub fn platform_box(&self, t: &PhysicsTuning) -> Aabb {
        Aabb::from_edges(
            self.pos.x + t.platform_box_left,
            self.pos.x + t.platform_box_right,
            self.pos.y,
            self.pos.y + self.height(t),
        )
    }

    /// Box tested against bears, orbs and hazards
    pub fn hit_box(&self, t: &PhysicsTuning) -> Aabb {
        Aabb::from_edges(
            self.pos.x + t.hit_box_left,
            self.pos.x + t.hit_box_right,
            self.pos.y,
            self.pos.y + self.height(t),
        )
    }
}

/// A floating platform; `y` is its top surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y - self.height
    }

    /// Full visual extent
    pub fn bounds(&self) -> Aabb {
        Aabb::from_edges(self.x, self.x + self.width, self.bottom(), self.top())
    }

    /// Extent the player can collide with (edges trimmed to match the art)
    pub fn solid_bounds(&self, t: &PlatformTuning) -> Aabb {
        self.bounds()
            .inset_x(t.collision_left_inset, t.collision_right_inset)
    }
}

/// A bear or speed orb sitting on the floor or a platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: EntityId,
    /// Horizontal center
    pub x: f32,
    /// Surface the collectible rests on
    pub base_y: f32,
    /// Idle bob phase (radians)
    pub phase: f32,
    /// Idle bob amplitude
    pub bob: f32,
    pub size: f32,
    pub on_platform: bool,
}

impl Collectible {
    /// Current bottom after the idle bob
    pub fn bob_y(&self) -> f32 {
        self.base_y + self.phase.sin() * self.bob
    }

    /// Drawn box
    pub fn bounds(&self) -> Aabb {
        Aabb::centered_on(self.x, self.bob_y(), self.size, self.size)
    }

    /// Contact box, bobbing by `hit_bob` instead of the drawn amplitude
    pub fn hit_bounds(&self, hit_bob: f32) -> Aabb {
        let bottom = self.base_y + self.phase.sin() * hit_bob;
        Aabb::centered_on(self.x, bottom, self.size, self.size)
    }
}

/// A large laser beam hanging in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub id: EntityId,
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Horizontal velocity per tick (negative = toward the player)
    pub vx: f32,
    /// Round-elapsed time at creation
    pub created_at_ms: f64,
}

impl Laser {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_edges(self.x, self.x + self.width, self.y, self.y + self.height)
    }
}

/// A small dart fired from one edge of the view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dart {
    pub id: EntityId,
    /// Bottom-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Base horizontal velocity per tick before acceleration
    pub vx: f32,
    pub from_left: bool,
}

impl Dart {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.pos + self.size)
    }
}

/// Timed horizontal speed multiplier
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SpeedBoost {
    /// Round-elapsed deadline, `None` when inactive
    pub until_ms: Option<f64>,
}

impl SpeedBoost {
    pub fn is_active(&self) -> bool {
        self.until_ms.is_some()
    }

    pub fn remaining_ms(&self, elapsed_ms: f64) -> f64 {
        self.until_ms.map_or(0.0, |until| (until - elapsed_ms).max(0.0))
    }

    /// Start (or extend) the boost
    pub fn activate(&mut self, elapsed_ms: f64, duration_ms: f64) {
        self.until_ms = Some(elapsed_ms + duration_ms);
    }

    /// Drop the boost once its deadline has passed; returns true if it expired
    pub fn expire(&mut self, elapsed_ms: f64) -> bool {
        match self.until_ms {
            Some(until) if elapsed_ms >= until => {
                self.until_ms = None;
                true
            }
            _ => false,
        }
    }
}

/// Generation frontiers; each only ever moves forward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frontiers {
    pub platform_x: f32,
    pub bear_x: f32,
    pub orb_x: f32,
    /// Player x that must be passed before the next laser
    pub laser_x: f32,
    /// Round-elapsed time of the next dart attempt
    pub dart_at_ms: f64,
}

impl Frontiers {
    /// Frontiers for a round starting with the player at `player_x`
    pub fn initial(t: &Tuning, player_x: f32) -> Self {
        let first = |spec: &crate::tuning::SurfaceSpawn| match spec.first_ahead {
            Some(ahead) => player_x + ahead,
            None => spec.first_x,
        };
        Self {
            platform_x: t.platforms.first_x,
            bear_x: first(&t.bears),
            orb_x: first(&t.orbs),
            laser_x: player_x + t.lasers.first_gap,
            dart_at_ms: t.round.hazard_grace_ms,
        }
    }
}

/// Discrete notifications for audio/haptics and the host UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted,
    Jumped,
    AteCreature { id: EntityId },
    CollectedOrb { id: EntityId },
    HitHazard { kind: HazardKind },
    BoostExpired,
    RoundEnded { cause: EndCause, score: u32 },
}

/// An entity that left the world this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removed {
    pub id: EntityId,
    pub kind: EntityKind,
}

/// Monotonic id source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    /// Allocate a new entity ID
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }
}

/// The whole simulation: player, entity collections, frontiers and round
#[derive(Debug, Clone)]
pub struct World {
    /// Seed of the current round
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Ticks simulated in the current round
    pub time_ticks: u64,
    pub round: Round,
    pub player: Player,
    /// Sorted by x (spawn order)
    pub platforms: Vec<Platform>,
    pub bears: Vec<Collectible>,
    pub orbs: Vec<Collectible>,
    pub lasers: Vec<Laser>,
    pub darts: Vec<Dart>,
    pub boost: SpeedBoost,
    pub frontiers: Frontiers,
    pub ids: EntityIds,
    /// Events raised since the host last drained them
    pub events: Vec<GameEvent>,
    /// Entities removed during the last tick or lifecycle call
    pub removed: Vec<Removed>,
}

impl World {
    /// Create an idle world with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let player = Player::spawn(tuning.physics.floor_height);
        let frontiers = Frontiers::initial(&tuning, player.pos.x);
        let round = Round::idle(tuning.round_ms());
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            time_ticks: 0,
            round,
            player,
            platforms: Vec::new(),
            bears: Vec::new(),
            orbs: Vec::new(),
            lasers: Vec::new(),
            darts: Vec::new(),
            boost: SpeedBoost::default(),
            frontiers,
            ids: EntityIds::default(),
            events: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Remove every entity and put the player back at the origin
    ///
    /// Removed entities are reported in `removed` so the presentation layer
    /// can release their handles.
    pub fn clear_entities(&mut self) {
        let removed = &mut self.removed;
        removed.extend(self.platforms.drain(..).map(|p| Removed {
            id: p.id,
            kind: EntityKind::Platform,
        }));
        removed.extend(self.bears.drain(..).map(|b| Removed {
            id: b.id,
            kind: EntityKind::Bear,
        }));
        removed.extend(self.orbs.drain(..).map(|o| Removed {
            id: o.id,
            kind: EntityKind::Orb,
        }));
        removed.extend(self.lasers.drain(..).map(|l| Removed {
            id: l.id,
            kind: EntityKind::Laser,
        }));
        removed.extend(self.darts.drain(..).map(|d| Removed {
            id: d.id,
            kind: EntityKind::Dart,
        }));

        self.player = Player::spawn(self.tuning.physics.floor_height);
        self.boost = SpeedBoost::default();
        self.frontiers = Frontiers::initial(&self.tuning, self.player.pos.x);
        self.time_ticks = 0;
    }

    /// Number of live entities of a kind
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Platform => self.platforms.len(),
            EntityKind::Bear => self.bears.len(),
            EntityKind::Orb => self.orbs.len(),
            EntityKind::Laser => self.lasers.len(),
            EntityKind::Dart => self.darts.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_player_box_shrinks_when_ducking() {
        let t = PhysicsTuning::default();
        let mut p = Player::spawn(FLOOR_HEIGHT);
        assert_eq!(p.hit_box(&t).top(), FLOOR_HEIGHT + PLAYER_HEIGHT);
        p.ducking = true;
        assert_eq!(p.hit_box(&t).top(), FLOOR_HEIGHT + PLAYER_DUCK_HEIGHT);
        assert_eq!(p.hit_box(&t).left(), PLAYER_HIT_LEFT);
        assert_eq!(p.platform_box(&t).right(), PLAYER_PLATFORM_RIGHT);
    }

    #[test]
    fn test_platform_solid_bounds() {
        let p = Platform {
            id: EntityId(1),
            x: 500.0,
            y: 200.0,
            width: PLATFORM_WIDTH,
            height: PLATFORM_HEIGHT,
        };
        let solid = p.solid_bounds(&PlatformTuning::default());
        assert_eq!(solid.left(), 592.0);
        assert_eq!(solid.right(), 688.0);
        assert_eq!(solid.bottom(), 170.0);
        assert_eq!(solid.top(), 200.0);
    }

    #[test]
    fn test_speed_boost_expiry() {
        let mut boost = SpeedBoost::default();
        assert!(!boost.is_active());
        boost.activate(1000.0, 5000.0);
        assert!(boost.is_active());
        assert_eq!(boost.remaining_ms(2000.0), 4000.0);
        assert!(!boost.expire(5999.0));
        assert!(boost.expire(6000.0));
        assert!(!boost.is_active());
    }

    #[test]
    fn test_initial_frontiers() {
        let f = Frontiers::initial(&Tuning::default(), 0.0);
        assert_eq!(f.platform_x, PLATFORM_FIRST_X);
        assert_eq!(f.bear_x, BEAR_FIRST_X);
        assert_eq!(f.orb_x, ORB_FIRST_AHEAD);
        assert_eq!(f.laser_x, LASER_FIRST_GAP);
        assert_eq!(f.dart_at_ms, HAZARD_GRACE_MS);
    }

    #[test]
    fn test_clear_entities_reports_removals() {
        let mut world = World::new(1, Tuning::default());
        let id = world.ids.next_id();
        world.platforms.push(Platform {
            id,
            x: 0.0,
            y: 200.0,
            width: PLATFORM_WIDTH,
            height: PLATFORM_HEIGHT,
        });
        world.player.pos.x = 900.0;
        world.clear_entities();
        assert!(world.platforms.is_empty());
        assert_eq!(world.player.pos.x, 0.0);
        assert_eq!(
            world.removed,
            vec![Removed {
                id,
                kind: EntityKind::Platform
            }]
        );
    }
}
