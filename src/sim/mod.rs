//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per display frame, velocities in units per tick
//! - Seeded RNG only
//! - Every time read comes from the injected clock
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod aabb;
pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod lifecycle;
pub mod physics;
pub mod round;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use clock::{Clock, ManualClock, RoundClock, SystemClock};
pub use collision::{Contacts, detect_contacts, resolve_support};
pub use round::{EndCause, PauseReason, Round, RoundPhase};
pub use snapshot::{BoostView, Camera, EntityView, PlayerPose, Snapshot};
pub use state::{
    Collectible, Dart, EntityId, EntityKind, Facing, GameEvent, HazardKind, Laser, Platform,
    Player, Removed, SpeedBoost, World,
};
pub use tick::{Engine, TickInput, tick};
