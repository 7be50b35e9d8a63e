//! Bull Rush - A side-scrolling arcade runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, spawning, round state)
//! - `tuning`: Data-driven game balance
//! - `bridge`: Host-facing input, presentation and audio/haptics adapters
//!
//! Rendering, audio synthesis and input devices belong to the host. The host
//! feeds [`sim::TickInput`] in and reads [`sim::Snapshot`] and
//! [`sim::GameEvent`] out.

pub mod bridge;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
///
/// World units are pixels at 1:1 scale, y grows upward from the bottom of the
/// view, one tick is one display frame.
pub mod consts {
    /// Downward acceleration per tick (reduced for floaty jumps)
    pub const GRAVITY: f32 = -0.5;
    /// Upward velocity set by a jump
    pub const JUMP_FORCE: f32 = 16.0;
    /// Horizontal run speed per tick
    pub const HORIZONTAL_SPEED: f32 = 5.0;
    /// Horizontal velocity multiplier applied each tick with no direction held
    pub const HORIZONTAL_DAMPING: f32 = 0.8;
    /// Height of the ground plane
    pub const FLOOR_HEIGHT: f32 = 80.0;

    /// Player collision boxes (offsets from player x)
    pub const PLAYER_HEIGHT: f32 = 140.0;
    pub const PLAYER_DUCK_HEIGHT: f32 = 80.0;
    pub const PLAYER_PLATFORM_LEFT: f32 = 20.0;
    pub const PLAYER_PLATFORM_RIGHT: f32 = 130.0;
    pub const PLAYER_HIT_LEFT: f32 = 25.0;
    pub const PLAYER_HIT_RIGHT: f32 = 125.0;

    /// Platform geometry
    pub const PLATFORM_WIDTH: f32 = 200.0;
    pub const PLATFORM_HEIGHT: f32 = 30.0;
    pub const PLATFORM_SPACING: f32 = 250.0;
    pub const PLATFORM_SPACING_JITTER: f32 = 200.0;
    pub const PLATFORM_COLLISION_LEFT_INSET: f32 = 92.0;
    pub const PLATFORM_COLLISION_RIGHT_INSET: f32 = 12.0;
    pub const PLATFORM_FIRST_X: f32 = 500.0;
    /// Height ladder above the floor, lowest first
    pub const PLATFORM_LEVELS: [f32; 7] = [120.0, 180.0, 240.0, 300.0, 360.0, 420.0, 480.0];
    /// Cumulative probability of each ladder level (30/20/20/15/10/4/1 %)
    pub const PLATFORM_LEVEL_CUMULATIVE: [f32; 7] = [0.30, 0.50, 0.70, 0.85, 0.95, 0.99, 1.0];

    /// Support resolution tolerances (empirically tuned feel)
    pub const SUPPORT_EPS: f32 = 0.5;
    pub const SUPPORT_SNAP_TOL: f32 = 6.0;
    pub const SUPPORT_HANG_TOL: f32 = 18.0;

    /// Bears (collectible creatures)
    pub const BEAR_SIZE: f32 = 80.0;
    pub const BEAR_FIRST_X: f32 = 200.0;
    pub const BEAR_SPAWN_MIN_GAP: f32 = 320.0;
    pub const BEAR_SPAWN_MAX_GAP: f32 = 560.0;
    pub const BEAR_PLATFORM_PROB: f32 = 0.65;
    pub const BEAR_PLATFORM_MARGIN: f32 = 24.0;
    pub const BEAR_MIN_AHEAD: f32 = 380.0;
    pub const BEAR_PLATFORM_BOB: f32 = 4.0;
    pub const BEAR_GROUND_BOB: f32 = 3.0;
    /// Hit box bob amplitude, wider than the drawn bob
    pub const BEAR_HIT_BOB: f32 = 15.0;
    pub const MAX_BEARS: usize = 12;

    /// Speed orbs
    pub const ORB_SIZE: f32 = 48.0;
    pub const ORB_FIRST_AHEAD: f32 = 800.0;
    pub const ORB_SPAWN_MIN_GAP: f32 = 1600.0;
    pub const ORB_SPAWN_MAX_GAP: f32 = 2400.0;
    pub const ORB_PLATFORM_PROB: f32 = 0.7;
    pub const ORB_PLATFORM_MARGIN: f32 = 26.0;
    pub const ORB_MIN_AHEAD: f32 = 420.0;
    pub const ORB_BOB: f32 = 2.0;
    /// Orb hit boxes stay on their resting surface
    pub const ORB_HIT_BOB: f32 = 0.0;
    pub const MAX_ORBS: usize = 3;

    /// Idle bob phase advance per tick (bears and orbs)
    pub const FLOAT_SPEED: f32 = 0.02;
    /// Random nudge along a platform, +/- this many units
    pub const SURFACE_WIGGLE: i32 = 20;
    /// Platform search window for collectibles, relative to the player
    pub const SURFACE_WINDOW_START: f32 = 250.0;
    pub const SURFACE_WINDOW_EXTRA: f32 = 900.0;

    /// Large lasers
    pub const LASER_WIDTH: f32 = 200.0;
    pub const LASER_HEIGHT: f32 = 15.0;
    pub const LASER_HIT_INSET_L: f32 = 24.0;
    pub const LASER_HIT_INSET_R: f32 = 24.0;
    /// Lasers further than this outside the view never collide
    pub const LASER_HIT_RANGE: f32 = 200.0;
    pub const LASER_MIN_Y: f32 = 50.0;
    pub const LASER_MAX_Y: f32 = 350.0;
    pub const LASER_SPAWN_OFFSET: f32 = 50.0;
    pub const LASER_FIRST_GAP: f32 = 1200.0;
    pub const LASER_GAP: f32 = 1200.0;
    pub const LASER_GAP_JITTER: f32 = 800.0;
    /// Lasers hold their world position; the player runs into them
    pub const LASER_SPEED: f32 = 0.0;
    pub const MAX_LARGE_LASERS: usize = 2;

    /// Side darts
    pub const DART_WIDTH: f32 = 36.0;
    pub const DART_HEIGHT: f32 = 6.0;
    pub const DART_SPEED: f32 = 12.0;
    pub const DART_MIN_MS: f64 = 1800.0;
    pub const DART_MAX_MS: f64 = 3200.0;
    pub const DART_EDGE_OFFSET: f32 = 60.0;
    pub const DART_DESPAWN_MARGIN: f32 = 200.0;
    pub const DART_AIM_STANDING: f32 = 90.0;
    pub const DART_AIM_DUCKING: f32 = 50.0;
    pub const DART_AIM_MIN: f32 = 50.0;
    pub const DART_AIM_MAX: f32 = 380.0;
    /// Extra dart speed factor reached at `DART_ACCEL_RAMP_MS`
    pub const DART_ACCEL_MAX: f32 = 0.8;
    pub const DART_ACCEL_RAMP_MS: f64 = 60_000.0;
    pub const MAX_SIDE_LASERS: usize = 2;

    /// No hazards during the first moments of a round
    pub const HAZARD_GRACE_MS: f64 = 2500.0;

    /// Despawn distances behind the player
    pub const PLATFORM_DESPAWN_BEHIND: f32 = 2000.0;
    pub const ENTITY_DESPAWN_BEHIND: f32 = 1000.0;

    /// Generation look-ahead past the view width
    pub const PLATFORM_LOOKAHEAD: f32 = 500.0;
    pub const COLLECTIBLE_LOOKAHEAD: f32 = 300.0;

    /// Round length in seconds
    pub const ROUND_DURATION_SECS: f64 = 30.0;

    /// Speed boost power-up
    pub const SPEEDBOOST_MULTIPLIER: f32 = 1.7;
    pub const SPEEDBOOST_DURATION_MS: f64 = 5000.0;

    /// Reference view size (the camera keeps the player centered)
    pub const VIEW_WIDTH: f32 = 1280.0;
    pub const VIEW_HEIGHT: f32 = 720.0;

    /// Background scroll factor relative to the player
    pub const PARALLAX: f32 = 0.5;
    /// Ticks per run animation frame
    pub const RUN_FRAME_TICKS: u32 = 10;

    /// Nominal display refresh used by the headless runner
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}
