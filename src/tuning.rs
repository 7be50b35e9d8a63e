//! Data-driven game balance
//!
//! Every field defaults to the matching constant in [`crate::consts`]. A JSON
//! override is merged onto the defaults, so it only has to name the values it
//! changes:
//!
//! ```json
//! { "physics": { "jump_force": 18.0 }, "round": { "duration_secs": 45.0 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::*;

/// Player movement and support resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsTuning {
    pub gravity: f32,
    pub jump_force: f32,
    pub horizontal_speed: f32,
    pub damping: f32,
    pub floor_height: f32,
    pub player_height: f32,
    pub player_duck_height: f32,
    /// Player box used against platforms (offsets from player x)
    pub platform_box_left: f32,
    pub platform_box_right: f32,
    /// Player box used against bears, orbs and hazards
    pub hit_box_left: f32,
    pub hit_box_right: f32,
    /// Numeric slack for the swept tests
    pub eps: f32,
    /// Snap onto a top when feet are at most this far above it
    pub snap_tol: f32,
    /// Allowed penetration below a top before support is lost
    pub hang_tol: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            horizontal_speed: HORIZONTAL_SPEED,
            damping: HORIZONTAL_DAMPING,
            floor_height: FLOOR_HEIGHT,
            player_height: PLAYER_HEIGHT,
            player_duck_height: PLAYER_DUCK_HEIGHT,
            platform_box_left: PLAYER_PLATFORM_LEFT,
            platform_box_right: PLAYER_PLATFORM_RIGHT,
            hit_box_left: PLAYER_HIT_LEFT,
            hit_box_right: PLAYER_HIT_RIGHT,
            eps: SUPPORT_EPS,
            snap_tol: SUPPORT_SNAP_TOL,
            hang_tol: SUPPORT_HANG_TOL,
        }
    }
}

/// Platform generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformTuning {
    pub width: f32,
    pub height: f32,
    pub spacing: f32,
    pub spacing_jitter: f32,
    pub collision_left_inset: f32,
    pub collision_right_inset: f32,
    pub first_x: f32,
    /// Generate while the frontier is closer than view width + this
    pub lookahead: f32,
    pub despawn_behind: f32,
    /// Heights above the floor
    pub levels: [f32; 7],
    /// Cumulative pick probability per level
    pub level_cumulative: [f32; 7],
}

impl Default for PlatformTuning {
    fn default() -> Self {
        Self {
            width: PLATFORM_WIDTH,
            height: PLATFORM_HEIGHT,
            spacing: PLATFORM_SPACING,
            spacing_jitter: PLATFORM_SPACING_JITTER,
            collision_left_inset: PLATFORM_COLLISION_LEFT_INSET,
            collision_right_inset: PLATFORM_COLLISION_RIGHT_INSET,
            first_x: PLATFORM_FIRST_X,
            lookahead: PLATFORM_LOOKAHEAD,
            despawn_behind: PLATFORM_DESPAWN_BEHIND,
            levels: PLATFORM_LEVELS,
            level_cumulative: PLATFORM_LEVEL_CUMULATIVE,
        }
    }
}

/// Spawn and placement policy shared by bears and orbs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceSpawn {
    /// Square sprite/collision size
    pub size: f32,
    /// First frontier, as an absolute world x
    pub first_x: f32,
    /// When set, the first frontier is `player.x + first_ahead` instead
    pub first_ahead: Option<f32>,
    pub min_gap: f32,
    pub max_gap: f32,
    pub min_ahead: f32,
    pub platform_prob: f32,
    pub platform_margin: f32,
    /// Keep the whole sprite (not just its center) inside the margin
    pub inset_half_size: bool,
    pub platform_bob: f32,
    pub ground_bob: f32,
    /// Bob amplitude used for contact tests
    pub hit_bob: f32,
    pub lookahead: f32,
    pub despawn_behind: f32,
    pub cap: usize,
}

impl SurfaceSpawn {
    pub fn bears() -> Self {
        Self {
            size: BEAR_SIZE,
            first_x: BEAR_FIRST_X,
            first_ahead: None,
            min_gap: BEAR_SPAWN_MIN_GAP,
            max_gap: BEAR_SPAWN_MAX_GAP,
            min_ahead: BEAR_MIN_AHEAD,
            platform_prob: BEAR_PLATFORM_PROB,
            platform_margin: BEAR_PLATFORM_MARGIN,
            inset_half_size: false,
            platform_bob: BEAR_PLATFORM_BOB,
            ground_bob: BEAR_GROUND_BOB,
            hit_bob: BEAR_HIT_BOB,
            lookahead: COLLECTIBLE_LOOKAHEAD,
            despawn_behind: ENTITY_DESPAWN_BEHIND,
            cap: MAX_BEARS,
        }
    }

    pub fn orbs() -> Self {
        Self {
            size: ORB_SIZE,
            first_x: 0.0,
            first_ahead: Some(ORB_FIRST_AHEAD),
            min_gap: ORB_SPAWN_MIN_GAP,
            max_gap: ORB_SPAWN_MAX_GAP,
            min_ahead: ORB_MIN_AHEAD,
            platform_prob: ORB_PLATFORM_PROB,
            platform_margin: ORB_PLATFORM_MARGIN,
            inset_half_size: true,
            platform_bob: ORB_BOB,
            ground_bob: ORB_BOB,
            hit_bob: ORB_HIT_BOB,
            lookahead: COLLECTIBLE_LOOKAHEAD,
            despawn_behind: ENTITY_DESPAWN_BEHIND,
            cap: MAX_ORBS,
        }
    }

    /// Usable inset from each platform edge
    pub fn edge_inset(&self) -> f32 {
        if self.inset_half_size {
            self.platform_margin + self.size / 2.0
        } else {
            self.platform_margin
        }
    }
}

/// Large laser hazards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaserTuning {
    pub width: f32,
    pub height: f32,
    pub hit_inset_left: f32,
    pub hit_inset_right: f32,
    /// Height band above the floor
    pub min_y: f32,
    pub max_y: f32,
    /// Spawn this far past the right edge of the view
    pub spawn_offset: f32,
    pub first_gap: f32,
    pub gap: f32,
    pub gap_jitter: f32,
    /// Collision is skipped beyond this distance outside the view
    pub hit_range: f32,
    /// World units per tick toward the player (0 = fixed in the world)
    pub speed: f32,
    pub despawn_behind: f32,
    pub cap: usize,
}

impl Default for LaserTuning {
    fn default() -> Self {
        Self {
            width: LASER_WIDTH,
            height: LASER_HEIGHT,
            hit_inset_left: LASER_HIT_INSET_L,
            hit_inset_right: LASER_HIT_INSET_R,
            min_y: LASER_MIN_Y,
            max_y: LASER_MAX_Y,
            spawn_offset: LASER_SPAWN_OFFSET,
            first_gap: LASER_FIRST_GAP,
            gap: LASER_GAP,
            gap_jitter: LASER_GAP_JITTER,
            hit_range: LASER_HIT_RANGE,
            speed: LASER_SPEED,
            despawn_behind: ENTITY_DESPAWN_BEHIND,
            cap: MAX_LARGE_LASERS,
        }
    }
}

/// Side dart hazards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DartTuning {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub min_delay_ms: f64,
    pub max_delay_ms: f64,
    /// Spawn this far outside the view edge
    pub edge_offset: f32,
    /// Despawn once this far outside the view edge
    pub despawn_margin: f32,
    pub aim_standing: f32,
    pub aim_ducking: f32,
    /// Aim band above the floor
    pub aim_min: f32,
    pub aim_max: f32,
    pub accel_max: f32,
    pub accel_ramp_ms: f64,
    pub cap: usize,
}

impl Default for DartTuning {
    fn default() -> Self {
        Self {
            width: DART_WIDTH,
            height: DART_HEIGHT,
            speed: DART_SPEED,
            min_delay_ms: DART_MIN_MS,
            max_delay_ms: DART_MAX_MS,
            edge_offset: DART_EDGE_OFFSET,
            despawn_margin: DART_DESPAWN_MARGIN,
            aim_standing: DART_AIM_STANDING,
            aim_ducking: DART_AIM_DUCKING,
            aim_min: DART_AIM_MIN,
            aim_max: DART_AIM_MAX,
            accel_max: DART_ACCEL_MAX,
            accel_ramp_ms: DART_ACCEL_RAMP_MS,
            cap: MAX_SIDE_LASERS,
        }
    }
}

/// Round timing and power-up effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundTuning {
    pub duration_secs: f64,
    pub hazard_grace_ms: f64,
    pub boost_multiplier: f32,
    pub boost_duration_ms: f64,
}

impl Default for RoundTuning {
    fn default() -> Self {
        Self {
            duration_secs: ROUND_DURATION_SECS,
            hazard_grace_ms: HAZARD_GRACE_MS,
            boost_multiplier: SPEEDBOOST_MULTIPLIER,
            boost_duration_ms: SPEEDBOOST_DURATION_MS,
        }
    }
}

/// Reference camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewTuning {
    pub width: f32,
    pub height: f32,
    pub parallax: f32,
    pub run_frame_ticks: u32,
}

impl Default for ViewTuning {
    fn default() -> Self {
        Self {
            width: VIEW_WIDTH,
            height: VIEW_HEIGHT,
            parallax: PARALLAX,
            run_frame_ticks: RUN_FRAME_TICKS,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    pub physics: PhysicsTuning,
    pub platforms: PlatformTuning,
    pub bears: SurfaceSpawn,
    pub orbs: SurfaceSpawn,
    pub lasers: LaserTuning,
    pub darts: DartTuning,
    pub round: RoundTuning,
    pub view: ViewTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            physics: PhysicsTuning::default(),
            platforms: PlatformTuning::default(),
            bears: SurfaceSpawn::bears(),
            orbs: SurfaceSpawn::orbs(),
            lasers: LaserTuning::default(),
            darts: DartTuning::default(),
            round: RoundTuning::default(),
            view: ViewTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let overrides: Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(Self::default())?;
        merge(&mut merged, overrides);
        let tuning: Tuning = serde_json::from_value(merged)?;
        Ok(tuning.sanitized())
    }

    /// Load from a JSON file, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Invalid tuning in {}: {}; using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Round length in milliseconds
    pub fn round_ms(&self) -> f64 {
        self.round.duration_secs * 1000.0
    }

    /// Clamp values that would break the simulation
    pub fn sanitized(mut self) -> Self {
        let p = &mut self.physics;
        if p.damping < 0.0 || p.damping > 1.0 {
            log::warn!("damping {} outside [0, 1], clamping", p.damping);
            p.damping = p.damping.clamp(0.0, 1.0);
        }
        if p.player_duck_height > p.player_height {
            log::warn!("duck height exceeds standing height, clamping");
            p.player_duck_height = p.player_height;
        }
        if p.platform_box_right < p.platform_box_left {
            std::mem::swap(&mut p.platform_box_left, &mut p.platform_box_right);
        }
        if p.hit_box_right < p.hit_box_left {
            std::mem::swap(&mut p.hit_box_left, &mut p.hit_box_right);
        }

        let pl = &mut self.platforms;
        if pl.spacing <= 0.0 {
            log::warn!("platform spacing {} must be positive, using default", pl.spacing);
            pl.spacing = PLATFORM_SPACING;
        }
        pl.spacing_jitter = pl.spacing_jitter.max(0.0);
        pl.width = pl.width.max(1.0);
        pl.height = pl.height.max(1.0);

        sanitize_surface("bears", &mut self.bears);
        sanitize_surface("orbs", &mut self.orbs);

        let l = &mut self.lasers;
        if l.max_y < l.min_y {
            std::mem::swap(&mut l.min_y, &mut l.max_y);
        }
        l.gap = l.gap.max(1.0);
        l.gap_jitter = l.gap_jitter.max(0.0);
        l.hit_range = l.hit_range.max(0.0);

        let d = &mut self.darts;
        if d.max_delay_ms < d.min_delay_ms {
            std::mem::swap(&mut d.min_delay_ms, &mut d.max_delay_ms);
        }
        d.min_delay_ms = d.min_delay_ms.max(1.0);
        d.max_delay_ms = d.max_delay_ms.max(d.min_delay_ms);
        if d.aim_max < d.aim_min {
            std::mem::swap(&mut d.aim_min, &mut d.aim_max);
        }
        d.accel_ramp_ms = d.accel_ramp_ms.max(1.0);

        let r = &mut self.round;
        if r.duration_secs <= 0.0 {
            log::warn!("round duration {} must be positive, using default", r.duration_secs);
            r.duration_secs = ROUND_DURATION_SECS;
        }
        r.hazard_grace_ms = r.hazard_grace_ms.max(0.0);
        r.boost_multiplier = r.boost_multiplier.max(0.0);

        self.view.run_frame_ticks = self.view.run_frame_ticks.max(1);
        self
    }
}

/// Overlay `patch` onto `base`, recursing into objects
fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        log::warn!("Unknown tuning key '{}', ignoring", key);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

fn sanitize_surface(name: &str, s: &mut SurfaceSpawn) {
    if s.max_gap < s.min_gap {
        log::warn!("{}: max_gap < min_gap, swapping", name);
        std::mem::swap(&mut s.min_gap, &mut s.max_gap);
    }
    if s.min_gap <= 0.0 {
        log::warn!("{}: min_gap {} must be positive, clamping", name, s.min_gap);
        s.min_gap = 1.0;
        s.max_gap = s.max_gap.max(s.min_gap);
    }
    if !(0.0..=1.0).contains(&s.platform_prob) {
        log::warn!("{}: platform_prob {} outside [0, 1], clamping", name, s.platform_prob);
        s.platform_prob = s.platform_prob.clamp(0.0, 1.0);
    }
    s.size = s.size.max(1.0);
}
