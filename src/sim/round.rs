//! Round lifecycle and scoring
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --resume--> Running
//!                    |                                     |
//!                    +--- hazard hit / timer expired ------+--> Ended
//! Ended --restart--> Running      any --return_to_idle--> Idle
//! ```
//!
//! Illegal transitions are no-ops that return `false`.

use serde::{Deserialize, Serialize};

use super::clock::RoundClock;
use super::collision::Contacts;
use super::state::{EntityKind, GameEvent, HazardKind, Removed, World};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for an explicit start
    Idle,
    /// Active gameplay
    Running,
    /// Suspended by the host; nothing advances
    Paused,
    /// Round over, see [`EndCause`]
    Ended,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    TimeExpired,
    HazardHit,
}

/// Why the host paused the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PauseReason {
    /// Page or window hidden
    Visibility,
    /// Window lost focus
    Blur,
    /// Any other host request
    Host,
}

/// Round timer, score and end state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub phase: RoundPhase,
    pub score: u32,
    pub end_cause: Option<EndCause>,
    pub pause_reason: Option<PauseReason>,
    /// Countdown length
    pub duration_ms: f64,
    timer: RoundClock,
}

impl Round {
    pub fn idle(duration_ms: f64) -> Self {
        Self {
            phase: RoundPhase::Idle,
            score: 0,
            end_cause: None,
            pause_reason: None,
            duration_ms,
            timer: RoundClock::default(),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    /// Enter Running with a fresh timer and zero score
    fn begin(&mut self, now: f64) {
        self.phase = RoundPhase::Running;
        self.score = 0;
        self.end_cause = None;
        self.pause_reason = None;
        self.timer = RoundClock::started(now);
    }

    /// Effective round time, excluding pauses
    pub fn elapsed_ms(&self, now: f64) -> f64 {
        match self.phase {
            RoundPhase::Idle => 0.0,
            _ => self.timer.elapsed_ms(now),
        }
    }

    /// Time left on the countdown, clamped at zero
    pub fn remaining_ms(&self, now: f64) -> f64 {
        match self.phase {
            RoundPhase::Idle => self.duration_ms,
            _ => (self.duration_ms - self.elapsed_ms(now)).max(0.0),
        }
    }

    /// Whole seconds shown on a countdown display
    pub fn display_seconds(&self, now: f64) -> u32 {
        (self.remaining_ms(now) / 1000.0).ceil() as u32
    }

    /// Add eaten creatures to the score (Running only)
    pub fn add_score(&mut self, eaten: u32) {
        if self.is_running() {
            self.score += eaten;
        }
    }

    fn pause(&mut self, now: f64, reason: PauseReason) -> bool {
        if self.phase != RoundPhase::Running {
            return false;
        }
        self.phase = RoundPhase::Paused;
        self.pause_reason = Some(reason);
        self.timer.pause(now);
        true
    }

    fn resume(&mut self, now: f64) -> bool {
        if self.phase != RoundPhase::Paused {
            return false;
        }
        self.phase = RoundPhase::Running;
        self.pause_reason = None;
        self.timer.resume(now);
        true
    }

    fn end(&mut self, now: f64, cause: EndCause) -> bool {
        if self.phase != RoundPhase::Running {
            return false;
        }
        self.phase = RoundPhase::Ended;
        self.end_cause = Some(cause);
        self.timer.stop(now);
        true
    }
}

impl World {
    /// Idle -> Running
    pub fn start(&mut self, now: f64) -> bool {
        if self.round.phase != RoundPhase::Idle {
            return false;
        }
        self.begin_round(now);
        true
    }

    /// Reset everything and run a new round from any phase
    pub fn restart(&mut self, now: f64) {
        self.begin_round(now);
    }

    /// Running -> Paused; entity and physics state is left untouched
    pub fn pause(&mut self, now: f64, reason: PauseReason) -> bool {
        let paused = self.round.pause(now, reason);
        if paused {
            log::info!("Round paused ({:?})", reason);
        }
        paused
    }

    /// Paused -> Running
    pub fn resume(&mut self, now: f64) -> bool {
        let resumed = self.round.resume(now);
        if resumed {
            log::info!(
                "Round resumed after {:.0} ms paused in total",
                self.round.timer.paused_ms(now)
            );
        }
        resumed
    }

    /// Any phase -> Idle, clearing the world
    pub fn return_to_idle(&mut self) {
        self.clear_entities();
        self.round = Round::idle(self.tuning.round_ms());
        log::info!("Returned to idle");
    }

    /// Running -> Ended
    pub fn end_round(&mut self, now: f64, cause: EndCause) -> bool {
        if !self.round.end(now, cause) {
            return false;
        }
        let score = self.round.score;
        log::info!(
            "Round ended: {:?}, score {}, {:.1}s elapsed",
            cause,
            score,
            self.round.elapsed_ms(now) / 1000.0
        );
        self.events.push(GameEvent::RoundEnded { cause, score });
        true
    }

    fn begin_round(&mut self, now: f64) {
        self.clear_entities();
        self.round = Round::idle(self.tuning.round_ms());
        self.round.begin(now);
        self.events.push(GameEvent::RoundStarted);
        log::info!(
            "Round started (seed {}, {:.0}s)",
            self.seed,
            self.round.duration_ms / 1000.0
        );
    }
}

/// Apply this tick's contacts: a hazard ends the round before anything is
/// scored; otherwise bears score and orbs start the speed boost
pub fn apply_contacts(world: &mut World, contacts: Contacts, now: f64, elapsed_ms: f64) {
    if !world.round.is_running() {
        return;
    }

    if let Some((kind, id)) = contacts.hazard {
        match kind {
            HazardKind::Laser => world.lasers.retain(|l| l.id != id),
            HazardKind::Dart => world.darts.retain(|d| d.id != id),
        }
        world.removed.push(Removed {
            id,
            kind: kind.entity_kind(),
        });
        world.events.push(GameEvent::HitHazard { kind });
        world.end_round(now, EndCause::HazardHit);
        return;
    }

    if !contacts.bears.is_empty() {
        world.bears.retain(|b| !contacts.bears.contains(&b.id));
        for &id in &contacts.bears {
            world.removed.push(Removed {
                id,
                kind: EntityKind::Bear,
            });
            world.events.push(GameEvent::AteCreature { id });
        }
        world.round.add_score(contacts.bears.len() as u32);
        log::debug!("Ate {} bear(s), score {}", contacts.bears.len(), world.round.score);
    }

    if !contacts.orbs.is_empty() {
        world.orbs.retain(|o| !contacts.orbs.contains(&o.id));
        for &id in &contacts.orbs {
            world.removed.push(Removed {
                id,
                kind: EntityKind::Orb,
            });
            world.events.push(GameEvent::CollectedOrb { id });
        }
        let duration = world.tuning.round.boost_duration_ms;
        world.boost.activate(elapsed_ms, duration);
        log::debug!("Speed boost until {:.0} ms", elapsed_ms + duration);
    }
}

/// End the round with `TimeExpired` once the countdown has run out
pub fn check_timer(world: &mut World, now: f64) -> bool {
    if world.round.is_running() && world.round.elapsed_ms(now) >= world.round.duration_ms {
        return world.end_round(now, EndCause::TimeExpired);
    }
    false
}
