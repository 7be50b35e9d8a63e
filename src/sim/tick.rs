//! Fixed-order simulation tick
//!
//! One call per display frame:
//!
//! 1. round timer (an expired round ends here, nothing else moves)
//! 2. player integration and platform/floor support
//! 3. world generation
//! 4. entity motion and culling
//! 5. contact detection, then hazards before scoring

use super::autopilot;
use super::clock::Clock;
use super::collision::{detect_contacts, resolve_support};
use super::lifecycle;
use super::physics;
use super::round::{PauseReason, apply_contacts, check_timer};
use super::snapshot::Snapshot;
use super::spawn;
use super::state::{GameEvent, World};
use crate::bridge::EventSink;
use crate::tuning::Tuning;

/// Input commands for a single tick (sampled once, at tick start)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub duck: bool,
    /// Jump edge; ignored unless grounded
    pub jump: bool,
    /// Demo mode: the autopilot replaces the fields above
    pub autopilot: bool,
}

/// Advance the world by one tick at clock time `now`
pub fn tick(world: &mut World, input: &TickInput, now: f64) {
    if !world.round.is_running() {
        return;
    }
    world.removed.clear();

    if check_timer(world, now) {
        return;
    }

    let input = if input.autopilot {
        autopilot::drive(world)
    } else {
        *input
    };

    let elapsed_ms = world.round.elapsed_ms(now);
    world.time_ticks += 1;

    let prev_y = physics::integrate(
        &mut world.player,
        &mut world.boost,
        &input,
        elapsed_ms,
        &world.tuning,
        &mut world.events,
    );
    resolve_support(&mut world.player, prev_y, &world.platforms, &world.tuning);

    spawn::extend_world(world, elapsed_ms);
    lifecycle::advance(world, elapsed_ms);

    let contacts = detect_contacts(world);
    apply_contacts(world, contacts, now, elapsed_ms);
}

/// A world bound to the clock that drives it
///
/// This is the whole host-facing API: lifecycle calls, one `step` per
/// frame, a snapshot for rendering and drained events for audio/haptics.
pub struct Engine<C: Clock> {
    world: World,
    clock: C,
}

impl<C: Clock> Engine<C> {
    pub fn new(seed: u64, tuning: Tuning, clock: C) -> Self {
        Self {
            world: World::new(seed, tuning),
            clock,
        }
    }

    pub fn start(&mut self) -> bool {
        let now = self.clock.now_ms();
        self.world.start(now)
    }

    pub fn pause(&mut self, reason: PauseReason) -> bool {
        let now = self.clock.now_ms();
        self.world.pause(now, reason)
    }

    pub fn resume(&mut self) -> bool {
        let now = self.clock.now_ms();
        self.world.resume(now)
    }

    pub fn restart(&mut self) {
        let now = self.clock.now_ms();
        self.world.restart(now);
    }

    pub fn return_to_idle(&mut self) {
        self.world.return_to_idle();
    }

    /// Run one tick; a no-op outside `Running`
    pub fn step(&mut self, input: &TickInput) {
        let now = self.clock.now_ms();
        tick(&mut self.world, input, now);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.world, self.clock.now_ms())
    }

    /// Take every event raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.world.events)
    }

    /// Hand pending events to a sink, oldest first
    pub fn dispatch_events(&mut self, sink: &mut impl EventSink) {
        for event in self.drain_events() {
            sink.emit(event);
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
