//! Host-facing adapters
//!
//! - [`InputLatch`]: device state written between ticks, sampled once per tick
//! - [`PresentationMap`]: entity id to presenter handle, kept in step with
//!   snapshots
//! - [`EventSink`] and the audio/haptics cue table

use std::collections::{BTreeMap, BTreeSet};

use crate::sim::{Camera, EntityId, EntityKind, EntityView, GameEvent, Snapshot, TickInput};

/// A held control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Duck,
}

/// Input state between ticks
///
/// Key, touch and button handlers call `press`/`release`/`request_jump`;
/// the frame loop calls [`InputLatch::take`] once per tick.
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    left: bool,
    right: bool,
    duck: bool,
    jump_requested: bool,
    autopilot: bool,
}

impl InputLatch {
    pub fn press(&mut self, control: Control) {
        self.set(control, true);
    }

    pub fn release(&mut self, control: Control) {
        self.set(control, false);
    }

    fn set(&mut self, control: Control, held: bool) {
        match control {
            Control::Left => self.left = held,
            Control::Right => self.right = held,
            Control::Duck => self.duck = held,
        }
    }

    /// Latch a jump for the next tick
    pub fn request_jump(&mut self) {
        self.jump_requested = true;
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.autopilot = on;
    }

    /// Drop every held control (focus lost, round over)
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
        self.duck = false;
        self.jump_requested = false;
    }

    /// Sample for one tick and clear the jump edge
    ///
    /// Left wins when both directions are held.
    pub fn take(&mut self) -> TickInput {
        let input = TickInput {
            move_left: self.left,
            move_right: self.right && !self.left,
            duck: self.duck,
            jump: self.jump_requested,
            autopilot: self.autopilot,
        };
        self.jump_requested = false;
        input
    }
}

/// Something that can draw entities (a sprite pool, DOM nodes, a scene graph)
pub trait Presenter {
    type Handle;

    /// Create a visual for a new entity; `None` if the host has none to give
    fn acquire(&mut self, kind: EntityKind) -> Option<Self::Handle>;

    /// Move a visual to the entity's current box
    fn place(&mut self, handle: &mut Self::Handle, view: &EntityView, camera: &Camera);

    /// Dispose of a visual whose entity is gone
    fn release(&mut self, handle: Self::Handle);
}

/// Entity id to presenter handle
///
/// A `None` slot means the presenter could not supply a handle; the entity
/// is still tracked so it is not re-acquired every frame.
#[derive(Debug)]
pub struct PresentationMap<H> {
    handles: BTreeMap<EntityId, Option<H>>,
}

impl<H> Default for PresentationMap<H> {
    fn default() -> Self {
        Self {
            handles: BTreeMap::new(),
        }
    }
}

impl<H> PresentationMap<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.handles.contains_key(&id)
    }

    /// Bring the presenter in line with a snapshot
    ///
    /// Removed entities are released first, then live ones are acquired and
    /// placed. Anything left over that the snapshot no longer lists (e.g.
    /// after a reset between syncs) is swept.
    pub fn sync<P: Presenter<Handle = H>>(&mut self, snapshot: &Snapshot, presenter: &mut P) {
        for removed in &snapshot.removed {
            if let Some(Some(handle)) = self.handles.remove(&removed.id) {
                presenter.release(handle);
            }
        }

        let mut live = BTreeSet::new();
        for view in snapshot.entities() {
            live.insert(view.id);
            let slot = self.handles.entry(view.id).or_insert_with(|| {
                let handle = presenter.acquire(view.kind);
                if handle.is_none() {
                    log::debug!("No presenter handle for {:?} {:?}", view.kind, view.id);
                }
                handle
            });
            if let Some(handle) = slot.as_mut() {
                presenter.place(handle, view, &snapshot.camera);
            }
        }

        let stale: Vec<EntityId> = self
            .handles
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect();
        for id in stale {
            if let Some(Some(handle)) = self.handles.remove(&id) {
                presenter.release(handle);
            }
        }
    }

    /// Release everything
    pub fn clear<P: Presenter<Handle = H>>(&mut self, presenter: &mut P) {
        for handle in std::mem::take(&mut self.handles).into_values().flatten() {
            presenter.release(handle);
        }
    }
}

/// Receives game events for audio, haptics or UI
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// A single enveloped oscillator note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq_hz: f32,
    pub waveform: Waveform,
    pub duration_ms: u32,
    /// Linear ramp up to full gain
    pub attack_ms: u32,
    /// Linear ramp back to silence after the attack
    pub decay_ms: u32,
}

/// What the host should play and buzz for an event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioCue {
    pub tone: Option<Tone>,
    pub vibrate_ms: Option<u32>,
}

const fn tone(freq_hz: f32, waveform: Waveform, duration_ms: u32, decay_ms: u32) -> Tone {
    Tone {
        freq_hz,
        waveform,
        duration_ms,
        attack_ms: 5,
        decay_ms,
    }
}

/// Sound and vibration for an event, if it has any
pub fn cue_for(event: &GameEvent) -> Option<AudioCue> {
    let (note, vibrate_ms) = match event {
        GameEvent::RoundStarted => (tone(440.0, Waveform::Triangle, 160, 120), None),
        GameEvent::Jumped => (tone(520.0, Waveform::Square, 120, 80), Some(10)),
        GameEvent::AteCreature { .. } => (tone(300.0, Waveform::Sine, 130, 120), Some(10)),
        GameEvent::CollectedOrb { .. } => (tone(760.0, Waveform::Triangle, 140, 140), Some(10)),
        GameEvent::HitHazard { .. } => (tone(120.0, Waveform::Sawtooth, 220, 220), Some(30)),
        GameEvent::BoostExpired | GameEvent::RoundEnded { .. } => return None,
    };
    Some(AudioCue {
        tone: Some(note),
        vibrate_ms,
    })
}

/// Turns events into cues for a host synth
///
/// Muting silences tones only; vibration still goes through.
pub struct CueSink<F: FnMut(AudioCue)> {
    play: F,
    muted: bool,
}

impl<F: FnMut(AudioCue)> CueSink<F> {
    pub fn new(play: F) -> Self {
        Self { play, muted: false }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl<F: FnMut(AudioCue)> EventSink for CueSink<F> {
    fn emit(&mut self, event: GameEvent) {
        let Some(mut cue) = cue_for(&event) else {
            return;
        };
        if self.muted {
            cue.tone = None;
        }
        if cue.tone.is_some() || cue.vibrate_ms.is_some() {
            (self.play)(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::sim::{Collectible, Engine, HazardKind, ManualClock, World};
    use crate::tuning::Tuning;

    #[test]
    fn test_latch_jump_is_edge() {
        let mut latch = InputLatch::default();
        latch.press(Control::Right);
        latch.request_jump();
        let first = latch.take();
        assert!(first.jump && first.move_right);
        let second = latch.take();
        assert!(!second.jump);
        assert!(second.move_right);
    }

    #[test]
    fn test_latch_left_wins() {
        let mut latch = InputLatch::default();
        latch.press(Control::Left);
        latch.press(Control::Right);
        let input = latch.take();
        assert!(input.move_left && !input.move_right);
        latch.release(Control::Left);
        assert!(latch.take().move_right);
        latch.release_all();
        assert_eq!(latch.take(), TickInput::default());
    }

    /// Records calls; hands out `None` for orbs
    #[derive(Default)]
    struct Recorder {
        next: u32,
        live: BTreeSet<u32>,
        placed: usize,
        released: usize,
    }

    impl Presenter for Recorder {
        type Handle = u32;

        fn acquire(&mut self, kind: EntityKind) -> Option<u32> {
            if kind == EntityKind::Orb {
                return None;
            }
            self.next += 1;
            self.live.insert(self.next);
            Some(self.next)
        }

        fn place(&mut self, handle: &mut u32, _view: &EntityView, _camera: &Camera) {
            assert!(self.live.contains(handle));
            self.placed += 1;
        }

        fn release(&mut self, handle: u32) {
            assert!(self.live.remove(&handle));
            self.released += 1;
        }
    }

    fn running_engine() -> Engine<ManualClock> {
        let mut e = Engine::new(42, Tuning::default(), ManualClock::new(0.0));
        e.start();
        e.clock().advance(FRAME_MS);
        e.step(&TickInput::default());
        e
    }

    #[test]
    fn test_sync_tracks_live_entities() {
        let e = running_engine();
        let snap = e.snapshot();
        let mut map = PresentationMap::new();
        let mut rec = Recorder::default();
        map.sync(&snap, &mut rec);

        assert_eq!(map.len(), snap.entities().count());
        let drawable = snap.entities().filter(|v| v.kind != EntityKind::Orb).count();
        assert_eq!(rec.live.len(), drawable);
        assert_eq!(rec.placed, drawable);

        // Second sync acquires nothing new
        map.sync(&snap, &mut rec);
        assert_eq!(rec.live.len(), drawable);
        assert_eq!(rec.placed, drawable * 2);
    }

    #[test]
    fn test_sync_releases_removed_and_stale() {
        let mut e = running_engine();
        let mut map = PresentationMap::new();
        let mut rec = Recorder::default();
        map.sync(&e.snapshot(), &mut rec);
        assert!(!rec.live.is_empty());

        // Reset reports every entity as removed
        e.restart();
        let snap = e.snapshot();
        assert!(!snap.removed.is_empty());
        map.sync(&snap, &mut rec);
        assert!(map.is_empty());
        assert!(rec.live.is_empty());

        // An id the snapshot never mentions again is swept
        let mut map = PresentationMap::new();
        let mut rec = Recorder::default();
        let mut world = World::new(1, Tuning::default());
        world.start(0.0);
        let id = world.ids.next_id();
        world.bears.push(Collectible {
            id,
            x: 900.0,
            base_y: 80.0,
            phase: 0.0,
            bob: 3.0,
            size: 80.0,
            on_platform: false,
        });
        map.sync(&Snapshot::capture(&world, 0.0), &mut rec);
        assert!(map.contains(id));
        world.bears.clear();
        map.sync(&Snapshot::capture(&world, 0.0), &mut rec);
        assert!(!map.contains(id));
        assert_eq!(rec.released, 1);
    }

    #[test]
    fn test_cue_table() {
        let jump = cue_for(&GameEvent::Jumped).unwrap();
        let tone = jump.tone.unwrap();
        assert_eq!(tone.freq_hz, 520.0);
        assert_eq!(tone.waveform, Waveform::Square);
        assert_eq!((tone.duration_ms, tone.attack_ms, tone.decay_ms), (120, 5, 80));
        assert_eq!(jump.vibrate_ms, Some(10));

        let hit = cue_for(&GameEvent::HitHazard {
            kind: HazardKind::Dart,
        })
        .unwrap();
        assert_eq!(hit.tone.unwrap().waveform, Waveform::Sawtooth);
        assert_eq!(hit.vibrate_ms, Some(30));

        assert_eq!(cue_for(&GameEvent::RoundStarted).unwrap().vibrate_ms, None);
        assert!(cue_for(&GameEvent::BoostExpired).is_none());
    }

    #[test]
    fn test_muted_sink_keeps_haptics() {
        let mut played = Vec::new();
        {
            let mut sink = CueSink::new(|cue| played.push(cue));
            sink.set_muted(true);
            sink.emit(GameEvent::Jumped);
            sink.emit(GameEvent::RoundStarted);
        }
        assert_eq!(played.len(), 1);
        assert!(played[0].tone.is_none());
        assert_eq!(played[0].vibrate_ms, Some(10));
    }

    #[test]
    fn test_dispatch_to_vec_sink() {
        let mut e = running_engine();
        let mut events: Vec<GameEvent> = Vec::new();
        e.dispatch_events(&mut events);
        assert_eq!(events.first(), Some(&GameEvent::RoundStarted));
        e.dispatch_events(&mut NullSink);
        assert!(e.drain_events().is_empty());
    }
}
