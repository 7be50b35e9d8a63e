//! Time sources and the pause-aware round timer
//!
//! Every "time since" / "time until" question in the simulation is answered
//! from one injected [`Clock`]. Tests drive a [`ManualClock`]; hosts use
//! [`SystemClock`] or wrap their own frame timestamps.

use std::cell::Cell;
use std::time::Instant;

use serde::{Deserialize, Serialize};

/// A monotonic millisecond time source
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Move time forward (negative deltas are ignored)
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms.max(0.0));
    }

    /// Jump to an absolute time, never backwards
    pub fn set(&self, ms: f64) {
        if ms > self.now.get() {
            self.now.set(ms);
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

/// Round timer measured as wall clock minus total paused time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundClock {
    started_at: f64,
    paused_total: f64,
    paused_since: Option<f64>,
    stopped_at: Option<f64>,
}

impl RoundClock {
    /// Start a fresh timer at `now`
    pub fn started(now: f64) -> Self {
        Self {
            started_at: now,
            paused_total: 0.0,
            paused_since: None,
            stopped_at: None,
        }
    }

    /// Effective elapsed milliseconds (never negative, frozen while paused or stopped)
    pub fn elapsed_ms(&self, now: f64) -> f64 {
        let end = self.stopped_at.or(self.paused_since).unwrap_or(now);
        (end - self.started_at - self.paused_total).max(0.0)
    }

    pub fn is_paused(&self) -> bool {
        self.paused_since.is_some()
    }

    /// Begin a pause; a second call while paused changes nothing
    pub fn pause(&mut self, now: f64) {
        if self.paused_since.is_none() && self.stopped_at.is_none() {
            self.paused_since = Some(now);
        }
    }

    /// End a pause, adding its length to the paused total
    pub fn resume(&mut self, now: f64) {
        if let Some(since) = self.paused_since.take() {
            self.paused_total += (now - since).max(0.0);
        }
    }

    /// Freeze the timer for good
    pub fn stop(&mut self, now: f64) {
        if self.stopped_at.is_none() {
            self.stopped_at = Some(self.paused_since.unwrap_or(now));
        }
    }

    /// Total time spent paused so far
    pub fn paused_ms(&self, now: f64) -> f64 {
        let open = self.paused_since.map_or(0.0, |since| (now - since).max(0.0));
        self.paused_total + open
    }
}
