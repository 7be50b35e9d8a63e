//! Bull Rush headless runner
//!
//! Plays one round against a manual 60 Hz clock and prints the final
//! snapshot as JSON.
//!
//! ```text
//! bull-rush [--seed N] [--tuning FILE] [--autopilot]
//! ```
//!
//! Without `--autopilot` the bull just holds right.

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
mod runner {
    use std::path::PathBuf;

    use bull_rush::Tuning;
    use bull_rush::bridge::{AudioCue, Control, CueSink, InputLatch};
    use bull_rush::consts::FRAME_MS;
    use bull_rush::sim::{Engine, ManualClock, RoundPhase, Snapshot};
    use clap::Parser;

    /// Play one headless round and print the final snapshot
    #[derive(Debug, Parser)]
    #[command(name = "bull-rush", version)]
    pub struct Args {
        /// Seed for world generation
        #[arg(long, default_value_t = 1)]
        pub seed: u64,
        /// JSON file overriding any subset of the balance values
        #[arg(long, value_name = "FILE")]
        pub tuning: Option<PathBuf>,
        /// Let the demo autopilot drive instead of holding right
        #[arg(long)]
        pub autopilot: bool,
    }

    /// Play one round to its end and return the final snapshot
    pub fn play(args: &Args) -> Snapshot {
        let tuning = args
            .tuning
            .as_deref()
            .map_or_else(Tuning::default, Tuning::load);
        let mut engine = Engine::new(args.seed, tuning, ManualClock::new(0.0));

        let mut latch = InputLatch::default();
        if args.autopilot {
            latch.set_autopilot(true);
        } else {
            latch.press(Control::Right);
        }

        let mut cues = CueSink::new(|cue: AudioCue| {
            if let Some(tone) = cue.tone {
                log::debug!("Tone {:.0} Hz {:?} {} ms", tone.freq_hz, tone.waveform, tone.duration_ms);
            }
        });

        engine.start();
        while engine.world().round.phase == RoundPhase::Running {
            engine.clock().advance(FRAME_MS);
            engine.step(&latch.take());
            engine.dispatch_events(&mut cues);
        }
        engine.snapshot()
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bull Rush (headless) starting...");

    let args = runner::Args::parse();
    let snapshot = runner::play(&args);
    log::info!(
        "Final score {} ({:?}) after {} ticks",
        snapshot.score,
        snapshot.end_cause,
        snapshot.tick
    );

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to serialize snapshot: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the wasm surface; there is no wasm binary
}
