//! # Preloader Progress Sequencer
//!
//! A loading counter that climbs by a random step on a fixed timer and
//! resolves a completion signal once, after it hits 100.
//!
//! ```text
//!  RUNNING ──(value clamped to 100, timer cancelled)──▶ SETTLING ──▶ DONE
//!     │ every interval: value += rand[min, max)            │
//!     │ publish { percent, fraction }                      ├─ settle delay, then on_exit()
//!                                                          └─ exit delay, then resolve
//! ```
//!
//! The sequencer owns no rendering; it publishes the floored percentage and
//! the bar width fraction on a watch channel for the presentation layer.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sithong_effects::Span;
use tokio::sync::{oneshot, watch};
use tokio::time;

use crate::error::SequencerError;

/// Counter value at which the sequence completes.
pub const COMPLETE: f32 = 100.0;

/// Timings and step range of the sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequencerConfig {
    /// Period of the counter timer.
    pub interval: Duration,
    /// Random step added every interval.
    pub increment: Span,
    /// Pause at 100% before the exit transition starts.
    pub settle: Duration,
    /// Length of the exit transition before completion resolves.
    pub exit: Duration,
}

impl SequencerConfig {
    /// Checks the config can complete.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero interval or a non-positive step range.
    pub fn validate(&self) -> Result<(), SequencerError> {
        if self.interval.is_zero() {
            return Err(SequencerError::ZeroInterval);
        }
        if !self.increment.is_valid() || self.increment.min <= 0.0 {
            return Err(SequencerError::InvalidIncrement {
                min: self.increment.min,
                max: self.increment.max,
            });
        }
        Ok(())
    }
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(60),
            increment: Span::new(2.0, 10.0),
            settle: Duration::from_millis(400),
            exit: Duration::from_millis(800),
        }
    }
}

/// Sequencer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Counter climbing.
    Running,
    /// Counter at 100, settle and exit delays running.
    Settling,
    /// Completion resolved. Terminal.
    Done,
}

/// Values the presentation layer shows on every step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressTick {
    /// Floored percentage, 0-100.
    pub percent: u32,
    /// Bar width as a fraction, 0-1.
    pub fraction: f32,
}

impl ProgressTick {
    /// Tick for a counter value.
    #[must_use]
    pub fn from_value(value: f32) -> Self {
        let value = value.clamp(0.0, COMPLETE);
        Self {
            percent: value.floor() as u32,
            fraction: value / COMPLETE,
        }
    }
}

/// Monotonic loading counter.
pub struct ProgressSequencer<R = ChaCha8Rng> {
    /// Counter, in `[0, 100]`.
    value: f32,
    /// Current state.
    phase: Phase,
    /// Timings.
    config: SequencerConfig,
    /// Step randomness.
    rng: R,
    /// Latest tick, for subscribers.
    ticks: watch::Sender<ProgressTick>,
    /// Latest phase, for subscribers.
    phases: watch::Sender<Phase>,
}

impl ProgressSequencer<ChaCha8Rng> {
    /// Creates a sequencer seeded from the OS.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` cannot complete.
    pub fn new(config: SequencerConfig) -> Result<Self, SequencerError> {
        Self::with_rng(config, ChaCha8Rng::from_entropy())
    }

    /// Creates a reproducible sequencer.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` cannot complete.
    pub fn seeded(config: SequencerConfig, seed: u64) -> Result<Self, SequencerError> {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> ProgressSequencer<R> {
    /// Creates a sequencer drawing its steps from `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` cannot complete.
    pub fn with_rng(config: SequencerConfig, rng: R) -> Result<Self, SequencerError> {
        config.validate()?;
        let (ticks, _) = watch::channel(ProgressTick::default());
        let (phases, _) = watch::channel(Phase::Running);
        Ok(Self {
            value: 0.0,
            phase: Phase::Running,
            config,
            rng,
            ticks,
            phases,
        })
    }

    /// Counter value.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Current state.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Tick for the current value.
    #[must_use]
    pub fn current(&self) -> ProgressTick {
        ProgressTick::from_value(self.value)
    }

    /// Receives every published tick.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProgressTick> {
        self.ticks.subscribe()
    }

    /// Receives every phase change.
    #[must_use]
    pub fn subscribe_phase(&self) -> watch::Receiver<Phase> {
        self.phases.subscribe()
    }

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        let _ = self.phases.send_replace(phase);
    }

    /// Performs one timer step and publishes the result.
    ///
    /// Only the running phase moves the counter; afterwards the value stays
    /// at exactly 100.
    pub fn advance(&mut self) -> ProgressTick {
        if self.phase == Phase::Running {
            self.value = (self.value + self.config.increment.sample(&mut self.rng)).min(COMPLETE);
            // The 100% tick goes out before the phase change.
            let _ = self.ticks.send_replace(self.current());
            if self.value >= COMPLETE {
                self.enter(Phase::Settling);
                tracing::info!("Preloader reached 100%, settling");
            }
        }
        self.current()
    }
}

impl<R: Rng + Send + 'static> ProgressSequencer<R> {
    /// Runs the sequence on the tokio runtime.
    ///
    /// `on_exit` runs once the settle delay after 100% has elapsed, when the
    /// exit transition starts. The returned signal resolves once, after the
    /// exit delay.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn run<F>(self, on_exit: F) -> Completion
    where
        F: FnOnce() + Send + 'static,
    {
        let (done, rx) = oneshot::channel();
        tokio::spawn(self.drive(on_exit, done));
        Completion { rx }
    }

    async fn drive<F: FnOnce()>(mut self, on_exit: F, done: oneshot::Sender<()>) {
        let mut ticker = time::interval(self.config.interval);
        // The first tick of an interval fires immediately.
        ticker.tick().await;
        while self.phase == Phase::Running {
            ticker.tick().await;
            let tick = self.advance();
            tracing::trace!("Preloader at {}%", tick.percent);
        }
        drop(ticker);

        time::sleep(self.config.settle).await;
        on_exit();
        tracing::debug!("Preloader exit transition started");

        time::sleep(self.config.exit).await;
        self.enter(Phase::Done);
        tracing::info!("Preloader done");
        // Nobody listening is fine.
        let _ = done.send(());
    }
}

/// Resolves once when a sequence completes. Never fails.
#[must_use = "the completion signal does nothing unless awaited"]
#[derive(Debug)]
pub struct Completion {
    rx: oneshot::Receiver<()>,
}

impl Future for Completion {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        // A dropped sender (runtime shut down) still counts as completion.
        Pin::new(&mut self.rx).poll(cx).map(|_| ())
    }
}
