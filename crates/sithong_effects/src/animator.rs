//! # Frame Loop
//!
//! Drives a [`ParticleField`] once per display frame on the tokio runtime.
//!
//! Every start of the loop gets a generation number. The loop re-reads the
//! current generation under the field lock before each frame and exits on a
//! mismatch; `stop()` bumps the generation under that same lock. So once
//! `stop()` returns, no frame is rendering and none will render.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::field::{FieldStats, ParticleField};
use crate::surface::{Surface, Vec2};

/// One frame at 60 Hz.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_666);

/// State shared between the animator, its loop task and stoppers.
struct Shared<S> {
    /// The field. Held for the whole of each frame.
    field: Mutex<ParticleField<S>>,
    /// Bumped on every stop; a loop only runs while it matches.
    generation: AtomicU64,
}

impl<S> Shared<S> {
    /// Invalidates the running loop, waiting out any frame in progress.
    fn cancel(&self) {
        let _frame = self.field.lock();
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

/// Owns a particle field and its per-frame loop.
pub struct ParticleAnimator<S> {
    /// Field and cancellation state.
    shared: Arc<Shared<S>>,
    /// Delay between frames.
    frame_interval: Duration,
    /// Running loop, with the generation it was started under.
    task: Option<(u64, JoinHandle<()>)>,
}

impl<S: Surface + Send + 'static> ParticleAnimator<S> {
    /// Wraps a field. The loop is not started.
    #[must_use]
    pub fn new(field: ParticleField<S>) -> Self {
        Self {
            shared: Arc::new(Shared {
                field: Mutex::new(field),
                generation: AtomicU64::new(0),
            }),
            frame_interval: DEFAULT_FRAME_INTERVAL,
            task: None,
        }
    }

    /// Sets the delay between frames.
    #[must_use]
    pub fn with_frame_interval(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = frame_interval;
        self
    }

    /// Starts rendering once per frame interval. No-op while running.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        if let Some((_, task)) = self.task.take() {
            task.abort();
        }

        let generation = self.shared.generation.load(Ordering::Acquire);
        let shared = Arc::clone(&self.shared);
        let frame_interval = self.frame_interval;
        let task = tokio::spawn(async move {
            let mut ticker = time::interval(frame_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if !render_frame(&shared, generation) {
                    break;
                }
            }
        });

        tracing::debug!("Particle animator started (generation {})", generation);
        self.task = Some((generation, task));
    }

    /// Stops rendering. Safe to call any number of times.
    pub fn stop(&mut self) {
        let Some((generation, task)) = self.task.take() else {
            return;
        };
        self.shared.cancel();
        task.abort();
        tracing::debug!("Particle animator stopped (generation {})", generation);
    }

    /// True while the loop is scheduled and has not been cancelled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        match &self.task {
            Some((generation, task)) => {
                !task.is_finished()
                    && *generation == self.shared.generation.load(Ordering::Acquire)
            }
            None => false,
        }
    }

    /// Handle that stops this animator from elsewhere.
    #[must_use]
    pub fn stopper(&self) -> AnimatorStopper {
        let shared = Arc::clone(&self.shared);
        AnimatorStopper {
            cancel: Arc::new(move || shared.cancel()),
        }
    }

    /// Advances one frame by hand, outside the loop.
    pub fn tick(&self) -> bool {
        self.shared.field.lock().tick()
    }

    /// Changes the surface extent.
    pub fn resize(&self, width: f32, height: f32) {
        self.shared.field.lock().resize(width, height);
    }

    /// Sets the repulsion target.
    pub fn set_pointer(&self, x: f32, y: f32) {
        self.shared.field.lock().set_pointer(x, y);
    }

    /// Removes the repulsion target.
    pub fn clear_pointer(&self) {
        self.shared.field.lock().clear_pointer();
    }

    /// Current repulsion target.
    #[must_use]
    pub fn pointer(&self) -> Option<Vec2> {
        self.shared.field.lock().pointer()
    }

    /// Frame counters.
    #[must_use]
    pub fn stats(&self) -> FieldStats {
        self.shared.field.lock().stats()
    }

    /// Runs `f` against the field while holding the frame lock.
    pub fn with_field<R>(&self, f: impl FnOnce(&ParticleField<S>) -> R) -> R {
        f(&self.shared.field.lock())
    }

    /// Stops the loop and releases the pool.
    pub fn dispose(mut self) {
        self.stop();
    }
}

impl<S> Drop for ParticleAnimator<S> {
    fn drop(&mut self) {
        if let Some((_, task)) = self.task.take() {
            self.shared.cancel();
            task.abort();
        }
    }
}

/// Renders one frame if `generation` is still current.
fn render_frame<S: Surface>(shared: &Shared<S>, generation: u64) -> bool {
    let mut field = shared.field.lock();
    if shared.generation.load(Ordering::Acquire) != generation {
        return false;
    }
    field.tick();
    true
}

/// Cloneable handle that stops a [`ParticleAnimator`]'s loop.
#[derive(Clone)]
pub struct AnimatorStopper {
    /// Type-erased cancellation of the animator's shared state.
    cancel: Arc<dyn Fn() + Send + Sync>,
}

impl AnimatorStopper {
    /// Stops the loop. Idempotent; once this returns no frame renders.
    pub fn stop(&self) {
        (self.cancel)();
    }
}

impl std::fmt::Debug for AnimatorStopper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimatorStopper").finish_non_exhaustive()
    }
}
