//! # Site
//!
//! Wires the two particle fields, the preloader sequence and the theme into
//! one explicitly owned value.
//!
//! ```text
//! boot():
//!   hero.start()        ──────────────────────────────────────────────▶ keeps running
//!   preloader.start()   ── 100% ── 400ms ──▶ preloader stopped
//!   sequencer.run()     ─────────────────────────────── 800ms ──▶ completion, boot() returns
//! ```

use sithong_effects::{Extent, FieldOptions, ParticleAnimator, ParticleField, Surface};
use sithong_ui::{
    Completion, Palette, Phase, PreferenceStore, ProgressSequencer, ProgressTick,
    SequencerConfig, ThemeController, ThemePreference,
};
use tokio::sync::watch;

use crate::config::SiteConfig;
use crate::error::SiteResult;

/// A running preloader sequence.
#[derive(Debug)]
pub struct PreloaderRun {
    /// Resolves once the exit transition has finished.
    pub completion: Completion,
    /// Latest percentage and bar width.
    pub progress: watch::Receiver<ProgressTick>,
    /// Current sequencer phase.
    pub phase: watch::Receiver<Phase>,
}

/// The page: preloader and hero backgrounds plus the theme preference.
pub struct Site<S, St> {
    /// Full-screen background behind the loading counter.
    preloader: ParticleAnimator<S>,
    /// Interactive background of the landing section.
    hero: ParticleAnimator<S>,
    /// Counter timings.
    sequencer: SequencerConfig,
    /// Counter seed. `None` seeds from the OS.
    sequencer_seed: Option<u64>,
    /// Theme preference.
    theme: ThemeController<St>,
}

impl<S, St> Site<S, St>
where
    S: Surface + Send + 'static,
    St: PreferenceStore,
{
    /// Builds both fields over `extent` and reads the stored theme.
    ///
    /// The fields take their accents from the stored theme. Nothing is
    /// animated until [`Site::boot`] or [`Site::run_preloader`].
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn new(
        preloader_surface: S,
        hero_surface: S,
        extent: Extent,
        config: &SiteConfig,
        store: St,
    ) -> SiteResult<Self> {
        config.validate()?;

        let theme = ThemeController::load(store);
        let palette = theme.palette().field_palette();
        let frame_interval = config.frame_interval();

        let preloader = ParticleField::initialize(
            preloader_surface,
            extent,
            FieldOptions {
                palette,
                ..config.preloader_options()
            },
        )?;
        let hero = ParticleField::initialize(
            hero_surface,
            extent,
            FieldOptions {
                palette,
                ..config.hero_options()
            },
        )?;

        tracing::info!(
            "Site ready: {}x{}, {} theme",
            extent.width,
            extent.height,
            theme.current()
        );

        Ok(Self {
            preloader: ParticleAnimator::new(preloader).with_frame_interval(frame_interval),
            hero: ParticleAnimator::new(hero).with_frame_interval(frame_interval),
            sequencer: config.sequencer_config(),
            sequencer_seed: config.sequencer.seed,
            theme,
        })
    }

    /// Starts the preloader field and its counter.
    ///
    /// The preloader field stops on its own when the exit transition starts.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequencer cannot be created.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn run_preloader(&mut self) -> SiteResult<PreloaderRun> {
        let sequencer = match self.sequencer_seed {
            Some(seed) => ProgressSequencer::seeded(self.sequencer, seed)?,
            None => ProgressSequencer::new(self.sequencer)?,
        };
        let progress = sequencer.subscribe();
        let phase = sequencer.subscribe_phase();

        self.preloader.start();
        let stopper = self.preloader.stopper();
        let completion = sequencer.run(move || stopper.stop());

        tracing::info!("Preloader running");
        Ok(PreloaderRun {
            completion,
            progress,
            phase,
        })
    }

    /// Starts the hero field. No-op while it runs.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start_hero(&mut self) {
        self.hero.start();
    }

    /// Runs the page load: the hero starts right away, the preloader runs to
    /// completion on top of it.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequencer cannot be created.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub async fn boot(&mut self) -> SiteResult<()> {
        self.start_hero();
        let run = self.run_preloader()?;
        run.completion.await;
        self.preloader.stop();
        tracing::info!("Site revealed");
        Ok(())
    }

    /// Moves the hero's repulsion target.
    pub fn pointer_moved(&self, x: f32, y: f32) {
        self.hero.set_pointer(x, y);
    }

    /// The pointer left the hero section.
    pub fn pointer_left(&self) {
        self.hero.clear_pointer();
    }

    /// Resizes both fields to the new viewport.
    pub fn resize(&self, width: f32, height: f32) {
        self.preloader.resize(width, height);
        self.hero.resize(width, height);
    }

    /// Effective theme.
    #[must_use]
    pub fn theme(&self) -> ThemePreference {
        self.theme.current()
    }

    /// Colors of the effective theme.
    #[must_use]
    pub fn palette(&self) -> &'static Palette {
        self.theme.palette()
    }

    /// Theme controller, for inspecting the persistence state.
    #[must_use]
    pub const fn theme_controller(&self) -> &ThemeController<St> {
        &self.theme
    }

    /// Switches theme and persists it.
    pub fn toggle_theme(&mut self) -> ThemePreference {
        self.theme.toggle()
    }

    /// The preloader field.
    #[must_use]
    pub const fn preloader(&self) -> &ParticleAnimator<S> {
        &self.preloader
    }

    /// The hero field.
    #[must_use]
    pub const fn hero(&self) -> &ParticleAnimator<S> {
        &self.hero
    }

    /// Stops both fields and releases their pools.
    pub fn shutdown(self) {
        let Self {
            preloader, hero, ..
        } = self;
        preloader.dispose();
        hero.dispose();
        tracing::info!("Site shut down");
    }
}
