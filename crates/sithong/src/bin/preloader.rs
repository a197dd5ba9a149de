//! # Sithong Preloader
//!
//! Headless run of the page load: the preloader counts to 100 over its
//! particle field, the hero field takes over and follows a scripted pointer
//! sweep, and the theme is toggled once.
//!
//! ```bash
//! # Built-in presets, session-only theme
//! sithong-preloader
//!
//! # With a config file
//! RUST_LOG=debug sithong-preloader site.toml
//! ```

use std::error::Error;

use sithong::effects::{CommandBuffer, Extent, DEFAULT_FRAME_INTERVAL};
use sithong::ui::{FileStore, MemoryStore, PreferenceStore};
use sithong::{Site, SiteConfig};
use tokio::time;
use tracing_subscriber::EnvFilter;

/// Viewport of the headless run.
const VIEWPORT: Extent = Extent::new(1280.0, 720.0);

/// Frames spent sweeping the pointer across the hero.
const SWEEP_FRAMES: u16 = 180;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => SiteConfig::load(path)?,
        None => SiteConfig::default(),
    };
    let store = open_store(&config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(run(config, store))
}

/// Opens the configured preference file, or a session store.
fn open_store(config: &SiteConfig) -> Box<dyn PreferenceStore> {
    let Some(path) = &config.theme.store_path else {
        return Box::new(MemoryStore::new());
    };
    match FileStore::open(path) {
        Ok(store) => Box::new(store),
        Err(err) => {
            tracing::warn!("Preference file unusable, theme is session-only: {}", err);
            Box::new(MemoryStore::new())
        }
    }
}

async fn run(config: SiteConfig, store: Box<dyn PreferenceStore>) -> Result<(), Box<dyn Error>> {
    let mut site = Site::new(
        CommandBuffer::new(VIEWPORT),
        CommandBuffer::new(VIEWPORT),
        VIEWPORT,
        &config,
        store,
    )?;

    site.start_hero();
    let run = site.run_preloader()?;
    let mut progress = run.progress;
    let reporter = tokio::spawn(async move {
        // Ends when the sequencer is dropped.
        while progress.changed().await.is_ok() {
            let percent = progress.borrow_and_update().percent;
            tracing::info!("Loading {:>3}%", percent);
        }
    });
    run.completion.await;
    reporter.await?;

    let stats = site.preloader().stats();
    tracing::info!(
        "Preloader rendered {} frames ({} links in the last)",
        stats.frames,
        stats.links
    );

    for step in 0..SWEEP_FRAMES {
        let x = VIEWPORT.width * f32::from(step) / f32::from(SWEEP_FRAMES);
        site.pointer_moved(x, VIEWPORT.height / 2.0);
        time::sleep(DEFAULT_FRAME_INTERVAL).await;
    }
    site.pointer_left();

    let stats = site.hero().stats();
    tracing::info!(
        "Hero rendered {} frames, {} resets",
        stats.frames,
        stats.resets
    );

    let theme = site.toggle_theme();
    tracing::info!("Theme is now {} (background {:?})", theme, site.palette().background);

    site.shutdown();
    Ok(())
}
