//! # Site Boot Verification
//!
//! End-to-end checks of the page load on a paused tokio clock:
//! - The preloader field keeps rendering through the settle pause
//! - It stops when the exit transition starts and never renders again
//! - The hero field runs from the start and follows the pointer
//! - The theme survives a reload through the preference file

use std::time::Duration;

use sithong::effects::{CommandBuffer, Extent, Vec2, DEFAULT_FRAME_INTERVAL};
use sithong::ui::{FileStore, MemoryStore, Palette, Phase, PreferenceStore, ThemePreference, THEME_KEY};
use sithong::{ConfigError, Site, SiteConfig, SiteError};
use tokio::time::{self, Instant};

const VIEWPORT: Extent = Extent::new(800.0, 600.0);

fn seeded_config() -> SiteConfig {
    SiteConfig::from_toml_str(
        r"
        [preloader]
        seed = 11

        [hero]
        seed = 12

        [sequencer]
        seed = 13
        ",
    )
    .unwrap()
}

fn site<St: PreferenceStore>(config: &SiteConfig, store: St) -> Site<CommandBuffer, St> {
    Site::new(
        CommandBuffer::new(Extent::ZERO),
        CommandBuffer::new(Extent::ZERO),
        VIEWPORT,
        config,
        store,
    )
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_boot_reveals_hero_after_preloader() {
    let mut site = site(&seeded_config(), MemoryStore::new());
    let start = Instant::now();

    site.boot().await.unwrap();

    // 11..=50 steps of 60ms, 400ms settle, 800ms exit.
    let elapsed = Instant::now() - start;
    assert!(elapsed >= Duration::from_millis(1860), "{elapsed:?}");
    assert!(elapsed <= Duration::from_millis(4200), "{elapsed:?}");

    assert!(!site.preloader().is_running());
    assert!(site.preloader().stats().frames > 0);
    assert!(site.hero().is_running());
    assert!(site.hero().stats().frames > site.preloader().stats().frames);

    site.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_preloader_renders_until_exit_transition() {
    let mut site = site(&seeded_config(), MemoryStore::new());
    let mut run = site.run_preloader().unwrap();

    run.phase
        .wait_for(|phase| *phase == Phase::Settling)
        .await
        .unwrap();
    assert_eq!(run.progress.borrow().percent, 100);

    // Settle pause: the field keeps animating.
    let at_full = site.preloader().stats().frames;
    time::sleep(Duration::from_millis(200)).await;
    assert!(site.preloader().is_running());
    assert!(site.preloader().stats().frames > at_full);

    // Exit transition under way: stopped for good.
    time::sleep(Duration::from_millis(300)).await;
    assert!(!site.preloader().is_running());
    let frozen = site.preloader().stats().frames;
    assert_eq!(*run.phase.borrow(), Phase::Settling);

    run.completion.await;
    assert_eq!(*run.phase.borrow(), Phase::Done);
    assert_eq!(site.preloader().stats().frames, frozen);

    time::sleep(DEFAULT_FRAME_INTERVAL * 30).await;
    assert_eq!(site.preloader().stats().frames, frozen);
}

#[tokio::test(start_paused = true)]
async fn test_hero_follows_pointer() {
    let mut site = site(&seeded_config(), MemoryStore::new());
    site.start_hero();

    site.pointer_moved(400.0, 300.0);
    assert_eq!(site.hero().pointer(), Some(Vec2::new(400.0, 300.0)));
    assert_eq!(site.preloader().pointer(), None);

    time::sleep(DEFAULT_FRAME_INTERVAL * 10).await;
    site.pointer_left();
    assert_eq!(site.hero().pointer(), None);

    site.resize(1024.0, 768.0);
    assert_eq!(
        site.hero().with_field(|field| field.extent()),
        Extent::new(1024.0, 768.0)
    );
    assert_eq!(
        site.preloader().with_field(|field| field.extent()),
        Extent::new(1024.0, 768.0)
    );
    site.shutdown();
}

#[test]
fn test_theme_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.toml");
    let config = seeded_config();

    let mut first = site(&config, FileStore::open(&path).unwrap());
    assert_eq!(first.theme(), ThemePreference::Dark);
    assert_eq!(first.toggle_theme(), ThemePreference::Light);
    first.shutdown();

    let reloaded = site(&config, FileStore::open(&path).unwrap());
    assert_eq!(reloaded.theme(), ThemePreference::Light);
    assert_eq!(reloaded.palette(), &Palette::LIGHT);
    assert_eq!(
        reloaded.hero().with_field(|field| field.options().palette),
        Palette::LIGHT.field_palette()
    );

    let stored = FileStore::open(&path).unwrap().get(THEME_KEY).unwrap();
    assert_eq!(stored.as_deref(), Some("light"));
}

#[test]
fn test_config_drives_fields() {
    let config = SiteConfig::from_toml_str(
        r#"
        [preloader]
        pool_size = 40
        seed = 1

        [hero]
        pool_size = 25
        entry_bias = "uniform"
        "#,
    )
    .unwrap();
    let site = site(&config, MemoryStore::new());

    assert_eq!(site.preloader().with_field(|field| field.particles().len()), 40);
    assert_eq!(site.hero().with_field(|field| field.particles().len()), 25);
    assert!(site.hero().with_field(|field| field.options().pointer_repulsion));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SiteConfig {
        frame: sithong::FrameSettings { interval_ms: -1.0 },
        ..SiteConfig::default()
    };
    let result = Site::new(
        CommandBuffer::new(Extent::ZERO),
        CommandBuffer::new(Extent::ZERO),
        VIEWPORT,
        &config,
        MemoryStore::new(),
    );
    assert!(matches!(
        result,
        Err(SiteError::Config(ConfigError::FrameInterval(_)))
    ));
}
