//! # Site Configuration
//!
//! Every section is optional; a missing key keeps the built-in value.
//!
//! ```toml
//! [preloader]
//! pool_size = 160
//! seed = 7
//!
//! [hero]
//! entry_bias = "top-edge"
//! link_distance = 100.0
//!
//! [sequencer]
//! interval_ms = 60
//! increment_min = 2.0
//! increment_max = 10.0
//!
//! [theme]
//! store_path = "prefs.toml"
//!
//! [frame]
//! interval_ms = 16.666
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use sithong_effects::{ColorMode, EntryBias, FieldOptions, Span, DEFAULT_FRAME_INTERVAL};
use sithong_ui::SequencerConfig;

use crate::error::{ConfigError, ConfigResult};

/// Complete site configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Overrides for the preloader field.
    pub preloader: FieldOverrides,
    /// Overrides for the hero field.
    pub hero: FieldOverrides,
    /// Progress counter timings.
    pub sequencer: SequencerSettings,
    /// Theme persistence.
    pub theme: ThemeSettings,
    /// Frame loop.
    pub frame: FrameSettings,
}

impl SiteConfig {
    /// Reads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!("Loaded site config from {}", path.display());
        Ok(config)
    }

    /// Parses and validates a config document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be parsed or validated.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> ConfigResult<()> {
        self.preloader_options()
            .validate()
            .map_err(|source| ConfigError::Field {
                section: "preloader",
                source,
            })?;
        self.hero_options()
            .validate()
            .map_err(|source| ConfigError::Field {
                section: "hero",
                source,
            })?;
        self.sequencer_config().validate()?;

        let interval = self.frame.interval_ms;
        if !(interval.is_finite() && interval > 0.0) {
            return Err(ConfigError::FrameInterval(interval));
        }
        Ok(())
    }

    /// Preloader field options: the preset with overrides applied.
    #[must_use]
    pub fn preloader_options(&self) -> FieldOptions {
        self.preloader.apply(FieldOptions::preloader())
    }

    /// Hero field options: the preset with overrides applied.
    #[must_use]
    pub fn hero_options(&self) -> FieldOptions {
        self.hero.apply(FieldOptions::hero())
    }

    /// Progress sequencer timings.
    #[must_use]
    pub fn sequencer_config(&self) -> SequencerConfig {
        let s = &self.sequencer;
        SequencerConfig {
            interval: Duration::from_millis(s.interval_ms),
            increment: Span::new(s.increment_min, s.increment_max),
            settle: Duration::from_millis(s.settle_ms),
            exit: Duration::from_millis(s.exit_ms),
        }
    }

    /// Delay between animation frames.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        let micros = (self.frame.interval_ms * 1000.0).round();
        if micros.is_finite() && micros > 0.0 {
            Duration::from_micros(micros.max(1.0) as u64)
        } else {
            DEFAULT_FRAME_INTERVAL
        }
    }
}

/// Per-field overrides. Unset keys keep the preset value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldOverrides {
    /// Number of particles.
    pub pool_size: Option<usize>,
    /// Re-entry policy.
    pub entry_bias: Option<EntryBias>,
    /// Pointer repulsion.
    pub pointer_repulsion: Option<bool>,
    /// Link distance in pixels.
    pub link_distance: Option<f32>,
    /// Link opacity at zero distance.
    pub link_alpha: Option<f32>,
    /// Link stroke width.
    pub link_width: Option<f32>,
    /// Single or dual accent.
    pub color_mode: Option<ColorMode>,
    /// Per-frame velocity damping.
    pub damping: Option<f32>,
    /// RNG seed.
    pub seed: Option<u64>,
}

impl FieldOverrides {
    /// Applies the set keys on top of `base`.
    #[must_use]
    pub fn apply(&self, mut base: FieldOptions) -> FieldOptions {
        if let Some(pool_size) = self.pool_size {
            base.pool_size = pool_size;
        }
        if let Some(entry_bias) = self.entry_bias {
            base.entry_bias = entry_bias;
        }
        if let Some(pointer_repulsion) = self.pointer_repulsion {
            base.pointer_repulsion = pointer_repulsion;
        }
        if let Some(link_distance) = self.link_distance {
            base.link_distance = link_distance;
        }
        if let Some(link_alpha) = self.link_alpha {
            base.link_alpha = link_alpha;
        }
        if let Some(link_width) = self.link_width {
            base.link_width = link_width;
        }
        if let Some(color_mode) = self.color_mode {
            base.color_mode = color_mode;
        }
        if let Some(damping) = self.damping {
            base.damping = damping;
        }
        if self.seed.is_some() {
            base.seed = self.seed;
        }
        base
    }
}

/// Progress counter timings, in milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SequencerSettings {
    /// Counter timer period.
    pub interval_ms: u64,
    /// Smallest step.
    pub increment_min: f32,
    /// Largest step, exclusive.
    pub increment_max: f32,
    /// Pause at 100% before the exit transition.
    pub settle_ms: u64,
    /// Exit transition length.
    pub exit_ms: u64,
    /// RNG seed for the steps.
    pub seed: Option<u64>,
}

impl Default for SequencerSettings {
    fn default() -> Self {
        Self {
            interval_ms: 60,
            increment_min: 2.0,
            increment_max: 10.0,
            settle_ms: 400,
            exit_ms: 800,
            seed: None,
        }
    }
}

/// Theme persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeSettings {
    /// Preference file. Without one the theme lasts for the session only.
    pub store_path: Option<PathBuf>,
}

/// Frame loop timing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameSettings {
    /// Delay between frames, in milliseconds.
    pub interval_ms: f64,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_FRAME_INTERVAL.as_secs_f64() * 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sithong_effects::FieldError;
    use sithong_ui::SequencerError;

    #[test]
    fn test_empty_document_uses_presets() {
        let config = SiteConfig::from_toml_str("").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.preloader_options(), FieldOptions::preloader());
        assert_eq!(config.hero_options(), FieldOptions::hero());
        assert_eq!(config.sequencer_config(), SequencerConfig::default());
        assert_eq!(config.frame_interval(), DEFAULT_FRAME_INTERVAL);
        assert_eq!(config.theme.store_path, None);
    }

    #[test]
    fn test_overrides_apply_over_presets() {
        let config = SiteConfig::from_toml_str(
            r#"
            [preloader]
            pool_size = 40
            seed = 3

            [hero]
            entry_bias = "uniform"
            pointer_repulsion = false
            color_mode = "dual"

            [sequencer]
            interval_ms = 10
            settle_ms = 0

            [theme]
            store_path = "prefs.toml"
            "#,
        )
        .unwrap();

        let preloader = config.preloader_options();
        assert_eq!(preloader.pool_size, 40);
        assert_eq!(preloader.seed, Some(3));
        assert!((preloader.link_distance - 80.0).abs() < f32::EPSILON);

        let hero = config.hero_options();
        assert_eq!(hero.entry_bias, EntryBias::Uniform);
        assert!(!hero.pointer_repulsion);
        assert_eq!(hero.color_mode, ColorMode::Dual);
        assert_eq!(hero.pool_size, 120);

        let sequencer = config.sequencer_config();
        assert_eq!(sequencer.interval, Duration::from_millis(10));
        assert_eq!(sequencer.settle, Duration::ZERO);
        assert_eq!(sequencer.exit, Duration::from_millis(800));

        assert_eq!(config.theme.store_path.as_deref(), Some(Path::new("prefs.toml")));
    }

    #[test]
    fn test_validation_rejects_unusable_values() {
        let zero_pool = SiteConfig::from_toml_str("[hero]\npool_size = 0");
        assert!(matches!(
            zero_pool,
            Err(ConfigError::Field {
                section: "hero",
                source: FieldError::EmptyPool
            })
        ));

        let no_links = SiteConfig::from_toml_str("[preloader]\nlink_distance = -1.0");
        assert!(matches!(
            no_links,
            Err(ConfigError::Field {
                section: "preloader",
                source: FieldError::InvalidLinkDistance(_)
            })
        ));

        let empty_range =
            SiteConfig::from_toml_str("[sequencer]\nincrement_min = 5.0\nincrement_max = 5.0");
        assert!(matches!(
            empty_range,
            Err(ConfigError::Sequencer(SequencerError::InvalidIncrement { .. }))
        ));

        let stalled = SiteConfig::from_toml_str("[sequencer]\ninterval_ms = 0");
        assert!(matches!(
            stalled,
            Err(ConfigError::Sequencer(SequencerError::ZeroInterval))
        ));

        let frozen = SiteConfig::from_toml_str("[frame]\ninterval_ms = 0.0");
        assert!(matches!(frozen, Err(ConfigError::FrameInterval(_))));
    }

    #[test]
    fn test_unknown_keys_are_errors() {
        let typo = SiteConfig::from_toml_str("[hero]\npool = 10");
        assert!(matches!(typo, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("site.toml");
        assert!(matches!(SiteConfig::load(&missing), Err(ConfigError::Io { .. })));

        fs::write(&missing, "[frame]\ninterval_ms = 33.0\n").unwrap();
        let config = SiteConfig::load(&missing).unwrap();
        assert_eq!(config.frame_interval(), Duration::from_millis(33));
    }
}
