//! # Theme Preference
//!
//! Dark or light, read once at load, persisted on every toggle.
//!
//! A store that cannot be read or written never surfaces an error: the
//! controller logs it and carries on with an in-memory store for the rest of
//! the session.

use std::fmt;
use std::str::FromStr;

use sithong_effects::{Color, FieldPalette};

use crate::error::UnknownTheme;
use crate::store::{MemoryStore, PreferenceStore};

/// Storage key of the theme preference.
pub const THEME_KEY: &str = "sithong-theme";

/// The two site themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemePreference {
    /// Dark background, neon accents.
    #[default]
    Dark,
    /// Light background.
    Light,
}

impl ThemePreference {
    /// Stored name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Colors for this theme.
    #[must_use]
    pub const fn palette(self) -> &'static Palette {
        match self {
            Self::Dark => &Palette::DARK,
            Self::Light => &Palette::LIGHT,
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(UnknownTheme(other.to_owned())),
        }
    }
}

/// Colors of a theme.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Page background.
    pub background: Color,
    /// Primary accent.
    pub primary: Color,
    /// Secondary accent.
    pub secondary: Color,
}

impl Palette {
    /// Near-black page with the neon accents.
    pub const DARK: Self = Self {
        background: Color::hex(0x0505_0AFF),
        primary: Color::NEON_CYAN,
        secondary: Color::NEON_PINK,
    };

    /// Pale page with deeper accents that keep their contrast on it.
    pub const LIGHT: Self = Self {
        background: Color::hex(0xF4F6_FAFF),
        primary: Color::hex(0x00A8_92FF),
        secondary: Color::hex(0xD90F_6CFF),
    };

    /// Accents for a particle field.
    #[must_use]
    pub const fn field_palette(&self) -> FieldPalette {
        FieldPalette {
            primary: self.primary,
            secondary: self.secondary,
        }
    }
}

/// Where the controller persists to.
enum Backend<St> {
    /// The durable store.
    Durable(St),
    /// Session fallback after the durable store failed.
    Session(MemoryStore),
}

/// Reads, toggles and persists the theme preference.
pub struct ThemeController<St> {
    /// Effective theme.
    current: ThemePreference,
    /// Persistence target.
    backend: Backend<St>,
}

impl<St: PreferenceStore> ThemeController<St> {
    /// Reads the stored theme, defaulting to dark.
    pub fn load(store: St) -> Self {
        match store.get(THEME_KEY) {
            Ok(stored) => {
                let current = stored
                    .as_deref()
                    .and_then(|value| value.parse().ok())
                    .unwrap_or_default();
                tracing::debug!("Theme loaded: {}", current);
                Self {
                    current,
                    backend: Backend::Durable(store),
                }
            }
            Err(err) => {
                tracing::warn!("Theme store unavailable, using session defaults: {}", err);
                Self {
                    current: ThemePreference::default(),
                    backend: Backend::Session(MemoryStore::new()),
                }
            }
        }
    }

    /// Effective theme.
    #[must_use]
    pub const fn current(&self) -> ThemePreference {
        self.current
    }

    /// Colors of the effective theme.
    #[must_use]
    pub const fn palette(&self) -> &'static Palette {
        self.current.palette()
    }

    /// True once the durable store has failed and the session store is used.
    #[must_use]
    pub fn is_session_only(&self) -> bool {
        matches!(self.backend, Backend::Session(_))
    }

    /// Switches theme and persists the new value immediately.
    pub fn toggle(&mut self) -> ThemePreference {
        self.set(self.current.toggled())
    }

    /// Sets the theme and persists it immediately.
    pub fn set(&mut self, theme: ThemePreference) -> ThemePreference {
        self.current = theme;
        tracing::info!("Theme set to {}", theme);

        match &mut self.backend {
            Backend::Durable(store) => {
                if let Err(err) = store.set(THEME_KEY, theme.as_str()) {
                    tracing::warn!("Theme not persisted, keeping it for this session: {}", err);
                    let mut session = MemoryStore::new();
                    // MemoryStore::set is infallible.
                    let _ = session.set(THEME_KEY, theme.as_str());
                    self.backend = Backend::Session(session);
                }
            }
            Backend::Session(session) => {
                let _ = session.set(THEME_KEY, theme.as_str());
            }
        }

        theme
    }

    /// The durable store, unless the controller fell back to the session.
    #[must_use]
    pub fn store(&self) -> Option<&St> {
        match &self.backend {
            Backend::Durable(store) => Some(store),
            Backend::Session(_) => None,
        }
    }
}
