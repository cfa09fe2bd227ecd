//! Color themes and the controller that owns the active one.

use crate::error::Result;
use crate::persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The available color themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// The default theme.
    #[default]
    Light,
    /// Dark background; also the focus-mode theme.
    Dark,
    /// Blues.
    Ocean,
    /// Warm oranges.
    Sunset,
    /// Greens.
    Forest,
    /// Neon on black.
    Cyberpunk,
}

impl Theme {
    /// All themes in menu order.
    pub const ALL: [Self; 6] =
        [Self::Light, Self::Dark, Self::Ocean, Self::Sunset, Self::Forest, Self::Cyberpunk];

    /// Stored name of the theme.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Ocean => "ocean",
            Self::Sunset => "sunset",
            Self::Forest => "forest",
            Self::Cyberpunk => "cyberpunk",
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::Ocean => "Ocean",
            Self::Sunset => "Sunset",
            Self::Forest => "Forest",
            Self::Cyberpunk => "Cyberpunk",
        }
    }

    /// Comma-separated list of every theme name.
    #[must_use]
    pub fn names() -> String {
        Self::ALL.map(Self::as_str).join(", ")
    }
}

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownTheme(s.to_string()))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when a theme name matches no theme.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme: '{0}'")]
pub struct UnknownTheme(pub String);

/// Holds the active theme and writes it through on change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemeController {
    current: Theme,
}

impl ThemeController {
    /// A controller starting on `theme`, without touching storage.
    #[must_use]
    pub const fn new(theme: Theme) -> Self {
        Self { current: theme }
    }

    /// Restore the stored theme, or use `fallback` when none or an unknown one is stored.
    #[must_use]
    pub fn load(persistence: &Persistence, fallback: Theme) -> Self {
        let current = match persistence.load_theme() {
            Some(name) => name.parse().unwrap_or_else(|e: UnknownTheme| {
                tracing::warn!(error = %e, "ignoring stored theme");
                fallback
            }),
            None => fallback,
        };
        Self { current }
    }

    /// The active theme.
    #[must_use]
    pub const fn current(&self) -> Theme {
        self.current
    }

    /// Switch themes and persist the choice.
    ///
    /// # Errors
    ///
    /// Returns an error if the theme cannot be written; the in-memory theme
    /// has changed regardless.
    pub fn set(&mut self, theme: Theme, persistence: &Persistence) -> Result<()> {
        self.current = theme;
        tracing::debug!(%theme, "theme changed");
        persistence.save_theme(theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::THEME_KEY;
    use crate::storage::MemoryKeyValueStore;

    #[test]
    fn test_theme_from_str() {
        assert_eq!("ocean".parse::<Theme>().unwrap(), Theme::Ocean);
        assert_eq!(" CyberPunk ".parse::<Theme>().unwrap(), Theme::Cyberpunk);
        assert_eq!("neon".parse::<Theme>().unwrap_err(), UnknownTheme("neon".to_string()));
    }

    #[test]
    fn test_theme_names_and_labels() {
        assert_eq!(Theme::names(), "light, dark, ocean, sunset, forest, cyberpunk");
        assert_eq!(Theme::Sunset.label(), "Sunset");
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn test_controller_load_validates_stored_theme() {
        let stored = Persistence::new(Box::new(MemoryKeyValueStore::with_entries([(
            THEME_KEY, "forest",
        )])));
        assert_eq!(ThemeController::load(&stored, Theme::Light).current(), Theme::Forest);

        let bogus = Persistence::new(Box::new(MemoryKeyValueStore::with_entries([(
            THEME_KEY, "plaid",
        )])));
        assert_eq!(ThemeController::load(&bogus, Theme::Dark).current(), Theme::Dark);

        assert_eq!(
            ThemeController::load(&Persistence::in_memory(), Theme::Ocean).current(),
            Theme::Ocean
        );
    }

    #[test]
    fn test_controller_set_persists() {
        let persistence = Persistence::in_memory();
        let mut controller = ThemeController::default();
        controller.set(Theme::Sunset, &persistence).unwrap();
        assert_eq!(controller.current(), Theme::Sunset);
        assert_eq!(persistence.load_theme().as_deref(), Some("sunset"));
    }
}
