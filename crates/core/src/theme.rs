//! Light/dark theme preference.

use crate::constants::THEME_KEY;
use crate::error::PreferenceResult;
use crate::preferences::PreferenceStore;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Interpret a stored preference. Only `"dark"` selects the dark theme.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Class applied to `<body>`, if any.
    pub fn body_class(self) -> Option<&'static str> {
        match self {
            Theme::Light => None,
            Theme::Dark => Some("dark"),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The theme toggle control together with the store it persists to.
#[derive(Debug)]
pub struct ThemeToggle<S> {
    store: S,
    applied: Theme,
}

impl<S: PreferenceStore> ThemeToggle<S> {
    /// Read the stored preference once and apply it.
    ///
    /// An unreadable store is logged and treated as "no preference".
    pub fn init(store: S) -> Self {
        let stored = match store.get(THEME_KEY) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("ignoring unreadable theme preference: {}", e);
                None
            }
        };
        let applied = Theme::from_stored(stored.as_deref());
        tracing::debug!("applied {} theme", applied);
        Self { store, applied }
    }

    pub fn applied(&self) -> Theme {
        self.applied
    }

    /// Flip the applied theme and persist it.
    ///
    /// The flip takes effect even when persisting fails; the error is returned so the caller
    /// can report it.
    pub fn toggle(&mut self) -> PreferenceResult<Theme> {
        self.applied = self.applied.toggled();
        self.store.set(THEME_KEY, self.applied.as_str())?;
        tracing::info!("theme set to {}", self.applied);
        Ok(self.applied)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
