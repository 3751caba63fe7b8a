//! Light/dark theme preference.

use std::fmt;

use crate::storage::{LocalStore, StorageError, THEME_KEY};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Read the stored preference. Unknown values fall back to light.
    #[must_use]
    pub fn load(store: &dyn LocalStore) -> Self {
        match store.get(THEME_KEY).as_deref() {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    /// Flip the preference and persist the new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the preference cannot be persisted.
    pub fn toggle(self, store: &mut dyn LocalStore) -> Result<Self, StorageError> {
        let next = self.toggled();
        store.set(THEME_KEY, next.as_str().to_owned())?;
        Ok(next)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "theme_test.rs"]
mod tests;
