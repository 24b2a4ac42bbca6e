//! UI preferences: language and color theme
//!
//! Persisted separately from the list so that clearing the list never
//! touches them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use crate::observe::{Listeners, Subscription};
use crate::persist::{PersistError, Persistence};
use crate::store::{load_record, save_record};

/// Record key the preferences store persists under
pub const PREFERENCES_KEY: &str = "preferences";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Ru,
}

impl Lang {
    pub fn all() -> [Lang; 2] {
        [Lang::En, Lang::Ru]
    }

    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ru => "ru",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// A preference value that is not one of the known options
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownPreference {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for Lang {
    type Err = UnknownPreference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lang::all()
            .into_iter()
            .find(|lang| lang.code() == s)
            .ok_or_else(|| UnknownPreference {
                kind: "language",
                value: s.to_string(),
            })
    }
}

impl FromStr for Theme {
    type Err = UnknownPreference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(UnknownPreference {
                kind: "mode",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub lang: Lang,
    #[serde(default)]
    pub theme: Theme,
}

pub struct PrefsStore {
    prefs: Preferences,
    persistence: Arc<dyn Persistence>,
    listeners: Listeners<Preferences>,
}

impl PrefsStore {
    pub fn open(persistence: Arc<dyn Persistence>) -> Result<Self, PersistError> {
        let prefs = load_record(persistence.as_ref(), PREFERENCES_KEY)?;
        Ok(PrefsStore {
            prefs,
            persistence,
            listeners: Listeners::new(),
        })
    }

    pub fn preferences(&self) -> Preferences {
        self.prefs
    }

    pub fn lang(&self) -> Lang {
        self.prefs.lang
    }

    pub fn theme(&self) -> Theme {
        self.prefs.theme
    }

    pub fn set_lang(&mut self, lang: Lang) {
        debug!(%lang, "set language");
        self.prefs.lang = lang;
        self.commit();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        debug!(%theme, "set theme");
        self.prefs.theme = theme;
        self.commit();
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.prefs.theme.toggled();
        self.set_theme(theme);
        theme
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Preferences) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    fn commit(&mut self) {
        save_record(self.persistence.as_ref(), PREFERENCES_KEY, &self.prefs);
        self.listeners.notify(&self.prefs);
    }
}

impl fmt::Debug for PrefsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefsStore").field("prefs", &self.prefs).finish()
    }
}
