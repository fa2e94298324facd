//! Persisted visitor preferences: language and theme.
//!
//! Stored as a small JSON file under the user's config directory
//! (`<config_dir>/folio/preferences.json`). Unknown or unreadable values
//! read back as "not set"; they never block a render.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use crate::i18n::Language;

const APP_NAME: &str = "folio";
const PREFS_FILE_NAME: &str = "preferences.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// The two values that survive a reload. `None` means "never chosen".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub lang: Option<Language>,
    pub theme: Option<Theme>,
}

impl Preferences {
    /// Lenient decode: a bad value for one key does not discard the other.
    pub fn from_json(raw: &str) -> Self {
        let json: serde_json::Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                warn!("Ignoring unreadable preferences: {}", e);
                return Preferences::default();
            }
        };
        Preferences {
            lang: json
                .get("lang")
                .and_then(|v| v.as_str())
                .and_then(Language::from_code),
            theme: json
                .get("theme")
                .and_then(|v| v.as_str())
                .and_then(Theme::from_str),
        }
    }
}

#[derive(Debug)]
pub struct PrefsError(pub String);

impl std::fmt::Display for PrefsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where preferences live between sessions.
pub trait PrefStore {
    fn load(&self) -> Preferences;
    fn save(&self, prefs: &Preferences) -> Result<(), PrefsError>;

    fn save_lang(&self, lang: Language) -> Result<(), PrefsError> {
        let mut prefs = self.load();
        prefs.lang = Some(lang);
        self.save(&prefs)
    }

    fn save_theme(&self, theme: Theme) -> Result<(), PrefsError> {
        let mut prefs = self.load();
        prefs.theme = Some(theme);
        self.save(&prefs)
    }
}

// ── File-backed store ─────────────────────────────────────

pub struct FilePrefStore {
    path: PathBuf,
}

impl FilePrefStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FilePrefStore { path: path.into() }
    }

    /// Store at the platform config directory; `None` when the platform
    /// reports no config directory.
    pub fn in_config_dir() -> Option<Self> {
        dirs::config_dir().map(|p| FilePrefStore::new(p.join(APP_NAME).join(PREFS_FILE_NAME)))
    }
}

impl PrefStore for FilePrefStore {
    fn load(&self) -> Preferences {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Preferences::from_json(&raw),
            Err(e) => {
                debug!("No stored preferences at {}: {}", self.path.display(), e);
                Preferences::default()
            }
        }
    }

    fn save(&self, prefs: &Preferences) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| PrefsError(format!("Failed to create config directory: {}", e)))?;
        }
        let content = serde_json::to_string_pretty(prefs)
            .map_err(|e| PrefsError(format!("Failed to serialize preferences: {}", e)))?;
        fs::write(&self.path, content)
            .map_err(|e| PrefsError(format!("Failed to write preferences file: {}", e)))?;
        Ok(())
    }
}

// ── In-memory store ───────────────────────────────────────

/// Store with no persistence, for runs where no config directory exists
/// and for tests.
#[derive(Default)]
pub struct MemoryPrefStore {
    prefs: RefCell<Preferences>,
}

impl PrefStore for MemoryPrefStore {
    fn load(&self) -> Preferences {
        *self.prefs.borrow()
    }

    fn save(&self, prefs: &Preferences) -> Result<(), PrefsError> {
        *self.prefs.borrow_mut() = *prefs;
        Ok(())
    }
}
