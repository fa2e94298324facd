use log::{info, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::prefs::Theme;

pub const DEFAULT_CONFIG_FILE: &str = "folio.toml";
pub const DEFAULT_CONTENT_SOURCE: &str = "content.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// `folio.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub content: ContentConfig,
    pub output: OutputConfig,
    pub preferences: PreferencesConfig,
    pub defaults: DefaultsConfig,
    /// Directory the config file was read from; relative paths resolve here.
    #[serde(skip)]
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Path or URL of the content document.
    pub source: String,
    /// Optional path or URL of a JSON array that replaces `documents`.
    pub documents: Option<String>,
    /// Base URL relative sources resolve against instead of `root`.
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        ContentConfig {
            source: DEFAULT_CONTENT_SOURCE.to_string(),
            documents: None,
            base_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub theme: Option<String>,
}

impl Config {
    /// Read the config file. A missing file yields defaults; a malformed one
    /// is reported and also yields defaults.
    pub fn load(path: &Path) -> Self {
        let root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let mut config = match std::fs::read_to_string(path) {
            Ok(raw) => match Config::from_toml(&raw) {
                Ok(c) => {
                    info!("Loaded config from {}", path.display());
                    c
                }
                Err(e) => {
                    warn!("Ignoring {}: {}", path.display(), e);
                    Config::default()
                }
            },
            Err(_) => {
                info!("No config at {}, using defaults", path.display());
                Config::default()
            }
        };
        config.root = root;
        config
    }

    pub fn from_toml(raw: &str) -> Result<Self, String> {
        toml::from_str(raw).map_err(|e| e.to_string())
    }

    pub fn default_theme(&self) -> Theme {
        self.defaults
            .theme
            .as_deref()
            .and_then(Theme::from_str)
            .unwrap_or_default()
    }

    pub fn resolve_path(&self, rel: &str) -> PathBuf {
        let p = Path::new(rel);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.root.join(p)
        }
    }
}
