use log::{error, info, warn};

use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::i18n::Language;
use crate::prefs::PrefStore;
use crate::site::{Site, Startup};
use crate::source::{self, ContentSource, SourceError};

#[derive(Debug)]
pub struct BootError(pub String);

impl std::fmt::Display for BootError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SourceError> for BootError {
    fn from(e: SourceError) -> Self {
        BootError(e.to_string())
    }
}

/// Load content, apply the secondary document list, and render the first
/// page. Only a failure to load the primary content aborts; everything else
/// is reported and booting carries on.
pub fn run(
    config: &Config,
    startup: &Startup,
    prefs: Box<dyn PrefStore>,
    clipboard: Box<dyn Clipboard>,
) -> Result<Site, BootError> {
    info!("Folio boot starting...");

    let mut warnings = 0u32;

    // ── 1. Primary content ─────────────────────────────
    let source = ContentSource::from_config(config)?;
    let mut content = match source.load_content(&config.content.source) {
        Ok(c) => c,
        Err(e) => {
            error!("  Content unavailable: {}", e);
            error!("Boot FAILED: primary content could not be loaded.");
            return Err(e.into());
        }
    };
    info!(
        "  Content loaded: {} project(s), {} document(s)",
        content.projects.len(),
        content.documents.len()
    );

    // ── 2. Secondary documents ─────────────────────────
    if let Some(raw) = config.content.documents.as_deref() {
        let secondary = source.load_documents(raw);
        if source::apply_secondary(&mut content, secondary) {
            info!("  Documents replaced from {} ({} entries)", raw, content.documents.len());
        } else {
            warn!("  Keeping the {} document(s) from the primary content", content.documents.len());
            warnings += 1;
        }
    }

    // ── 3. Chrome strings ──────────────────────────────
    for lang in [Language::Zh, Language::En] {
        if !content.i18n.contains_key(lang.code()) {
            warn!("  No i18n strings for {} (chrome text falls back to defaults)", lang);
            warnings += 1;
        }
    }

    // ── 4. Preferences ─────────────────────────────────
    let stored = prefs.load();
    if stored.lang.is_none() && stored.theme.is_none() {
        info!("  No stored preferences; using locale and configured theme");
    }

    // ── Summary ─────────────────────────────────────────
    if warnings > 0 {
        warn!("Boot finished with {} warning(s).", warnings);
    } else {
        info!("Boot finished. All content in place.");
    }

    Ok(Site::boot(content, prefs, clipboard, startup))
}
