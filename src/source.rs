//! Loading the content document and the optional secondary document list.
//!
//! A source is a local path or an http(s) URL. Relative sources resolve
//! against the configured base URL when there is one, otherwise against the
//! directory holding `folio.toml`.

use log::{info, warn};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::models::content::{ContentDocument, Document};

#[derive(Debug)]
pub enum SourceError {
    Location(String),
    Read(String),
    Http(String),
    Parse(String),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Location(m) => write!(f, "bad source location: {}", m),
            SourceError::Read(m) => write!(f, "read failed: {}", m),
            SourceError::Http(m) => write!(f, "fetch failed: {}", m),
            SourceError::Parse(m) => write!(f, "parse failed: {}", m),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    Remote(Url),
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::File(p) => write!(f, "{}", p.display()),
            Location::Remote(u) => write!(f, "{}", u),
        }
    }
}

pub struct ContentSource {
    root: PathBuf,
    base_url: Option<Url>,
    timeout: Duration,
}

impl ContentSource {
    pub fn new(root: impl Into<PathBuf>, base_url: Option<Url>, timeout: Duration) -> Self {
        ContentSource {
            root: root.into(),
            base_url,
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let base_url = match config.content.base_url.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(
                Url::parse(raw).map_err(|e| SourceError::Location(format!("base_url {}: {}", raw, e)))?,
            ),
            _ => None,
        };
        Ok(ContentSource::new(
            config.root.clone(),
            base_url,
            Duration::from_secs(config.content.timeout_secs),
        ))
    }

    /// Resolve a raw source string to a concrete location.
    pub fn locate(&self, raw: &str) -> Result<Location, SourceError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SourceError::Location("empty source".to_string()));
        }

        if let Ok(url) = Url::parse(raw) {
            // single-letter schemes are Windows drive letters, not URLs
            if url.scheme().len() > 1 {
                return location_from_url(url);
            }
        }

        if let Some(base) = &self.base_url {
            let joined = base
                .join(raw)
                .map_err(|e| SourceError::Location(format!("{} against {}: {}", raw, base, e)))?;
            return location_from_url(joined);
        }

        let path = Path::new(raw);
        Ok(Location::File(if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }))
    }

    pub fn fetch_text(&self, location: &Location) -> Result<String, SourceError> {
        match location {
            Location::File(path) => std::fs::read_to_string(path)
                .map_err(|e| SourceError::Read(format!("{}: {}", path.display(), e))),
            Location::Remote(url) => {
                let client = reqwest::blocking::Client::builder()
                    .timeout(self.timeout)
                    .build()
                    .map_err(|e| SourceError::Http(format!("HTTP client error: {}", e)))?;

                let resp = client
                    .get(url.as_str())
                    .header("Cache-Control", "no-store")
                    .send()
                    .map_err(|e| SourceError::Http(format!("{}: {}", url, e)))?;

                if !resp.status().is_success() {
                    return Err(SourceError::Http(format!("{} returned {}", url, resp.status())));
                }
                resp.text()
                    .map_err(|e| SourceError::Http(format!("{}: {}", url, e)))
            }
        }
    }

    /// Load and parse the primary content document. Any failure here is
    /// fatal to the bootstrap.
    pub fn load_content(&self, raw: &str) -> Result<ContentDocument, SourceError> {
        let location = self.locate(raw)?;
        info!("Loading content from {}", location);
        let body = self.fetch_text(&location)?;
        ContentDocument::from_json(&body).map_err(SourceError::Parse)
    }

    /// Load the secondary document list. Returns `None`, after logging why,
    /// whenever the primary list should stay in place.
    pub fn load_documents(&self, raw: &str) -> Option<Vec<Document>> {
        let location = match self.locate(raw) {
            Ok(l) => l,
            Err(e) => {
                warn!("Secondary documents ignored: {}", e);
                return None;
            }
        };
        let body = match self.fetch_text(&location) {
            Ok(b) => b,
            Err(e) => {
                warn!("Secondary documents at {} ignored: {}", location, e);
                return None;
            }
        };
        match parse_documents(&body) {
            Ok(docs) => {
                info!("Loaded {} documents from {}", docs.len(), location);
                Some(docs)
            }
            Err(e) => {
                warn!("Secondary documents at {} ignored: {}", location, e);
                None
            }
        }
    }
}

fn location_from_url(url: Url) -> Result<Location, SourceError> {
    match url.scheme() {
        "http" | "https" => Ok(Location::Remote(url)),
        "file" => url
            .to_file_path()
            .map(Location::File)
            .map_err(|_| SourceError::Location(format!("{} is not a local path", url))),
        other => Err(SourceError::Location(format!("unsupported scheme {}", other))),
    }
}

/// Parse a secondary document list. Only a non-empty JSON array supersedes
/// the primary list; entries that are not objects are skipped.
pub fn parse_documents(raw: &str) -> Result<Vec<Document>, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| format!("not JSON: {}", e))?;
    let items = match value {
        Value::Array(items) => items,
        _ => return Err("not a JSON array".to_string()),
    };

    let mut docs = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            warn!("Skipping document entry {}: not an object", i);
            continue;
        }
        match serde_json::from_value::<Document>(item) {
            Ok(doc) => docs.push(doc),
            Err(e) => warn!("Skipping document entry {}: {}", i, e),
        }
    }

    if docs.is_empty() {
        return Err("no usable documents".to_string());
    }
    Ok(docs)
}

/// Replace the content's documents with the secondary list, if one loaded.
pub fn apply_secondary(content: &mut ContentDocument, secondary: Option<Vec<Document>>) -> bool {
    match secondary {
        Some(docs) if !docs.is_empty() => {
            content.documents = docs;
            true
        }
        _ => false,
    }
}
