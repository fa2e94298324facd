use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::i18n::{Language, BASE_LANGUAGE};

// ── Localized values ──────────────────────────────────────

/// A string keyed by language code.
///
/// Resolution always goes active language → base language (`zh`) → `""`.
/// A plain JSON string is read as the base-language value. Non-string
/// entries are dropped at parse time so nothing non-textual ever reaches
/// a renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn from_value(value: Value) -> Self {
        let mut map = BTreeMap::new();
        match value {
            Value::Object(obj) => {
                for (lang, v) in obj {
                    if let Value::String(s) = v {
                        map.insert(lang, s);
                    }
                }
            }
            Value::String(s) => {
                map.insert(BASE_LANGUAGE.code().to_string(), s);
            }
            _ => {}
        }
        LocalizedText(map)
    }

    /// Raw value for one language, empty strings treated as absent.
    pub fn get(&self, lang: Language) -> Option<&str> {
        self.0
            .get(lang.code())
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn resolve(&self, lang: Language) -> String {
        self.get(lang)
            .or_else(|| self.get(BASE_LANGUAGE))
            .unwrap_or("")
            .to_string()
    }

    /// Every language variant, in code order. Feeds the search haystack.
    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(|s| s.as_str())
    }
}

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_value(Value::deserialize(deserializer)?))
    }
}

/// A list of strings keyed by language code. Same resolution rule as
/// [`LocalizedText`]; an empty list counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocalizedList(BTreeMap<String, Vec<String>>);

impl LocalizedList {
    pub fn from_value(value: Value) -> Self {
        let mut map = BTreeMap::new();
        match value {
            Value::Object(obj) => {
                for (lang, v) in obj {
                    if let Value::Array(items) = v {
                        map.insert(lang, string_items(items));
                    }
                }
            }
            Value::Array(items) => {
                map.insert(BASE_LANGUAGE.code().to_string(), string_items(items));
            }
            _ => {}
        }
        LocalizedList(map)
    }

    pub fn get(&self, lang: Language) -> Option<&[String]> {
        self.0
            .get(lang.code())
            .map(|v| v.as_slice())
            .filter(|v| !v.is_empty())
    }

    pub fn resolve(&self, lang: Language) -> Vec<String> {
        self.get(lang)
            .or_else(|| self.get(BASE_LANGUAGE))
            .map(|v| v.to_vec())
            .unwrap_or_default()
    }
}

impl<'de> Deserialize<'de> for LocalizedList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_value(Value::deserialize(deserializer)?))
    }
}

fn string_items(items: Vec<Value>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}

/// Plain optional strings in the content file follow JavaScript truthiness:
/// `""` and `null` are both "not set".
fn non_empty_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let v = Value::deserialize(deserializer)?;
    Ok(match v {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

fn lenient_strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let v = Value::deserialize(deserializer)?;
    Ok(match v {
        Value::Array(items) => string_items(items),
        _ => Vec::new(),
    })
}

/// `preview: false` (or `"false"`) opts out; anything else keeps the default.
fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let v = Value::deserialize(deserializer)?;
    Ok(match v {
        Value::Bool(b) => b,
        Value::String(s) => s.trim() != "false",
        _ => true,
    })
}

// ── Content document ──────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentDocument {
    /// language code → nested tree of chrome strings
    pub i18n: BTreeMap<String, Value>,
    pub profile: Profile,
    pub about: About,
    pub projects: Vec<Project>,
    pub experience: Vec<ExperienceItem>,
    pub skills: Vec<SkillGroup>,
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub name: LocalizedText,
    pub headline: LocalizedText,
    pub lead: LocalizedText,
    pub one_liner: LocalizedText,
    pub metrics: Vec<Metric>,
    pub highlights: LocalizedList,
    pub social: Vec<LabeledLink>,
    #[serde(deserialize_with = "non_empty_string")]
    pub resume_path: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub email: Option<String>,
    pub contact_title: LocalizedText,
    pub contact_text: LocalizedText,
    pub contact_meta: LocalizedText,
    pub contact_links: Vec<LabeledLink>,
}

pub const DEFAULT_RESUME_PATH: &str = "./assets/resume.pdf";
pub const DEFAULT_EMAIL: &str = "hello@example.com";

impl Profile {
    pub fn resume_href(&self) -> &str {
        self.resume_path.as_deref().unwrap_or(DEFAULT_RESUME_PATH)
    }

    pub fn email_address(&self) -> &str {
        self.email.as_deref().unwrap_or(DEFAULT_EMAIL)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Metric {
    pub value: LocalizedText,
    pub label: LocalizedText,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LabeledLink {
    pub label: LocalizedText,
    #[serde(deserialize_with = "non_empty_string")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct About {
    pub subtitle: LocalizedText,
    pub paragraphs: LocalizedList,
    pub bullets: LocalizedList,
    pub quick_facts: Vec<QuickFact>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct QuickFact {
    pub k: LocalizedText,
    pub v: LocalizedText,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Project {
    pub title: LocalizedText,
    pub summary: LocalizedText,
    pub description: LocalizedText,
    pub role: LocalizedText,
    pub bullets: LocalizedList,
    pub metrics: LocalizedList,
    #[serde(deserialize_with = "lenient_strings")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub stack: Vec<String>,
    pub links: ProjectLinks,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectLinks {
    #[serde(deserialize_with = "non_empty_string")]
    pub case: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub demo: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub repo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ExperienceItem {
    pub title: LocalizedText,
    pub org: LocalizedText,
    pub time: LocalizedText,
    pub bullets: LocalizedList,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SkillGroup {
    pub group: LocalizedText,
    pub items: LocalizedList,
}

/// An entry in the research/document library.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Document {
    pub title: LocalizedText,
    pub summary: LocalizedText,
    #[serde(deserialize_with = "non_empty_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient_strings")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub file: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient_flag")]
    pub preview: bool,
}

impl Default for Document {
    fn default() -> Self {
        Document {
            title: LocalizedText::default(),
            summary: LocalizedText::default(),
            date: None,
            category: None,
            tags: Vec::new(),
            file: None,
            url: None,
            preview: true,
        }
    }
}

impl Document {
    /// Resolvable link: an explicit `url` wins over `file`.
    pub fn href(&self) -> Option<&str> {
        self.url.as_deref().or(self.file.as_deref())
    }

    /// The date string, trimmed.
    pub fn date_str(&self) -> &str {
        self.date.as_deref().map(str::trim).unwrap_or("")
    }
}

impl ContentDocument {
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("content document is not valid: {}", e))
    }
}
