//! Filter/search engine for the project grid and the document library,
//! plus the facet option sets the filter controls offer.

use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

use crate::group::DocDate;
use crate::models::content::{Document, Project};

/// CLI spelling of the "no restriction" choice.
pub const ALL: &str = "all";

/// A facet selection. `All` is kept distinct from every real value, so a
/// tag literally named "all" is still filterable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    /// Parse a command-line selection; empty input and `all` mean no
    /// restriction. Use [`Choice::from_attr`] for rendered attribute values.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == ALL {
            Choice::All
        } else {
            Choice::Only(raw.to_string())
        }
    }

    /// Inverse of [`Choice::as_attr`]: only an empty value means `All`.
    pub fn from_attr(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            Choice::All
        } else {
            Choice::Only(raw.to_string())
        }
    }

    pub fn only(value: &str) -> Self {
        Choice::Only(value.to_string())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Choice::All => None,
            Choice::Only(v) => Some(v.as_str()),
        }
    }

    /// Value written into `data-arg` / `<option value>` attributes. `All`
    /// is the empty string so no real value can collide with it.
    pub fn as_attr(&self) -> &str {
        self.value().unwrap_or("")
    }
}

impl Serialize for Choice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

// ── Projects ──────────────────────────────────────────────

pub fn project_matches(project: &Project, filter: &Choice) -> bool {
    match filter {
        Choice::All => true,
        Choice::Only(tag) => project.tags.iter().any(|t| t == tag),
    }
}

/// Projects passing the tag filter, with their index in the content list.
pub fn visible_projects<'a>(projects: &'a [Project], filter: &Choice) -> Vec<(usize, &'a Project)> {
    projects
        .iter()
        .enumerate()
        .filter(|(_, p)| project_matches(p, filter))
        .collect()
}

/// Union of all project tags, ascending. `all` is not part of the set; the
/// chip row adds it separately.
pub fn tag_facet(projects: &[Project]) -> Vec<String> {
    projects
        .iter()
        .flat_map(|p| p.tags.iter())
        .filter(|t| !t.trim().is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ── Documents ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocFilter {
    pub year: Choice,
    /// `YYYY-MM`
    pub month: Choice,
    pub category: Choice,
    pub query: String,
}

impl DocFilter {
    pub fn matches(&self, doc: &Document) -> bool {
        let date = DocDate::parse(doc.date_str());

        if let Choice::Only(year) = &self.year {
            match &date {
                Some(d) if d.year_key() == *year => {}
                _ => return false,
            }
        }
        if let Choice::Only(month) = &self.month {
            match &date {
                Some(d) if d.month_key() == *month => {}
                _ => return false,
            }
        }
        if let Choice::Only(cat) = &self.category {
            if doc.category.as_deref() != Some(cat.as_str()) {
                return false;
            }
        }

        let needle = self.query.trim().to_lowercase();
        needle.is_empty() || search_haystack(doc).contains(&needle)
    }

    /// Select a year. A selected month that does not belong to the new year
    /// is reset to `all`. Returns whether the month was reset.
    pub fn select_year(&mut self, year: Choice) -> bool {
        let reset = match (&year, &self.month) {
            (Choice::Only(y), Choice::Only(m)) => !m.starts_with(y.as_str()),
            _ => false,
        };
        if reset {
            self.month = Choice::All;
        }
        self.year = year;
        reset
    }

    pub fn select_month(&mut self, month: Choice) {
        self.month = month;
    }

    pub fn select_category(&mut self, category: Choice) {
        self.category = category;
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }
}

/// Lowercased search text: title and summary in every language, category,
/// tags. Both language variants are always included, so a query typed in
/// either language finds the document whatever language is active.
pub fn search_haystack(doc: &Document) -> String {
    let mut parts: Vec<&str> = Vec::new();
    parts.extend(doc.title.variants());
    parts.extend(doc.summary.variants());
    if let Some(cat) = &doc.category {
        parts.push(cat);
    }
    parts.extend(doc.tags.iter().map(|t| t.as_str()));
    parts.join(" ").to_lowercase()
}

pub fn visible_documents<'a>(documents: &'a [Document], filter: &DocFilter) -> Vec<(usize, &'a Document)> {
    documents
        .iter()
        .enumerate()
        .filter(|(_, d)| filter.matches(d))
        .collect()
}

/// Option sets for the document filter controls, derived from the full
/// collection. Rebuilt whenever the collection changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocFacets {
    /// Newest first.
    pub years: Vec<String>,
    /// `YYYY-MM`, newest first.
    pub months: Vec<String>,
    /// Ascending.
    pub categories: Vec<String>,
}

impl DocFacets {
    pub fn from_documents(documents: &[Document]) -> Self {
        let mut years = BTreeSet::new();
        let mut months = BTreeSet::new();
        let mut categories = BTreeSet::new();

        for doc in documents {
            if let Some(date) = DocDate::parse(doc.date_str()) {
                years.insert(date.year_key());
                months.insert(date.month_key());
            }
            if let Some(cat) = &doc.category {
                categories.insert(cat.clone());
            }
        }

        DocFacets {
            years: years.into_iter().rev().collect(),
            months: months.into_iter().rev().collect(),
            categories: categories.into_iter().collect(),
        }
    }

    /// Month options to offer for the selected year; every month when no
    /// year is selected.
    pub fn months_for(&self, year: &Choice) -> Vec<&str> {
        self.months
            .iter()
            .map(|m| m.as_str())
            .filter(|m| match year {
                Choice::All => true,
                Choice::Only(y) => m.starts_with(y.as_str()),
            })
            .collect()
    }
}
