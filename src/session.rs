//! In-memory UI state for one visit.
//!
//! Every mutation goes through a setter that returns the mount points whose
//! contents depend on what changed. An unchanged value dirties nothing.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::filter::{Choice, DocFilter};
use crate::i18n::Language;
use crate::prefs::{Preferences, Theme};
use crate::render::MountPoint;

pub type Dirty = BTreeSet<MountPoint>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub lang: Language,
    pub theme: Theme,
    pub project_filter: Choice,
    pub doc_filter: DocFilter,
    pub email_copied: bool,
}

fn dirty(points: &[MountPoint]) -> Dirty {
    points.iter().copied().collect()
}

/// Starting language: stored preference, then a `zh*` environment locale,
/// then English.
pub fn initial_language(stored: Option<Language>, locale: Option<&str>) -> Language {
    stored.unwrap_or_else(|| locale.map(Language::from_locale).unwrap_or(Language::En))
}

impl Session {
    pub fn new(lang: Language, theme: Theme) -> Self {
        Session {
            lang,
            theme,
            project_filter: Choice::All,
            doc_filter: DocFilter::default(),
            email_copied: false,
        }
    }

    pub fn from_preferences(prefs: &Preferences, locale: Option<&str>, default_theme: Theme) -> Self {
        Session::new(
            initial_language(prefs.lang, locale),
            prefs.theme.unwrap_or(default_theme),
        )
    }

    /// A language change touches every localized region. The open modal
    /// keeps the fragment it was opened with.
    pub fn set_lang(&mut self, lang: Language) -> Dirty {
        if self.lang == lang {
            return Dirty::new();
        }
        self.lang = lang;
        MountPoint::ALL
            .iter()
            .copied()
            .filter(|m| *m != MountPoint::Modal)
            .collect()
    }

    pub fn set_theme(&mut self, theme: Theme) -> Dirty {
        if self.theme == theme {
            return Dirty::new();
        }
        self.theme = theme;
        dirty(&[MountPoint::Root])
    }

    pub fn set_project_filter(&mut self, filter: Choice) -> Dirty {
        if self.project_filter == filter {
            return Dirty::new();
        }
        self.project_filter = filter;
        dirty(&[MountPoint::TagChips, MountPoint::ProjectGrid])
    }

    pub fn select_year(&mut self, year: Choice) -> Dirty {
        if self.doc_filter.year == year {
            return Dirty::new();
        }
        self.doc_filter.select_year(year);
        dirty(&[MountPoint::DocFilters, MountPoint::DocGroups])
    }

    pub fn select_month(&mut self, month: Choice) -> Dirty {
        if self.doc_filter.month == month {
            return Dirty::new();
        }
        self.doc_filter.select_month(month);
        dirty(&[MountPoint::DocFilters, MountPoint::DocGroups])
    }

    pub fn select_category(&mut self, category: Choice) -> Dirty {
        if self.doc_filter.category == category {
            return Dirty::new();
        }
        self.doc_filter.select_category(category);
        dirty(&[MountPoint::DocFilters, MountPoint::DocGroups])
    }

    /// The search box keeps its own value while typing, only the list
    /// is rebuilt.
    pub fn set_query(&mut self, query: &str) -> Dirty {
        if self.doc_filter.query == query {
            return Dirty::new();
        }
        self.doc_filter.set_query(query);
        dirty(&[MountPoint::DocGroups])
    }

    pub fn set_email_copied(&mut self, copied: bool) -> Dirty {
        if self.email_copied == copied {
            return Dirty::new();
        }
        self.email_copied = copied;
        dirty(&[MountPoint::Contact])
    }
}
