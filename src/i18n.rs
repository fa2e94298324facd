//! Language handling: the active-language enum, the dotted-path accessor
//! over the content's `i18n` tree, and the built-in section labels used when
//! the content does not carry its own.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::content::{LocalizedList, LocalizedText};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Zh,
    En,
}

/// Content is authored in Chinese first; every localized lookup falls back
/// toward this language and never the other way round.
pub const BASE_LANGUAGE: Language = Language::Zh;

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }

    pub fn from_code(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "zh" | "zh-cn" | "zh-hans" => Some(Language::Zh),
            "en" | "en-us" | "en-gb" => Some(Language::En),
            _ => None,
        }
    }

    /// Value for `<html lang>`.
    pub fn html_lang(&self) -> &'static str {
        match self {
            Language::Zh => "zh-CN",
            Language::En => "en",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Language::Zh => Language::En,
            Language::En => Language::Zh,
        }
    }

    /// Text of the language toggle: it names the language you switch *to*.
    pub fn toggle_text(&self) -> &'static str {
        match self {
            Language::Zh => "EN",
            Language::En => "中文",
        }
    }

    /// Pick a language from a locale string such as `zh_CN.UTF-8`.
    /// Anything that is not Chinese reads as English.
    pub fn from_locale(locale: &str) -> Self {
        if locale.trim().to_lowercase().starts_with("zh") {
            Language::Zh
        } else {
            Language::En
        }
    }

    pub fn labels(&self) -> &'static Labels {
        match self {
            Language::Zh => &ZH_LABELS,
            Language::En => &EN_LABELS,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// ── Dotted-path accessor ──────────────────────────────────

/// Resolve `path` (e.g. `"hero.title"`) in the `lang` subtree of `tree`.
/// Missing segments and non-string terminals resolve to `""`.
pub fn t(tree: &BTreeMap<String, Value>, lang: Language, path: &str) -> String {
    let mut cur = match tree.get(lang.code()) {
        Some(v) => v,
        None => return String::new(),
    };
    for part in path.split('.') {
        match cur.as_object().and_then(|obj| obj.get(part)) {
            Some(next) => cur = next,
            None => return String::new(),
        }
    }
    cur.as_str().unwrap_or("").to_string()
}

// ── Section labels ────────────────────────────────────────

pub struct Labels {
    pub case_study: &'static str,
    pub demo: &'static str,
    pub repo: &'static str,
    pub details: &'static str,
    pub metrics: &'static str,
    pub key_moves: &'static str,
    pub copy: &'static str,
    pub copied: &'static str,
    pub all: &'static str,
    pub year: &'static str,
    pub month: &'static str,
    pub category: &'static str,
    pub search: &'static str,
    pub no_date: &'static str,
    pub open: &'static str,
    pub no_documents: &'static str,
    pub close: &'static str,
    pub resume: &'static str,
}

pub const ZH_LABELS: Labels = Labels {
    case_study: "Case Study", demo: "演示", repo: "Repo", details: "查看详情",
    metrics: "结果 / 指标", key_moves: "关键动作",
    copy: "复制邮箱", copied: "已复制",
    all: "全部", year: "年份", month: "月份", category: "分类", search: "搜索标题、摘要、标签",
    no_date: "未注明日期", open: "打开", no_documents: "没有匹配的文档", close: "关闭",
    resume: "下载简历",
};

pub const EN_LABELS: Labels = Labels {
    case_study: "Case Study", demo: "Demo", repo: "Repo", details: "Details",
    metrics: "Impact / Metrics", key_moves: "Key Moves",
    copy: "Copy", copied: "Copied",
    all: "All", year: "Year", month: "Month", category: "Category", search: "Search title, summary, tags",
    no_date: "Undated", open: "Open", no_documents: "No matching documents", close: "Close",
    resume: "Resume",
};

/// Section label lookup: the content's own `labels.<key>` string wins,
/// otherwise the built-in table for the language.
pub fn label(
    tree: &BTreeMap<String, Value>,
    lang: Language,
    key: &str,
    builtin: fn(&Labels) -> &'static str,
) -> String {
    let from_content = t(tree, lang, &format!("labels.{}", key));
    if from_content.is_empty() {
        builtin(lang.labels()).to_string()
    } else {
        from_content
    }
}

/// The active language bound to the content's `i18n` tree. View builders
/// take one of these so every lookup goes through the same fallback rule.
#[derive(Clone, Copy)]
pub struct Localizer<'a> {
    pub tree: &'a BTreeMap<String, Value>,
    pub lang: Language,
}

impl<'a> Localizer<'a> {
    pub fn new(tree: &'a BTreeMap<String, Value>, lang: Language) -> Self {
        Localizer { tree, lang }
    }

    pub fn t(&self, path: &str) -> String {
        t(self.tree, self.lang, path)
    }

    pub fn label(&self, key: &str, builtin: fn(&Labels) -> &'static str) -> String {
        label(self.tree, self.lang, key, builtin)
    }

    pub fn text(&self, value: &LocalizedText) -> String {
        value.resolve(self.lang)
    }

    pub fn list(&self, value: &LocalizedList) -> Vec<String> {
        value.resolve(self.lang)
    }
}
