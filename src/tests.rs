#![cfg(test)]

use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

use crate::boot;
use crate::clipboard::{copy_email, Clipboard, ClipboardError, CopyOutcome, SystemClipboard};
use crate::config::Config;
use crate::dom::{self, el, Action, Element, Node};
use crate::filter::{self, Choice, DocFacets, DocFilter};
use crate::group::{self, DocDate};
use crate::i18n::{self, Language, Localizer};
use crate::models::content::{ContentDocument, Document, LocalizedList, LocalizedText};
use crate::page;
use crate::prefs::{FilePrefStore, MemoryPrefStore, PrefStore, Preferences, Theme};
use crate::render::{self, Modal, MountPoint, Rect};
use crate::session::{initial_language, Session};
use crate::site::{Card, Event, Key, Site, Startup};
use crate::source::{self, ContentSource, Location};
use crate::view;

/// In-memory clipboard; `fail` makes every write error.
#[derive(Default)]
struct MemoryClipboard {
    contents: Option<String>,
    fail: bool,
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.fail {
            return Err(ClipboardError("clipboard write denied".to_string()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

fn to_html(node: &Node) -> String {
    dom::nodes_to_html(std::slice::from_ref(node))
}

fn attr<'a>(e: &'a Element, name: &str) -> Option<&'a str> {
    e.attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
}

fn text_content(node: &Node) -> String {
    match node {
        Node::Text(s) => s.clone(),
        Node::Element(e) => e.children.iter().map(text_content).collect(),
    }
}

/// Depth-first search for elements carrying `class`.
fn find_by_class<'a>(node: &'a Node, class: &str, found: &mut Vec<&'a Element>) {
    if let Node::Element(e) = node {
        if attr(e, "class").is_some_and(|c| c.split_whitespace().any(|x| x == class)) {
            found.push(e);
        }
        for c in &e.children {
            find_by_class(c, class, found);
        }
    }
}

fn document_count(site: &Site) -> usize {
    site.document_groups().iter().map(|b| b.items.len()).sum()
}

fn fixture_json() -> serde_json::Value {
    json!({
        "i18n": {
            "zh": {
                "meta": { "title": "作品集" },
                "nav": { "about": "关于" },
                "sections": { "about": "关于我" }
            },
            "en": {
                "meta": { "title": "Portfolio", "description": "Selected work" },
                "nav": { "about": "About", "projects": "Projects" },
                "labels": { "details": "More" },
                "count": 3
            }
        },
        "profile": {
            "name": { "zh": "李雷", "en": "Li Lei" },
            "headline": { "zh": "数据工程师" },
            "email": "li@example.com",
            "social": [
                { "label": "GitHub", "url": "https://github.com/lilei" },
                { "label": "Broken", "url": null }
            ]
        },
        "about": {
            "subtitle": { "zh": "简介", "en": "Intro" },
            "paragraphs": { "zh": ["第一段"] },
            "bullets": { "zh": [], "en": [] }
        },
        "projects": [
            {
                "title": { "zh": "推荐系统", "en": "Recommender" },
                "summary": { "zh": "摘要" },
                "role": { "en": "Lead" },
                "tags": ["ML", "Data"],
                "stack": ["Rust"],
                "metrics": { "zh": ["提升 20%"] },
                "bullets": { "en": ["Shipped v1"] },
                "links": { "case": "https://case.example", "demo": "", "repo": "https://repo.example" }
            },
            { "title": { "zh": "仪表盘" }, "tags": ["Frontend", "Data"] },
            { "title": { "en": "All hands" }, "tags": ["all"] }
        ],
        "experience": [
            { "title": { "zh": "工程师", "en": "Engineer" }, "org": { "zh": "某公司" }, "time": "2020 - 2024" }
        ],
        "skills": [
            { "group": { "en": "Languages" }, "items": ["Rust", "Python"] }
        ],
        "documents": [
            {
                "title": { "zh": "报告A" },
                "summary": { "en": "An ML pipeline overview" },
                "date": "2024-05-01",
                "category": "Report",
                "tags": ["pipeline"]
            },
            { "title": { "zh": "报告B" }, "date": "2024-05-20", "category": "Note" },
            { "title": { "zh": "报告C" }, "date": "2024-03-01", "category": "Report", "file": "./docs/c.pdf" },
            { "title": { "zh": "无日期" }, "category": "Misc", "url": "https://docs.example/d", "preview": false },
            { "title": { "zh": "旧笔记" }, "date": "2023-11", "category": "Note" }
        ]
    })
}

fn fixture() -> ContentDocument {
    ContentDocument::from_json(&fixture_json().to_string()).unwrap()
}

fn startup(lang: Option<Language>) -> Startup {
    Startup {
        locale: None,
        default_theme: Theme::Light,
        lang,
        theme: None,
        year: 2025,
    }
}

fn site_in(lang: Language) -> Site {
    Site::boot(
        fixture(),
        Box::new(MemoryPrefStore::default()),
        Box::new(MemoryClipboard::default()),
        &startup(Some(lang)),
    )
}

fn doc(date: Option<&str>) -> Document {
    Document {
        date: date.map(|d| d.to_string()),
        ..Document::default()
    }
}

fn dirty(points: &[MountPoint]) -> std::collections::BTreeSet<MountPoint> {
    points.iter().copied().collect()
}

// ═══════════════════════════════════════════════════════════
// Localized accessor
// ═══════════════════════════════════════════════════════════

#[test]
fn t_resolves_dotted_paths() {
    let content = fixture();
    assert_eq!(i18n::t(&content.i18n, Language::En, "meta.title"), "Portfolio");
    assert_eq!(i18n::t(&content.i18n, Language::Zh, "meta.title"), "作品集");
}

#[test]
fn t_never_panics_on_missing_or_non_string() {
    let content = fixture();
    assert_eq!(i18n::t(&content.i18n, Language::En, "meta.missing"), "");
    assert_eq!(i18n::t(&content.i18n, Language::En, "meta.title.deeper"), "");
    assert_eq!(i18n::t(&content.i18n, Language::En, "meta"), "");
    assert_eq!(i18n::t(&content.i18n, Language::En, "count"), "");
    assert_eq!(i18n::t(&content.i18n, Language::En, ""), "");
    assert_eq!(i18n::t(&BTreeMap::new(), Language::Zh, "meta.title"), "");
}

#[test]
fn t_does_not_fall_back_across_languages() {
    let content = fixture();
    // description only exists under en
    assert_eq!(i18n::t(&content.i18n, Language::Zh, "meta.description"), "");
}

#[test]
fn localized_text_falls_back_toward_zh_only() {
    let zh_only = LocalizedText::from_value(json!({ "zh": "仅中文" }));
    let en_only = LocalizedText::from_value(json!({ "en": "English only" }));
    assert_eq!(zh_only.resolve(Language::En), "仅中文");
    assert_eq!(en_only.resolve(Language::Zh), "");
    assert_eq!(en_only.resolve(Language::En), "English only");
}

#[test]
fn localized_text_lenient_shapes() {
    assert_eq!(LocalizedText::from_value(json!("plain")).resolve(Language::En), "plain");
    assert_eq!(LocalizedText::from_value(json!(42)).resolve(Language::Zh), "");
    assert_eq!(LocalizedText::from_value(json!(null)).resolve(Language::Zh), "");
    let mixed = LocalizedText::from_value(json!({ "zh": 7, "en": "ok" }));
    assert_eq!(mixed.resolve(Language::Zh), "");
    assert_eq!(mixed.resolve(Language::En), "ok");
    // empty string counts as absent
    let empty_en = LocalizedText::from_value(json!({ "zh": "中", "en": "" }));
    assert_eq!(empty_en.resolve(Language::En), "中");
}

#[test]
fn localized_list_fallback_and_filtering() {
    let list = LocalizedList::from_value(json!({ "zh": ["一", 2, "三"], "en": [] }));
    assert_eq!(list.resolve(Language::En), vec!["一", "三"]);
    assert_eq!(LocalizedList::from_value(json!(["a"])).resolve(Language::En), vec!["a"]);
    assert!(LocalizedList::from_value(json!({ "en": ["x"] })).resolve(Language::Zh).is_empty());
    assert!(LocalizedList::from_value(json!("nope")).resolve(Language::Zh).is_empty());
}

#[test]
fn labels_prefer_content_then_builtin() {
    let content = fixture();
    let en = Localizer::new(&content.i18n, Language::En);
    let zh = Localizer::new(&content.i18n, Language::Zh);
    assert_eq!(en.label("details", |l| l.details), "More");
    assert_eq!(zh.label("details", |l| l.details), "查看详情");
    assert_eq!(en.label("copied", |l| l.copied), "Copied");
    assert_eq!(zh.label("copied", |l| l.copied), "已复制");
}

#[test]
fn language_codes_and_chrome() {
    assert_eq!(Language::from_code("zh-CN"), Some(Language::Zh));
    assert_eq!(Language::from_code("EN"), Some(Language::En));
    assert_eq!(Language::from_code("fr"), None);
    assert_eq!(Language::Zh.html_lang(), "zh-CN");
    assert_eq!(Language::En.html_lang(), "en");
    assert_eq!(Language::Zh.toggle_text(), "EN");
    assert_eq!(Language::En.toggle_text(), "中文");
    assert_eq!(Language::from_locale("zh_TW.UTF-8"), Language::Zh);
    assert_eq!(Language::from_locale("de_DE"), Language::En);
}

// ═══════════════════════════════════════════════════════════
// Content model
// ═══════════════════════════════════════════════════════════

#[test]
fn content_defaults_and_links() {
    let content = fixture();
    assert_eq!(content.profile.email_address(), "li@example.com");
    assert_eq!(content.profile.resume_href(), "./assets/resume.pdf");
    assert!(content.projects[0].links.demo.is_none());
    let bare = &content.projects[1].links;
    assert!(bare.case.is_none() && bare.demo.is_none() && bare.repo.is_none());

    let docs = &content.documents;
    assert!(docs[0].preview);
    assert!(!docs[3].preview);
    assert_eq!(docs[2].href(), Some("./docs/c.pdf"));
    assert_eq!(docs[3].href(), Some("https://docs.example/d"));
    assert_eq!(docs[3].date_str(), "");
}

#[test]
fn document_url_wins_over_file() {
    let d: Document = serde_json::from_value(json!({ "file": "a.pdf", "url": "https://b" })).unwrap();
    assert_eq!(d.href(), Some("https://b"));
    let d: Document = serde_json::from_value(json!({ "file": "a.pdf", "url": "" })).unwrap();
    assert_eq!(d.href(), Some("a.pdf"));
}

#[test]
fn empty_content_document_parses() {
    let content = ContentDocument::from_json("{}").unwrap();
    assert!(content.projects.is_empty());
    assert_eq!(content.profile.email_address(), "hello@example.com");
    assert!(ContentDocument::from_json("not json").is_err());
}

// ═══════════════════════════════════════════════════════════
// View models
// ═══════════════════════════════════════════════════════════

#[test]
fn profile_view_skips_links_without_url() {
    let content = fixture();
    let lx = Localizer::new(&content.i18n, Language::En);
    let p = view::profile_view(&content.profile, &lx);
    assert_eq!(p.name, "Li Lei");
    assert_eq!(p.headline, "数据工程师");
    assert_eq!(p.social.len(), 1);
    assert_eq!(p.social[0].href, "https://github.com/lilei");
}

#[test]
fn project_card_badges_and_links() {
    let content = fixture();
    let lx = Localizer::new(&content.i18n, Language::En);
    let card = view::project_card(0, &content.projects[0], &lx);
    assert_eq!(card.title, "Recommender");
    assert_eq!(card.badges, vec!["ML", "Data", "Lead"]);
    assert!(card.case_link.is_some());
    assert!(card.demo_link.is_none());
    assert_eq!(card.details_label, "More");

    // role only in en: zh card has no role badge
    let zh = Localizer::new(&content.i18n, Language::Zh);
    assert_eq!(view::project_card(0, &content.projects[0], &zh).badges, vec!["ML", "Data"]);
}

#[test]
fn project_detail_sections() {
    let content = fixture();
    let lx = Localizer::new(&content.i18n, Language::En);
    let d = view::project_detail(&content.projects[0], &lx);
    assert_eq!(d.badges, vec!["ML", "Data", "Rust"]);
    assert_eq!(d.metrics, vec!["提升 20%"]);
    assert_eq!(d.bullets, vec!["Shipped v1"]);
    let labels: Vec<&str> = d.links.iter().map(|l| l.label.as_str()).collect();
    assert_eq!(labels, vec!["Case Study", "Repo"]);
    assert!(d.has_case);

    let zh = Localizer::new(&content.i18n, Language::Zh);
    // en-only bullets render empty under zh
    assert!(view::project_detail(&content.projects[0], &zh).bullets.is_empty());
}

#[test]
fn experience_heading_joins_title_and_org() {
    let content = fixture();
    let lx = Localizer::new(&content.i18n, Language::En);
    let x = view::experience_view(&content.experience[0], &lx);
    assert_eq!(x.heading, "Engineer · 某公司");
    assert_eq!(x.time, "2020 - 2024");
}

#[test]
fn document_views() {
    let content = fixture();
    let lx = Localizer::new(&content.i18n, Language::En);
    let undated = view::document_card(3, &content.documents[3], &lx);
    assert_eq!(undated.date, "Undated");
    assert_eq!(undated.link.as_ref().map(|l| l.href.as_str()), Some("https://docs.example/d"));

    let with_preview = view::document_detail(&content.documents[2], &lx);
    assert_eq!(with_preview.preview_src.as_deref(), Some("./docs/c.pdf"));
    assert!(view::document_detail(&content.documents[3], &lx).preview_src.is_none());
    assert!(view::document_detail(&content.documents[1], &lx).preview_src.is_none());
}

// ═══════════════════════════════════════════════════════════
// Filters and facets
// ═══════════════════════════════════════════════════════════

#[test]
fn tag_facet_is_sorted_union() {
    let content = fixture();
    assert_eq!(filter::tag_facet(&content.projects), vec!["Data", "Frontend", "ML", "all"]);
}

#[test]
fn project_filter_all_is_identity() {
    let content = fixture();
    assert_eq!(filter::visible_projects(&content.projects, &Choice::All).len(), 3);
    let data: Vec<usize> = filter::visible_projects(&content.projects, &Choice::only("Data"))
        .into_iter()
        .map(|(i, _)| i)
        .collect();
    assert_eq!(data, vec![0, 1]);
}

#[test]
fn tag_named_all_is_still_filterable() {
    let content = fixture();
    let only_all: Vec<usize> = filter::visible_projects(&content.projects, &Choice::only("all"))
        .into_iter()
        .map(|(i, _)| i)
        .collect();
    assert_eq!(only_all, vec![2]);
    assert_eq!(Choice::parse("all"), Choice::All);
    assert_eq!(Choice::parse("  "), Choice::All);
}

#[test]
fn doc_facets_from_present_values() {
    let content = fixture();
    let f = DocFacets::from_documents(&content.documents);
    assert_eq!(f.years, vec!["2024", "2023"]);
    assert_eq!(f.months, vec!["2024-05", "2024-03", "2023-11"]);
    assert_eq!(f.categories, vec!["Misc", "Note", "Report"]);
    assert_eq!(f.months_for(&Choice::only("2023")), vec!["2023-11"]);
    assert_eq!(f.months_for(&Choice::All).len(), 3);
}

#[test]
fn cross_facet_reset() {
    let mut f = DocFilter {
        year: Choice::only("2024"),
        month: Choice::only("2023-11"),
        ..DocFilter::default()
    };
    assert!(!f.select_year(Choice::only("2023")));
    assert_eq!(f.month, Choice::only("2023-11"));
    assert!(f.select_year(Choice::only("2022")));
    assert_eq!(f.month, Choice::All);
    assert_eq!(f.year, Choice::only("2022"));
}

#[test]
fn selecting_all_years_keeps_month() {
    let mut f = DocFilter {
        month: Choice::only("2023-11"),
        ..DocFilter::default()
    };
    assert!(!f.select_year(Choice::All));
    assert_eq!(f.month, Choice::only("2023-11"));
}

#[test]
fn selecting_month_leaves_year_alone() {
    let mut f = DocFilter {
        year: Choice::only("2024"),
        ..DocFilter::default()
    };
    f.select_month(Choice::only("2023-11"));
    assert_eq!(f.year, Choice::only("2024"));
}

#[test]
fn search_matches_any_language_variant() {
    let content = fixture();
    let filter = DocFilter {
        query: "ml".to_string(),
        ..DocFilter::default()
    };
    let hits: Vec<usize> = filter::visible_documents(&content.documents, &filter)
        .into_iter()
        .map(|(i, _)| i)
        .collect();
    assert_eq!(hits, vec![0]);

    let by_tag = DocFilter {
        query: "  PIPELINE ".to_string(),
        ..DocFilter::default()
    };
    assert!(by_tag.matches(&content.documents[0]));
}

#[test]
fn blank_query_matches_everything() {
    let content = fixture();
    let filter = DocFilter {
        query: "   ".to_string(),
        ..DocFilter::default()
    };
    assert_eq!(filter::visible_documents(&content.documents, &filter).len(), 5);
}

#[test]
fn undated_documents_never_match_a_year() {
    let content = fixture();
    let filter = DocFilter {
        year: Choice::only("2024"),
        category: Choice::only("Report"),
        ..DocFilter::default()
    };
    let hits: Vec<usize> = filter::visible_documents(&content.documents, &filter)
        .into_iter()
        .map(|(i, _)| i)
        .collect();
    assert_eq!(hits, vec![0, 2]);
    assert!(!filter.matches(&content.documents[3]));
}

// ═══════════════════════════════════════════════════════════
// Grouping
// ═══════════════════════════════════════════════════════════

#[test]
fn grouping_orders_buckets_and_items() {
    let docs = vec![
        doc(Some("2024-05-01")),
        doc(Some("2024-05-20")),
        doc(Some("2024-03-01")),
        doc(None),
    ];
    let buckets = group::group_documents(docs.iter().enumerate().collect());
    let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(keys, vec!["2024-05", "2024-03", "unknown"]);
    let may: Vec<usize> = buckets[0].items.iter().map(|(i, _)| *i).collect();
    assert_eq!(may, vec![1, 0]);
    assert!(buckets[2].is_unknown());
}

#[test]
fn grouping_keeps_input_order_on_ties() {
    let docs = vec![doc(Some("2024-05")), doc(Some("2024-05")), doc(Some("2024-05"))];
    let buckets = group::group_documents(docs.iter().enumerate().collect());
    let order: Vec<usize> = buckets[0].items.iter().map(|(i, _)| *i).collect();
    assert_eq!(order, vec![0, 1, 2]);
}

#[test]
fn unparseable_dates_group_as_unknown() {
    for raw in ["2024-13-01", "2024-5", "2024/05/01", "May 2024", "2024-02-30"] {
        assert!(DocDate::parse(raw).is_none(), "{} should not parse", raw);
        assert_eq!(group::bucket_key(&doc(Some(raw))), "unknown");
    }
    assert_eq!(DocDate::parse("2024-02-29").map(|d| d.month_key()), Some("2024-02".to_string()));
    assert_eq!(DocDate::parse(" 2023-11 ").map(|d| d.year_key()), Some("2023".to_string()));
}

#[test]
fn unknown_bucket_sorts_last_even_alone_with_old_dates() {
    let docs = vec![doc(None), doc(Some("1999-01-01"))];
    let buckets = group::group_documents(docs.iter().enumerate().collect());
    assert_eq!(buckets.last().map(|b| b.key.as_str()), Some("unknown"));
}

// ═══════════════════════════════════════════════════════════
// DOM and renderer
// ═══════════════════════════════════════════════════════════

#[test]
fn dom_escapes_text_and_attributes() {
    let node: Node = el("a")
        .attr("title", "say \"hi\"")
        .text("<b> & co")
        .into();
    assert_eq!(to_html(&node), "<a title=\"say &quot;hi&quot;\">&lt;b&gt; &amp; co</a>");
}

#[test]
fn dom_actions_and_void_tags() {
    let node: Node = el("button").on(Action::OpenProject(3)).into();
    assert_eq!(to_html(&node), "<button data-action=\"open-project\" data-arg=\"3\"></button>");
    let input: Node = el("input").attr("value", "x").into();
    assert_eq!(to_html(&input), "<input value=\"x\">");
    let replaced = el("div").class("a").class("b");
    assert_eq!(attr(&replaced, "class"), Some("b"));
}

#[test]
fn tag_chips_mark_the_active_filter() {
    let tags = vec!["ML".to_string(), "all".to_string()];
    let nodes = render::tag_chip_nodes(&tags, &Choice::only("all"), "All");
    let classes: Vec<&str> = nodes
        .iter()
        .filter_map(|n| n.as_element())
        .filter_map(|e| attr(e, "class"))
        .collect();
    assert_eq!(classes, vec!["chip", "chip", "chip is-active"]);
}

#[test]
fn chip_args_parse_back_to_their_choice() {
    let tags = vec!["ML".to_string(), "all".to_string()];
    let nodes = render::tag_chip_nodes(&tags, &Choice::All, "All");
    let parsed: Vec<Event> = nodes
        .iter()
        .filter_map(|n| n.as_element())
        .map(|e| Event::parse(&format!("filter-tag {}", attr(e, "data-arg").unwrap_or(""))).unwrap())
        .collect();
    assert_eq!(
        parsed,
        vec![
            Event::FilterTag(Choice::All),
            Event::FilterTag(Choice::only("ML")),
            Event::FilterTag(Choice::only("all")),
        ]
    );

    // the real "all" tag filters down to its one project
    let mut site = site_in(Language::En);
    site.dispatch(parsed[2].clone());
    let grid = site.renderer().html(MountPoint::ProjectGrid);
    assert!(grid.contains("All hands"));
    assert!(!grid.contains("Recommender"));
}

#[test]
fn modal_state_machine() {
    let mut modal = Modal::default();
    assert!(!modal.close());
    modal.open(vec![Node::Text("first".into())]);
    modal.open(vec![Node::Text("second".into())]);
    assert!(modal.is_open());
    let shown = dom::nodes_to_html(&modal.nodes("Close"));
    assert!(shown.contains("second") && !shown.contains("first"));
    assert!(modal.close());
    assert!(!modal.is_open());
    assert!(!dom::nodes_to_html(&modal.nodes("Close")).contains("second"));
    assert!(!modal.close());
}

#[test]
fn rect_contains_edges() {
    let r = Rect { left: 10.0, top: 10.0, right: 20.0, bottom: 20.0 };
    assert!(r.contains(10.0, 20.0));
    assert!(!r.contains(9.9, 15.0));
}

// ═══════════════════════════════════════════════════════════
// Site: rendering and dispatch
// ═══════════════════════════════════════════════════════════

#[test]
fn boot_renders_chrome() {
    let site = site_in(Language::Zh);
    let attrs = site.renderer().root_attrs();
    assert!(attrs.contains(&("lang".to_string(), "zh-CN".to_string())));
    assert!(attrs.contains(&("data-theme".to_string(), "light".to_string())));
    assert!(site.renderer().html(MountPoint::Header).contains(">EN<"));
    assert!(site.renderer().html(MountPoint::Meta).contains("<title>作品集</title>"));
    assert!(site.renderer().html(MountPoint::Footer).contains("2025"));

    let page = site.page_html();
    assert!(page.starts_with("<!doctype html>"));
    assert!(page.contains("<html lang=\"zh-CN\" data-theme=\"light\">"));
    assert!(page.contains(">关于我</h2>"));
    // missing i18n key keeps the skeleton default
    assert!(page.contains(">Projects</h2>"));
    assert!(!page.contains("{{"));
}

#[test]
fn rendering_is_idempotent() {
    let mut site = site_in(Language::En);
    let first = site.page_html();
    site.render_all();
    assert_eq!(site.page_html(), first);
    assert_eq!(site_in(Language::En).page_html(), first);

    site.dispatch(Event::FilterTag(Choice::only("ML")));
    site.dispatch(Event::FilterTag(Choice::All));
    assert_eq!(site.page_html(), first);
}

#[test]
fn page_keeps_braces_in_content_text() {
    let text = "Templates {{skills}} and {{name}} and {{i18n:nav.about|X}}";
    let mut raw = fixture_json();
    raw["projects"][0]["summary"] = json!({ "en": text });
    let site = Site::boot(
        ContentDocument::from_json(&raw.to_string()).unwrap(),
        Box::new(MemoryPrefStore::default()),
        Box::new(MemoryClipboard::default()),
        &startup(Some(Language::En)),
    );
    assert!(site.renderer().html(MountPoint::ProjectGrid).contains(text));

    let page = site.page_html();
    assert!(page.contains(text));
    let skills = site.renderer().html(MountPoint::Skills);
    assert_eq!(page.matches(skills.as_str()).count(), 1);
}

#[test]
fn tag_filter_dirties_only_project_regions() {
    let mut site = site_in(Language::En);
    let out = site.dispatch(Event::FilterTag(Choice::only("Frontend")));
    assert_eq!(out.dirty, dirty(&[MountPoint::TagChips, MountPoint::ProjectGrid]));
    let grid = site.renderer().html(MountPoint::ProjectGrid);
    assert!(grid.contains("仪表盘"));
    assert!(!grid.contains("Recommender"));

    // same value again: nothing to do
    assert!(site.dispatch(Event::FilterTag(Choice::only("Frontend"))).dirty.is_empty());
}

#[test]
fn project_grid_cards_in_authored_order() {
    let site = site_in(Language::En);
    let mut cards = Vec::new();
    for node in site.renderer().mounted(MountPoint::ProjectGrid) {
        find_by_class(node, "card-title", &mut cards);
    }
    let titles: Vec<String> = cards
        .iter()
        .map(|e| text_content(&Node::Element((*e).clone())))
        .collect();
    assert_eq!(titles, vec!["Recommender", "仪表盘", "All hands"]);
}

#[test]
fn document_filters_dirty_document_regions() {
    let mut site = site_in(Language::En);
    let out = site.dispatch(Event::SelectYear(Choice::only("2023")));
    assert_eq!(out.dirty, dirty(&[MountPoint::DocFilters, MountPoint::DocGroups]));
    let groups = site.renderer().html(MountPoint::DocGroups);
    assert!(groups.contains("data-key=\"2023-11\""));
    assert!(!groups.contains("data-key=\"2024-05\""));

    let out = site.dispatch(Event::Search("ml".to_string()));
    assert_eq!(out.dirty, dirty(&[MountPoint::DocGroups]));
    assert!(site
        .renderer()
        .html(MountPoint::DocGroups)
        .contains("No matching documents"));
}

#[test]
fn theme_toggle_dirties_only_root() {
    let mut site = site_in(Language::En);
    let out = site.dispatch(Event::ToggleTheme);
    assert_eq!(out.dirty, dirty(&[MountPoint::Root]));
    assert_eq!(site.session().theme, Theme::Dark);
    assert!(site
        .renderer()
        .root_attrs()
        .contains(&("data-theme".to_string(), "dark".to_string())));
}

#[test]
fn language_toggle_rerenders_everything_but_the_modal() {
    let mut site = site_in(Language::En);
    site.dispatch(Event::OpenProject(0));
    let modal_before = site.renderer().html(MountPoint::Modal);
    assert!(modal_before.contains("Recommender"));

    let out = site.dispatch(Event::ToggleLang);
    assert!(!out.dirty.contains(&MountPoint::Modal));
    assert_eq!(out.dirty.len(), MountPoint::ALL.len() - 1);
    assert_eq!(site.session().lang, Language::Zh);
    assert!(site.renderer().html(MountPoint::Hero).contains("李雷"));
    assert_eq!(site.renderer().html(MountPoint::Modal), modal_before);
}

#[test]
fn cards_open_on_enter_and_space_only() {
    let mut site = site_in(Language::En);
    let out = site.dispatch(Event::CardKey { card: Card::Project(0), key: Key::Other("a".into()) });
    assert!(out.dirty.is_empty());
    assert!(!site.renderer().modal.is_open());

    let out = site.dispatch(Event::CardKey { card: Card::Project(0), key: Key::Space });
    assert_eq!(out.dirty, dirty(&[MountPoint::Modal]));
    assert!(site.renderer().modal.is_open());

    site.dispatch(Event::CardKey { card: Card::Document(2), key: Key::Enter });
    let modal = site.renderer().html(MountPoint::Modal);
    assert!(modal.contains("<iframe class=\"doc-preview\" src=\"./docs/c.pdf\""));
    assert!(!modal.contains("Recommender"));
}

#[test]
fn escape_and_outside_click_close_the_modal() {
    let mut site = site_in(Language::En);
    let inner = Rect { left: 100.0, top: 100.0, right: 500.0, bottom: 400.0 };

    site.dispatch(Event::OpenProject(0));
    let inside = site.dispatch(Event::ModalClick { x: 300.0, y: 200.0, inner });
    assert!(inside.dirty.is_empty());
    assert!(site.renderer().modal.is_open());

    let outside = site.dispatch(Event::ModalClick { x: 20.0, y: 200.0, inner });
    assert_eq!(outside.dirty, dirty(&[MountPoint::Modal]));
    assert!(!site.renderer().modal.is_open());

    site.dispatch(Event::OpenDocument(3));
    assert!(!site.renderer().html(MountPoint::Modal).contains("<iframe"));
    site.dispatch(Event::KeyDown(Key::Escape));
    assert!(!site.renderer().modal.is_open());

    // closing a closed modal changes nothing
    assert!(site.dispatch(Event::CloseModal).dirty.is_empty());
}

#[test]
fn out_of_range_open_is_ignored() {
    let mut site = site_in(Language::En);
    assert!(site.dispatch(Event::OpenProject(99)).dirty.is_empty());
    assert!(site.dispatch(Event::OpenDocument(99)).dirty.is_empty());
    assert!(!site.renderer().modal.is_open());
}

#[test]
fn project_detail_modal_markup() {
    let mut site = site_in(Language::En);
    site.dispatch(Event::OpenProject(0));
    let html = site.renderer().html(MountPoint::Modal);
    assert!(html.contains("<dialog class=\"modal\" id=\"projectModal\" open=\"\">"));
    assert!(html.contains("Impact / Metrics"));
    assert!(html.contains("Key Moves"));
    assert!(html.contains("href=\"https://repo.example\""));
    assert!(!html.contains(">Demo<"));

    // a project without metrics, bullets or links omits those sections
    site.dispatch(Event::OpenProject(1));
    let bare = site.renderer().html(MountPoint::Modal);
    assert!(!bare.contains("Impact / Metrics"));
    assert!(!bare.contains("card-actions"));
}

// ═══════════════════════════════════════════════════════════
// Copy email
// ═══════════════════════════════════════════════════════════

#[test]
fn copy_email_outcomes() {
    let mut ok = MemoryClipboard::default();
    assert_eq!(copy_email(&mut ok, "a@b.c"), CopyOutcome::Copied);
    assert_eq!(ok.contents.as_deref(), Some("a@b.c"));

    let mut denied = MemoryClipboard { fail: true, ..MemoryClipboard::default() };
    assert_eq!(copy_email(&mut denied, "a@b.c"), CopyOutcome::Alert("a@b.c".to_string()));
}

#[test]
fn system_clipboard_never_panics_without_a_display() {
    // headless runs have no clipboard; the failure must surface as an alert
    let mut system = SystemClipboard::default();
    match copy_email(&mut system, "a@b.c") {
        CopyOutcome::Copied => {}
        CopyOutcome::Alert(email) => assert_eq!(email, "a@b.c"),
    }
}

#[test]
fn copy_email_flips_the_button_label() {
    let mut site = site_in(Language::En);
    assert!(site.renderer().html(MountPoint::Contact).contains("<span>Copy</span>"));

    let out = site.dispatch(Event::CopyEmail);
    assert_eq!(out.dirty, dirty(&[MountPoint::Contact]));
    assert!(out.alert.is_none());
    let contact = site.renderer().html(MountPoint::Contact);
    assert!(contact.contains(">Copied</button>"));
    assert!(!contact.contains("btn-icon"));

    site.dispatch(Event::CopyFeedbackElapsed);
    assert!(site.renderer().html(MountPoint::Contact).contains("<span>Copy</span>"));
}

#[test]
fn copy_email_failure_alerts_with_address() {
    let mut site = Site::boot(
        fixture(),
        Box::new(MemoryPrefStore::default()),
        Box::new(MemoryClipboard { fail: true, ..MemoryClipboard::default() }),
        &startup(Some(Language::Zh)),
    );
    let out = site.dispatch(Event::CopyEmail);
    assert_eq!(out.alert.as_deref(), Some("li@example.com"));
    assert!(out.dirty.is_empty());
    assert!(!site.session().email_copied);
}

// ═══════════════════════════════════════════════════════════
// Session and preferences
// ═══════════════════════════════════════════════════════════

#[test]
fn initial_language_precedence() {
    assert_eq!(initial_language(Some(Language::En), Some("zh_CN.UTF-8")), Language::En);
    assert_eq!(initial_language(None, Some("zh_CN.UTF-8")), Language::Zh);
    assert_eq!(initial_language(None, Some("fr_FR")), Language::En);
    assert_eq!(initial_language(None, None), Language::En);
}

#[test]
fn session_from_preferences_uses_default_theme() {
    let s = Session::from_preferences(&Preferences::default(), None, Theme::Dark);
    assert_eq!(s.theme, Theme::Dark);
    let stored = Preferences { lang: Some(Language::Zh), theme: Some(Theme::Light) };
    let s = Session::from_preferences(&stored, Some("en_US"), Theme::Dark);
    assert_eq!((s.lang, s.theme), (Language::Zh, Theme::Light));
}

#[test]
fn session_setters_report_unchanged_as_clean() {
    let mut s = Session::new(Language::En, Theme::Light);
    assert!(s.set_lang(Language::En).is_empty());
    assert!(s.set_theme(Theme::Light).is_empty());
    assert!(s.set_query("").is_empty());
    assert_eq!(s.select_category(Choice::only("Note")), dirty(&[MountPoint::DocFilters, MountPoint::DocGroups]));
}

#[test]
fn boot_prefers_stored_preferences() {
    let prefs = MemoryPrefStore::default();
    prefs.save(&Preferences { lang: Some(Language::Zh), theme: Some(Theme::Dark) }).unwrap();
    let site = Site::boot(
        fixture(),
        Box::new(prefs),
        Box::new(MemoryClipboard::default()),
        &Startup { locale: Some("en_US.UTF-8".into()), ..startup(None) },
    );
    assert_eq!(site.session().lang, Language::Zh);
    assert_eq!(site.session().theme, Theme::Dark);
}

#[test]
fn file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("preferences.json");
    let store = FilePrefStore::new(&path);
    assert_eq!(store.load(), Preferences::default());

    store.save_lang(Language::En).unwrap();
    store.save_theme(Theme::Dark).unwrap();
    let reread = FilePrefStore::new(&path).load();
    assert_eq!(reread, Preferences { lang: Some(Language::En), theme: Some(Theme::Dark) });
}

#[test]
fn corrupt_preferences_read_as_unset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert_eq!(FilePrefStore::new(&path).load(), Preferences::default());

    std::fs::write(&path, r#"{"lang":"klingon","theme":"dark"}"#).unwrap();
    assert_eq!(
        FilePrefStore::new(&path).load(),
        Preferences { lang: None, theme: Some(Theme::Dark) }
    );
}

#[test]
fn toggles_persist_through_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    let mut site = Site::boot(
        fixture(),
        Box::new(FilePrefStore::new(&path)),
        Box::new(MemoryClipboard::default()),
        &startup(Some(Language::Zh)),
    );
    site.dispatch(Event::ToggleTheme);
    site.dispatch(Event::ToggleLang);
    // filters are session-only
    site.dispatch(Event::FilterTag(Choice::only("ML")));

    let stored = FilePrefStore::new(&path).load();
    assert_eq!(stored, Preferences { lang: Some(Language::En), theme: Some(Theme::Dark) });
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("ML"));
}

// ═══════════════════════════════════════════════════════════
// Event parsing
// ═══════════════════════════════════════════════════════════

#[test]
fn parse_session_events() {
    assert_eq!(Event::parse("toggle-lang"), Ok(Event::ToggleLang));
    assert_eq!(Event::parse("filter-tag"), Ok(Event::FilterTag(Choice::All)));
    assert_eq!(Event::parse("filter-tag all"), Ok(Event::FilterTag(Choice::only("all"))));
    assert_eq!(Event::parse("select-year 2024"), Ok(Event::SelectYear(Choice::only("2024"))));
    assert_eq!(Event::parse("search  ml pipeline "), Ok(Event::Search("ml pipeline".into())));
    assert_eq!(Event::parse("open-document 2"), Ok(Event::OpenDocument(2)));
    assert_eq!(
        Event::parse("key Enter project 1"),
        Ok(Event::CardKey { card: Card::Project(1), key: Key::Enter })
    );
    assert_eq!(Event::parse("key Escape"), Ok(Event::KeyDown(Key::Escape)));
    assert_eq!(
        Event::parse("click 1 2 0 0 10 10"),
        Ok(Event::ModalClick {
            x: 1.0,
            y: 2.0,
            inner: Rect { left: 0.0, top: 0.0, right: 10.0, bottom: 10.0 }
        })
    );
    assert!(Event::parse("open-project x").is_err());
    assert!(Event::parse("set-lang fr").is_err());
    assert!(Event::parse("dance").is_err());
}

// ═══════════════════════════════════════════════════════════
// Content sources
// ═══════════════════════════════════════════════════════════

#[test]
fn locate_relative_sources() {
    let local = ContentSource::new("/srv/site", None, Duration::from_secs(5));
    assert_eq!(
        local.locate("content.json").unwrap(),
        Location::File("/srv/site/content.json".into())
    );
    assert_eq!(
        local.locate("https://cdn.example/c.json").unwrap(),
        Location::Remote(Url::parse("https://cdn.example/c.json").unwrap())
    );
    assert!(local.locate("  ").is_err());
    assert!(local.locate("ftp://x/c.json").is_err());

    let remote = ContentSource::new(
        "/srv/site",
        Some(Url::parse("https://example.com/cv/").unwrap()),
        Duration::from_secs(5),
    );
    assert_eq!(
        remote.locate("content.json").unwrap(),
        Location::Remote(Url::parse("https://example.com/cv/content.json").unwrap())
    );
}

#[test]
fn secondary_documents_must_be_a_non_empty_array() {
    assert!(source::parse_documents(r#"{"documents": []}"#).is_err());
    assert!(source::parse_documents("[]").is_err());
    assert!(source::parse_documents("[1, \"x\", null]").is_err());
    assert!(source::parse_documents("nope").is_err());

    let docs = source::parse_documents(r#"[{"title":{"zh":"新"},"date":"2022-01-01"}, 5, "x"]"#).unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].date_str(), "2022-01-01");
}

#[test]
fn apply_secondary_replaces_only_with_documents() {
    let mut content = fixture();
    assert!(!source::apply_secondary(&mut content, None));
    assert!(!source::apply_secondary(&mut content, Some(Vec::new())));
    assert_eq!(content.documents.len(), 5);
    assert!(source::apply_secondary(&mut content, Some(vec![doc(Some("2022-01"))])));
    assert_eq!(content.documents.len(), 1);
}

fn write_site_dir(documents: Option<&str>) -> (tempfile::TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("content.json"), fixture_json().to_string()).unwrap();
    let mut config = Config::default();
    config.root = dir.path().to_path_buf();
    if let Some(raw) = documents {
        std::fs::write(dir.path().join("docs.json"), raw).unwrap();
        config.content.documents = Some("docs.json".to_string());
    }
    (dir, config)
}

fn boot_from(config: &Config) -> Result<Site, boot::BootError> {
    boot::run(
        config,
        &startup(Some(Language::En)),
        Box::new(MemoryPrefStore::default()),
        Box::new(MemoryClipboard::default()),
    )
}

#[test]
fn boot_loads_content_from_disk() {
    let (_dir, config) = write_site_dir(None);
    let site = boot_from(&config).unwrap();
    assert_eq!(document_count(&site), 5);
    assert_eq!(site.tags().len(), 4);
}

#[test]
fn boot_uses_secondary_documents_when_usable() {
    let (_dir, config) = write_site_dir(Some(r#"[{"title":{"en":"Fresh"},"date":"2022-01-01","category":"New"}]"#));
    let site = boot_from(&config).unwrap();
    assert_eq!(document_count(&site), 1);
    assert_eq!(site.facets().years, vec!["2022"]);
    assert_eq!(site.facets().categories, vec!["New"]);
}

#[test]
fn boot_keeps_primary_documents_on_bad_secondary() {
    for raw in ["[]", "{\"a\":1}", "garbage"] {
        let (_dir, config) = write_site_dir(Some(raw));
        let site = boot_from(&config).unwrap();
        assert_eq!(document_count(&site), 5, "secondary {:?}", raw);
    }

    // missing secondary file also degrades
    let (_dir, mut config) = write_site_dir(None);
    config.content.documents = Some("absent.json".to_string());
    assert_eq!(document_count(&boot_from(&config).unwrap()), 5);
}

#[test]
fn boot_fails_without_primary_content() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.root = dir.path().to_path_buf();
    assert!(boot_from(&config).is_err());

    std::fs::write(dir.path().join("content.json"), "{ broken").unwrap();
    assert!(boot_from(&config).is_err());
}

#[test]
fn fallback_page_carries_the_message() {
    let html = page::fallback_page();
    assert!(html.contains(page::FALLBACK_MESSAGE));
    assert!(!html.contains("<header"));
}

// ═══════════════════════════════════════════════════════════
// Config
// ═══════════════════════════════════════════════════════════

#[test]
fn config_partial_toml() {
    let config = Config::from_toml("[content]\nsource = \"x.json\"\n\n[defaults]\ntheme = \"dark\"\n").unwrap();
    assert_eq!(config.content.source, "x.json");
    assert_eq!(config.content.timeout_secs, 20);
    assert!(config.content.documents.is_none());
    assert_eq!(config.default_theme(), Theme::Dark);
}

#[test]
fn config_bad_values_fall_back() {
    let config = Config::from_toml("[defaults]\ntheme = \"neon\"\n").unwrap();
    assert_eq!(config.default_theme(), Theme::Light);
    assert!(Config::from_toml("[content\n").is_err());
}

#[test]
fn config_load_missing_or_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = Config::load(&dir.path().join("folio.toml"));
    assert_eq!(missing.content.source, "content.json");
    assert_eq!(missing.root, dir.path());

    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "content = 5").unwrap();
    let invalid = Config::load(&path);
    assert_eq!(invalid.content.source, "content.json");
    assert_eq!(invalid.resolve_path("out.html"), dir.path().join("out.html"));
}
