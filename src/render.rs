use std::collections::BTreeMap;

use crate::dom::{el, text, Action, Element, Node};
use crate::filter::{Choice, DocFacets, DocFilter};
use crate::group::Bucket;
use crate::i18n::{Language, Localizer};
use crate::models::content::Document;
use crate::prefs::Theme;
use crate::view::{
    AboutView, DocumentCard, DocumentDetail, ExperienceView, LinkView, ProfileView, ProjectCard,
    ProjectDetail, SkillGroupView,
};

// ── Mount points ──────────────────────────────────────────

/// Named page regions. Each is owned by the renderer and rebuilt wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MountPoint {
    /// `<html>` attributes (`lang`, `data-theme`)
    Root,
    Meta,
    Header,
    Hero,
    About,
    TagChips,
    ProjectGrid,
    Timeline,
    Skills,
    DocFilters,
    DocGroups,
    Contact,
    Footer,
    Modal,
}

impl MountPoint {
    pub const ALL: [MountPoint; 14] = [
        MountPoint::Root,
        MountPoint::Meta,
        MountPoint::Header,
        MountPoint::Hero,
        MountPoint::About,
        MountPoint::TagChips,
        MountPoint::ProjectGrid,
        MountPoint::Timeline,
        MountPoint::Skills,
        MountPoint::DocFilters,
        MountPoint::DocGroups,
        MountPoint::Contact,
        MountPoint::Footer,
        MountPoint::Modal,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            MountPoint::Root => "root",
            MountPoint::Meta => "meta",
            MountPoint::Header => "header",
            MountPoint::Hero => "hero",
            MountPoint::About => "about",
            MountPoint::TagChips => "tag-chips",
            MountPoint::ProjectGrid => "project-grid",
            MountPoint::Timeline => "timeline",
            MountPoint::Skills => "skills",
            MountPoint::DocFilters => "doc-filters",
            MountPoint::DocGroups => "doc-groups",
            MountPoint::Contact => "contact",
            MountPoint::Footer => "footer",
            MountPoint::Modal => "modal",
        }
    }
}

// ── Modal ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open(Vec<Node>),
}

/// Single modal dialog. Opening always replaces whatever was shown; closing
/// drops the fragment.
#[derive(Debug, Clone, Default)]
pub struct Modal {
    state: ModalState,
}

impl Modal {
    pub fn open(&mut self, content: Vec<Node>) {
        self.state = ModalState::Open(content);
    }

    /// Returns false when the modal was already closed (nothing changed).
    pub fn close(&mut self) -> bool {
        match self.state {
            ModalState::Open(_) => {
                self.state = ModalState::Closed;
                true
            }
            ModalState::Closed => false,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open(_))
    }

    pub fn nodes(&self, close_label: &str) -> Vec<Node> {
        let (open, content) = match &self.state {
            ModalState::Open(c) => (true, c.clone()),
            ModalState::Closed => (false, Vec::new()),
        };
        vec![el("dialog")
            .class("modal")
            .id("projectModal")
            .attr_if(open, "open", "")
            .child(
                el("div")
                    .class("modal-inner")
                    .child(
                        el("button")
                            .class("modal-close")
                            .id("modalClose")
                            .attr("type", "button")
                            .attr("aria-label", close_label)
                            .on(Action::CloseModal)
                            .text("×"),
                    )
                    .child(el("div").id("modalContent").children(content)),
            )
            .into()]
    }
}

/// Axis-aligned box in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

// ── Renderer ──────────────────────────────────────────────

/// Owns the current contents of every mount point.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    mounts: BTreeMap<MountPoint, Vec<Node>>,
    pub modal: Modal,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer::default()
    }

    /// Replace the contents of `point`.
    pub fn mount(&mut self, point: MountPoint, nodes: Vec<Node>) {
        self.mounts.insert(point, nodes);
    }

    pub fn mounted(&self, point: MountPoint) -> &[Node] {
        self.mounts.get(&point).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn html(&self, point: MountPoint) -> String {
        crate::dom::nodes_to_html(self.mounted(point))
    }

    /// Attributes of the root element, if rendered.
    pub fn root_attrs(&self) -> Vec<(String, String)> {
        self.mounted(MountPoint::Root)
            .first()
            .and_then(|n| n.as_element())
            .map(|e| e.attrs.clone())
            .unwrap_or_default()
    }
}

// ── Section builders ──────────────────────────────────────

fn badge(s: &str) -> Node {
    el("span").class("badge").text(s).into()
}

fn list_items(items: &[String]) -> Element {
    el("ul").children(items.iter().map(|x| el("li").text(x.as_str())))
}

fn link_button(link: &LinkView, class: &str) -> Node {
    el("a").class(class).external(&link.href).text(link.label.as_str()).into()
}

pub fn root_nodes(lang: Language, theme: Theme) -> Vec<Node> {
    vec![el("html")
        .attr("lang", lang.html_lang())
        .attr("data-theme", theme.as_str())
        .into()]
}

pub fn meta_nodes(lx: &Localizer, fallback_title: &str) -> Vec<Node> {
    let title = lx.t("meta.title");
    let description = lx.t("meta.description");
    let mut nodes: Vec<Node> = vec![el("title")
        .text(if title.is_empty() { fallback_title } else { title.as_str() })
        .into()];
    if !description.is_empty() {
        nodes.push(
            el("meta")
                .attr("name", "description")
                .attr("content", description)
                .into(),
        );
    }
    nodes
}

pub fn header_nodes(profile: &ProfileView, lang: Language, lx: &Localizer) -> Vec<Node> {
    let nav = [
        ("about", "nav.about"),
        ("projects", "nav.projects"),
        ("experience", "nav.experience"),
        ("skills", "nav.skills"),
        ("documents", "nav.documents"),
        ("contact", "nav.contact"),
    ];
    vec![
        el("a").class("brand").id("brandName").attr("href", "#top").text(profile.name.as_str()).into(),
        el("nav")
            .class("nav")
            .children(nav.iter().filter_map(|(anchor, key)| {
                let label = lx.t(key);
                if label.is_empty() {
                    None
                } else {
                    Some(el("a").attr("href", format!("#{}", anchor)).text(label))
                }
            }))
            .into(),
        el("button")
            .class("btn btn-ghost")
            .id("langToggle")
            .attr("type", "button")
            .on(Action::ToggleLang)
            .child(el("span").id("langToggleText").text(lang.toggle_text()))
            .into(),
        el("button")
            .class("btn btn-ghost")
            .id("themeToggle")
            .attr("type", "button")
            .on(Action::ToggleTheme)
            .text("◐")
            .into(),
    ]
}

pub fn hero_nodes(profile: &ProfileView) -> Vec<Node> {
    vec![
        el("h1").id("heroName").text(profile.name.as_str()).into(),
        el("p").id("heroTitle").text(profile.headline.as_str()).into(),
        el("p").id("heroLead").text(profile.lead.as_str()).into(),
        el("p").id("oneLiner").text(profile.one_liner.as_str()).into(),
        el("div")
            .id("heroMetrics")
            .children(profile.metrics.iter().map(|m| {
                el("div")
                    .class("metric")
                    .child(el("strong").text(m.value.as_str()))
                    .child(el("span").text(m.label.as_str()))
            }))
            .into(),
        list_items(&profile.highlights).id("highlights").into(),
        el("div")
            .id("socialLinks")
            .children(
                profile
                    .social
                    .iter()
                    .map(|l| el("a").external(&l.href).text(l.label.as_str())),
            )
            .into(),
        el("a")
            .class("btn btn-primary")
            .id("resumeCta")
            .attr("href", profile.resume_href.as_str())
            .text(profile.resume_label.as_str())
            .into(),
    ]
}

pub fn about_nodes(about: &AboutView) -> Vec<Node> {
    let mut body = el("div")
        .id("aboutBody")
        .children(about.paragraphs.iter().map(|p| el("p").text(p.as_str())));
    if !about.bullets.is_empty() {
        body = body.child(list_items(&about.bullets));
    }
    vec![
        el("p").id("aboutSubtitle").text(about.subtitle.as_str()).into(),
        body.into(),
        el("dl")
            .id("quickFacts")
            .children(about.quick_facts.iter().map(|f| {
                el("div")
                    .child(el("dt").text(f.key.as_str()))
                    .child(el("dd").text(f.value.as_str()))
            }))
            .into(),
    ]
}

/// Tag chips: `all` first, then every tag; the active one is marked.
pub fn tag_chip_nodes(tags: &[String], active: &Choice, all_label: &str) -> Vec<Node> {
    let chip = |label: &str, choice: Choice| -> Node {
        let is_active = &choice == active;
        el("button")
            .class(if is_active { "chip is-active" } else { "chip" })
            .attr("type", "button")
            .attr("data-filter", choice.as_attr())
            .on(Action::FilterTag(choice.as_attr().to_string()))
            .text(label)
            .into()
    };
    let mut nodes = vec![chip(all_label, Choice::All)];
    nodes.extend(tags.iter().map(|t| chip(t, Choice::only(t))));
    nodes
}

pub fn project_card_node(card: &ProjectCard) -> Node {
    let mut actions: Vec<Node> = Vec::new();
    if let Some(link) = &card.case_link {
        actions.push(link_button(link, "btn btn-primary"));
    }
    if let Some(link) = &card.demo_link {
        actions.push(link_button(link, "btn btn-ghost"));
    }
    actions.push(
        el("button")
            .class("btn btn-ghost")
            .attr("type", "button")
            .on(Action::OpenProject(card.index))
            .text(card.details_label.as_str())
            .into(),
    );

    el("article")
        .class("card")
        .attr("role", "button")
        .attr("tabindex", "0")
        .on(Action::OpenProject(card.index))
        .child(el("h3").class("card-title").text(card.title.as_str()))
        .child(el("p").class("card-desc").text(card.summary.as_str()))
        .child(el("div").class("card-meta").children(card.badges.iter().map(|b| badge(b))))
        .child(el("div").class("card-actions").children(actions))
        .into()
}

pub fn project_detail_nodes(detail: &ProjectDetail) -> Vec<Node> {
    let mut nodes: Vec<Node> = vec![
        el("h3").text(detail.title.as_str()).into(),
        el("p").text(detail.description.as_str()).into(),
        el("div")
            .class("meta-row")
            .children(detail.badges.iter().map(|b| badge(b)))
            .into(),
    ];
    if !detail.metrics.is_empty() {
        nodes.push(el("h4").text(detail.metrics_heading.as_str()).into());
        nodes.push(list_items(&detail.metrics).into());
    }
    if !detail.bullets.is_empty() {
        nodes.push(el("h4").text(detail.key_moves_heading.as_str()).into());
        nodes.push(list_items(&detail.bullets).into());
    }
    if !detail.links.is_empty() {
        nodes.push(
            el("div")
                .class("card-actions")
                .children(detail.links.iter().enumerate().map(|(i, l)| {
                    let class = if i == 0 && detail.has_case { "btn btn-primary" } else { "btn btn-ghost" };
                    link_button(l, class)
                }))
                .into(),
        );
    }
    nodes
}

pub fn timeline_nodes(items: &[ExperienceView]) -> Vec<Node> {
    items
        .iter()
        .map(|item| {
            el("li")
                .class("t-item")
                .child(
                    el("div")
                        .class("t-head")
                        .child(el("h3").class("t-title").text(item.heading.as_str()))
                        .child(el("div").class("t-time").text(item.time.as_str())),
                )
                .child(el("div").class("t-body").child(list_items(&item.bullets)))
                .into()
        })
        .collect()
}

pub fn skill_nodes(groups: &[SkillGroupView]) -> Vec<Node> {
    groups
        .iter()
        .map(|g| {
            el("div")
                .class("skill-group")
                .child(el("h3").text(g.title.as_str()))
                .child(
                    el("div")
                        .class("skill-list")
                        .children(g.items.iter().map(|x| el("span").class("skill").text(x.as_str()))),
                )
                .into()
        })
        .collect()
}

/// `copied` swaps the copy button's icon and label for the confirmation.
pub fn contact_nodes(profile: &ProfileView, copy_label: &str, copied: bool) -> Vec<Node> {
    let copy_button = el("button")
        .class("btn btn-ghost")
        .id("copyEmailBtn")
        .attr("type", "button")
        .attr("data-email", profile.email.as_str())
        .on(Action::CopyEmail);
    let copy_button = if copied {
        copy_button.text(copy_label)
    } else {
        copy_button
            .child(el("span").class("btn-icon").attr("aria-hidden", "true").text("⧉"))
            .child(el("span").text(copy_label))
    };
    vec![
        el("h2").id("contactTitle").text(profile.contact_title.as_str()).into(),
        el("p").id("contactText").text(profile.contact_text.as_str()).into(),
        el("p").id("contactMeta").text(profile.contact_meta.as_str()).into(),
        el("div")
            .class("card-actions")
            .child(
                el("a")
                    .class("btn btn-primary")
                    .id("emailBtn")
                    .attr("href", format!("mailto:{}", profile.email))
                    .text(profile.email.as_str()),
            )
            .child(copy_button)
            .child(
                el("a")
                    .class("btn btn-ghost")
                    .id("resumeSecondary")
                    .attr("href", profile.resume_href.as_str())
                    .text(profile.resume_label.as_str()),
            )
            .into(),
        el("div")
            .id("contactLinks")
            .children(
                profile
                    .contact_links
                    .iter()
                    .map(|l| el("a").external(&l.href).text(l.label.as_str())),
            )
            .into(),
    ]
}

pub fn footer_nodes(name: &str, year: i32) -> Vec<Node> {
    vec![el("p")
        .child(text("© "))
        .child(el("span").id("year").text(year.to_string()))
        .child(text(" "))
        .child(el("span").id("footerName").text(name))
        .into()]
}

// ── Document library ──────────────────────────────────────

fn select(
    id: &str,
    label: &str,
    action: Action,
    all_label: &str,
    options: &[&str],
    selected: &Choice,
) -> Node {
    let option = |value: &str, text_: &str, is_selected: bool| {
        el("option")
            .attr("value", value)
            .attr_if(is_selected, "selected", "")
            .text(text_)
    };
    el("label")
        .class("doc-filter")
        .child(el("span").text(label))
        .child(
            el("select")
                .id(id)
                .on(action)
                .child(option(Choice::All.as_attr(), all_label, selected.is_all()))
                .children(
                    options
                        .iter()
                        .map(|o| option(*o, *o, selected.value() == Some(*o))),
                ),
        )
        .into()
}

pub fn doc_filter_nodes(facets: &DocFacets, filter: &DocFilter, lx: &Localizer) -> Vec<Node> {
    let all = lx.label("all", |l| l.all);
    let years: Vec<&str> = facets.years.iter().map(|s| s.as_str()).collect();
    let months = facets.months_for(&filter.year);
    let categories: Vec<&str> = facets.categories.iter().map(|s| s.as_str()).collect();
    vec![
        select("docYear", &lx.label("year", |l| l.year), Action::SelectYear, &all, &years, &filter.year),
        select("docMonth", &lx.label("month", |l| l.month), Action::SelectMonth, &all, &months, &filter.month),
        select(
            "docCategory",
            &lx.label("category", |l| l.category),
            Action::SelectCategory,
            &all,
            &categories,
            &filter.category,
        ),
        el("input")
            .id("docSearch")
            .attr("type", "search")
            .attr("placeholder", lx.label("search", |l| l.search))
            .attr("value", filter.query.as_str())
            .on(Action::Search)
            .into(),
    ]
}

pub fn document_card_node(card: &DocumentCard) -> Node {
    let mut meta: Vec<Node> = vec![el("time").text(card.date.as_str()).into()];
    if !card.category.is_empty() {
        meta.push(el("span").class("badge badge-category").text(card.category.as_str()).into());
    }
    meta.extend(card.tags.iter().map(|t| badge(t)));

    let mut node = el("article")
        .class("card doc-card")
        .attr("role", "button")
        .attr("tabindex", "0")
        .on(Action::OpenDocument(card.index))
        .child(el("h3").class("card-title").text(card.title.as_str()))
        .child(el("p").class("card-desc").text(card.summary.as_str()))
        .child(el("div").class("card-meta").children(meta));
    if let Some(link) = &card.link {
        node = node.child(el("div").class("card-actions").child(link_button(link, "btn btn-ghost")));
    }
    node.into()
}

pub fn doc_group_nodes(
    buckets: &[Bucket<(usize, &Document)>],
    lx: &Localizer,
    card: impl Fn(usize, &Document) -> DocumentCard,
) -> Vec<Node> {
    if buckets.is_empty() {
        return vec![el("p").class("empty").text(lx.label("noDocuments", |l| l.no_documents)).into()];
    }
    buckets
        .iter()
        .map(|bucket| {
            let heading = if bucket.is_unknown() {
                lx.label("noDate", |l| l.no_date)
            } else {
                bucket.key.clone()
            };
            el("section")
                .class("doc-group")
                .attr("data-key", bucket.key.as_str())
                .child(el("h3").class("doc-group-title").text(heading))
                .child(
                    el("div")
                        .class("doc-list")
                        .children(bucket.items.iter().map(|(i, d)| document_card_node(&card(*i, *d)))),
                )
                .into()
        })
        .collect()
}

pub fn document_detail_nodes(detail: &DocumentDetail) -> Vec<Node> {
    let mut meta = detail.date.clone();
    if !detail.category.is_empty() {
        meta.push_str(" · ");
        meta.push_str(&detail.category);
    }
    let mut nodes: Vec<Node> = vec![
        el("h3").text(detail.title.as_str()).into(),
        el("p").class("doc-meta").text(meta).into(),
        el("p").text(detail.summary.as_str()).into(),
        el("div")
            .class("meta-row")
            .children(detail.tags.iter().map(|t| badge(t)))
            .into(),
    ];
    if let Some(src) = &detail.preview_src {
        nodes.push(
            el("iframe")
                .class("doc-preview")
                .attr("src", src.as_str())
                .attr("title", detail.title.as_str())
                .attr("loading", "lazy")
                .into(),
        );
    }
    if let Some(link) = &detail.link {
        nodes.push(el("div").class("card-actions").child(link_button(link, "btn btn-primary")).into());
    }
    nodes
}
