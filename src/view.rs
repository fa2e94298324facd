//! View-model builders.
//!
//! Each builder maps one content entity plus the active language to a flat
//! record of already-resolved strings. Nothing downstream of this module
//! performs a language lookup.

use serde::Serialize;

use crate::i18n::Localizer;
use crate::models::content::{
    About, Document, ExperienceItem, LabeledLink, Profile, Project, SkillGroup,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkView {
    pub label: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricView {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub name: String,
    pub headline: String,
    pub lead: String,
    pub one_liner: String,
    pub metrics: Vec<MetricView>,
    pub highlights: Vec<String>,
    pub social: Vec<LinkView>,
    pub resume_href: String,
    pub resume_label: String,
    pub email: String,
    pub contact_title: String,
    pub contact_text: String,
    pub contact_meta: String,
    pub contact_links: Vec<LinkView>,
}

fn link_views(links: &[LabeledLink], lx: &Localizer) -> Vec<LinkView> {
    links
        .iter()
        .filter_map(|l| {
            let href = l.url.clone()?;
            Some(LinkView {
                label: lx.text(&l.label),
                href,
            })
        })
        .collect()
}

pub fn profile_view(profile: &Profile, lx: &Localizer) -> ProfileView {
    ProfileView {
        name: lx.text(&profile.name),
        headline: lx.text(&profile.headline),
        lead: lx.text(&profile.lead),
        one_liner: lx.text(&profile.one_liner),
        metrics: profile
            .metrics
            .iter()
            .map(|m| MetricView {
                value: lx.text(&m.value),
                label: lx.text(&m.label),
            })
            .collect(),
        highlights: lx.list(&profile.highlights),
        social: link_views(&profile.social, lx),
        resume_href: profile.resume_href().to_string(),
        resume_label: lx.label("resume", |l| l.resume),
        email: profile.email_address().to_string(),
        contact_title: lx.text(&profile.contact_title),
        contact_text: lx.text(&profile.contact_text),
        contact_meta: lx.text(&profile.contact_meta),
        contact_links: link_views(&profile.contact_links, lx),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactView {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AboutView {
    pub subtitle: String,
    pub paragraphs: Vec<String>,
    pub bullets: Vec<String>,
    pub quick_facts: Vec<FactView>,
}

pub fn about_view(about: &About, lx: &Localizer) -> AboutView {
    AboutView {
        subtitle: lx.text(&about.subtitle),
        paragraphs: lx.list(&about.paragraphs),
        bullets: lx.list(&about.bullets),
        quick_facts: about
            .quick_facts
            .iter()
            .map(|f| FactView {
                key: lx.text(&f.k),
                value: lx.text(&f.v),
            })
            .collect(),
    }
}

// ── Projects ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectCard {
    /// Position in the content's project list; the modal opens by index.
    pub index: usize,
    pub title: String,
    pub summary: String,
    /// Tags in authored order, then the role if there is one.
    pub badges: Vec<String>,
    pub case_link: Option<LinkView>,
    pub demo_link: Option<LinkView>,
    pub details_label: String,
}

pub fn project_card(index: usize, project: &Project, lx: &Localizer) -> ProjectCard {
    let role = lx.text(&project.role);
    let mut badges = project.tags.clone();
    if !role.is_empty() {
        badges.push(role);
    }
    ProjectCard {
        index,
        title: lx.text(&project.title),
        summary: lx.text(&project.summary),
        badges,
        case_link: project.links.case.as_ref().map(|href| LinkView {
            label: lx.label("caseStudy", |l| l.case_study),
            href: href.clone(),
        }),
        demo_link: project.links.demo.as_ref().map(|href| LinkView {
            label: lx.label("demo", |l| l.demo),
            href: href.clone(),
        }),
        details_label: lx.label("details", |l| l.details),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDetail {
    pub title: String,
    pub description: String,
    /// Tags followed by stack entries.
    pub badges: Vec<String>,
    pub metrics_heading: String,
    pub metrics: Vec<String>,
    pub key_moves_heading: String,
    pub bullets: Vec<String>,
    /// Case study first, then repo, then demo.
    pub links: Vec<LinkView>,
    pub has_case: bool,
}

pub fn project_detail(project: &Project, lx: &Localizer) -> ProjectDetail {
    let mut links = Vec::new();
    if let Some(href) = &project.links.case {
        links.push(LinkView {
            label: lx.label("caseStudy", |l| l.case_study),
            href: href.clone(),
        });
    }
    if let Some(href) = &project.links.repo {
        links.push(LinkView {
            label: lx.label("repo", |l| l.repo),
            href: href.clone(),
        });
    }
    if let Some(href) = &project.links.demo {
        links.push(LinkView {
            label: lx.label("demo", |l| l.demo),
            href: href.clone(),
        });
    }

    let mut badges = project.tags.clone();
    badges.extend(project.stack.iter().cloned());

    ProjectDetail {
        title: lx.text(&project.title),
        description: lx.text(&project.description),
        badges,
        metrics_heading: lx.label("metrics", |l| l.metrics),
        metrics: lx.list(&project.metrics),
        key_moves_heading: lx.label("keyMoves", |l| l.key_moves),
        bullets: lx.list(&project.bullets),
        links,
        has_case: project.links.case.is_some(),
    }
}

// ── Timeline / skills ─────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceView {
    /// `title · org`
    pub heading: String,
    pub time: String,
    pub bullets: Vec<String>,
}

pub fn experience_view(item: &ExperienceItem, lx: &Localizer) -> ExperienceView {
    ExperienceView {
        heading: format!("{} · {}", lx.text(&item.title), lx.text(&item.org)),
        time: lx.text(&item.time),
        bullets: lx.list(&item.bullets),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGroupView {
    pub title: String,
    pub items: Vec<String>,
}

pub fn skill_group_view(group: &SkillGroup, lx: &Localizer) -> SkillGroupView {
    SkillGroupView {
        title: lx.text(&group.group),
        items: lx.list(&group.items),
    }
}

// ── Documents ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentCard {
    pub index: usize,
    pub title: String,
    pub summary: String,
    /// Raw date, or the "undated" label.
    pub date: String,
    pub category: String,
    pub tags: Vec<String>,
    pub link: Option<LinkView>,
}

pub fn document_card(index: usize, doc: &Document, lx: &Localizer) -> DocumentCard {
    DocumentCard {
        index,
        title: lx.text(&doc.title),
        summary: lx.text(&doc.summary),
        date: document_date(doc, lx),
        category: doc.category.clone().unwrap_or_default(),
        tags: doc.tags.clone(),
        link: doc.href().map(|href| LinkView {
            label: lx.label("open", |l| l.open),
            href: href.to_string(),
        }),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentDetail {
    pub title: String,
    pub summary: String,
    pub date: String,
    pub category: String,
    pub tags: Vec<String>,
    pub link: Option<LinkView>,
    /// Source for the inline preview frame; `None` when the document opts
    /// out of previews or has nothing to show.
    pub preview_src: Option<String>,
}

pub fn document_detail(doc: &Document, lx: &Localizer) -> DocumentDetail {
    let href = doc.href().map(|s| s.to_string());
    DocumentDetail {
        title: lx.text(&doc.title),
        summary: lx.text(&doc.summary),
        date: document_date(doc, lx),
        category: doc.category.clone().unwrap_or_default(),
        tags: doc.tags.clone(),
        link: href.clone().map(|href| LinkView {
            label: lx.label("open", |l| l.open),
            href,
        }),
        preview_src: if doc.preview { href } else { None },
    }
}

fn document_date(doc: &Document, lx: &Localizer) -> String {
    let raw = doc.date_str();
    if raw.is_empty() {
        lx.label("noDate", |l| l.no_date)
    } else {
        raw.to_string()
    }
}
