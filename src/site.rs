//! The booted page: content, session state, and the rendered mount points.
//!
//! A [`Site`] only exists once [`Site::boot`] has loaded preferences, built
//! the facets and rendered every mount point, so no event can be dispatched
//! against a half-initialised page. Each [`Site::dispatch`] runs to
//! completion and re-renders exactly the mount points the change touched.

use log::{debug, warn};

use crate::clipboard::{copy_email, Clipboard, CopyOutcome};
use crate::dom::Node;
use crate::filter::{self, Choice, DocFacets};
use crate::group::{self, Bucket};
use crate::i18n::{Language, Localizer};
use crate::models::content::{ContentDocument, Document};
use crate::page;
use crate::prefs::{PrefStore, Theme};
use crate::render::{self, MountPoint, Rect, Renderer};
use crate::session::{Dirty, Session};
use crate::view;

#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Other(String),
}

impl Key {
    pub fn parse(s: &str) -> Self {
        match s {
            "Enter" | "enter" => Key::Enter,
            " " | "Space" | "space" => Key::Space,
            "Escape" | "escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }
}

/// A focusable card in one of the two grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Card {
    Project(usize),
    Document(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ToggleLang,
    SetLang(Language),
    ToggleTheme,
    FilterTag(Choice),
    SelectYear(Choice),
    SelectMonth(Choice),
    SelectCategory(Choice),
    Search(String),
    OpenProject(usize),
    OpenDocument(usize),
    /// Key pressed while a card has focus.
    CardKey { card: Card, key: Key },
    /// Key pressed anywhere else.
    KeyDown(Key),
    /// Click on the modal backdrop or its contents; `inner` is the bounding
    /// box of the dialog's inner panel.
    ModalClick { x: f64, y: f64, inner: Rect },
    CloseModal,
    CopyEmail,
    /// The "copied" confirmation timed out.
    CopyFeedbackElapsed,
}

impl Event {
    /// Parse one line of the `session` command's input. Action names match
    /// the `data-action` attributes the renderer emits.
    pub fn parse(line: &str) -> Result<Event, String> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((n, r)) => (n, r.trim()),
            None => (line, ""),
        };
        let index = |s: &str| -> Result<usize, String> {
            s.parse::<usize>().map_err(|_| format!("{}: expected an index, got {:?}", name, s))
        };

        Ok(match name {
            "toggle-lang" => Event::ToggleLang,
            "set-lang" => Event::SetLang(
                Language::from_code(rest).ok_or_else(|| format!("unknown language {:?}", rest))?,
            ),
            "toggle-theme" => Event::ToggleTheme,
            "filter-tag" => Event::FilterTag(Choice::from_attr(rest)),
            "select-year" => Event::SelectYear(Choice::from_attr(rest)),
            "select-month" => Event::SelectMonth(Choice::from_attr(rest)),
            "select-category" => Event::SelectCategory(Choice::from_attr(rest)),
            "search" => Event::Search(rest.to_string()),
            "open-project" => Event::OpenProject(index(rest)?),
            "open-document" => Event::OpenDocument(index(rest)?),
            "close-modal" => Event::CloseModal,
            "copy-email" => Event::CopyEmail,
            "copy-elapsed" => Event::CopyFeedbackElapsed,
            "key" => {
                let parts: Vec<&str> = rest.split_whitespace().collect();
                match parts.as_slice() {
                    [key] => Event::KeyDown(Key::parse(key)),
                    [key, "project", i] => Event::CardKey {
                        card: Card::Project(index(*i)?),
                        key: Key::parse(key),
                    },
                    [key, "document", i] => Event::CardKey {
                        card: Card::Document(index(*i)?),
                        key: Key::parse(key),
                    },
                    _ => return Err(format!("key: expected `key NAME [project|document N]`, got {:?}", rest)),
                }
            }
            "click" => {
                let nums = rest
                    .split_whitespace()
                    .map(|s| s.parse::<f64>())
                    .collect::<Result<Vec<f64>, _>>()
                    .map_err(|e| format!("click: {}", e))?;
                match nums.as_slice() {
                    [x, y, left, top, right, bottom] => Event::ModalClick {
                        x: *x,
                        y: *y,
                        inner: Rect {
                            left: *left,
                            top: *top,
                            right: *right,
                            bottom: *bottom,
                        },
                    },
                    _ => return Err("click: expected `click X Y LEFT TOP RIGHT BOTTOM`".to_string()),
                }
            }
            "" => return Err("empty event".to_string()),
            other => return Err(format!("unknown event {:?}", other)),
        })
    }
}

/// Result of one dispatch.
#[derive(Debug, Default, PartialEq)]
pub struct Dispatched {
    /// Mount points that were re-rendered.
    pub dirty: Dirty,
    /// Message to surface in an alert, if the event produced one.
    pub alert: Option<String>,
}

/// Everything the first render needs besides the content and the stores.
#[derive(Debug, Clone)]
pub struct Startup {
    /// Environment locale, e.g. `zh_CN.UTF-8`.
    pub locale: Option<String>,
    pub default_theme: Theme,
    /// One-off overrides; not persisted.
    pub lang: Option<Language>,
    pub theme: Option<Theme>,
    /// Year shown in the footer.
    pub year: i32,
}

pub struct Site {
    content: ContentDocument,
    session: Session,
    tags: Vec<String>,
    facets: DocFacets,
    renderer: Renderer,
    prefs: Box<dyn PrefStore>,
    clipboard: Box<dyn Clipboard>,
    year: i32,
}

impl Site {
    pub fn boot(
        content: ContentDocument,
        prefs: Box<dyn PrefStore>,
        clipboard: Box<dyn Clipboard>,
        startup: &Startup,
    ) -> Self {
        let stored = prefs.load();
        let mut session = Session::from_preferences(&stored, startup.locale.as_deref(), startup.default_theme);
        if let Some(lang) = startup.lang {
            session.lang = lang;
        }
        if let Some(theme) = startup.theme {
            session.theme = theme;
        }
        debug!("Session starts with lang={} theme={}", session.lang, session.theme.as_str());

        let tags = filter::tag_facet(&content.projects);
        let facets = DocFacets::from_documents(&content.documents);

        let mut site = Site {
            content,
            session,
            tags,
            facets,
            renderer: Renderer::new(),
            prefs,
            clipboard,
            year: startup.year,
        };
        site.render_all();
        site
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn facets(&self) -> &DocFacets {
        &self.facets
    }

    pub fn localizer(&self) -> Localizer<'_> {
        Localizer::new(&self.content.i18n, self.session.lang)
    }

    /// Filtered documents grouped by year-month.
    pub fn document_groups(&self) -> Vec<Bucket<(usize, &Document)>> {
        group::group_documents(filter::visible_documents(
            &self.content.documents,
            &self.session.doc_filter,
        ))
    }

    /// The whole page as one HTML document.
    pub fn page_html(&self) -> String {
        page::render_page(&self.renderer, &self.localizer())
    }

    pub fn render_all(&mut self) {
        for point in MountPoint::ALL {
            self.render(point);
        }
    }

    fn render(&mut self, point: MountPoint) {
        let nodes = self.build(point);
        self.renderer.mount(point, nodes);
    }

    fn build(&self, point: MountPoint) -> Vec<Node> {
        let lx = self.localizer();
        let lang = self.session.lang;
        match point {
            MountPoint::Root => render::root_nodes(lang, self.session.theme),
            MountPoint::Meta => {
                let name = lx.text(&self.content.profile.name);
                render::meta_nodes(&lx, &name)
            }
            MountPoint::Header => {
                render::header_nodes(&view::profile_view(&self.content.profile, &lx), lang, &lx)
            }
            MountPoint::Hero => render::hero_nodes(&view::profile_view(&self.content.profile, &lx)),
            MountPoint::About => render::about_nodes(&view::about_view(&self.content.about, &lx)),
            MountPoint::TagChips => {
                render::tag_chip_nodes(&self.tags, &self.session.project_filter, &lx.label("all", |l| l.all))
            }
            MountPoint::ProjectGrid => {
                filter::visible_projects(&self.content.projects, &self.session.project_filter)
                    .into_iter()
                    .map(|(i, p)| render::project_card_node(&view::project_card(i, p, &lx)))
                    .collect()
            }
            MountPoint::Timeline => {
                let items: Vec<_> = self
                    .content
                    .experience
                    .iter()
                    .map(|x| view::experience_view(x, &lx))
                    .collect();
                render::timeline_nodes(&items)
            }
            MountPoint::Skills => {
                let groups: Vec<_> = self
                    .content
                    .skills
                    .iter()
                    .map(|g| view::skill_group_view(g, &lx))
                    .collect();
                render::skill_nodes(&groups)
            }
            MountPoint::DocFilters => render::doc_filter_nodes(&self.facets, &self.session.doc_filter, &lx),
            MountPoint::DocGroups => render::doc_group_nodes(&self.document_groups(), &lx, |i, d| {
                view::document_card(i, d, &lx)
            }),
            MountPoint::Contact => {
                let label = if self.session.email_copied {
                    lx.label("copied", |l| l.copied)
                } else {
                    lx.label("copy", |l| l.copy)
                };
                render::contact_nodes(
                    &view::profile_view(&self.content.profile, &lx),
                    &label,
                    self.session.email_copied,
                )
            }
            MountPoint::Footer => render::footer_nodes(&lx.text(&self.content.profile.name), self.year),
            MountPoint::Modal => self.renderer.modal.nodes(&lx.label("close", |l| l.close)),
        }
    }

    pub fn dispatch(&mut self, event: Event) -> Dispatched {
        let mut alert = None;
        let dirty = match event {
            Event::ToggleLang => {
                let next = self.session.lang.toggled();
                self.change_lang(next)
            }
            Event::SetLang(lang) => self.change_lang(lang),
            Event::ToggleTheme => {
                let next = self.session.theme.toggled();
                if let Err(e) = self.prefs.save_theme(next) {
                    warn!("Theme not saved: {}", e);
                }
                self.session.set_theme(next)
            }
            Event::FilterTag(choice) => self.session.set_project_filter(choice),
            Event::SelectYear(choice) => self.session.select_year(choice),
            Event::SelectMonth(choice) => self.session.select_month(choice),
            Event::SelectCategory(choice) => self.session.select_category(choice),
            Event::Search(query) => self.session.set_query(&query),
            Event::OpenProject(index) => self.open_project(index),
            Event::OpenDocument(index) => self.open_document(index),
            Event::CardKey { card, key } => match key {
                Key::Enter | Key::Space => match card {
                    Card::Project(i) => self.open_project(i),
                    Card::Document(i) => self.open_document(i),
                },
                Key::Escape => self.close_modal(),
                Key::Other(_) => Dirty::new(),
            },
            Event::KeyDown(Key::Escape) => self.close_modal(),
            Event::KeyDown(_) => Dirty::new(),
            Event::ModalClick { x, y, inner } => {
                if self.renderer.modal.is_open() && !inner.contains(x, y) {
                    self.close_modal()
                } else {
                    Dirty::new()
                }
            }
            Event::CloseModal => self.close_modal(),
            Event::CopyEmail => {
                let email = self.content.profile.email_address().to_string();
                match copy_email(self.clipboard.as_mut(), &email) {
                    CopyOutcome::Copied => self.session.set_email_copied(true),
                    CopyOutcome::Alert(message) => {
                        alert = Some(message);
                        Dirty::new()
                    }
                }
            }
            Event::CopyFeedbackElapsed => self.session.set_email_copied(false),
        };

        for point in &dirty {
            self.render(*point);
        }
        Dispatched { dirty, alert }
    }

    fn change_lang(&mut self, lang: Language) -> Dirty {
        if let Err(e) = self.prefs.save_lang(lang) {
            warn!("Language not saved: {}", e);
        }
        self.session.set_lang(lang)
    }

    fn open_project(&mut self, index: usize) -> Dirty {
        let nodes = match self.content.projects.get(index) {
            Some(project) => render::project_detail_nodes(&view::project_detail(project, &self.localizer())),
            None => {
                warn!("No project at index {}", index);
                return Dirty::new();
            }
        };
        self.renderer.modal.open(nodes);
        Dirty::from([MountPoint::Modal])
    }

    fn open_document(&mut self, index: usize) -> Dirty {
        let nodes = match self.content.documents.get(index) {
            Some(doc) => render::document_detail_nodes(&view::document_detail(doc, &self.localizer())),
            None => {
                warn!("No document at index {}", index);
                return Dirty::new();
            }
        };
        self.renderer.modal.open(nodes);
        Dirty::from([MountPoint::Modal])
    }

    fn close_modal(&mut self) -> Dirty {
        if self.renderer.modal.close() {
            Dirty::from([MountPoint::Modal])
        } else {
            Dirty::new()
        }
    }
}
