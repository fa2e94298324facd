//! Typed DOM construction.
//!
//! Nodes are plain values: building a tree never touches a mount point.
//! Interactivity is declared with [`Action`]s, serialized as
//! `data-action` / `data-arg` attributes and mapped back to events by the
//! site's dispatcher.

use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// Declarative interaction attached to an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ToggleLang,
    ToggleTheme,
    FilterTag(String),
    OpenProject(usize),
    OpenDocument(usize),
    CloseModal,
    CopyEmail,
    SelectYear,
    SelectMonth,
    SelectCategory,
    Search,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::ToggleLang => "toggle-lang",
            Action::ToggleTheme => "toggle-theme",
            Action::FilterTag(_) => "filter-tag",
            Action::OpenProject(_) => "open-project",
            Action::OpenDocument(_) => "open-document",
            Action::CloseModal => "close-modal",
            Action::CopyEmail => "copy-email",
            Action::SelectYear => "select-year",
            Action::SelectMonth => "select-month",
            Action::SelectCategory => "select-category",
            Action::Search => "search",
        }
    }

    fn arg(&self) -> Option<String> {
        match self {
            Action::FilterTag(tag) => Some(tag.clone()),
            Action::OpenProject(i) | Action::OpenDocument(i) => Some(i.to_string()),
            _ => None,
        }
    }
}

/// Start building an element.
pub fn el(tag: &'static str) -> Element {
    Element {
        tag,
        attrs: Vec::new(),
        children: Vec::new(),
    }
}

pub fn text(s: impl Into<String>) -> Node {
    Node::Text(s.into())
}

impl Element {
    /// Set an attribute, replacing an earlier value of the same name.
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn attr_if(self, cond: bool, name: &str, value: impl Into<String>) -> Self {
        if cond {
            self.attr(name, value)
        } else {
            self
        }
    }

    pub fn on(self, action: Action) -> Self {
        let with_name = self.attr("data-action", action.name());
        match action.arg() {
            Some(arg) => with_name.attr("data-arg", arg),
            None => with_name,
        }
    }

    /// External link opened in a new tab.
    pub fn external(self, href: &str) -> Self {
        self.attr("href", href)
            .attr("target", "_blank")
            .attr("rel", "noopener")
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn text(self, s: impl Into<String>) -> Self {
        self.child(Node::Text(s.into()))
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

/// Elements serialized without a closing tag.
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

impl Node {
    pub fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(s) => out.push_str(&html_escape(s)),
            Node::Element(e) => {
                out.push('<');
                out.push_str(e.tag);
                for (k, v) in &e.attrs {
                    let _ = write!(out, " {}=\"{}\"", k, html_escape(v));
                }
                out.push('>');
                if VOID_TAGS.contains(&e.tag) {
                    return;
                }
                for c in &e.children {
                    c.write_html(out);
                }
                let _ = write!(out, "</{}>", e.tag);
            }
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        }
    }
}

pub fn nodes_to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for n in nodes {
        n.write_html(&mut out);
    }
    out
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
