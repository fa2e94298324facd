//! Page skeleton and whole-document serialization.
//!
//! The skeleton carries two kinds of placeholders: `{{mount_id}}` for a
//! mount point's contents (dashes in the id become underscores) and
//! `{{i18n:path|Default}}` for static chrome text, resolved through the
//! accessor with the default kept when the path is missing.

use crate::dom::html_escape;
use crate::i18n::Localizer;
use crate::render::{MountPoint, Renderer};

pub const FALLBACK_MESSAGE: &str =
    "Failed to load content.json. Please run via a local server (see README) or host it.";

const LAYOUT: &str = r##"<!doctype html>
<html{{root_attrs}}>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{{meta}}
<link rel="stylesheet" href="./styles.css">
</head>
<body>
<header class="site-header" id="top">
<div class="container header-inner">
{{header}}
</div>
</header>
<main>
<section class="hero container" id="hero">
{{hero}}
</section>
<section class="section container" id="about">
<h2 data-i18n="sections.about">{{i18n:sections.about|About}}</h2>
{{about}}
</section>
<section class="section container" id="projects">
<h2 data-i18n="sections.projects">{{i18n:sections.projects|Projects}}</h2>
<div class="chips" id="projectTags">{{tag_chips}}</div>
<div class="grid" id="projectGrid">{{project_grid}}</div>
</section>
<section class="section container" id="experience">
<h2 data-i18n="sections.experience">{{i18n:sections.experience|Experience}}</h2>
<ol class="timeline" id="timeline">{{timeline}}</ol>
</section>
<section class="section container" id="skills">
<h2 data-i18n="sections.skills">{{i18n:sections.skills|Skills}}</h2>
<div class="skills" id="skillsGrid">{{skills}}</div>
</section>
<section class="section container" id="documents">
<h2 data-i18n="sections.documents">{{i18n:sections.documents|Documents}}</h2>
<div class="doc-filters" id="docFilters">{{doc_filters}}</div>
<div class="doc-groups" id="docGroups">{{doc_groups}}</div>
</section>
<section class="section container" id="contact">
{{contact}}
</section>
</main>
<footer class="site-footer container">
{{footer}}
</footer>
{{modal}}
</body>
</html>
"##;

/// Serialize every mount point into the skeleton.
///
/// Placeholders are read from the skeleton only. Substituted mount HTML and
/// chrome text are never scanned again, so braces inside content survive.
pub fn render_page(renderer: &Renderer, lx: &Localizer) -> String {
    fill_layout(LAYOUT, |name| {
        if name == "root_attrs" {
            return Some(
                renderer
                    .root_attrs()
                    .iter()
                    .map(|(k, v)| format!(" {}=\"{}\"", k, html_escape(v)))
                    .collect(),
            );
        }
        if let Some(body) = name.strip_prefix("i18n:") {
            let (path, default) = body.split_once('|').unwrap_or((body, ""));
            let value = lx.t(path);
            return Some(html_escape(if value.is_empty() { default } else { &value }));
        }
        MountPoint::ALL
            .iter()
            .find(|p| **p != MountPoint::Root && p.id().replace('-', "_") == name)
            .map(|p| renderer.html(*p))
    })
}

/// Single left-to-right pass over `layout`. Each `{{name}}` is replaced by
/// `resolve(name)`; unresolved markers made of lowercase letters and
/// underscores are dropped, anything else is kept verbatim.
fn fill_layout(layout: &str, mut resolve: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(layout.len() * 2);
    let mut rest = layout;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match resolve(name) {
            Some(value) => out.push_str(&value),
            None if !name.is_empty() && name.bytes().all(|b| b.is_ascii_lowercase() || b == b'_') => {}
            None => {
                out.push_str("{{");
                rest = after;
                continue;
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// Whole-page replacement shown when the content cannot be loaded.
pub fn fallback_page() -> String {
    format!(
        "<!doctype html>\n<html>\n<body><div style=\"padding:24px;font-family:system-ui\">{}</div></body>\n</html>\n",
        FALLBACK_MESSAGE
    )
}
