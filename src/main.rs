mod boot;
mod clipboard;
mod config;
mod dom;
mod filter;
mod group;
mod i18n;
mod models;
mod page;
mod prefs;
mod render;
mod session;
mod site;
mod source;
mod view;

#[cfg(test)]
mod tests;

use chrono::Datelike;
use clap::{Args, Parser, Subcommand};
use log::{debug, error, info, warn};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clipboard::SystemClipboard;
use config::Config;
use filter::Choice;
use i18n::Language;
use prefs::{FilePrefStore, MemoryPrefStore, PrefStore, Theme};
use render::MountPoint;
use site::{Event, Site, Startup};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Render a bilingual portfolio page from a content document")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_FILE, env = "FOLIO_CONFIG")]
    config: PathBuf,

    /// Content source, path or URL (overrides config file)
    #[arg(long, env = "FOLIO_CONTENT")]
    content: Option<String>,

    /// Secondary document list, path or URL (overrides config file)
    #[arg(long)]
    documents: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the full page
    Render {
        #[command(flatten)]
        view: ViewArgs,
        /// Open the detail modal for the project at this index
        #[arg(long)]
        open_project: Option<usize>,
        /// Open the detail modal for the document at this index
        #[arg(long)]
        open_document: Option<usize>,
        /// Output file (overrides config file; stdout when neither is set)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the tag, year, month and category facets as JSON
    Facets,
    /// List matching documents grouped by month
    Search {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Show stored preferences, or store new ones
    Prefs {
        #[arg(long)]
        lang: Option<String>,
        #[arg(long)]
        theme: Option<String>,
    },
    /// Copy the profile email address to the clipboard
    CopyEmail,
    /// Read events from stdin, one per line, and print re-rendered mount points
    Session {
        #[command(flatten)]
        view: ViewArgs,
    },
}

#[derive(Args, Default)]
struct ViewArgs {
    /// Language for this run (not stored)
    #[arg(long)]
    lang: Option<String>,
    /// Theme for this run (not stored)
    #[arg(long)]
    theme: Option<String>,
    /// Project tag filter
    #[arg(long)]
    tag: Option<String>,
    /// Document year filter (YYYY)
    #[arg(long)]
    year: Option<String>,
    /// Document month filter (YYYY-MM)
    #[arg(long)]
    month: Option<String>,
    /// Document category filter
    #[arg(long)]
    category: Option<String>,
    /// Document search query
    #[arg(long)]
    query: Option<String>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = Config::load(&cli.config);
    if let Some(content) = cli.content {
        config.content.source = content;
    }
    if let Some(documents) = cli.documents {
        config.content.documents = Some(documents);
    }

    let result = match cli.command {
        Command::Render {
            view,
            open_project,
            open_document,
            out,
        } => cmd_render(&config, &view, open_project, open_document, out),
        Command::Facets => cmd_facets(&config),
        Command::Search { view } => cmd_search(&config, &view),
        Command::Prefs { lang, theme } => cmd_prefs(&config, lang, theme),
        Command::CopyEmail => cmd_copy_email(&config),
        Command::Session { view } => cmd_session(&config, &view),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

// ── Setup ─────────────────────────────────────────────────

fn pref_store(config: &Config) -> Box<dyn PrefStore> {
    if let Some(path) = config.preferences.path.as_deref() {
        return Box::new(FilePrefStore::new(config.resolve_path(path)));
    }
    match FilePrefStore::in_config_dir() {
        Some(store) => Box::new(store),
        None => {
            warn!("No config directory on this platform; preferences will not persist");
            Box::new(MemoryPrefStore::default())
        }
    }
}

/// First non-empty locale variable, in POSIX precedence order.
fn env_locale() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|k| std::env::var(k).ok())
        .find(|v| !v.trim().is_empty())
}

fn parse_lang(raw: Option<&str>) -> Result<Option<Language>, String> {
    raw.map(|s| Language::from_code(s).ok_or_else(|| format!("Unknown language: {}", s)))
        .transpose()
}

fn parse_theme(raw: Option<&str>) -> Result<Option<Theme>, String> {
    raw.map(|s| Theme::from_str(s).ok_or_else(|| format!("Unknown theme: {}", s)))
        .transpose()
}

fn startup(config: &Config, view: &ViewArgs) -> Result<Startup, String> {
    Ok(Startup {
        locale: env_locale(),
        default_theme: config.default_theme(),
        lang: parse_lang(view.lang.as_deref())?,
        theme: parse_theme(view.theme.as_deref())?,
        year: chrono::Local::now().year(),
    })
}

fn boot_site(config: &Config, view: &ViewArgs) -> Result<Site, String> {
    let startup = startup(config, view)?;
    let mut site = boot::run(config, &startup, pref_store(config), Box::new(SystemClipboard::default()))
        .map_err(|e| e.to_string())?;
    apply_filters(&mut site, view);
    Ok(site)
}

fn apply_filters(site: &mut Site, view: &ViewArgs) {
    if let Some(tag) = &view.tag {
        site.dispatch(Event::FilterTag(Choice::parse(tag)));
    }
    if let Some(year) = &view.year {
        site.dispatch(Event::SelectYear(Choice::parse(year)));
    }
    if let Some(month) = &view.month {
        site.dispatch(Event::SelectMonth(Choice::parse(month)));
    }
    if let Some(category) = &view.category {
        site.dispatch(Event::SelectCategory(Choice::parse(category)));
    }
    if let Some(query) = &view.query {
        site.dispatch(Event::Search(query.clone()));
    }
}

fn write_output(path: Option<&Path>, html: &str) -> Result<(), String> {
    match path {
        Some(p) => {
            std::fs::write(p, html).map_err(|e| format!("Failed to write {}: {}", p.display(), e))?;
            info!("Wrote {}", p.display());
            Ok(())
        }
        None => std::io::stdout()
            .write_all(html.as_bytes())
            .map_err(|e| format!("Failed to write output: {}", e)),
    }
}

// ── Commands ──────────────────────────────────────────────

fn cmd_render(
    config: &Config,
    view: &ViewArgs,
    open_project: Option<usize>,
    open_document: Option<usize>,
    out: Option<PathBuf>,
) -> Result<(), String> {
    let out = out.or_else(|| config.output.path.as_deref().map(|p| config.resolve_path(p)));

    let mut site = match boot_site(config, view) {
        Ok(site) => site,
        Err(e) => {
            write_output(out.as_deref(), &page::fallback_page())?;
            return Err(e);
        }
    };
    if let Some(i) = open_project {
        site.dispatch(Event::OpenProject(i));
    }
    if let Some(i) = open_document {
        site.dispatch(Event::OpenDocument(i));
    }
    write_output(out.as_deref(), &site.page_html())
}

fn cmd_facets(config: &Config) -> Result<(), String> {
    let site = boot_site(config, &ViewArgs::default())?;
    let facets = serde_json::json!({
        "tags": site.tags(),
        "years": site.facets().years,
        "months": site.facets().months,
        "categories": site.facets().categories,
    });
    let out = serde_json::to_string_pretty(&facets).map_err(|e| e.to_string())?;
    println!("{}", out);
    Ok(())
}

fn cmd_search(config: &Config, view: &ViewArgs) -> Result<(), String> {
    let site = boot_site(config, view)?;
    let lx = site.localizer();
    let groups = site.document_groups();
    if groups.is_empty() {
        println!("{}", lx.label("noDocuments", |l| l.no_documents));
        return Ok(());
    }
    for bucket in &groups {
        if bucket.is_unknown() {
            println!("{}", lx.label("noDate", |l| l.no_date));
        } else {
            println!("{}", bucket.key);
        }
        for (i, doc) in &bucket.items {
            let card = view::document_card(*i, doc, &lx);
            let mut line = format!("  [{}] {}  {}", card.index, card.date, card.title);
            if !card.category.is_empty() {
                line.push_str(&format!("  ({})", card.category));
            }
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_prefs(config: &Config, lang: Option<String>, theme: Option<String>) -> Result<(), String> {
    let store = pref_store(config);
    let lang = parse_lang(lang.as_deref())?;
    let theme = parse_theme(theme.as_deref())?;
    if let Some(lang) = lang {
        store.save_lang(lang).map_err(|e| e.to_string())?;
    }
    if let Some(theme) = theme {
        store.save_theme(theme).map_err(|e| e.to_string())?;
    }
    let out = serde_json::to_string_pretty(&store.load()).map_err(|e| e.to_string())?;
    println!("{}", out);
    Ok(())
}

fn cmd_copy_email(config: &Config) -> Result<(), String> {
    let mut site = boot_site(config, &ViewArgs::default())?;
    let result = site.dispatch(Event::CopyEmail);
    match result.alert {
        Some(email) => println!("{}", email),
        None => println!("{}", site.localizer().label("copied", |l| l.copied)),
    }
    Ok(())
}

fn cmd_session(config: &Config, view: &ViewArgs) -> Result<(), String> {
    let startup = startup(config, view)?;
    let mut site = match boot::run(config, &startup, pref_store(config), Box::new(SystemClipboard::default())) {
        Ok(site) => site,
        Err(e) => {
            println!("{}", page::fallback_page());
            return Err(e.to_string());
        }
    };
    apply_filters(&mut site, view);
    println!("{}", site.page_html());

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.map_err(|e| format!("Failed to read input: {}", e))?;
        if line.trim().is_empty() {
            continue;
        }
        let event = match Event::parse(&line) {
            Ok(ev) => ev,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };
        let result = site.dispatch(event);
        match serde_json::to_string(site.session()) {
            Ok(state) => debug!("Session state: {}", state),
            Err(e) => warn!("Session state not serializable: {}", e),
        }
        if let Some(message) = result.alert {
            println!("alert: {}", message);
        }
        for point in &result.dirty {
            println!("--- {} ---", point.id());
            match point {
                MountPoint::Root => {
                    let attrs: Vec<String> = site
                        .renderer()
                        .root_attrs()
                        .iter()
                        .map(|(k, v)| format!("{}=\"{}\"", k, v))
                        .collect();
                    println!("{}", attrs.join(" "));
                }
                _ => println!("{}", site.renderer().html(*point)),
            }
        }
    }
    Ok(())
}
