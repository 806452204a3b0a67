//! Cover page and stylesheet templates.
//!
//! The built-in cover is rendered with [maud](https://maud.lambda.xyz/). Users
//! can replace it by dropping a `cover.html` into the custom template
//! directory (or the theme's custom directory), and can extend the built-in
//! stylesheet with a `styles.css` found the same way.
//!
//! ## Template search path
//!
//! ```text
//! custom_template_path/    ← first match wins
//! theme.custom_dir/
//! (built-in)
//! ```
//!
//! ## Custom cover placeholders
//!
//! | Placeholder | Value |
//! |---|---|
//! | `{{ title }}` | cover title |
//! | `{{ subtitle }}` | cover subtitle |
//! | `{{ logo_url }}` | resolved logo URL |
//! | `{{ author }}` | author |
//! | `{{ copyright }}` | copyright |
//!
//! Values are HTML-escaped; unset values render as an empty string.

use crate::config::SiteSettings;
use crate::options::ResolvedOptions;
use maud::{Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid theme: {0}")]
    Theme(String),
}

const BASE_CSS: &str = include_str!("../static/pdf.css");

pub const COVER_TEMPLATE: &str = "cover.html";
pub const STYLES_TEMPLATE: &str = "styles.css";

/// Template handler for one build.
///
/// Custom resources are read once, at construction.
#[derive(Debug, Clone)]
pub struct Template {
    theme_name: String,
    search_path: Vec<PathBuf>,
    custom_cover: Option<String>,
    custom_styles: Option<String>,
}

impl Template {
    pub fn new(custom_template_path: &str, site: &SiteSettings) -> Result<Self, TemplateError> {
        let theme_name = site.theme.name.trim();
        if theme_name.is_empty() {
            return Err(TemplateError::Theme("theme name must not be empty".into()));
        }

        let search_path: Vec<PathBuf> = [
            Some(custom_template_path),
            site.theme.custom_dir.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .collect();

        let custom_cover = read_first(&search_path, COVER_TEMPLATE)?;
        let custom_styles = read_first(&search_path, STYLES_TEMPLATE)?;
        tracing::debug!(
            theme = theme_name,
            custom_cover = custom_cover.is_some(),
            custom_styles = custom_styles.is_some(),
            "template handler ready"
        );

        Ok(Self {
            theme_name: theme_name.to_string(),
            search_path,
            custom_cover,
            custom_styles,
        })
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    /// Directories searched for custom templates, highest priority first.
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    pub fn has_custom_cover(&self) -> bool {
        self.custom_cover.is_some()
    }

    /// Render the cover page, or `None` when the cover is disabled.
    pub fn render_cover(&self, options: &ResolvedOptions) -> Option<Markup> {
        let cover = options.cover_details()?;
        let author = options.author();
        let copyright = options.copyright();

        if let Some(custom) = &self.custom_cover {
            let rendered = fill_placeholders(custom, |name| match name {
                "title" => Some(escape(Some(cover.title()))),
                "subtitle" => Some(escape(cover.subtitle())),
                "logo_url" => Some(escape(cover.logo_url())),
                "author" => Some(escape(author)),
                "copyright" => Some(escape(copyright)),
                _ => None,
            });
            return Some(PreEscaped(rendered));
        }

        Some(html! {
            section.cover {
                @if let Some(logo) = cover.logo_url() {
                    img.cover-logo src=(logo) alt="";
                }
                h1.cover-title { (cover.title()) }
                @if let Some(subtitle) = cover.subtitle() {
                    h2.cover-subtitle { (subtitle) }
                }
                @if let Some(author) = author {
                    p.cover-author { (author) }
                }
                @if let Some(copyright) = copyright {
                    p.cover-copyright { (copyright) }
                }
            }
        })
    }

    /// Built-in CSS, theme adjustments, then the user's `styles.css`.
    pub fn stylesheet(&self) -> String {
        let mut css = String::from(BASE_CSS);
        if let Some(theme_css) = theme_css(&self.theme_name) {
            css.push('\n');
            css.push_str(theme_css);
        }
        if let Some(custom) = &self.custom_styles {
            css.push('\n');
            css.push_str(custom);
        }
        css
    }
}

/// Small per-theme corrections for markup the themes add around content.
fn theme_css(theme_name: &str) -> Option<&'static str> {
    match theme_name {
        "material" => Some(".md-header, .md-footer, .md-sidebar { display: none; }"),
        "readthedocs" => Some(".wy-nav-side, .rst-versions { display: none; }"),
        _ => None,
    }
}

fn read_first(search_path: &[PathBuf], name: &str) -> Result<Option<String>, TemplateError> {
    let Some(path) = search_path
        .iter()
        .map(|dir| dir.join(name))
        .find(|path| path.is_file())
    else {
        return Ok(None);
    };
    read_template(&path).map(Some)
}

fn read_template(path: &Path) -> Result<String, TemplateError> {
    fs::read_to_string(path).map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace each `{{ name }}` token in one pass. Substituted values are never
/// rescanned; unknown or unterminated tokens are kept as written.
fn fill_placeholders(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let token = &rest[start..];
        let Some(end) = token.find("}}") else {
            rest = token;
            break;
        };
        match lookup(token[2..end].trim()) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&token[..end + 2]),
        }
        rest = &token[end + 2..];
    }
    out.push_str(rest);
    out
}

fn escape(value: Option<&str>) -> String {
    value.map(|v| html! { (v) }.into_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site_with_theme(name: &str) -> SiteSettings {
        let mut site = SiteSettings::default();
        site.theme.name = name.to_string();
        site
    }

    #[test]
    fn empty_theme_name_is_error() {
        let result = Template::new("templates", &site_with_theme("  "));
        assert!(matches!(result, Err(TemplateError::Theme(_))));
    }

    #[test]
    fn no_custom_templates_when_dirs_missing() {
        let template = Template::new("/nonexistent/templates", &SiteSettings::default()).unwrap();
        assert!(!template.has_custom_cover());
        assert_eq!(template.theme_name(), "mkdocs");
        assert!(template.stylesheet().starts_with(BASE_CSS));
    }

    #[test]
    fn search_path_skips_missing_theme_dir() {
        let template = Template::new("templates", &SiteSettings::default()).unwrap();
        assert_eq!(template.search_path(), &[PathBuf::from("templates")]);

        let mut site = SiteSettings::default();
        site.theme.custom_dir = Some("overrides".to_string());
        let template = Template::new("templates", &site).unwrap();
        assert_eq!(
            template.search_path(),
            &[PathBuf::from("templates"), PathBuf::from("overrides")]
        );
    }

    #[test]
    fn custom_cover_found_in_theme_dir() {
        let tmp = TempDir::new().unwrap();
        let overrides = tmp.path().join("overrides");
        fs::create_dir_all(&overrides).unwrap();
        fs::write(overrides.join(COVER_TEMPLATE), "<h1>{{ title }}</h1>").unwrap();

        let mut site = SiteSettings::default();
        site.theme.custom_dir = Some(overrides.to_string_lossy().into_owned());
        let templates = tmp.path().join("templates");
        let template = Template::new(templates.to_str().unwrap(), &site).unwrap();
        assert!(template.has_custom_cover());
    }

    #[test]
    fn custom_template_dir_wins_over_theme_dir() {
        let tmp = TempDir::new().unwrap();
        let custom = tmp.path().join("templates");
        let overrides = tmp.path().join("overrides");
        fs::create_dir_all(&custom).unwrap();
        fs::create_dir_all(&overrides).unwrap();
        fs::write(custom.join(STYLES_TEMPLATE), "h1 { color: red; }").unwrap();
        fs::write(overrides.join(STYLES_TEMPLATE), "h1 { color: blue; }").unwrap();

        let mut site = SiteSettings::default();
        site.theme.custom_dir = Some(overrides.to_string_lossy().into_owned());
        let template = Template::new(custom.to_str().unwrap(), &site).unwrap();
        let css = template.stylesheet();
        assert!(css.ends_with("h1 { color: red; }"));
        assert!(!css.contains("color: blue"));
    }

    #[test]
    fn theme_css_appended_for_known_themes() {
        let template = Template::new("/nonexistent", &site_with_theme("material")).unwrap();
        assert!(template.stylesheet().contains(".md-header"));

        let template = Template::new("/nonexistent", &site_with_theme("custom-theme")).unwrap();
        assert_eq!(template.stylesheet(), BASE_CSS);
    }

    #[test]
    fn placeholders_filled_in_one_pass() {
        let lookup = |name: &str| match name {
            "title" => Some("{{ author }}".to_string()),
            "author" => Some("Ann".to_string()),
            _ => None,
        };
        assert_eq!(
            fill_placeholders("<h1>{{ title }}</h1><p>{{author}}</p>", lookup),
            "<h1>{{ author }}</h1><p>Ann</p>"
        );
    }

    #[test]
    fn unknown_and_unterminated_placeholders_kept() {
        let lookup = |_: &str| None;
        assert_eq!(
            fill_placeholders("a {{ date }} b {{ title", lookup),
            "a {{ date }} b {{ title"
        );
    }

    #[test]
    fn escape_handles_markup_and_none() {
        assert_eq!(escape(Some("<b>&</b>")), "&lt;b&gt;&amp;&lt;/b&gt;");
        assert_eq!(escape(None), "");
    }
}
