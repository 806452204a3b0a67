//! Options resolution.
//!
//! Turns the host configuration into a [`ResolvedOptions`] value: every
//! default, fallback and lookup happens once, in [`resolve`], and the result
//! is read-only for the rest of the build.
//!
//! ## Resolution order
//!
//! Later steps read fields settled by earlier ones:
//!
//! 1. Pass-through flags and paths
//! 2. `author` / `copyright`: local value, else site value (both HTML-stripped)
//! 3. Cover title and subtitle (when the cover is enabled)
//! 4. `custom_template_path`
//! 5. TOC and page settings
//! 6. JS renderer (when `render_js` is set)
//! 7. Theme name and theme handler fallback
//! 8. Template handler
//! 9. Cover logo lookup (when the cover is enabled)
//!
//! ## Fallbacks
//!
//! | Field | Local | Fallback |
//! |---|---|---|
//! | `author` | `pdf.author` | `site.site_author` |
//! | `copyright` | `pdf.copyright` | `site.copyright` |
//! | `cover_title` | `pdf.cover_title` | `site.site_name` (verbatim) |
//! | `theme_handler_path` | `pdf.theme_handler_path` | `site.theme_handler_path` |

use crate::config::{PluginConfig, SiteSettings};
use crate::normalize::{is_blank, normalize};
use crate::reference::{candidate_dirs_for, resolve_reference};
use crate::renderer::{JsRenderer, RenderError, RendererLauncher};
use crate::template::{Template, TemplateError};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OptionsError {
    #[error(transparent)]
    Renderer(#[from] RenderError),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Cover page settings. Only exists when the cover is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cover {
    title: String,
    subtitle: Option<String>,
    logo_url: Option<String>,
}

impl Cover {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    /// Remote URL or `file://` URI of the logo.
    pub fn logo_url(&self) -> Option<&str> {
        self.logo_url.as_deref()
    }
}

/// Fully-resolved PDF export settings for one build.
pub struct ResolvedOptions {
    strict: bool,

    verbose: bool,
    debug_html: bool,
    show_anchors: bool,

    output_path: Option<String>,
    theme_handler_path: Option<String>,

    author: Option<String>,
    copyright: Option<String>,

    cover: Option<Cover>,
    custom_template_path: String,

    toc_title: Option<String>,
    heading_shift: bool,
    toc_level: i64,
    ordered_chapter_level: i64,
    excludes_children: BTreeSet<String>,

    exclude_pages: BTreeSet<String>,
    convert_iframe: BTreeSet<String>,
    two_columns_level: i64,

    js_renderer: Option<Box<dyn JsRenderer>>,

    theme_name: String,
    template: Template,
}

/// Resolve the plugin and site settings into [`ResolvedOptions`].
///
/// Starts the JS renderer through `launcher` when `render_js` is set; a
/// launcher or template failure is returned unchanged and aborts the build.
pub fn resolve(
    local: &PluginConfig,
    site: &SiteSettings,
    launcher: &dyn RendererLauncher,
) -> Result<ResolvedOptions, OptionsError> {
    let author = normalize_with_fallback("author", &local.author, &site.site_author);
    let copyright = normalize_with_fallback("copyright", &local.copyright, &site.copyright);

    let cover_text = local.cover.then(|| {
        let title = match local.cover_title.as_deref() {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => {
                tracing::debug!("cover_title not set, using site_name");
                site.site_name.clone()
            }
        };
        (title, local.cover_subtitle.clone())
    });

    let custom_template_path = local.custom_template_path.clone();

    let js_renderer = if local.render_js {
        Some(launcher.start(&local.headless_chrome_path)?)
    } else {
        None
    };

    let theme_name = site.theme.name.clone();
    let theme_handler_path = match local.theme_handler_path.as_deref() {
        Some(path) if !path.is_empty() => Some(path.to_string()),
        _ => site.theme_handler_path.clone(),
    };

    let template = Template::new(&custom_template_path, site)?;

    let cover = cover_text.map(|(title, subtitle)| {
        let dirs = candidate_dirs_for(&custom_template_path, site);
        let logo_url = resolve_reference(local.cover_logo.as_deref(), &dirs);
        match (&local.cover_logo, &logo_url) {
            (Some(logo), None) if !logo.is_empty() => {
                tracing::warn!(cover_logo = %logo, "cover logo not found in any search directory")
            }
            (_, Some(url)) => tracing::debug!(logo_url = %url, "resolved cover logo"),
            _ => {}
        }
        Cover {
            title,
            subtitle,
            logo_url,
        }
    });

    Ok(ResolvedOptions {
        strict: site.strict,
        verbose: local.verbose,
        debug_html: local.debug_html,
        show_anchors: local.show_anchors,
        output_path: local.output_path.clone(),
        theme_handler_path,
        author,
        copyright,
        cover,
        custom_template_path,
        toc_title: normalize(local.toc_title.as_deref()),
        heading_shift: local.heading_shift,
        toc_level: local.toc_level,
        ordered_chapter_level: local.ordered_chapter_level,
        excludes_children: local.excludes_children.iter().cloned().collect(),
        exclude_pages: local.exclude_pages.iter().cloned().collect(),
        convert_iframe: local.convert_iframe.iter().cloned().collect(),
        two_columns_level: local.two_columns_level,
        js_renderer,
        theme_name,
        template,
    })
}

fn normalize_with_fallback(
    field: &str,
    local: &Option<String>,
    global: &Option<String>,
) -> Option<String> {
    let value = normalize(local.as_deref());
    if !is_blank(&value) {
        return value;
    }
    let fallback = normalize(global.as_deref());
    if fallback.is_some() {
        tracing::debug!(field, "using site-wide value");
    }
    fallback
}

impl ResolvedOptions {
    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn debug_html(&self) -> bool {
        self.debug_html
    }

    pub fn show_anchors(&self) -> bool {
        self.show_anchors
    }

    pub fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    pub fn theme_handler_path(&self) -> Option<&str> {
        self.theme_handler_path.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn copyright(&self) -> Option<&str> {
        self.copyright.as_deref()
    }

    pub fn cover(&self) -> bool {
        self.cover.is_some()
    }

    pub fn cover_details(&self) -> Option<&Cover> {
        self.cover.as_ref()
    }

    pub fn cover_title(&self) -> Option<&str> {
        self.cover.as_ref().map(Cover::title)
    }

    pub fn cover_subtitle(&self) -> Option<&str> {
        self.cover.as_ref().and_then(Cover::subtitle)
    }

    pub fn logo_url(&self) -> Option<&str> {
        self.cover.as_ref().and_then(Cover::logo_url)
    }

    pub fn custom_template_path(&self) -> &str {
        &self.custom_template_path
    }

    pub fn toc_title(&self) -> Option<&str> {
        self.toc_title.as_deref()
    }

    pub fn heading_shift(&self) -> bool {
        self.heading_shift
    }

    pub fn toc_level(&self) -> i64 {
        self.toc_level
    }

    pub fn ordered_chapter_level(&self) -> i64 {
        self.ordered_chapter_level
    }

    pub fn excludes_children(&self) -> &BTreeSet<String> {
        &self.excludes_children
    }

    pub fn exclude_pages(&self) -> &BTreeSet<String> {
        &self.exclude_pages
    }

    pub fn convert_iframe(&self) -> &BTreeSet<String> {
        &self.convert_iframe
    }

    pub fn two_columns_level(&self) -> i64 {
        self.two_columns_level
    }

    pub fn js_renderer(&self) -> Option<&dyn JsRenderer> {
        self.js_renderer.as_deref()
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Run `html` through the JS renderer, if one was started.
    ///
    /// A rendering failure is logged and the page is used as-is, so one
    /// broken page does not abort the whole export.
    pub fn render_js(&self, html: &str) -> String {
        let Some(renderer) = &self.js_renderer else {
            return html.to_string();
        };
        match renderer.render(html) {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::error!("failed to render by JS: {e}");
                html.to_string()
            }
        }
    }
}

impl fmt::Debug for ResolvedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedOptions")
            .field("strict", &self.strict)
            .field("output_path", &self.output_path)
            .field("author", &self.author)
            .field("copyright", &self.copyright)
            .field("cover", &self.cover)
            .field("custom_template_path", &self.custom_template_path)
            .field("toc_title", &self.toc_title)
            .field("js_renderer", &self.js_renderer.is_some())
            .field("theme_name", &self.theme_name)
            .field("theme_handler_path", &self.theme_handler_path)
            .finish_non_exhaustive()
    }
}
