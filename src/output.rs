//! CLI output formatting for resolved options.
//!
//! # Output Format
//!
//! ```text
//! Document
//!     Output: pdf/document.pdf
//!     Author: Jane Doe
//!     Copyright: © 2026 ACME
//!
//! Cover
//!     Title: My Docs
//!     Logo: file:///home/jane/site/docs/img/logo.png
//!
//! Contents
//!     Title: Table of contents
//!     TOC level: 2, numbered to level 3, heading shift on
//!     Excluded pages: changelog/
//!
//! Theme
//!     mkdocs (templates: templates, overrides)
//!
//! Rendering
//!     JS: headless browser
//! ```
//!
//! # Architecture
//!
//! [`format_options`] returns `Vec<String>` for testability and
//! [`print_options`] writes it to stdout. Formatting is pure: no I/O, no
//! side effects.

use crate::options::ResolvedOptions;
use std::collections::BTreeSet;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn field(label: &str, value: &str) -> String {
    format!("{}{}: {}", indent(1), label, value)
}

fn join_set(values: &BTreeSet<String>) -> String {
    values.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

/// Format a resolved options value as an indented summary.
pub fn format_options(options: &ResolvedOptions) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Document".to_string());
    lines.push(field("Output", options.output_path().unwrap_or("(none)")));
    if let Some(author) = options.author() {
        lines.push(field("Author", author));
    }
    if let Some(copyright) = options.copyright() {
        lines.push(field("Copyright", copyright));
    }
    if options.strict() {
        lines.push(field("Strict", "on"));
    }

    lines.push(String::new());
    lines.push("Cover".to_string());
    match options.cover_details() {
        Some(cover) => {
            lines.push(field("Title", cover.title()));
            if let Some(subtitle) = cover.subtitle() {
                lines.push(field("Subtitle", subtitle));
            }
            lines.push(field("Logo", cover.logo_url().unwrap_or("(none)")));
        }
        None => lines.push(format!("{}disabled", indent(1))),
    }

    lines.push(String::new());
    lines.push("Contents".to_string());
    if let Some(title) = options.toc_title() {
        lines.push(field("Title", title));
    }
    lines.push(format!(
        "{}TOC level: {}, numbered to level {}, heading shift {}",
        indent(1),
        options.toc_level(),
        options.ordered_chapter_level(),
        on_off(options.heading_shift())
    ));
    if options.two_columns_level() > 0 {
        lines.push(field(
            "Two columns from level",
            &options.two_columns_level().to_string(),
        ));
    }
    for (label, values) in [
        ("Excluded children", options.excludes_children()),
        ("Excluded pages", options.exclude_pages()),
        ("Converted iframes", options.convert_iframe()),
    ] {
        if !values.is_empty() {
            lines.push(field(label, &join_set(values)));
        }
    }

    lines.push(String::new());
    lines.push("Theme".to_string());
    let search_path = options
        .template()
        .search_path()
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!(
        "{}{} (templates: {})",
        indent(1),
        options.theme_name(),
        search_path
    ));
    if let Some(handler) = options.theme_handler_path() {
        lines.push(field("Handler", handler));
    }
    if options.template().has_custom_cover() {
        lines.push(field("Cover template", "custom"));
    }

    lines.push(String::new());
    lines.push("Rendering".to_string());
    let js = match options.js_renderer() {
        Some(renderer) if renderer.is_live() => "headless browser",
        Some(_) => "headless browser (not started)",
        None => "off",
    };
    lines.push(field("JS", js));
    if options.debug_html() {
        lines.push(field("Debug HTML", "on"));
    }
    if options.show_anchors() {
        lines.push(field("Show anchors", "on"));
    }

    lines
}

/// Print the resolved options summary to stdout.
pub fn print_options(options: &ResolvedOptions) {
    for line in format_options(options) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PluginConfig, SiteSettings};
    use crate::options::resolve;
    use crate::renderer::NoopLauncher;
    use crate::renderer::tests::MockLauncher;

    fn lines_for(local: &PluginConfig, site: &SiteSettings) -> Vec<String> {
        let options = resolve(local, site, &NoopLauncher).unwrap();
        format_options(&options)
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn default_summary_sections() {
        let lines = lines_for(&PluginConfig::default(), &SiteSettings::default());
        for section in ["Document", "Cover", "Contents", "Theme", "Rendering"] {
            assert!(lines.iter().any(|l| l == section), "missing {section}");
        }
        assert!(lines.contains(&"    Output: pdf/document.pdf".to_string()));
        assert!(lines.contains(&"    Logo: (none)".to_string()));
        assert!(lines.contains(&"    JS: off".to_string()));
        assert!(lines.contains(
            &"    TOC level: 2, numbered to level 3, heading shift on".to_string()
        ));
    }

    #[test]
    fn check_mode_renderer_marked_not_started() {
        let local = PluginConfig {
            render_js: true,
            ..PluginConfig::default()
        };
        let lines = lines_for(&local, &SiteSettings::default());
        assert!(lines.contains(&"    JS: headless browser (not started)".to_string()));
    }

    #[test]
    fn live_renderer_shown_as_headless_browser() {
        let local = PluginConfig {
            render_js: true,
            ..PluginConfig::default()
        };
        let options = resolve(&local, &SiteSettings::default(), &MockLauncher::new()).unwrap();
        assert!(format_options(&options).contains(&"    JS: headless browser".to_string()));
    }

    #[test]
    fn disabled_cover_shown() {
        let local = PluginConfig {
            cover: false,
            ..PluginConfig::default()
        };
        let lines = lines_for(&local, &SiteSettings::default());
        assert!(lines.contains(&"    disabled".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Logo:")));
    }

    #[test]
    fn resolved_fallbacks_shown() {
        let site = SiteSettings {
            site_author: Some("<b>Jane</b>".to_string()),
            site_name: "My Docs".to_string(),
            theme_handler_path: Some("/opt/handler".to_string()),
            ..SiteSettings::default()
        };
        let lines = lines_for(&PluginConfig::default(), &site);
        assert!(lines.contains(&"    Author: Jane".to_string()));
        assert!(lines.contains(&"    Title: My Docs".to_string()));
        assert!(lines.contains(&"    Handler: /opt/handler".to_string()));
    }

    #[test]
    fn page_lists_joined_in_order() {
        let local = PluginConfig {
            exclude_pages: vec!["changelog/".to_string(), "about/".to_string()],
            ..PluginConfig::default()
        };
        let lines = lines_for(&local, &SiteSettings::default());
        assert!(lines.contains(&"    Excluded pages: about/, changelog/".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Converted iframes")));
    }
}
