//! Resource reference resolution.
//!
//! A cover logo may be written as a remote URL or as a path relative to one
//! of several directories. Remote references pass through untouched; local
//! ones are probed against an ordered list of candidate directories and the
//! first existing file wins, which lets a custom template directory shadow
//! the theme, the theme shadow the docs, and so on:
//!
//! ```text
//! custom_template_path  →  theme.custom_dir  →  docs_dir  →  .
//! ```

use crate::config::SiteSettings;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Resolve `href` to a remote URL or a `file://` URI of an existing file.
///
/// Empty entries in `candidate_dirs` are skipped. Returns `None` when `href`
/// is empty or no candidate directory contains the file; filesystem errors
/// count as "not found".
pub fn resolve_reference(href: Option<&str>, candidate_dirs: &[Option<&Path>]) -> Option<String> {
    let href = href.filter(|h| !h.is_empty())?;

    if is_remote(href) {
        return Some(href.to_string());
    }

    candidate_dirs
        .iter()
        .flatten()
        .filter(|dir| !dir.as_os_str().is_empty())
        .find_map(|dir| {
            let path = absolute_normalized(&dir.join(href))?;
            if !path.is_file() {
                return None;
            }
            Url::from_file_path(&path).ok().map(String::from)
        })
}

/// The standard logo search order for a build.
pub fn candidate_dirs_for<'a>(
    custom_template_path: &'a str,
    site: &'a SiteSettings,
) -> [Option<&'a Path>; 4] {
    [
        Some(Path::new(custom_template_path)),
        site.theme.custom_dir.as_deref().map(Path::new),
        Some(Path::new(&site.docs_dir)),
        Some(Path::new(".")),
    ]
}

/// A reference with a scheme (`https:`, `data:`) or a network location
/// (`//cdn.example.com/logo.png`). Host and port are not validated.
fn is_remote(href: &str) -> bool {
    href.starts_with("//") || has_scheme(href) || Url::parse(href).is_ok()
}

/// RFC 3986 scheme: a letter, then letters, digits, `+`, `-` or `.`, then `:`.
fn has_scheme(href: &str) -> bool {
    let Some((scheme, _)) = href.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Make `path` absolute against the working directory and fold away `.`
/// and `..` components without touching the filesystem.
fn absolute_normalized(path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(path).ok()?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Some(normalized)
}
