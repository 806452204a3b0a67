//! Text normalization for user-supplied metadata strings.
//!
//! Author, copyright and table-of-contents titles are often written with
//! inline markup (`&copy; 2026 <a href="...">ACME</a>`) because the same
//! values feed the HTML site. The PDF needs plain text, so these fields are
//! parsed as an HTML fragment and only their text content is kept.

use scraper::Html;

/// Strip HTML from `text`, returning its concatenated text content.
///
/// `None` and `""` normalize to `None`. Malformed markup is parsed
/// permissively; markup without any text yields `Some("")`.
pub fn normalize(text: Option<&str>) -> Option<String> {
    let text = text.filter(|t| !t.is_empty())?;
    let fragment = Html::parse_fragment(text);
    Some(fragment.root_element().text().collect())
}

/// `true` when a normalized value carries no text.
pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}
