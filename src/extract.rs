//! Markup extraction: pull the on-page signals the scorer consumes.
//!
//! Selection only, no judgement: malformed or empty markup degrades to
//! empty strings and zero counts rather than erroring.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Serialize;

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("valid selector"));
static META_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="description"]"#).expect("valid selector"));
static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("valid selector"));
static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img").expect("valid selector"));

/// On-page signals extracted from one fetched document.
/// Derived transiently per request; nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageSignals {
    pub title: String,
    pub meta_description: String,
    pub first_heading: String,
    pub images_missing_alt: usize,
}

/// Extract scoring signals from raw HTML.
pub fn extract_signals(html: &str) -> PageSignals {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default();

    let meta_description = document
        .select(&META_DESCRIPTION)
        .next()
        .and_then(|el| el.value().attr("content"))
        .unwrap_or_default()
        .to_string();

    let first_heading = document
        .select(&H1)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default();

    // alt="" is a deliberate decorative marker; only a wholly absent
    // attribute counts as missing.
    let images_missing_alt = document
        .select(&IMG)
        .filter(|el| el.value().attr("alt").is_none())
        .count();

    PageSignals {
        title,
        meta_description,
        first_heading,
        images_missing_alt,
    }
}
