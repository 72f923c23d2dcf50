//! Keyword scoring over extracted page signals.
//!
//! Matching is case-insensitive substring containment, not word-boundary
//! matching. That semantic is load-bearing: "seo" matches "SEO Audit Tool"
//! and also "paseo".

use serde::{Deserialize, Serialize};

use crate::extract::PageSignals;

/// Substituted when a scoring pass produces no suggestions.
pub const NO_ISSUES_MESSAGE: &str = "No issues found! Great job.";

const POINTS_PER_MATCH: u32 = 10;
const MAX_SCORE: u32 = 100;

/// Final report returned to the caller as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub url: String,
    pub keywords: Vec<String>,
    pub score: u32,
    pub suggestions: Vec<String>,
}

/// Score the signals against the keyword list.
///
/// Per keyword: +10 for each of title/heading/meta that contains it, one
/// suggestion for each that does not. The no-missing-alt bonus is a flat +10
/// applied once, regardless of keyword count. Score is clamped to [0, 100]
/// and the suggestion list is never empty.
pub fn score_signals(signals: &PageSignals, keywords: &[String]) -> (u32, Vec<String>) {
    let title = signals.title.to_lowercase();
    let heading = signals.first_heading.to_lowercase();
    let meta = signals.meta_description.to_lowercase();

    let mut score: u32 = 0;
    let mut suggestions: Vec<String> = Vec::new();

    for keyword in keywords {
        let needle = keyword.to_lowercase();
        let in_title = title.contains(&needle);
        let in_heading = heading.contains(&needle);
        let in_meta = meta.contains(&needle);

        if !in_title {
            suggestions.push(format!("Add \"{}\" to the title tag.", keyword));
        }
        if !in_heading {
            suggestions.push(format!("Include \"{}\" in the H1 tag.", keyword));
        }
        if !in_meta {
            suggestions.push(format!("Use \"{}\" in the meta description.", keyword));
        }

        for matched in [in_title, in_heading, in_meta] {
            if matched {
                score += POINTS_PER_MATCH;
            }
        }
    }

    if signals.images_missing_alt > 0 {
        suggestions.push(format!(
            "{} image(s) missing alt tags.",
            signals.images_missing_alt
        ));
    } else {
        score += POINTS_PER_MATCH;
    }

    if suggestions.is_empty() {
        suggestions.push(NO_ISSUES_MESSAGE.to_string());
    }

    (score.min(MAX_SCORE), suggestions)
}

/// Assemble the report for one audited URL.
pub fn build_report(url: String, keywords: Vec<String>, signals: &PageSignals) -> AuditReport {
    let (score, suggestions) = score_signals(signals, &keywords);
    AuditReport {
        url,
        keywords,
        score,
        suggestions,
    }
}
