//! Best-effort company names from affiliation text

use super::rules::{strip_emails, RuleSet};

/// Company name for a company-classified affiliation
///
/// The affiliation is split on commas and semicolons; the first segment with
/// a company indicator wins, otherwise the first non-empty segment.
pub fn company_name(rules: &RuleSet, affiliation: &str) -> Option<String> {
    let text = strip_emails(affiliation);
    let segments: Vec<&str> = text
        .split([',', ';'])
        .map(clean_segment)
        .filter(|s| !s.is_empty())
        .collect();

    segments
        .iter()
        .find(|s| rules.has_company_indicator(s))
        .or_else(|| segments.first())
        .map(|s| s.to_string())
}

fn clean_segment(segment: &str) -> &str {
    segment
        .trim()
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim_end_matches(|c: char| c.is_whitespace() || c == '.' || c == ':')
}

/// Append `name` unless an equal name (ignoring case) is already present
pub(crate) fn push_unique(names: &mut Vec<String>, name: String) {
    if !names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
        names.push(name);
    }
}
