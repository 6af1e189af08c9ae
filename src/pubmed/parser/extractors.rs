//! Small text extraction helpers shared by the parser and the classifier

use std::sync::OnceLock;

use regex::Regex;

pub(crate) fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)+")
            .expect("email pattern is valid")
    })
}

/// First email address appearing in `text`, without trailing punctuation
pub fn extract_email(text: &str) -> Option<String> {
    email_regex()
        .find(text)
        .map(|m| m.as_str().trim_end_matches(&['.', '-'][..]).to_string())
}

/// Display name built from PubMed name parts
///
/// Returns `None` when no usable part is present.
pub(crate) fn format_author_name(
    last_name: Option<&str>,
    fore_name: Option<&str>,
    initials: Option<&str>,
    collective_name: Option<&str>,
) -> Option<String> {
    match (fore_name, last_name) {
        (Some(fore), Some(last)) => Some(format!("{} {}", fore, last)),
        (None, Some(last)) => Some(match initials {
            Some(init) => format!("{} {}", init, last),
            None => last.to_string(),
        }),
        (Some(fore), None) => Some(fore.to_string()),
        (None, None) => collective_name.map(str::to_string),
    }
}

/// Two-digit month from a PubMed month value ("Mar", "March", "3", "03")
pub(crate) fn normalize_month(month: &str) -> Option<String> {
    let month = month.trim();
    if let Ok(n) = month.parse::<u32>() {
        return (1..=12).contains(&n).then(|| format!("{:02}", n));
    }

    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let prefix: String = month.chars().take(3).collect::<String>().to_lowercase();
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .map(|i| format!("{:02}", i + 1))
}

/// Publication date as `YYYY`, `YYYY-MM` or `YYYY-MM-DD`, falling back to MedlineDate
pub(crate) fn format_publication_date(
    year: Option<&str>,
    month: Option<&str>,
    day: Option<&str>,
    medline_date: Option<&str>,
) -> Option<String> {
    let Some(year) = year.map(str::trim).filter(|y| !y.is_empty()) else {
        return medline_date
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
    };

    let mut date = year.to_string();
    if let Some(month) = month.and_then(normalize_month) {
        date.push('-');
        date.push_str(&month);

        if let Some(day) = day.and_then(|d| d.trim().parse::<u32>().ok()) {
            if (1..=31).contains(&day) {
                date.push_str(&format!("-{:02}", day));
            }
        }
    }
    Some(date)
}

/// Slices of `xml` covering each `<name ...>...</name>` element, in order
///
/// Only exact element names match, so `PubmedArticle` does not match
/// `PubmedArticleSet`.
pub(crate) fn split_elements<'a>(xml: &'a str, name: &str) -> Vec<&'a str> {
    let open = format!("<{}", name);
    let close = format!("</{}>", name);
    let mut elements = Vec::new();
    let mut pos = 0;

    while let Some(found) = xml[pos..].find(&open) {
        let start = pos + found;
        let after = start + open.len();
        let boundary = xml[after..].chars().next();

        if !matches!(boundary, Some(c) if c == '>' || c.is_whitespace()) {
            pos = after;
            continue;
        }

        match xml[after..].find(&close) {
            Some(end) => {
                let end = after + end + close.len();
                elements.push(&xml[start..end]);
                pos = end;
            }
            None => {
                // Unterminated trailing element
                elements.push(&xml[start..]);
                break;
            }
        }
    }

    elements
}

/// Message of an E-utilities `<ERROR>` payload, if the document is one
pub(crate) fn service_error(xml: &str) -> Option<String> {
    let start = xml.find("<ERROR>")? + "<ERROR>".len();
    let end = xml[start..].find("</ERROR>")? + start;
    Some(xml[start..end].trim().to_string())
}
