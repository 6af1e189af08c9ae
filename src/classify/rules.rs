//! Tagged keyword matchers for affiliation strings
//!
//! A [`RuleSet`] is an ordered list of [`Matcher`]s. Academic matchers always
//! come before company matchers, so an affiliation that carries both kinds of
//! indicator is academic.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::pubmed::parser::email_regex;

/// What a matching keyword says about an affiliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Indicator {
    Academic,
    Company,
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Indicator::Academic => write!(f, "academic"),
            Indicator::Company => write!(f, "company"),
        }
    }
}

/// Which rendering of an affiliation a pattern runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextForm {
    /// [`normalize_affiliation`] output: lower-case words separated by single
    /// spaces, no punctuation
    Normalized,
    /// Lower-cased text with punctuation kept, for dotted legal suffixes
    Punctuated,
}

/// A keyword pattern tagged with the indicator it signals
#[derive(Debug, Clone)]
pub struct Matcher {
    indicator: Indicator,
    label: String,
    form: TextForm,
    pattern: Regex,
}

impl Matcher {
    /// Matcher over [`normalize_affiliation`] output
    pub fn new(
        indicator: Indicator,
        label: impl Into<String>,
        pattern: &str,
    ) -> std::result::Result<Self, regex::Error> {
        Self::with_form(indicator, label, TextForm::Normalized, pattern)
    }

    pub fn with_form(
        indicator: Indicator,
        label: impl Into<String>,
        form: TextForm,
        pattern: &str,
    ) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            indicator,
            label: label.into(),
            form,
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn indicator(&self) -> Indicator {
        self.indicator
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn form(&self) -> TextForm {
        self.form
    }

    fn is_match(&self, text: &PreparedText) -> bool {
        match self.form {
            TextForm::Normalized => self.pattern.is_match(&text.normalized),
            TextForm::Punctuated => self.pattern.is_match(&text.punctuated),
        }
    }
}

/// An affiliation with emails removed, in both matcher renderings
struct PreparedText {
    punctuated: String,
    normalized: String,
}

impl PreparedText {
    fn new(affiliation: &str) -> Self {
        let punctuated = strip_emails(affiliation).to_lowercase();
        let normalized = normalize_affiliation(&punctuated);
        Self {
            punctuated,
            normalized,
        }
    }
}

/// Result of running the rule set over one affiliation string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// Matched an academic indicator (label of the first match)
    Academic(String),
    /// Matched a company indicator and no academic one
    Company(String),
    /// Nothing matched
    Ambiguous,
}

const ACADEMIC_RULES: &[(&str, &str)] = &[
    ("university", r"\buniversit"),
    ("college", r"\bcolleges?\b"),
    ("institute", r"\binstitut"),
    ("academy", r"\bacadem"),
    ("school", r"\bschools?\b"),
    ("faculty", r"\bfacult"),
    ("hospital", r"\bhospital"),
    ("medical center", r"\bmedical cent(?:er|re)\b"),
    ("professor", r"\bprofessor"),
    ("phd", r"\bph ?d\b"),
];

const COMPANY_RULES: &[(&str, &str)] = &[
    ("pharma", r"\b(?:bio)?pharma"),
    ("biotech", r"\bbiotech"),
    ("therapeutics", r"\btherapeutics\b"),
    ("biosciences", r"\bbiosciences?\b"),
    ("biologics", r"\bbiologics\b"),
    ("vaccines", r"\bvaccines?\b"),
    ("diagnostics", r"\bdiagnostics\b"),
    ("genomics", r"\bgenomics\b"),
    ("inc", r"\binc\b|\bincorporated\b"),
    ("ltd", r"\bltd\b|\blimited\b"),
    ("llc", r"\bllc\b"),
    ("corp", r"\bcorp(?:oration)?\b"),
    ("gmbh", r"\bgmbh\b"),
    ("plc", r"\bplc\b"),
];

// Dotted suffixes must follow a name word with no comma in between and end
// the segment, so "MN, U.S.A." and "Cape Town, S.A." do not match.
const COMPANY_SUFFIX_RULES: &[(&str, &str)] = &[
    ("s.a.", r"\w{2,}\s+s\.\s?(?:p\.\s?)?a\.?\s*(?:[,;)]|$)"),
    ("k.k.", r"\w{2,}\s+k\.\s?k\.?\s*(?:[,;)]|$)"),
];

/// Ordered academic-then-company matchers
#[derive(Debug, Clone)]
pub struct RuleSet {
    matchers: Vec<Matcher>,
}

impl RuleSet {
    /// Build a rule set from arbitrary matchers
    ///
    /// Matchers are stably reordered so every academic matcher precedes every
    /// company matcher; relative order within each group is kept.
    pub fn new(mut matchers: Vec<Matcher>) -> Self {
        matchers.sort_by_key(Matcher::indicator);
        Self { matchers }
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    /// First matcher (in precedence order) that matches `affiliation`
    pub fn first_match(&self, affiliation: &str) -> Option<&Matcher> {
        let text = PreparedText::new(affiliation);
        if text.normalized.is_empty() {
            return None;
        }
        self.matchers.iter().find(|m| m.is_match(&text))
    }

    /// Whether `text` contains any company indicator, ignoring academic ones
    pub fn has_company_indicator(&self, text: &str) -> bool {
        let text = PreparedText::new(text);
        self.matchers
            .iter()
            .filter(|m| m.indicator == Indicator::Company)
            .any(|m| m.is_match(&text))
    }

    /// Classify one affiliation string
    ///
    /// An academic email domain counts as an academic indicator. Email
    /// addresses are otherwise removed before keyword matching.
    pub fn evaluate(&self, affiliation: &str) -> RuleOutcome {
        if has_academic_email(affiliation) {
            return RuleOutcome::Academic("academic email domain".to_string());
        }

        match self.first_match(affiliation) {
            Some(m) if m.indicator == Indicator::Academic => RuleOutcome::Academic(m.label.clone()),
            Some(m) => RuleOutcome::Company(m.label.clone()),
            None => RuleOutcome::Ambiguous,
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        let build = |indicator, form, rules: &[(&str, &str)]| -> Vec<Matcher> {
            rules
                .iter()
                .map(|(label, pattern)| {
                    Matcher::with_form(indicator, *label, form, pattern)
                        .expect("built-in pattern is valid")
                })
                .collect()
        };

        let mut matchers = build(Indicator::Academic, TextForm::Normalized, ACADEMIC_RULES);
        matchers.extend(build(Indicator::Company, TextForm::Normalized, COMPANY_RULES));
        matchers.extend(build(
            Indicator::Company,
            TextForm::Punctuated,
            COMPANY_SUFFIX_RULES,
        ));
        Self::new(matchers)
    }
}

/// Lower-case `text`, replace punctuation with spaces and collapse whitespace
pub fn normalize_affiliation(text: &str) -> String {
    let spaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn strip_emails(text: &str) -> String {
    email_regex().replace_all(text, " ").into_owned()
}

fn academic_domain_regex() -> &'static Regex {
    static DOMAIN: OnceLock<Regex> = OnceLock::new();
    DOMAIN.get_or_init(|| {
        Regex::new(r"(?:\.edu(?:\.[a-z]{2})?|\.ac\.[a-z]{2})$").expect("domain pattern is valid")
    })
}

fn has_academic_email(text: &str) -> bool {
    email_regex().find_iter(text).any(|m| {
        let address = m.as_str().trim_end_matches(&['.', '-'][..]).to_lowercase();
        address
            .rsplit_once('@')
            .map(|(_, domain)| academic_domain_regex().is_match(domain))
            .unwrap_or(false)
    })
}
