use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a paper within the literature database
///
/// For PubMed this is the PMID. No numeric validation is applied; the
/// identifier is only trimmed and compared for identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaperId(String);

impl PaperId {
    /// Returns `None` for empty or whitespace-only input
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PaperId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An author as listed on a paper, with raw affiliation strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name ("ForeName LastName" or the collective name)
    pub name: String,
    /// Raw affiliation strings in source order; may be empty
    pub affiliations: Vec<String>,
    /// Email address found in the affiliation text
    pub email: Option<String>,
}

impl Author {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            affiliations: Vec::new(),
            email: None,
        }
    }

    pub fn with_affiliation<S: Into<String>>(mut self, affiliation: S) -> Self {
        self.affiliations.push(affiliation.into());
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    /// All affiliation strings joined with `"; "`, or `None` when there are none
    pub fn affiliation_text(&self) -> Option<String> {
        if self.affiliations.is_empty() {
            None
        } else {
            Some(self.affiliations.join("; "))
        }
    }
}

/// Per-paper metadata produced by the fetcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub id: PaperId,
    pub title: String,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`, or the free-text MedlineDate
    pub publication_date: Option<String>,
    pub authors: Vec<Author>,
}
