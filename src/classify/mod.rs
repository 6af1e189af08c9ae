//! Affiliation classification: which authors of a paper work for a company
//!
//! Each affiliation string goes through the keyword [`RuleSet`] first. Only
//! affiliations the rules leave undecided are sent to the
//! [`AffiliationOracle`]; an oracle failure counts as non-company.

pub mod extract;
pub mod oracle;
pub mod rules;

use tracing::{debug, instrument};

use crate::pubmed::models::{Author, PaperRecord};

pub use oracle::{
    from_config as oracle_from_config, AffiliationOracle, NoOracle, OllamaOracle, OracleVerdict,
};
pub use rules::{normalize_affiliation, Indicator, Matcher, RuleOutcome, RuleSet, TextForm};

/// Keep/discard decision for a paper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Discard,
}

/// An author with at least one company affiliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyAuthor {
    pub author: Author,
    /// Company names from this author's company affiliations, first-seen order
    pub companies: Vec<String>,
}

impl CompanyAuthor {
    pub fn company_name(&self) -> Option<&str> {
        self.companies.first().map(String::as_str)
    }
}

/// A paper together with its company-affiliated authors
///
/// The verdict is `Keep` exactly when there is at least one company author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedPaper {
    record: PaperRecord,
    company_authors: Vec<CompanyAuthor>,
    verdict: Verdict,
    fallback_email: Option<String>,
}

impl ClassifiedPaper {
    pub fn new(record: PaperRecord, company_authors: Vec<CompanyAuthor>) -> Self {
        let verdict = if company_authors.is_empty() {
            Verdict::Discard
        } else {
            Verdict::Keep
        };
        Self {
            record,
            company_authors,
            verdict,
            fallback_email: None,
        }
    }

    /// Email used when no company author has one
    ///
    /// Callers pass only addresses of authors with no academic affiliation.
    pub fn with_fallback_email(mut self, email: Option<String>) -> Self {
        self.fallback_email = email;
        self
    }

    pub fn record(&self) -> &PaperRecord {
        &self.record
    }

    /// Company-affiliated authors in the record's author order
    pub fn company_authors(&self) -> &[CompanyAuthor] {
        &self.company_authors
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn is_kept(&self) -> bool {
        self.verdict == Verdict::Keep
    }

    /// Distinct company names across all company authors
    pub fn company_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for name in self.company_authors.iter().flat_map(|a| a.companies.iter()) {
            extract::push_unique(&mut names, name.clone());
        }
        names
    }

    /// First email of a company author, else the fallback email
    pub fn corresponding_email(&self) -> Option<&str> {
        self.company_authors
            .iter()
            .find_map(|a| a.author.email.as_deref())
            .or(self.fallback_email.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AffiliationKind {
    Academic,
    Company,
    Other,
}

/// Classifies the authors of fetched papers
pub struct AffiliationClassifier {
    rules: RuleSet,
    oracle: Box<dyn AffiliationOracle>,
}

impl AffiliationClassifier {
    pub fn new(rules: RuleSet, oracle: Box<dyn AffiliationOracle>) -> Self {
        Self { rules, oracle }
    }

    /// Default keyword rules with the given oracle
    pub fn with_oracle(oracle: Box<dyn AffiliationOracle>) -> Self {
        Self::new(RuleSet::default(), oracle)
    }

    /// Whether a single affiliation string is a company affiliation
    pub async fn is_company_affiliation(&self, affiliation: &str) -> bool {
        self.affiliation_kind(affiliation).await == AffiliationKind::Company
    }

    async fn affiliation_kind(&self, affiliation: &str) -> AffiliationKind {
        if affiliation.trim().is_empty() {
            return AffiliationKind::Other;
        }

        match self.rules.evaluate(affiliation) {
            RuleOutcome::Academic(label) => {
                debug!(affiliation, label = %label, "Academic affiliation");
                AffiliationKind::Academic
            }
            RuleOutcome::Company(label) => {
                debug!(affiliation, label = %label, "Company affiliation");
                AffiliationKind::Company
            }
            RuleOutcome::Ambiguous => match self.oracle.classify(affiliation).await {
                Ok(OracleVerdict::Company) => AffiliationKind::Company,
                Ok(_) => AffiliationKind::Other,
                Err(e) => {
                    debug!(
                        affiliation,
                        oracle = self.oracle.name(),
                        error = %e,
                        "Oracle failed, treating affiliation as non-company"
                    );
                    AffiliationKind::Other
                }
            },
        }
    }

    /// Classify every author of `record`
    #[instrument(skip(self, record), fields(pmid = %record.id))]
    pub async fn classify(&self, record: PaperRecord) -> ClassifiedPaper {
        let mut company_authors = Vec::new();
        let mut fallback_email = None;

        for author in &record.authors {
            let mut companies = Vec::new();
            let mut is_company = false;
            let mut is_academic = false;

            for affiliation in &author.affiliations {
                match self.affiliation_kind(affiliation).await {
                    AffiliationKind::Company => {
                        is_company = true;
                        if let Some(name) = extract::company_name(&self.rules, affiliation) {
                            extract::push_unique(&mut companies, name);
                        }
                    }
                    AffiliationKind::Academic => is_academic = true,
                    AffiliationKind::Other => {}
                }
            }

            if is_company {
                company_authors.push(CompanyAuthor {
                    author: author.clone(),
                    companies,
                });
            } else if !is_academic && fallback_email.is_none() {
                fallback_email = author.email.clone();
            }
        }

        let paper =
            ClassifiedPaper::new(record, company_authors).with_fallback_email(fallback_email);
        debug!(
            company_authors = paper.company_authors.len(),
            verdict = ?paper.verdict,
            "Classified paper"
        );
        paper
    }

    /// Classify papers one after another, keeping their order
    pub async fn classify_all(&self, records: Vec<PaperRecord>) -> Vec<ClassifiedPaper> {
        let mut papers = Vec::with_capacity(records.len());
        for record in records {
            papers.push(self.classify(record).await);
        }
        papers
    }
}
