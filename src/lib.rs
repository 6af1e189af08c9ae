//! # get-papers-list
//!
//! Finds PubMed papers with at least one author affiliated with a
//! pharmaceutical or biotech company.
//!
//! A run is a straight pipeline:
//!
//! 1. [`PubMedClient::search_articles`] turns a query into PubMed IDs (ESearch)
//! 2. [`PubMedClient::fetch_articles`] fetches metadata in batches (EFetch)
//! 3. [`AffiliationClassifier`] decides which authors are company-affiliated
//! 4. [`export::serialize`] writes kept papers as CSV or prints them
//!
//! ## Quick Start
//!
//! ```no_run
//! use get_papers_list::{export, ClientConfig, NoOracle, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new().with_email("researcher@example.com");
//!     let pipeline = Pipeline::new(config, Box::new(NoOracle));
//!
//!     let papers = pipeline.run("machine learning brain", 10).await?;
//!     export::serialize(&papers, Some(std::path::Path::new("results.csv")))?;
//!     Ok(())
//! }
//! ```
//!
//! ## Classification
//!
//! Affiliations are matched against academic and company keyword rules;
//! academic indicators win when both are present. Affiliations matching
//! neither can be sent to an optional [`AffiliationOracle`] (an Ollama chat
//! endpoint); without one, or when it fails, they count as non-company.

pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod pubmed;
pub mod rate_limit;

pub use classify::{
    AffiliationClassifier, AffiliationOracle, ClassifiedPaper, CompanyAuthor, NoOracle,
    OllamaOracle, OracleVerdict, RuleSet, Verdict,
};
pub use config::{ClientConfig, OracleConfig};
pub use error::{PapersError, Result};
pub use export::ResultRow;
pub use pipeline::Pipeline;
pub use pubmed::{Author, PaperId, PaperRecord, PubMedClient};
pub use rate_limit::RateLimiter;
