//! PubMed client for searching and fetching paper metadata
//!
//! - `client` - ESearch (query to PMIDs) and batched EFetch (PMIDs to records)
//! - `parser` - EFetch XML to [`PaperRecord`]
//! - `models` - identifiers, authors and records
//! - `responses` - ESearch JSON payload

pub mod client;
pub mod models;
pub mod parser;
pub(crate) mod responses;

pub use client::PubMedClient;
pub use models::{Author, PaperId, PaperRecord};
pub use parser::{extract_email, parse_articles_from_xml, ParsedBatch, RecordSkip};
