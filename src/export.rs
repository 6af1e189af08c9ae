//! Output of kept papers as CSV or as a readable listing

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classify::ClassifiedPaper;
use crate::error::{PapersError, Result};

/// Placeholder for a missing value
pub const ABSENT: &str = "N/A";

/// Separator for list-valued columns
pub const LIST_SEPARATOR: &str = "; ";

pub const CSV_HEADERS: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// One output row; list columns are already joined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "PubmedID")]
    pub pubmed_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Publication Date")]
    pub publication_date: String,
    #[serde(rename = "Non-academic Author(s)")]
    pub company_authors: String,
    #[serde(rename = "Company Affiliation(s)")]
    pub company_names: String,
    #[serde(rename = "Corresponding Author Email")]
    pub corresponding_email: String,
}

impl ResultRow {
    pub fn from_paper(paper: &ClassifiedPaper) -> Self {
        let record = paper.record();
        let authors: Vec<&str> = paper
            .company_authors()
            .iter()
            .map(|a| a.author.name.as_str())
            .collect();

        Self {
            pubmed_id: record.id.to_string(),
            title: record.title.clone(),
            publication_date: or_absent(record.publication_date.as_deref()),
            company_authors: join_or_absent(&authors),
            company_names: join_or_absent(&paper.company_names()),
            corresponding_email: or_absent(paper.corresponding_email()),
        }
    }

    /// Company author names split back out of the joined column
    pub fn author_names(&self) -> Vec<&str> {
        split_list(&self.company_authors)
    }

    pub fn company_list(&self) -> Vec<&str> {
        split_list(&self.company_names)
    }

    fn as_record(&self) -> [&str; 6] {
        [
            &self.pubmed_id,
            &self.title,
            &self.publication_date,
            &self.company_authors,
            &self.company_names,
            &self.corresponding_email,
        ]
    }
}

fn or_absent(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(ABSENT)
        .to_string()
}

fn join_or_absent<S: AsRef<str>>(values: &[S]) -> String {
    if values.is_empty() {
        ABSENT.to_string()
    } else {
        values
            .iter()
            .map(|v| v.as_ref())
            .collect::<Vec<&str>>()
            .join(LIST_SEPARATOR)
    }
}

fn split_list(joined: &str) -> Vec<&str> {
    if joined == ABSENT {
        return Vec::new();
    }
    joined
        .split(LIST_SEPARATOR.trim())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Rows for the kept papers, in input order
pub fn to_rows(papers: &[ClassifiedPaper]) -> Vec<ResultRow> {
    papers
        .iter()
        .filter(|p| p.is_kept())
        .map(ResultRow::from_paper)
        .collect()
}

/// Write a header row and one row per kept paper
pub fn write_csv<W: Write>(papers: &[ClassifiedPaper], writer: W) -> Result<usize> {
    let rows = to_rows(papers);
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(CSV_HEADERS)?;
    for row in &rows {
        wtr.write_record(row.as_record())?;
    }
    wtr.flush().map_err(csv::Error::from)?;

    Ok(rows.len())
}

/// Human-readable listing of the kept papers
pub fn render_text(papers: &[ClassifiedPaper]) -> String {
    let rows = to_rows(papers);
    if rows.is_empty() {
        return "No results found.\n".to_string();
    }

    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        out.push_str(&format!("[{}] PubmedID: {}\n", i + 1, row.pubmed_id));
        out.push_str(&format!("    Title: {}\n", row.title));
        out.push_str(&format!("    Publication Date: {}\n", row.publication_date));
        out.push_str(&format!("    Non-academic Author(s): {}\n", row.company_authors));
        out.push_str(&format!("    Company Affiliation(s): {}\n", row.company_names));
        out.push_str(&format!(
            "    Corresponding Author Email: {}\n\n",
            row.corresponding_email
        ));
    }
    out.push_str(&format!("{} paper(s) with company-affiliated authors\n", rows.len()));
    out
}

/// Write kept papers as CSV to `destination`, or as a listing to stdout
///
/// The file is created or truncated. Failing to open or write it is an
/// [`PapersError::OutputError`].
pub fn serialize(papers: &[ClassifiedPaper], destination: Option<&Path>) -> Result<()> {
    match destination {
        Some(path) => {
            let mut buffer = Vec::new();
            let written = write_csv(papers, &mut buffer)?;

            fs::write(path, buffer).map_err(|source| PapersError::OutputError {
                path: path.to_path_buf(),
                source,
            })?;

            info!(path = %path.display(), rows = written, "Wrote CSV results");
            Ok(())
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(render_text(papers).as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|source| PapersError::OutputError {
                    path: PathBuf::from("<stdout>"),
                    source,
                })
        }
    }
}
