//! PubMed EFetch XML parser
//!
//! An EFetch response is a `<PubmedArticleSet>` holding one `<PubmedArticle>`
//! per requested PMID. Each article element is parsed on its own with a
//! streaming reader, so a malformed or incomplete element only drops that
//! record; the rest of the batch is still returned.
//!
//! # Module Organization
//!
//! - `preprocessing` - removal of inline formatting tags
//! - `extractors` - email, name, date and element-splitting helpers

mod extractors;
mod preprocessing;

pub use extractors::extract_email;
pub(crate) use extractors::{email_regex, service_error};

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, instrument};

use crate::error::{PapersError, Result};
use crate::pubmed::models::{Author, PaperId, PaperRecord};
use extractors::{format_author_name, format_publication_date, split_elements};
use preprocessing::strip_inline_tags;

/// A record that was present in the response but could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSkip {
    /// PMID, when it could be read before the failure
    pub pmid: Option<String>,
    pub reason: String,
}

impl RecordSkip {
    fn new(pmid: Option<&str>, reason: impl Into<String>) -> Self {
        Self {
            pmid: pmid.map(str::to_string),
            reason: reason.into(),
        }
    }
}

/// Outcome of parsing one EFetch document
#[derive(Debug, Default)]
pub struct ParsedBatch {
    /// Usable records in document order
    pub records: Vec<PaperRecord>,
    /// Records that were dropped, with the reason
    pub skipped: Vec<RecordSkip>,
}

/// Parse every `<PubmedArticle>` of an EFetch response
///
/// # Errors
///
/// Returns `PapersError::XmlError` if the document is not a
/// `PubmedArticleSet` at all. Problems inside a single article never fail
/// the call; they are reported in [`ParsedBatch::skipped`].
///
/// # Example
///
/// ```
/// use get_papers_list::pubmed::parse_articles_from_xml;
///
/// let xml = r#"<PubmedArticleSet>
///   <PubmedArticle><MedlineCitation>
///     <PMID>1</PMID>
///     <Article><ArticleTitle>Example</ArticleTitle></Article>
///   </MedlineCitation></PubmedArticle>
/// </PubmedArticleSet>"#;
///
/// let batch = parse_articles_from_xml(xml).unwrap();
/// assert_eq!(batch.records[0].title, "Example");
/// ```
#[instrument(skip(xml), fields(xml_size = xml.len()))]
pub fn parse_articles_from_xml(xml: &str) -> Result<ParsedBatch> {
    if xml.trim().is_empty() {
        return Ok(ParsedBatch::default());
    }

    if !xml.contains("<PubmedArticleSet") {
        return Err(PapersError::XmlError(
            "response is not a PubmedArticleSet document".to_string(),
        ));
    }

    let cleaned = strip_inline_tags(xml);
    let mut batch = ParsedBatch::default();

    for element in split_elements(&cleaned, "PubmedArticle") {
        match parse_article(element) {
            Ok(record) => batch.records.push(record),
            Err(skip) => {
                debug!(
                    pmid = skip.pmid.as_deref().unwrap_or("unknown"),
                    reason = %skip.reason,
                    "Dropping malformed record"
                );
                batch.skipped.push(skip);
            }
        }
    }

    Ok(batch)
}

#[derive(Default)]
struct AuthorFields {
    last_name: String,
    fore_name: String,
    initials: String,
    collective_name: String,
    affiliations: Vec<String>,
}

impl AuthorFields {
    fn into_author(self) -> Option<Author> {
        let non_empty = |s: &str| Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_owned);
        let name = format_author_name(
            non_empty(&self.last_name).as_deref(),
            non_empty(&self.fore_name).as_deref(),
            non_empty(&self.initials).as_deref(),
            non_empty(&self.collective_name).as_deref(),
        )?;
        let email = self.affiliations.iter().find_map(|a| extract_email(a));

        Some(Author {
            name,
            affiliations: self.affiliations,
            email,
        })
    }
}

#[derive(Default)]
struct ArticleFields {
    pmid: Option<String>,
    has_article: bool,
    title: String,
    year: String,
    month: String,
    day: String,
    medline_date: String,
    authors: Vec<Author>,
}

fn ends_with(path: &[String], suffix: &[&str]) -> bool {
    path.len() >= suffix.len()
        && path[path.len() - suffix.len()..]
            .iter()
            .zip(suffix)
            .all(|(a, b)| a == b)
}

fn parse_article(element: &str) -> std::result::Result<PaperRecord, RecordSkip> {
    let mut reader = Reader::from_str(element);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut fields = ArticleFields::default();
    let mut author = AuthorFields::default();
    let mut affiliation = String::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            RecordSkip::new(fields.pmid.as_deref(), format!("XML error: {}", e))
        })?;

        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match name.as_str() {
                    "Article" if ends_with(&path, &["MedlineCitation"]) => {
                        fields.has_article = true;
                    }
                    "Author" if ends_with(&path, &["AuthorList"]) => {
                        author = AuthorFields::default();
                    }
                    "Affiliation" => affiliation.clear(),
                    _ => {}
                }
                path.push(name);
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map(|c| c.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&t).into_owned());
                capture_text(&path, &text, &mut fields, &mut author, &mut affiliation);
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                capture_text(&path, &text, &mut fields, &mut author, &mut affiliation);
            }
            Event::End(_) => {
                let closed = path.pop();
                match closed.as_deref() {
                    Some("Author") if ends_with(&path, &["AuthorList"]) => {
                        if let Some(a) = std::mem::take(&mut author).into_author() {
                            fields.authors.push(a);
                        }
                    }
                    Some("Affiliation") if ends_with(&path, &["Author", "AffiliationInfo"]) => {
                        let text = affiliation.trim();
                        if !text.is_empty() {
                            author.affiliations.push(text.to_string());
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let Some(pmid) = fields.pmid.as_deref().and_then(PaperId::parse) else {
        return Err(RecordSkip::new(None, "missing PMID"));
    };

    if !fields.has_article {
        return Err(RecordSkip::new(Some(pmid.as_str()), "missing Article element"));
    }

    let title = fields.title.trim();
    if title.is_empty() {
        return Err(RecordSkip::new(Some(pmid.as_str()), "missing ArticleTitle"));
    }

    let publication_date = format_publication_date(
        non_blank(&fields.year),
        non_blank(&fields.month),
        non_blank(&fields.day),
        non_blank(&fields.medline_date),
    );

    Ok(PaperRecord {
        title: title.to_string(),
        id: pmid,
        publication_date,
        authors: fields.authors,
    })
}

fn non_blank(s: &str) -> Option<&str> {
    Some(s).filter(|s| !s.trim().is_empty())
}

fn capture_text(
    path: &[String],
    text: &str,
    fields: &mut ArticleFields,
    author: &mut AuthorFields,
    affiliation: &mut String,
) {
    if ends_with(path, &["MedlineCitation", "PMID"]) {
        if fields.pmid.is_none() {
            fields.pmid = Some(text.trim().to_string());
        }
    } else if ends_with(path, &["MedlineCitation", "Article", "ArticleTitle"]) {
        fields.title.push_str(text);
    } else if ends_with(path, &["JournalIssue", "PubDate", "Year"]) {
        fields.year.push_str(text);
    } else if ends_with(path, &["JournalIssue", "PubDate", "Month"]) {
        fields.month.push_str(text);
    } else if ends_with(path, &["JournalIssue", "PubDate", "Day"]) {
        fields.day.push_str(text);
    } else if ends_with(path, &["JournalIssue", "PubDate", "MedlineDate"]) {
        fields.medline_date.push_str(text);
    } else if ends_with(path, &["AuthorList", "Author", "LastName"]) {
        author.last_name.push_str(text);
    } else if ends_with(path, &["AuthorList", "Author", "ForeName"]) {
        author.fore_name.push_str(text);
    } else if ends_with(path, &["AuthorList", "Author", "Initials"]) {
        author.initials.push_str(text);
    } else if ends_with(path, &["AuthorList", "Author", "CollectiveName"]) {
        author.collective_name.push_str(text);
    } else if ends_with(path, &["Author", "AffiliationInfo", "Affiliation"]) {
        if !affiliation.is_empty() {
            affiliation.push(' ');
        }
        affiliation.push_str(text);
    }
}
