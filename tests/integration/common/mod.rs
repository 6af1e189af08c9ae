//! Shared fixtures for the mocked integration tests
#![allow(dead_code)]

use get_papers_list::{ClientConfig, PaperId, PubMedClient};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Author fixture: (last name, fore name, affiliations)
pub type AuthorFixture<'a> = (&'a str, &'a str, &'a [&'a str]);

/// One `<PubmedArticle>` element
pub fn article_xml(pmid: &str, title: &str, authors: &[AuthorFixture<'_>]) -> String {
    let mut author_xml = String::new();
    for (last, fore, affiliations) in authors {
        author_xml.push_str("<Author ValidYN=\"Y\">");
        author_xml.push_str(&format!("<LastName>{}</LastName><ForeName>{}</ForeName>", last, fore));
        for affiliation in affiliations.iter() {
            author_xml.push_str(&format!(
                "<AffiliationInfo><Affiliation>{}</Affiliation></AffiliationInfo>",
                affiliation
            ));
        }
        author_xml.push_str("</Author>");
    }

    format!(
        r#"<PubmedArticle>
    <MedlineCitation Status="MEDLINE" Owner="NLM">
        <PMID Version="1">{pmid}</PMID>
        <Article PubModel="Print">
            <Journal>
                <JournalIssue CitedMedium="Internet">
                    <PubDate><Year>2024</Year><Month>Mar</Month><Day>7</Day></PubDate>
                </JournalIssue>
                <Title>Test Journal</Title>
            </Journal>
            <ArticleTitle>{title}</ArticleTitle>
            <AuthorList CompleteYN="Y">{author_xml}</AuthorList>
        </Article>
    </MedlineCitation>
</PubmedArticle>"#
    )
}

/// A `<PubmedArticleSet>` document wrapping the given elements
pub fn article_set(articles: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" ?>\n<!DOCTYPE PubmedArticleSet PUBLIC \"-//NLM//DTD PubMedArticle, 1st January 2024//EN\" \"https://dtd.nlm.nih.gov/ncbi/pubmed/out/pubmed_240101.dtd\">\n<PubmedArticleSet>\n{}\n</PubmedArticleSet>",
        articles.join("\n")
    )
}

/// Simple article with one author per affiliation
pub fn simple_article(pmid: &str, affiliation: &str) -> String {
    let affiliations: &[&str] = &[affiliation];
    article_xml(
        pmid,
        &format!("Paper {}", pmid),
        &[("Author", pmid, affiliations)],
    )
}

pub fn esearch_json(ids: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "header": {"type": "esearch", "version": "0.3"},
        "esearchresult": {
            "count": ids.len().to_string(),
            "retmax": ids.len().to_string(),
            "retstart": "0",
            "idlist": ids,
            "querytranslation": "test"
        }
    })
}

pub fn ids(raw: &[&str]) -> Vec<PaperId> {
    raw.iter().map(|id| PaperId::parse(id).unwrap()).collect()
}

/// Client pointing at a mock server
pub fn create_mock_client(mock_server: &MockServer) -> PubMedClient {
    PubMedClient::with_config(mock_config(mock_server))
}

pub fn mock_config(mock_server: &MockServer) -> ClientConfig {
    ClientConfig::new()
        .with_base_url(mock_server.uri())
        .with_rate_limit(100.0) // High rate limit for tests
}

pub async fn mount_esearch(mock_server: &MockServer, ids: &[&str]) {
    Mock::given(method("GET"))
        .and(path_regex(r"/esearch\.fcgi.*"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(esearch_json(ids))
                .insert_header("content-type", "application/json"),
        )
        .mount(mock_server)
        .await;
}

/// EFetch responder that answers with the requested ids in reverse order,
/// using `affiliation_for` to pick each article's single affiliation
pub struct ReversedEFetch {
    pub affiliation_for: fn(&str) -> &'static str,
}

impl Respond for ReversedEFetch {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let requested: Vec<String> = request
            .url
            .query_pairs()
            .find(|(key, _)| key == "id")
            .map(|(_, value)| value.split(',').map(str::to_string).collect())
            .unwrap_or_default();

        let articles: Vec<String> = requested
            .iter()
            .rev()
            .map(|pmid| simple_article(pmid, (self.affiliation_for)(pmid)))
            .collect();

        ResponseTemplate::new(200)
            .set_body_string(article_set(&articles))
            .insert_header("content-type", "application/xml")
    }
}

/// Ollama-style chat reply
pub fn chat_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "model": "llama3:8b",
        "created_at": "2024-01-01T00:00:00Z",
        "message": {"role": "assistant", "content": content},
        "done": true
    })
}
