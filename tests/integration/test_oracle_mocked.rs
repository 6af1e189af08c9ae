//! Integration tests for the Ollama-backed affiliation oracle

mod common;

use std::time::Duration;

use common::chat_reply;
use get_papers_list::classify::AffiliationClassifier;
use get_papers_list::{AffiliationOracle, OllamaOracle, OracleVerdict, PapersError};
use tracing_test::traced_test;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn oracle_for(mock_server: &MockServer, timeout: Duration) -> OllamaOracle {
    OllamaOracle::new(&mock_server.uri(), "llama3:8b", timeout).expect("oracle client builds")
}

#[tokio::test]
#[traced_test]
async fn test_oracle_yes_means_company() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama3:8b",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("Yes")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let oracle = oracle_for(&mock_server, Duration::from_secs(5));
    let verdict = oracle.classify("Acme Widgets, Boston, MA").await.unwrap();
    assert_eq!(verdict, OracleVerdict::Company);

    let received = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    let prompt = body["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("pharmaceutical or biotech"));
    assert!(prompt.contains("Acme Widgets, Boston, MA"));
}

#[tokio::test]
#[traced_test]
async fn test_oracle_no_means_not_company() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("No.")))
        .mount(&mock_server)
        .await;

    let oracle = oracle_for(&mock_server, Duration::from_secs(5));
    assert_eq!(
        oracle.classify("City Council, Springfield").await.unwrap(),
        OracleVerdict::NotCompany
    );
}

#[tokio::test]
#[traced_test]
async fn test_oracle_timeout_is_oracle_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_reply("Yes"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let oracle = oracle_for(&mock_server, Duration::from_millis(100));
    let result = oracle.classify("Acme Widgets").await;
    assert!(matches!(result, Err(PapersError::OracleError { .. })));
}

#[tokio::test]
#[traced_test]
async fn test_oracle_server_error_is_oracle_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
        .mount(&mock_server)
        .await;

    let oracle = oracle_for(&mock_server, Duration::from_secs(5));
    let err = oracle.classify("Acme Widgets").await.unwrap_err();
    assert!(matches!(err, PapersError::OracleError { .. }));
    assert!(!err.is_network_error());
}

#[tokio::test]
#[traced_test]
async fn test_classifier_falls_back_when_oracle_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_reply("Yes"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let classifier = AffiliationClassifier::with_oracle(Box::new(oracle_for(
        &mock_server,
        Duration::from_millis(100),
    )));

    assert!(!classifier.is_company_affiliation("Acme Widgets, Boston, MA").await);
}

#[tokio::test]
#[traced_test]
async fn test_classifier_only_asks_oracle_about_ambiguous_affiliations() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("Yes")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let classifier = AffiliationClassifier::with_oracle(Box::new(oracle_for(
        &mock_server,
        Duration::from_secs(5),
    )));

    assert!(!classifier.is_company_affiliation("Stanford University").await);
    assert!(classifier.is_company_affiliation("Moderna Therapeutics").await);
    assert!(classifier.is_company_affiliation("Acme Widgets, Boston, MA").await);
}
