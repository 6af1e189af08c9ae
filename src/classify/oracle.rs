//! Optional external classifier for affiliations the keyword rules cannot decide

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::OracleConfig;
use crate::error::{PapersError, Result};

/// Answer returned by an [`AffiliationOracle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleVerdict {
    Company,
    NotCompany,
}

/// Text-in, verdict-out classification capability
#[async_trait]
pub trait AffiliationOracle: Send + Sync {
    async fn classify(&self, affiliation: &str) -> Result<OracleVerdict>;

    fn name(&self) -> &str;
}

/// Oracle used when none is configured: every affiliation is non-company
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOracle;

#[async_trait]
impl AffiliationOracle for NoOracle {
    async fn classify(&self, _affiliation: &str) -> Result<OracleVerdict> {
        Ok(OracleVerdict::NotCompany)
    }

    fn name(&self) -> &str {
        "none"
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

/// Oracle backed by an Ollama-compatible `/api/chat` endpoint
pub struct OllamaOracle {
    client: Client,
    chat_url: String,
    model: String,
}

impl OllamaOracle {
    pub fn new(base_url: &str, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("get-papers-list/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            chat_url: format!("{}/api/chat", base_url.trim_end_matches('/')),
            model: model.into(),
        })
    }

    fn prompt(affiliation: &str) -> String {
        format!(
            "Is the following affiliation related to pharmaceutical or biotech industry? \
             Reply with only 'Yes' or 'No'.\n\nAffiliation: \"{}\"",
            affiliation
        )
    }
}

#[async_trait]
impl AffiliationOracle for OllamaOracle {
    #[instrument(skip(self), fields(model = %self.model))]
    async fn classify(&self, affiliation: &str) -> Result<OracleVerdict> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Self::prompt(affiliation),
            }],
            stream: false,
        };

        let response = self
            .client
            .post(&self.chat_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| PapersError::OracleError {
                message: format!("request failed: {}", e),
            })?;

        if !response.status().is_success() {
            return Err(PapersError::OracleError {
                message: format!("oracle returned status {}", response.status()),
            });
        }

        let body: ChatResponse = response.json().await.map_err(|e| PapersError::OracleError {
            message: format!("invalid oracle response: {}", e),
        })?;

        let verdict = parse_answer(&body.message.content);
        debug!(answer = %body.message.content.trim(), ?verdict, "Oracle answered");
        Ok(verdict)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// "Yes" (in any case, with leading quotes or whitespace) means company
fn parse_answer(answer: &str) -> OracleVerdict {
    let answer = answer
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    if answer.starts_with("yes") {
        OracleVerdict::Company
    } else {
        OracleVerdict::NotCompany
    }
}

/// Oracle selected by configuration: Ollama when a URL is set, otherwise [`NoOracle`]
pub fn from_config(config: &OracleConfig) -> Result<Box<dyn AffiliationOracle>> {
    match config.url.as_deref() {
        Some(url) if config.is_enabled() => Ok(Box::new(OllamaOracle::new(
            url.trim(),
            config.model.clone(),
            config.timeout,
        )?)),
        _ => Ok(Box::new(NoOracle)),
    }
}
