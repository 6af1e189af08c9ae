//! Configuration for the PubMed client and the optional classification oracle
//!
//! Both values are built once at startup (from CLI flags with environment
//! fallbacks) and handed to each component at construction time.

use std::time::Duration;

use crate::rate_limit::RateLimiter;

const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
const DEFAULT_TOOL: &str = "get-papers-list";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// NCBI recommends at most 200 UIDs per EFetch request
pub const DEFAULT_BATCH_SIZE: usize = 200;

/// Configuration for [`PubMedClient`](crate::pubmed::PubMedClient)
///
/// # Example
///
/// ```
/// use get_papers_list::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_api_key("your_api_key_here")
///     .with_email("researcher@example.com");
///
/// assert_eq!(config.effective_rate_limit(), 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// NCBI API key (raises the allowed request rate)
    pub api_key: Option<String>,
    /// Contact email sent with every request
    pub email: Option<String>,
    /// Tool name sent with every request
    pub tool: Option<String>,
    /// Override for the E-utilities base URL
    pub base_url: Option<String>,
    /// Override for the User-Agent header
    pub user_agent: Option<String>,
    /// Requests per second; derived from the API key when unset
    pub rate_limit: Option<f64>,
    /// HTTP timeout per request
    pub timeout: Duration,
    /// Maximum identifiers per EFetch call
    pub batch_size: usize,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            api_key: None,
            email: None,
            tool: None,
            base_url: None,
            user_agent: None,
            rate_limit: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_tool<S: Into<String>>(mut self, tool: S) -> Self {
        self.tool = Some(tool.into());
        self
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: f64) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the EFetch batch cap. Values below 1 are clamped to 1.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Requests per second actually applied
    ///
    /// NCBI allows 3 requests/second without an API key and 10 with one.
    pub fn effective_rate_limit(&self) -> f64 {
        self.rate_limit.unwrap_or(if self.api_key.is_some() {
            10.0
        } else {
            3.0
        })
    }

    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("{}/{}", DEFAULT_TOOL, env!("CARGO_PKG_VERSION")))
    }

    pub fn effective_tool(&self) -> &str {
        self.tool.as_deref().unwrap_or(DEFAULT_TOOL)
    }

    /// Query parameters appended to every E-utilities request
    pub fn build_api_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(api_key) = &self.api_key {
            params.push(("api_key".to_string(), api_key.clone()));
        }

        if let Some(email) = &self.email {
            params.push(("email".to_string(), email.clone()));
        }

        params.push(("tool".to_string(), self.effective_tool().to_string()));

        params
    }

    pub fn create_rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.effective_rate_limit())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

const DEFAULT_ORACLE_MODEL: &str = "llama3:8b";
const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 10;

/// Configuration for the optional affiliation oracle
///
/// An oracle is only used when `url` is set.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Base URL of an Ollama-compatible server, e.g. `http://localhost:11434`
    pub url: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl OracleConfig {
    pub fn new() -> Self {
        Self {
            url: None,
            model: DEFAULT_ORACLE_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_ORACLE_TIMEOUT_SECS),
        }
    }

    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self::new()
    }
}
