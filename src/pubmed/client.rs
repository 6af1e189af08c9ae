use std::collections::HashMap;

use reqwest::{Client, Response};
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{PapersError, Result};
use crate::pubmed::models::{PaperId, PaperRecord};
use crate::pubmed::parser::{parse_articles_from_xml, service_error};
use crate::pubmed::responses::ESearchResult;
use crate::rate_limit::RateLimiter;

/// Client for the PubMed E-utilities search and fetch endpoints
#[derive(Clone)]
pub struct PubMedClient {
    client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
    config: ClientConfig,
}

impl PubMedClient {
    /// Create a new PubMed client with default configuration
    ///
    /// Uses NCBI default pacing (3 requests/second) and no API key.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a new PubMed client with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use get_papers_list::{ClientConfig, PubMedClient};
    ///
    /// let config = ClientConfig::new()
    ///     .with_api_key("your_api_key_here")
    ///     .with_email("researcher@example.com");
    ///
    /// let client = PubMedClient::with_config(config);
    /// ```
    pub fn with_config(config: ClientConfig) -> Self {
        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self::with_client(client, config)
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        Self {
            client,
            base_url: config.effective_base_url().to_string(),
            rate_limiter: config.create_rate_limiter(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Search PubMed and return matching identifiers in the order the service ranks them
    ///
    /// # Errors
    ///
    /// * `PapersError::InvalidQuery` - If the query is empty (no request is made)
    /// * `PapersError::RequestError` - If the HTTP request fails
    /// * `PapersError::ApiError` - On a non-success status or an ESearch `ERROR` payload
    /// * `PapersError::JsonError` - If the body is not a valid ESearch result
    ///
    /// Zero matches is `Ok` with an empty vector.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use get_papers_list::PubMedClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PubMedClient::new();
    ///     let ids = client.search_articles("machine learning brain", 10).await?;
    ///     println!("Found {} papers", ids.len());
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self), fields(query = %query, max_results = max_results))]
    pub async fn search_articles(&self, query: &str, max_results: usize) -> Result<Vec<PaperId>> {
        if query.trim().is_empty() {
            return Err(PapersError::InvalidQuery("query must not be empty".to_string()));
        }

        let url = format!(
            "{}/esearch.fcgi?db=pubmed&term={}&retmax={}&retmode=json",
            self.base_url,
            urlencoding::encode(query.trim()),
            max_results
        );

        debug!("Making ESearch API request");
        let response = self.make_request(&url).await?;
        let body = response.text().await?;
        let search_result: ESearchResult = serde_json::from_str(&body)?;

        // NCBI sometimes returns 200 OK with an ERROR field
        if let Some(error_msg) = &search_result.esearchresult.error {
            return Err(PapersError::ApiError {
                status: 200,
                message: format!("NCBI ESearch API error: {}", error_msg),
            });
        }

        if let Some(translation) = &search_result.esearchresult.querytranslation {
            debug!(translation = %translation, "Query translated by PubMed");
        }

        let ids: Vec<PaperId> = search_result
            .esearchresult
            .idlist
            .iter()
            .filter_map(|id| PaperId::parse(id))
            .collect();

        info!(
            total = search_result.esearchresult.count.as_deref().unwrap_or("0"),
            returned = ids.len(),
            "Search completed"
        );

        Ok(ids)
    }

    /// Fetch paper metadata for `ids`, in the same order as `ids`
    ///
    /// Identifiers are sent in batches of at most `batch_size` (see
    /// [`ClientConfig::with_batch_size`]). Records that cannot be parsed are
    /// dropped and logged at debug level; any failed request aborts the fetch.
    ///
    /// No request is made when `ids` is empty.
    #[instrument(skip(self, ids), fields(ids_count = ids.len()))]
    pub async fn fetch_articles(&self, ids: &[PaperId]) -> Result<Vec<PaperRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let batch_size = self.config.batch_size.max(1);
        let mut all_records = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(batch_size) {
            let id_list = chunk
                .iter()
                .map(|id| urlencoding::encode(id.as_str()).into_owned())
                .collect::<Vec<_>>()
                .join(",");

            let url = format!(
                "{}/efetch.fcgi?db=pubmed&id={}&retmode=xml",
                self.base_url, id_list
            );

            debug!(batch_size = chunk.len(), "Making batch EFetch API request");
            let response = self.make_request(&url).await?;
            let xml_text = response.text().await?;

            if let Some(message) = service_error(&xml_text) {
                return Err(PapersError::ApiError {
                    status: 200,
                    message: format!("NCBI EFetch API error: {}", message),
                });
            }

            let batch = parse_articles_from_xml(&xml_text)?;
            info!(
                requested = chunk.len(),
                parsed = batch.records.len(),
                skipped = batch.skipped.len(),
                "Batch fetch completed"
            );

            let mut by_id: HashMap<PaperId, PaperRecord> = batch
                .records
                .into_iter()
                .map(|record| (record.id.clone(), record))
                .collect();

            for id in chunk {
                match by_id.remove(id) {
                    Some(record) => all_records.push(record),
                    None => debug!(pmid = %id, "No usable record returned"),
                }
            }

            if !by_id.is_empty() {
                debug!(extra = by_id.len(), "Ignoring records that were not requested");
            }
        }

        Ok(all_records)
    }

    /// GET `url` with the configured API parameters appended, after pacing.
    /// Any non-success status becomes `PapersError::ApiError`.
    async fn make_request(&self, url: &str) -> Result<Response> {
        let mut final_url = url.to_string();
        let api_params = self.config.build_api_params();

        if !api_params.is_empty() {
            let separator = if url.contains('?') { '&' } else { '?' };
            final_url.push(separator);

            let param_strings: Vec<String> = api_params
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
                .collect();
            final_url.push_str(&param_strings.join("&"));
        }

        self.rate_limiter.acquire().await;
        debug!("Making API request to: {}", final_url);
        let response = self.client.get(&final_url).send().await?;

        if !response.status().is_success() {
            warn!("API request failed with status: {}", response.status());
            return Err(PapersError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        Ok(response)
    }
}

impl Default for PubMedClient {
    fn default() -> Self {
        Self::new()
    }
}
