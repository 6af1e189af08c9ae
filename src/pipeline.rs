//! Search, fetch and classify, one stage after another

use tracing::{info, instrument};

use crate::classify::{AffiliationClassifier, AffiliationOracle, ClassifiedPaper, RuleSet};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::pubmed::PubMedClient;

/// One configured run of the tool
pub struct Pipeline {
    client: PubMedClient,
    classifier: AffiliationClassifier,
}

impl Pipeline {
    pub fn new(config: ClientConfig, oracle: Box<dyn AffiliationOracle>) -> Self {
        Self::from_parts(
            PubMedClient::with_config(config),
            AffiliationClassifier::new(RuleSet::default(), oracle),
        )
    }

    pub fn from_parts(client: PubMedClient, classifier: AffiliationClassifier) -> Self {
        Self { client, classifier }
    }

    /// Classified papers for `query`, in search order
    ///
    /// Both kept and discarded papers are returned; the serializer drops the
    /// discarded ones. Zero matches is an empty vector, not an error.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn run(&self, query: &str, max_results: usize) -> Result<Vec<ClassifiedPaper>> {
        let ids = self.client.search_articles(query, max_results).await?;
        if ids.is_empty() {
            info!("No papers matched the query");
            return Ok(Vec::new());
        }

        let records = self.client.fetch_articles(&ids).await?;
        let papers = self.classifier.classify_all(records).await;

        info!(
            found = ids.len(),
            fetched = papers.len(),
            kept = papers.iter().filter(|p| p.is_kept()).count(),
            "Pipeline completed"
        );
        Ok(papers)
    }
}
