use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::ProviderConfig;
use crate::error::SearchError;
use crate::llm::{GenerativeProvider, GroundedRequest};
use crate::models::{Query, SearchResponse};

/// Answer text used when the provider returns no text at all.
pub const NO_RESULTS_TEXT: &str = "No results found.";

/// Runs one grounded provider call per query and normalizes the result.
#[derive(Clone)]
pub struct SearchService {
    provider: Arc<dyn GenerativeProvider>,
    config: Arc<RwLock<ProviderConfig>>,
}

impl SearchService {
    pub fn new(provider: Arc<dyn GenerativeProvider>, config: Arc<RwLock<ProviderConfig>>) -> Self {
        Self { provider, config }
    }

    /// Execute `query` against the provider. Every call goes to the
    /// provider; nothing is cached.
    pub async fn execute(&self, query: &Query) -> Result<SearchResponse, SearchError> {
        let request = {
            let config = self.config.read();
            let api_key = config
                .credential()
                .ok_or_else(|| SearchError::Configuration("API key not found".to_string()))?;
            GroundedRequest {
                model: config.model.clone(),
                api_key: api_key.to_string(),
                prompt: query.as_str().to_string(),
            }
        };

        tracing::debug!(model = %request.model, "Running grounded search");

        let response = self
            .provider
            .generate_grounded(request)
            .await
            .map_err(SearchError::Provider)?;

        let text = response
            .first_text()
            .unwrap_or_else(|| NO_RESULTS_TEXT.to_string());
        let grounding_metadata = response.first_grounding();

        tracing::info!(
            chunks = grounding_metadata
                .as_ref()
                .map_or(0, |m| m.grounding_chunks.len()),
            "Search completed"
        );

        Ok(SearchResponse {
            text,
            grounding_metadata,
        })
    }
}
