use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, ProviderConfig};
use crate::llm::{GeminiProvider, GenerativeProvider};
use crate::search::{ResultController, SearchService, SessionRegistry};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub provider_config: Arc<RwLock<ProviderConfig>>,
    pub provider: Arc<dyn GenerativeProvider>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.provider.timeout_secs))
            .build()?;
        let provider = GeminiProvider::new(http_client, config.provider.base_url.clone());

        Ok(Self::with_provider(config, Arc::new(provider)))
    }

    /// State over an arbitrary provider backend.
    pub fn with_provider(config: Config, provider: Arc<dyn GenerativeProvider>) -> Self {
        let provider_config = Arc::new(RwLock::new(config.provider.clone()));
        let sessions = Arc::new(SessionRegistry::new(SearchService::new(
            provider.clone(),
            provider_config.clone(),
        )));
        Self {
            config,
            provider_config,
            provider,
            sessions,
        }
    }

    pub fn search_service(&self) -> SearchService {
        SearchService::new(self.provider.clone(), self.provider_config.clone())
    }

    /// A fresh results controller, for requests without a session.
    pub fn result_controller(&self) -> ResultController {
        ResultController::new(self.search_service())
    }
}
