use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// A user query: trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    pub fn new(raw: &str) -> Result<Self, SearchError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One cited web page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSource {
    pub uri: String,
    pub title: String,
}

/// One citation unit. Only web chunks are of interest; anything else the
/// provider returns arrives here with `web` unset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

/// Provider-rendered search widget markup
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntryPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_entry_point: Option<SearchEntryPoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_search_queries: Vec<String>,
}

/// Normalized answer for one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Generated answer, markdown formatted
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_metadata: Option<GroundingMetadata>,
}

/// Lifecycle state of the results view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ResultState {
    pub data: Option<SearchResponse>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ResultState {
    pub fn is_idle(&self) -> bool {
        !self.loading && self.data.is_none() && self.error.is_none()
    }
}

/// A deduplicated source ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceView {
    pub uri: String,
    pub title: String,
    pub domain: String,
}

/// Query string of `GET /api/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    /// Browser tab id. A new query for the same session cancels the
    /// session's in-flight search.
    #[serde(default)]
    pub session: Option<String>,
}

/// Body of `GET /api/search`
#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub query: String,
    pub state: ResultState,
    pub sources: Vec<SourceView>,
}

/// Body of `GET /api/lucky`
#[derive(Debug, Clone, Serialize)]
pub struct LuckyQuery {
    pub query: String,
}

/// Public view of the provider settings. The key itself is never exposed.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSettingsView {
    pub base_url: String,
    pub model: String,
    pub api_key_configured: bool,
    pub timeout_secs: u64,
}

/// Provider config update request
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfigUpdate {
    // base_url intentionally omitted: immutable at runtime to prevent SSRF
    pub model: Option<String>,
    pub api_key: Option<String>,
}
