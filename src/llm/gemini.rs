use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{GroundingChunk, GroundingMetadata, SearchEntryPoint, WebSource};

/// Longest provider error body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 800;

/// One grounded text-generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundedRequest {
    pub model: String,
    pub api_key: String,
    pub prompt: String,
}

/// A text-generation backend with Google Search grounding enabled.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    async fn generate_grounded(&self, request: GroundedRequest) -> Result<GenerateContentResponse>;
}

// ─── Wire types: request ─────────────────────────────────

/// `generateContent` request body. There is deliberately no
/// `generationConfig`: the search tool cannot be combined with
/// `responseMimeType` / `responseSchema`.
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
    tools: Vec<Tool>,
}

impl GenerateContentRequest {
    pub fn grounded(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

// ─── Wire types: response ────────────────────────────────
//
// Every field is optional: the provider omits whatever it has nothing for.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub grounding_metadata: Option<WireGroundingMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub thought: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireGroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Option<Vec<WireGroundingChunk>>,
    #[serde(default)]
    pub search_entry_point: Option<WireSearchEntryPoint>,
    #[serde(default)]
    pub web_search_queries: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireGroundingChunk {
    #[serde(default)]
    pub web: Option<WireWebSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireWebSource {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSearchEntryPoint {
    #[serde(default)]
    pub rendered_content: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate: its non-thought text parts joined.
    /// `None` when there is no candidate or no text.
    pub fn first_text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts
            .iter()
            .filter(|p| p.thought != Some(true))
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Grounding metadata of the first candidate, converted to the strict model.
    pub fn first_grounding(&self) -> Option<GroundingMetadata> {
        self.candidates
            .first()?
            .grounding_metadata
            .clone()
            .map(GroundingMetadata::from)
    }
}

impl From<WireGroundingMetadata> for GroundingMetadata {
    fn from(wire: WireGroundingMetadata) -> Self {
        Self {
            grounding_chunks: wire
                .grounding_chunks
                .unwrap_or_default()
                .into_iter()
                .map(GroundingChunk::from)
                .collect(),
            search_entry_point: wire.search_entry_point.map(|e| SearchEntryPoint {
                rendered_content: e.rendered_content,
            }),
            web_search_queries: wire.web_search_queries.unwrap_or_default(),
        }
    }
}

impl From<WireGroundingChunk> for GroundingChunk {
    fn from(wire: WireGroundingChunk) -> Self {
        Self {
            web: wire.web.map(|w| WebSource {
                uri: w.uri.unwrap_or_default(),
                title: w.title.unwrap_or_default(),
            }),
        }
    }
}

// ─── HTTP client ─────────────────────────────────────────

/// Gemini REST API (`v1beta/models/{model}:generateContent`).
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl GenerativeProvider for GeminiProvider {
    async fn generate_grounded(&self, request: GroundedRequest) -> Result<GenerateContentResponse> {
        let url = self.endpoint(&request.model);
        let body = GenerateContentRequest::grounded(&request.prompt);

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &request.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to call Gemini generateContent")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let body = truncate_chars(body.trim(), MAX_ERROR_BODY_CHARS);
            if body.is_empty() {
                anyhow::bail!("Gemini API returned {status}");
            }
            anyhow::bail!("Gemini API returned {status}: {body}");
        }

        resp.json::<GenerateContentResponse>()
            .await
            .context("Failed to decode Gemini response")
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
