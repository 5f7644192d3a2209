use std::collections::HashSet;

use crate::models::{GroundingChunk, SearchResponse, SourceView};

/// Keep the first chunk for each distinct web URI, in original order.
/// Chunks without a web source or with an empty URI are dropped.
pub fn dedupe_chunks(chunks: &[GroundingChunk]) -> Vec<GroundingChunk> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut sources = Vec::new();

    for chunk in chunks {
        if let Some(web) = &chunk.web {
            if !web.uri.is_empty() && seen.insert(web.uri.as_str()) {
                sources.push(chunk.clone());
            }
        }
    }

    sources
}

/// Unique cited sources of a response; empty when there is no response or
/// it carries no grounding metadata.
pub fn unique_sources(data: Option<&SearchResponse>) -> Vec<GroundingChunk> {
    data.and_then(|d| d.grounding_metadata.as_ref())
        .map(|m| dedupe_chunks(&m.grounding_chunks))
        .unwrap_or_default()
}

/// Host of `uri`, or `uri` itself when it does not parse or has no host.
pub fn domain_of(uri: &str) -> String {
    url::Url::parse(uri)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| uri.to_string())
}

impl SourceView {
    /// `None` for chunks without a web source.
    pub fn from_chunk(chunk: &GroundingChunk) -> Option<Self> {
        let web = chunk.web.as_ref()?;
        Some(Self {
            uri: web.uri.clone(),
            title: web.title.clone(),
            domain: domain_of(&web.uri),
        })
    }
}

/// Display-ready unique sources of a response.
pub fn source_views(data: Option<&SearchResponse>) -> Vec<SourceView> {
    unique_sources(data)
        .iter()
        .filter_map(SourceView::from_chunk)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroundingMetadata, WebSource};

    fn web(uri: &str, title: &str) -> GroundingChunk {
        GroundingChunk {
            web: Some(WebSource {
                uri: uri.to_string(),
                title: title.to_string(),
            }),
        }
    }

    fn uris(chunks: &[GroundingChunk]) -> Vec<&str> {
        chunks
            .iter()
            .map(|c| c.web.as_ref().unwrap().uri.as_str())
            .collect()
    }

    #[test]
    fn test_keeps_first_seen_order() {
        let input = vec![
            web("https://a.com", "A"),
            web("https://b.com", "B"),
            web("https://a.com", "A again"),
            web("https://c.com", "C"),
            web("https://b.com", "B again"),
        ];
        let out = dedupe_chunks(&input);
        assert_eq!(uris(&out), vec!["https://a.com", "https://b.com", "https://c.com"]);
        // first occurrence wins, including its title
        assert_eq!(out[0].web.as_ref().unwrap().title, "A");
    }

    #[test]
    fn test_drops_missing_web_and_empty_uri() {
        let input = vec![
            GroundingChunk { web: None },
            web("", "x"),
            web("https://a.com", "A"),
        ];
        assert_eq!(dedupe_chunks(&input), vec![web("https://a.com", "A")]);
    }

    #[test]
    fn test_idempotent() {
        let input = vec![
            web("https://a.com", "A"),
            GroundingChunk { web: None },
            web("https://a.com", "A"),
            web("https://b.com", "B"),
        ];
        let once = dedupe_chunks(&input);
        assert_eq!(dedupe_chunks(&once), once);
    }

    #[test]
    fn test_empty_input() {
        assert!(dedupe_chunks(&[]).is_empty());
    }

    #[test]
    fn test_unique_sources_without_data_or_metadata() {
        assert!(unique_sources(None).is_empty());
        let resp = SearchResponse {
            text: "answer".to_string(),
            grounding_metadata: None,
        };
        assert!(unique_sources(Some(&resp)).is_empty());
    }

    #[test]
    fn test_unique_sources_from_response() {
        let resp = SearchResponse {
            text: "answer".to_string(),
            grounding_metadata: Some(GroundingMetadata {
                grounding_chunks: vec![web("https://a.com", "A"), web("https://a.com", "A")],
                ..GroundingMetadata::default()
            }),
        };
        assert_eq!(unique_sources(Some(&resp)).len(), 1);
    }

    #[test]
    fn test_domain_of_url() {
        assert_eq!(domain_of("https://sub.example.com/page"), "sub.example.com");
        assert_eq!(domain_of("http://example.org:8080/x?y=1"), "example.org");
    }

    #[test]
    fn test_domain_of_falls_back_verbatim() {
        assert_eq!(domain_of("not a url"), "not a url");
        assert_eq!(domain_of(""), "");
        // parses, but carries no host
        assert_eq!(domain_of("mailto:someone@example.com"), "mailto:someone@example.com");
    }

    #[test]
    fn test_source_views() {
        let resp = SearchResponse {
            text: "answer".to_string(),
            grounding_metadata: Some(GroundingMetadata {
                grounding_chunks: vec![
                    web("https://sub.example.com/page", "Example"),
                    GroundingChunk { web: None },
                    web("vertexaisearch redirect", "Odd"),
                ],
                ..GroundingMetadata::default()
            }),
        };
        let views = source_views(Some(&resp));
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].domain, "sub.example.com");
        assert_eq!(views[0].title, "Example");
        assert_eq!(views[1].domain, "vertexaisearch redirect");
    }
}
