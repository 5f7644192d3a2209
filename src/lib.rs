//! # grounded-search
//!
//! A search-engine styled web application. Queries are answered by Gemini
//! with its Google Search tool enabled, and the page shows the generated
//! answer next to the web sources it cites.
//!
//! ## Request lifecycle
//!
//! ```text
//!   /search?q=cats ──► GET /api/search?q=cats
//!                              │
//!                              ▼
//!                   ┌─────────────────────┐
//!                   │  ResultController   │  idle ─► loading
//!                   └──────────┬──────────┘
//!                              │ Query
//!                              ▼
//!                   ┌─────────────────────┐
//!                   │   SearchService     │  credential check,
//!                   │                     │  one grounded call
//!                   └──────────┬──────────┘
//!                              │ generateContent + googleSearch
//!                              ▼
//!                   ┌─────────────────────┐
//!                   │   Gemini provider   │
//!                   └──────────┬──────────┘
//!                              │ SearchResponse / SearchError
//!                              ▼
//!                   loading ─► success | error
//!                              │
//!                              ▼
//!                   deduplicated sources (first URI wins)
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for the server and provider
//! - [`error`] - `SearchError`, the service's failure type
//! - [`models`] - Query, grounding metadata, response and view types
//! - [`llm::gemini`] - Gemini wire types, response normalization and HTTP client
//! - [`search::service`] - Query execution against the provider
//! - [`search::controller`] - Per-query lifecycle with cancellation of superseded queries
//! - [`search::sessions`] - One controller per browser tab, so a tab's new query cancels its old one
//! - [`search::sources`] - Stable source deduplication and domain extraction
//! - [`api`] - Axum handlers and the router
//! - [`state`] - Shared application state

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod search;
pub mod state;
