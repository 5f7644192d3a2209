//! Generative AI provider access.

pub mod gemini;

pub use gemini::{GeminiProvider, GenerativeProvider, GroundedRequest};
