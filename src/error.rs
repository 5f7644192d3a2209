use thiserror::Error;

/// Failures surfaced by the query execution service.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The query was blank after trimming. Raised by `Query::new`, never by
    /// the provider path.
    #[error("query is empty")]
    EmptyQuery,

    /// No provider credential is configured. No request was sent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The provider call failed: transport, auth, rate limit or a body we
    /// could not decode.
    #[error("provider error: {0:#}")]
    Provider(#[source] anyhow::Error),
}
