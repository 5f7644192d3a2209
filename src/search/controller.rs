use parking_lot::Mutex;
use tokio::sync::watch;

use crate::error::SearchError;
use crate::models::{Query, ResultState, SearchResponse, SourceView};
use crate::search::service::SearchService;
use crate::search::sources::source_views;

/// The only error text ever shown to the user. Provider details go to the log.
pub const FETCH_ERROR_MESSAGE: &str = "An error occurred while fetching results. Please try again.";

/// Ticket for one started lifecycle. Handed back to [`ResultController::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lifecycle {
    generation: u64,
    query: Query,
}

impl Lifecycle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &Query {
        &self.query
    }
}

/// How a lifecycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Error,
    /// A newer query took over; nothing was written.
    Superseded,
}

struct Inner {
    active: Option<Query>,
    state: ResultState,
}

/// Owns the idle → loading → success/error lifecycle of the active query.
///
/// Each new query bumps a generation counter. A running lifecycle watches
/// that counter and drops its provider call as soon as it changes, and a
/// result is only written while its generation is still current, so a
/// stale answer never overwrites a newer one.
pub struct ResultController {
    service: SearchService,
    inner: Mutex<Inner>,
    generation: watch::Sender<u64>,
}

impl ResultController {
    pub fn new(service: SearchService) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            service,
            inner: Mutex::new(Inner {
                active: None,
                state: ResultState::default(),
            }),
            generation,
        }
    }

    /// Make `query` the active query.
    ///
    /// Blank or absent input, or the query that is already active, leaves
    /// everything untouched and returns `None`. Otherwise the state moves to
    /// loading with prior data and error cleared, any in-flight lifecycle is
    /// cancelled, and the ticket for the new lifecycle is returned.
    pub fn activate(&self, query: Option<&str>) -> Option<Lifecycle> {
        let query = Query::new(query?).ok()?;

        let mut inner = self.inner.lock();
        if inner.active.as_ref() == Some(&query) {
            return None;
        }

        let generation = *self.generation.borrow() + 1;
        inner.active = Some(query.clone());
        inner.state = ResultState {
            data: None,
            loading: true,
            error: None,
        };
        self.generation.send_replace(generation);

        tracing::debug!(generation, query = %query, "Lifecycle started");
        Some(Lifecycle { generation, query })
    }

    /// Drive `lifecycle` to completion. Never fails: provider errors end in
    /// the error state with [`FETCH_ERROR_MESSAGE`].
    pub async fn run(&self, lifecycle: Lifecycle) -> Outcome {
        let mut current = self.generation.subscribe();
        if *current.borrow_and_update() != lifecycle.generation {
            return Outcome::Superseded;
        }

        let result = tokio::select! {
            result = self.service.execute(&lifecycle.query) => result,
            Ok(_) = current.wait_for(|g| *g != lifecycle.generation) => {
                tracing::debug!(
                    generation = lifecycle.generation,
                    "Search superseded, dropping in-flight request"
                );
                return Outcome::Superseded;
            }
        };

        self.resolve(&lifecycle, result)
    }

    /// Activate `query` and, if that started a lifecycle, run it. Returns
    /// the resulting state.
    pub async fn search(&self, query: Option<&str>) -> ResultState {
        if let Some(lifecycle) = self.activate(query) {
            self.run(lifecycle).await;
        }
        self.state()
    }

    fn resolve(
        &self,
        lifecycle: &Lifecycle,
        result: Result<SearchResponse, SearchError>,
    ) -> Outcome {
        let mut inner = self.inner.lock();
        if *self.generation.borrow() != lifecycle.generation {
            tracing::debug!(
                generation = lifecycle.generation,
                "Discarding response for superseded query"
            );
            return Outcome::Superseded;
        }

        match result {
            Ok(data) => {
                inner.state = ResultState {
                    data: Some(data),
                    loading: false,
                    error: None,
                };
                Outcome::Success
            }
            Err(e) => {
                match &e {
                    SearchError::Configuration(_) => {
                        tracing::error!(query = %lifecycle.query, "Search failed: {e}")
                    }
                    _ => tracing::warn!(query = %lifecycle.query, "Search failed: {e}"),
                }
                inner.state = ResultState {
                    data: None,
                    loading: false,
                    error: Some(FETCH_ERROR_MESSAGE.to_string()),
                };
                Outcome::Error
            }
        }
    }

    /// Generation of the most recently started lifecycle (0 before any).
    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    pub fn state(&self) -> ResultState {
        self.inner.lock().state.clone()
    }

    pub fn active_query(&self) -> Option<Query> {
        self.inner.lock().active.clone()
    }

    /// Deduplicated sources of the current data.
    pub fn unique_sources(&self) -> Vec<SourceView> {
        source_views(self.inner.lock().state.data.as_ref())
    }
}
