use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use rand::seq::SliceRandom;

use crate::models::{LuckyQuery, ResultState, SearchParams, SearchView};
use crate::search::{Outcome, ResultController, SessionRegistry, SessionStart};
use crate::state::AppState;

/// Suggestions behind "I'm Feeling Lucky".
pub const LUCKY_QUERIES: [&str; 5] = [
    "Why is the sky blue?",
    "History of the internet",
    "Cute cat pictures",
    "How to code in React",
    "Best pizza near me",
];

/// GET /api/search?q=&session= - Run one results lifecycle for `q`.
///
/// A failed search still answers with the view body (its `state.error` set)
/// under 502, so the page renders it like any other state. With a `session`,
/// a newer query for the same session cancels this one, which then answers
/// 409 with an empty view.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<(StatusCode, Json<SearchView>), (StatusCode, String)> {
    let query = params.q.as_deref().unwrap_or_default().trim().to_string();
    if query.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Query is required".to_string()));
    }

    let session = params.session.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let Some(session) = session else {
        let controller = state.result_controller();
        let outcome = match controller.activate(Some(&query)) {
            Some(lifecycle) => Some(controller.run(lifecycle).await),
            None => None,
        };
        return Ok(respond(query, &controller, outcome));
    };

    if !SessionRegistry::is_valid_id(session) {
        return Err((StatusCode::BAD_REQUEST, "Invalid session id".to_string()));
    }

    match state.sessions.start(session, &query) {
        SessionStart::Started(lease, lifecycle) => {
            let outcome = lease.controller().run(lifecycle).await;
            Ok(respond(query, lease.controller(), Some(outcome)))
        }
        SessionStart::AlreadyActive(controller) => Ok(respond(query, &controller, None)),
    }
}

fn respond(
    query: String,
    controller: &ResultController,
    outcome: Option<Outcome>,
) -> (StatusCode, Json<SearchView>) {
    let status = match outcome {
        Some(Outcome::Success) => StatusCode::OK,
        Some(Outcome::Error) => StatusCode::BAD_GATEWAY,
        Some(Outcome::Superseded) | None => {
            return (
                StatusCode::CONFLICT,
                Json(SearchView {
                    query,
                    state: ResultState::default(),
                    sources: Vec::new(),
                }),
            );
        }
    };

    (
        status,
        Json(SearchView {
            query,
            sources: controller.unique_sources(),
            state: controller.state(),
        }),
    )
}

/// GET /api/lucky - A random suggestion to search for.
pub async fn lucky() -> Json<LuckyQuery> {
    Json(LuckyQuery {
        query: pick_lucky_query().to_string(),
    })
}

fn pick_lucky_query() -> &'static str {
    LUCKY_QUERIES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(LUCKY_QUERIES[0])
}
