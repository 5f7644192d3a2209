//! Axum HTTP surface: the single-page app and its JSON API.

pub mod search;
pub mod settings;

use axum::response::Html;
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

/// All routes. Unknown paths fall back to the page so client-side
/// navigation (`/search?q=...`) survives a reload.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Serve frontend
        .route("/", get(serve_index))
        .route("/search", get(serve_index))
        // API routes
        .route("/api/search", get(search::search))
        .route("/api/lucky", get(search::lucky))
        .route(
            "/api/config",
            get(settings::get_config).put(settings::update_config),
        )
        .with_state(state)
        .fallback(get(serve_index))
}

async fn serve_index() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}
