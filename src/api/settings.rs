use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::config::ProviderConfig;
use crate::models::{ProviderConfigUpdate, ProviderSettingsView};
use crate::state::AppState;

/// GET /api/config - Provider settings with the API key redacted
pub async fn get_config(State(state): State<AppState>) -> Json<ProviderSettingsView> {
    let config = state.provider_config.read();
    Json(settings_view(&config))
}

/// PUT /api/config - Update model and/or API key
pub async fn update_config(
    State(state): State<AppState>,
    Json(update): Json<ProviderConfigUpdate>,
) -> Result<Json<ProviderSettingsView>, (StatusCode, String)> {
    if let Some(model) = &update.model {
        if model.trim().is_empty() || model.contains('/') {
            return Err((StatusCode::BAD_REQUEST, "Invalid model name".to_string()));
        }
    }

    let mut config = state.provider_config.write();

    // base_url is immutable at runtime (set via GEMINI_BASE_URL only):
    // redirecting it would leak the API key to another host
    if let Some(model) = update.model {
        config.model = model.trim().to_string();
    }
    if let Some(api_key) = update.api_key {
        let api_key = api_key.trim().to_string();
        config.api_key = if api_key.is_empty() { None } else { Some(api_key) };
    }

    tracing::info!(model = %config.model, "Provider config updated");
    Ok(Json(settings_view(&config)))
}

fn settings_view(config: &ProviderConfig) -> ProviderSettingsView {
    ProviderSettingsView {
        base_url: config.base_url.clone(),
        model: config.model.clone(),
        api_key_configured: config.credential().is_some(),
        timeout_secs: config.timeout_secs,
    }
}
