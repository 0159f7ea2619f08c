//! Greeting endpoint.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;

/// Placeholder token replaced by the caller's name.
const PLACEHOLDER: &str = "%s";

#[derive(Deserialize)]
pub struct GreetingParams {
    name: Option<String>,
}

/// Response body for `/api/greeting`.
#[derive(Serialize)]
pub struct Greeting {
    pub content: String,
}

/// Substitute every placeholder occurrence in `template` with `name`.
pub fn render_greeting(template: &str, name: &str) -> String {
    template.replace(PLACEHOLDER, name)
}

/// `GET /api/greeting?name=<name>`
///
/// Responds 500 with `{"content": "no config map"}` until a ConfigMap
/// has been published (or after it becomes absent again).
pub async fn greeting_handler(
    State(state): State<AppState>,
    Query(params): Query<GreetingParams>,
) -> (StatusCode, Json<Greeting>) {
    let name = params.name.unwrap_or_else(|| "World".to_string());

    let Some(template) = state.published.greeting_template() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(Greeting {
                content: "no config map".to_string(),
            }),
        );
    };

    tracing::debug!(name = %name, "Replying to greeting request");
    (
        StatusCode::OK,
        Json(Greeting {
            content: render_greeting(&template, &name),
        }),
    )
}
