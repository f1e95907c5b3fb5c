//! HTTP endpoints

use axum::{
    body::Body,
    extract::{Json, State},
    http::{header::CONTENT_TYPE, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.settings.server.cors_origins,
        state.settings.server.cors_enabled,
    );

    Router::new()
        .route("/api/chat", post(chat_proxy))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build the CORS layer from configured origins.
///
/// With CORS disabled the layer is permissive (development only); with no
/// valid origins configured it falls back to localhost:3000.
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled, allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(origin = %origin, "Invalid CORS origin, skipping");
                None
            })
        })
        .collect();

    let allowed = if parsed.is_empty() {
        tracing::info!("No CORS origins configured, defaulting to localhost:3000");
        vec![HeaderValue::from_static("http://localhost:3000")]
    } else {
        tracing::info!(count = parsed.len(), "CORS origins configured");
        parsed
    };

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Liveness probe
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Forward a completion request upstream with the server-held credential.
///
/// The browser widget sends the full completion-request body; the key never
/// leaves the server. Streamed responses are relayed byte for byte so SSE
/// framing reaches the client untouched.
async fn chat_proxy(State(state): State<AppState>, Json(mut body): Json<Value>) -> Response {
    let Some(api_key) = state.settings.llm.api_key.clone() else {
        tracing::error!("Completion API key is not configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "completion service credential is not configured" })),
        )
            .into_response();
    };

    if body.get("model").is_none() {
        body["model"] = json!(state.settings.llm.model);
    }
    let stream_requested = body
        .get("stream")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let url = format!(
        "{}/chat/completions",
        state.settings.llm.endpoint.trim_end_matches('/')
    );

    let upstream = match state
        .client
        .post(&url)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!(error = %e, "Upstream completion request failed");
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "upstream completion request failed" })),
            )
                .into_response();
        },
    };

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    if stream_requested && status.is_success() {
        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        response.headers_mut().insert(CONTENT_TYPE, content_type);
        return response;
    }

    match upstream.bytes().await {
        Ok(bytes) => {
            let mut response = Response::new(Body::from(bytes));
            *response.status_mut() = status;
            response.headers_mut().insert(CONTENT_TYPE, content_type);
            response
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to read upstream response body");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": "failed to read upstream response" })),
            )
                .into_response()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_config::Settings;

    #[test]
    fn test_router_creation() {
        let state = AppState::new(Settings::default());
        let _router = create_router(state);
    }

    #[tokio::test]
    async fn test_missing_credential_is_500() {
        // Default settings carry no API key
        let state = AppState::new(Settings::default());
        let response =
            chat_proxy(State(state), Json(json!({ "messages": [] }))).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_cors_layer_tolerates_invalid_origin() {
        let _layer = build_cors_layer(
            &["http://localhost:3000".to_string(), "not a url\n".to_string()],
            true,
        );
        let _layer = build_cors_layer(&[], false);
    }
}
