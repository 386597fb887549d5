//! API routes for the support agent server

pub mod agents;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/info", get(info))
        .nest(
            "/agents",
            Router::new()
                .route("/health", get(agents::health))
                .route("/tool_agent", post(agents::tool_agent)),
        )
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let (responders, policy) = match state.orchestrator() {
        Ok(orchestrator) => (
            orchestrator.pool().catalog(),
            Some(orchestrator.policy_name().to_string()),
        ),
        Err(_) => (Vec::new(), None),
    };

    Json(serde_json::json!({
        "name": "support-agent",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Customer support agent routing messages to small-talk and FAQ responders",
        "endpoints": {
            "GET /health": "Liveness check",
            "GET /ready": "Readiness check (503 until the LLM backend is configured)",
            "GET /api/agents/health": "Liveness plus API key presence",
            "POST /api/agents/tool_agent": "Answer one customer message"
        },
        "faq": {
            "source": state.index().document().source,
            "snippets": state.index().len()
        },
        "policy": policy,
        "responders": responders
    }))
}
