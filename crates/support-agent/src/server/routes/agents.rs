//! Agent endpoints

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{AgentHealth, AgentRequest, AgentResponse};

/// GET /api/agents/health - Liveness plus credential presence
pub async fn health(State(state): State<AppState>) -> Json<AgentHealth> {
    Json(AgentHealth::new(state.config().api_key_set()))
}

/// POST /api/agents/tool_agent - Answer one customer message
pub async fn tool_agent(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AgentRequest>, JsonRejection>,
) -> Result<Json<AgentResponse>> {
    let Json(request) = payload.map_err(|e| Error::bad_request(e.body_text()))?;
    let request = request.validated()?;
    let orchestrator = state.orchestrator()?.clone();

    let budget = Duration::from_secs(state.config().server.request_timeout_secs);
    let span = tracing::info_span!("tool_agent", request_id = %Uuid::new_v4());

    async move {
        let start = Instant::now();
        tracing::info!("Query: \"{}\"", request.query);

        let outcome = tokio::time::timeout(budget, orchestrator.run(&request.query))
            .await
            .map_err(|_| Error::Timeout(format!("request exceeded {}s", budget.as_secs())))??;

        tracing::info!(
            "Resolved as {:?} after {} step(s) in {}ms",
            outcome.status,
            outcome.steps,
            start.elapsed().as_millis()
        );

        Ok(Json(AgentResponse::new(outcome.answer)))
    }
    .instrument(span)
    .await
}
