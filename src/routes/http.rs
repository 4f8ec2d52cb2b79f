// GET handlers: version, agent stat list, agent stat existence

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::AppState;
use crate::error::StatError;
use crate::models::Range;

/// Query string shared by the agent stat endpoints. Missing fields are rejected by the DAO.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AgentStatQuery {
    agent_id: Option<String>,
    from: Option<i64>,
    to: Option<i64>,
    #[serde(default)]
    aggregated: bool,
}

impl AgentStatQuery {
    fn range(&self) -> Result<Option<Range>, StatError> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Range::new(from, to).map(Some),
            _ => Ok(None),
        }
    }
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/agent-stat?agentId=&from=&to=[&aggregated=true]
pub(super) async fn agent_stat_handler(
    State(state): State<AppState>,
    Query(query): Query<AgentStatQuery>,
) -> Response {
    let range = match query.range() {
        Ok(r) => r,
        Err(e) => return error_response(e),
    };
    let agent_id = query.agent_id.as_deref();
    let result = if query.aggregated {
        state
            .dao
            .get_aggregated_agent_stat_list(agent_id, range.as_ref())
            .await
    } else {
        state.dao.get_agent_stat_list(agent_id, range.as_ref()).await
    };
    match result {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/agent-stat/exists?agentId=&from=&to=
pub(super) async fn agent_stat_exists_handler(
    State(state): State<AppState>,
    Query(query): Query<AgentStatQuery>,
) -> Response {
    let range = match query.range() {
        Ok(r) => r,
        Err(e) => return error_response(e),
    };
    match state
        .dao
        .agent_stat_exists(query.agent_id.as_deref(), range.as_ref())
        .await
    {
        Ok(exists) => Json(serde_json::json!({ "exists": exists })).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(e: StatError) -> Response {
    let status = match &e {
        StatError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        StatError::Scan(_) => {
            tracing::warn!(error = %e, "agent stat scan failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
}
