// HTTP routes

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::stat_dao::AgentStatDao;
use crate::store::SqliteStatStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) dao: Arc<AgentStatDao<SqliteStatStore>>,
}

pub fn app(dao: Arc<AgentStatDao<SqliteStatStore>>) -> Router {
    let state = AppState { dao };
    Router::new()
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/agent-stat", get(http::agent_stat_handler)) // GET /api/agent-stat
        .route(
            "/api/agent-stat/exists",
            get(http::agent_stat_exists_handler),
        ) // GET /api/agent-stat/exists
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
