// Integration tests: HTTP endpoints over a SQLite-backed DAO

mod common;

use std::sync::Arc;

use agentstat::config::AppConfig;
use agentstat::row_key::distributor::HashPrefixDistributor;
use agentstat::routes;
use agentstat::scan::Tier;
use agentstat::stat_dao::AgentStatDao;
use agentstat::store::SqliteStatStore;
use axum::http::StatusCode;
use axum_test::TestServer;
use common::{AGENT, stat, stat_with_cpu};
use tempfile::TempDir;

const TEST_CONFIG: &str = r#"
[server]
port = 8081
host = "0.0.0.0"

[database]
path = "data/test.db"
max_pool_size = 2

[scan]
cache_size = 4
key_buckets = 4

[aggregation]
sample_interval_ms = 60000
"#;

async fn test_server(dir: &TempDir) -> (TestServer, Arc<AgentStatDao<SqliteStatStore>>) {
    let config = AppConfig::load_from_str(TEST_CONFIG).unwrap();
    let path = dir.path().join("test.db");
    let store = SqliteStatStore::connect(
        path.to_str().unwrap(),
        config.database.max_pool_size,
        HashPrefixDistributor::new(config.scan.key_buckets),
    )
    .await
    .unwrap();
    store.init().await.unwrap();
    let dao = Arc::new(AgentStatDao::new(store, config.stat_dao_config()));
    let server = TestServer::new(routes::app(dao.clone()));
    (server, dao)
}

#[tokio::test]
async fn test_version_endpoint() {
    let dir = TempDir::new().unwrap();
    let (server, _) = test_server(&dir).await;
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(
        json.get("name").and_then(|v| v.as_str()),
        Some("agentstat")
    );
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn test_agent_stat_raw_list() {
    let dir = TempDir::new().unwrap();
    let (server, dao) = test_server(&dir).await;
    dao.scanner()
        .put_stats(Tier::Raw, AGENT, &[stat(1_000, 1_000), stat(2_000, 1_000)])
        .await
        .unwrap();

    let response = server
        .get("/api/agent-stat")
        .add_query_param("agentId", AGENT)
        .add_query_param("from", 0)
        .add_query_param("to", 5_000)
        .await;

    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["agentId"], AGENT);
    assert!(list[0].get("collectInterval").is_some());
    assert!(list[0]["payload"].get("jvmCpuUsage").is_some());
}

#[tokio::test]
async fn test_agent_stat_aggregated_list_backfills() {
    let dir = TempDir::new().unwrap();
    let (server, dao) = test_server(&dir).await;
    dao.scanner()
        .put_stats(
            Tier::Raw,
            AGENT,
            &[stat_with_cpu(130_000, 5_000, 10.0), stat_with_cpu(135_000, 5_000, 20.0)],
        )
        .await
        .unwrap();

    let response = server
        .get("/api/agent-stat")
        .add_query_param("agentId", AGENT)
        .add_query_param("from", 0)
        .add_query_param("to", 300_000)
        .add_query_param("aggregated", true)
        .await;

    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["timestamp"], 120_000);
    assert_eq!(list[0]["collectInterval"], 60_000);
    assert_eq!(list[0]["payload"]["jvmCpuUsage"], 15.0);
}

#[tokio::test]
async fn test_agent_stat_exists() {
    let dir = TempDir::new().unwrap();
    let (server, dao) = test_server(&dir).await;
    dao.scanner()
        .put_stats(Tier::Raw, AGENT, &[stat(1_000, 1_000)])
        .await
        .unwrap();

    let hit = server
        .get("/api/agent-stat/exists")
        .add_query_param("agentId", AGENT)
        .add_query_param("from", 0)
        .add_query_param("to", 5_000)
        .await;
    hit.assert_status_ok();
    assert_eq!(hit.json::<serde_json::Value>()["exists"], true);

    let miss = server
        .get("/api/agent-stat/exists")
        .add_query_param("agentId", "agent-2")
        .add_query_param("from", 0)
        .add_query_param("to", 5_000)
        .await;
    miss.assert_status_ok();
    assert_eq!(miss.json::<serde_json::Value>()["exists"], false);
}

#[tokio::test]
async fn test_missing_agent_id_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let (server, _) = test_server(&dir).await;

    let response = server
        .get("/api/agent-stat")
        .add_query_param("from", 0)
        .add_query_param("to", 5_000)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json: serde_json::Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("agentId"));
}

#[tokio::test]
async fn test_missing_range_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let (server, _) = test_server(&dir).await;

    let response = server
        .get("/api/agent-stat/exists")
        .add_query_param("agentId", AGENT)
        .add_query_param("from", 0)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_inverted_range_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let (server, _) = test_server(&dir).await;

    let response = server
        .get("/api/agent-stat")
        .add_query_param("agentId", AGENT)
        .add_query_param("from", 10_000)
        .add_query_param("to", 5_000)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
