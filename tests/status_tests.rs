// tests/status_tests.rs
use aladdin_demo::commands::StatusReporter;
use aladdin_demo::config::{search_url, ServiceEndpoint};
use aladdin_demo::connections::{AppContext, CacheStore, ElasticsearchClient, RedisCache, SearchStore};
use aladdin_demo::health::HealthChecker;
use anyhow::anyhow;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

fn closed_endpoint() -> ServiceEndpoint {
    ServiceEndpoint {
        host: "127.0.0.1".to_string(),
        port: 1,
    }
}

fn reporter(ping_target: anyhow::Result<Url>, context: AppContext) -> StatusReporter {
    StatusReporter::new(
        ping_target,
        HealthChecker::new(context, None),
        Duration::from_secs(2),
    )
    .unwrap()
}

async fn run(reporter: &StatusReporter) -> Vec<String> {
    let mut out = Vec::new();
    reporter.report(&mut out).await.unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn disabled_search_prints_exactly_the_flag_message() {
    let reporter = reporter(Err(anyhow!("unused")), AppContext::default());
    let mut out = Vec::new();

    reporter.report_elasticsearch(&mut out).await.unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "getting elasticsearch health ...\n\
         elasticsearch creation flag set to false, no other elasticsearch connection available at this time\n"
    );
}

#[tokio::test]
async fn all_disabled_with_healthy_server() {
    let mut server = mockito::Server::new_async().await;
    let ping = server
        .mock("GET", "/ping")
        .with_status(200)
        .create_async()
        .await;
    let target = Url::parse(&format!("{}/ping", server.url())).unwrap();

    let lines = run(&reporter(Ok(target), AppContext::default())).await;

    ping.assert_async().await;
    assert_eq!(
        lines,
        vec![
            "pinging aladdin-demo-server ...",
            "aladdin demo server endpoint ping successful",
            "pinging redis ...",
            "redis creation flag set to false, no other redis connection available at this time",
            "getting elasticsearch health ...",
            "elasticsearch creation flag set to false, no other elasticsearch connection available at this time",
        ]
    );
}

#[tokio::test]
async fn non_200_ping_reports_status_code() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/ping")
        .with_status(503)
        .create_async()
        .await;
    let target = Url::parse(&format!("{}/ping", server.url())).unwrap();

    let lines = run(&reporter(Ok(target), AppContext::default())).await;

    assert_eq!(
        lines[1],
        "aladdin demo server endpoint ping returned with status code 503"
    );
}

#[tokio::test]
async fn every_failure_is_reported_and_the_next_check_still_runs() {
    let cache: Arc<dyn CacheStore> = Arc::new(RedisCache::lazy(&closed_endpoint()).unwrap());
    let search: Arc<dyn SearchStore> =
        Arc::new(ElasticsearchClient::new(search_url("127.0.0.1:1").unwrap()).unwrap());
    let target = closed_endpoint().http_url("/ping").unwrap();

    let lines = run(&reporter(Ok(target), AppContext::new(Some(cache), Some(search)))).await;

    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "pinging aladdin-demo-server ...");
    assert!(lines[1].starts_with("aladdin demo endpoint connection error: "));
    assert_eq!(lines[2], "pinging redis ...");
    assert!(lines[3].starts_with("redis connection error: "));
    assert_eq!(lines[4], "getting elasticsearch health ...");
    assert!(lines[5].starts_with("encountered elasticsearch error: "));
}

#[tokio::test]
async fn missing_server_discovery_variables_are_reported() {
    let lines = run(&reporter(
        Err(anyhow!("ALADDIN_DEMO_SERVER_SERVICE_HOST and ALADDIN_DEMO_SERVER_SERVICE_PORT must be set")),
        AppContext::default(),
    ))
    .await;

    assert_eq!(
        lines[1],
        "aladdin demo endpoint connection error: ALADDIN_DEMO_SERVER_SERVICE_HOST and ALADDIN_DEMO_SERVER_SERVICE_PORT must be set"
    );
    assert_eq!(lines.len(), 6);
}

#[tokio::test]
async fn search_health_is_printed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/_cluster/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"cluster_name":"demo","status":"yellow"}"#)
        .create_async()
        .await;
    let search: Arc<dyn SearchStore> =
        Arc::new(ElasticsearchClient::new(search_url(&server.url()).unwrap()).unwrap());

    let lines = run(&reporter(Err(anyhow!("unset")), AppContext::new(None, Some(search)))).await;

    assert_eq!(
        lines[5],
        r#"elasticsearch health retrieved: {"cluster_name":"demo","status":"yellow"}"#
    );
}
