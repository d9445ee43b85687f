// src/server/resources.rs
// One function per route. Each makes at most one call to a dependency.
use crate::connections::{CacheStore, SearchStore, DEMO_DOCUMENT_ID, DEMO_INDEX};
use crate::metrics::{MetricsCollector, MetricsRegistry, Timer};
use crate::server::busy::{busy_work, BUSY_ITERATIONS};
use crate::server::render::spaced_json;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Body, Response, StatusCode};
use tracing::{debug, error};

pub const BASE_BODY: &str = "\n I can show you the world \n \n";
pub const BUSY_BODY: &str = "busy busy...";
pub const CACHE_KEY: &str = "msg";

pub(crate) fn respond(status: StatusCode, body: impl Into<Body>) -> Response<Body> {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    response
}

fn internal_error() -> Response<Body> {
    respond(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

pub fn base() -> Response<Body> {
    respond(StatusCode::OK, BASE_BODY)
}

pub fn ping() -> Response<Body> {
    respond(StatusCode::OK, Body::empty())
}

/// Raw value of the `msg` key. A missing key is an empty body.
pub async fn cache_echo(cache: &dyn CacheStore) -> Response<Body> {
    match cache.get(CACHE_KEY).await {
        Ok(value) => respond(StatusCode::OK, value.unwrap_or_default()),
        Err(e) => {
            error!("Redis GET {} failed: {}", CACHE_KEY, e);
            internal_error()
        }
    }
}

pub async fn search_echo(search: &dyn SearchStore) -> Response<Body> {
    let rendered = search
        .get_source(DEMO_INDEX, DEMO_DOCUMENT_ID)
        .await
        .map_err(|e| e.to_string())
        .and_then(|source| spaced_json(&source).map_err(|e| e.to_string()));

    match rendered {
        Ok(source) => respond(
            StatusCode::OK,
            format!("\nData from ElasticSearch is {} \n \n", source),
        ),
        Err(e) => {
            error!("Elasticsearch get {}/{} failed: {}", DEMO_INDEX, DEMO_DOCUMENT_ID, e);
            internal_error()
        }
    }
}

/// Burns a core on the blocking pool; the body never depends on the result.
pub async fn busy(metrics: &MetricsCollector) -> Response<Body> {
    let timer = Timer::new();
    match tokio::task::spawn_blocking(|| busy_work(BUSY_ITERATIONS)).await {
        Ok(n) => {
            metrics.record_busy_loop(timer.elapsed());
            debug!("Busy loop finished in {:?} (n = {})", timer.elapsed(), n);
            respond(StatusCode::OK, BUSY_BODY)
        }
        Err(e) => {
            error!("Busy loop task failed: {}", e);
            internal_error()
        }
    }
}

pub fn metrics(registry: &MetricsRegistry) -> Response<Body> {
    match registry.gather() {
        Ok(buffer) => {
            let mut response = respond(StatusCode::OK, buffer);
            response.headers_mut().insert(
                CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            );
            response
        }
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            internal_error()
        }
    }
}
