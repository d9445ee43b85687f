// src/server/handler.rs
use hyper::{Body, Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;
use tower::Service;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::connections::AppContext;
use crate::metrics::{MetricsRegistry, Timer};
use crate::server::resources::{self, respond};
use crate::server::routes::{Resource, RouteTable};

const UNMATCHED_PATH: &str = "unmatched";

/// Everything a request needs: dependency handles, the route table built
/// from them, and the metrics registry.
pub struct App {
    context: AppContext,
    routes: RouteTable,
    metrics: Arc<MetricsRegistry>,
}

impl App {
    pub fn new(context: AppContext, metrics: Arc<MetricsRegistry>) -> Self {
        let routes = RouteTable::from_context(&context);
        Self {
            context,
            routes,
            metrics,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub async fn handle(&self, req: Request<Body>) -> Response<Body> {
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "request",
            %request_id,
            method = %req.method(),
            path = %req.uri().path()
        );

        async move {
            let timer = Timer::new();
            let route = self.routes.resolve(req.uri().path()).cloned();

            let response = match &route {
                None => respond(StatusCode::NOT_FOUND, "Not Found"),
                Some(_) if req.method() != Method::GET => {
                    respond(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
                }
                Some(route) => self.dispatch(route.resource).await,
            };

            let path = route.as_ref().map(|r| r.path).unwrap_or(UNMATCHED_PATH);
            self.metrics
                .collector()
                .record_request(path, response.status().as_u16(), timer.elapsed());
            debug!(status = response.status().as_u16(), "request complete");

            response
        }
        .instrument(span)
        .await
    }

    async fn dispatch(&self, resource: Resource) -> Response<Body> {
        match resource {
            Resource::Base => resources::base(),
            Resource::Ping => resources::ping(),
            Resource::Busy => resources::busy(&self.metrics.collector()).await,
            Resource::Metrics => resources::metrics(&self.metrics),
            Resource::Redis => match self.context.cache() {
                Some(cache) => resources::cache_echo(cache).await,
                None => respond(StatusCode::NOT_FOUND, "Not Found"),
            },
            Resource::Elasticsearch => match self.context.search() {
                Some(search) => resources::search_echo(search).await,
                None => respond(StatusCode::NOT_FOUND, "Not Found"),
            },
        }
    }
}

#[derive(Clone)]
pub struct RequestHandler {
    app: Arc<App>,
}

impl RequestHandler {
    pub fn new(app: App) -> Self {
        Self { app: Arc::new(app) }
    }
}

impl Service<Request<Body>> for RequestHandler {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let app = self.app.clone();
        Box::pin(async move { Ok(app.handle(req).await) })
    }
}
