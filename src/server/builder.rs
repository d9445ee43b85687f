// ────────────────────────────────
// src/server/builder.rs
// ────────────────────────────────
use crate::server::listener::{bind_tcp, shutdown_signal};
use std::future::Future;
use std::net::SocketAddr;
use anyhow::{anyhow, Result};
use hyper::{server::conn::Http, Body, Request, Response};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tower::Service;

/// Builder pattern so `main.rs` can inject the request handler.
pub struct ServerBuilder<H>
where
    H: Service<Request<Body>, Response = Response<Body>> + Send + Clone + 'static,
    H::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H::Future: Send + 'static,
{
    addr: SocketAddr,
    handler: Option<H>,
}

impl<H> ServerBuilder<H>
where
    H: Service<Request<Body>, Response = Response<Body>> + Send + Clone + 'static,
    H::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    H::Future: Send + 'static,
{
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr, handler: None }
    }

    pub fn with_handler(mut self, handler: H) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Bind the configured address and serve until SIGTERM or Ctrl-C.
    pub async fn serve(self) -> Result<()> {
        let listener = bind_tcp(self.addr).await?;
        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    /// Accept connections on `listener` until `signal` resolves. Open
    /// connections are then told to finish their current request and close,
    /// and this returns once all of them have.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        let handler = self
            .handler
            .ok_or_else(|| anyhow!("handler must be set via with_handler()"))?;

        tracing::info!("HTTP server listening on {}", listener.local_addr()?);

        let (shutdown_tx, _) = watch::channel(false);
        let mut connections = JoinSet::new();
        tokio::pin!(signal);

        loop {
            tokio::select! {
                biased;

                _ = &mut signal => break,

                accepted = listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(err) => {
                            tracing::warn!(%err, "accept error");
                            continue;
                        }
                    };
                    let svc = handler.clone();
                    let mut shutdown_rx = shutdown_tx.subscribe();

                    // One task per connection.
                    connections.spawn(async move {
                        let conn = Http::new().serve_connection(stream, svc);
                        tokio::pin!(conn);
                        let mut draining = false;

                        loop {
                            tokio::select! {
                                result = conn.as_mut() => {
                                    if let Err(err) = result {
                                        tracing::warn!(%peer, %err, "connection error");
                                    }
                                    break;
                                }
                                // Idle keep-alive connections close here instead
                                // of holding the drain open.
                                _ = shutdown_rx.changed(), if !draining => {
                                    draining = true;
                                    conn.as_mut().graceful_shutdown();
                                }
                            }
                        }
                    });
                }

                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        }

        tracing::info!("Draining {} open connection(s)", connections.len());
        let _ = shutdown_tx.send(true);
        while connections.join_next().await.is_some() {}

        Ok(())
    }
}
