// src/connections/search.rs
use crate::connections::StoreError;
use crate::health::Probe;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use url::Url;

pub const DEMO_INDEX: &str = "messages";
pub const DEMO_DOCUMENT_ID: &str = "1";

/// The document `populate-search` writes and `/app/elasticsearch` reads back.
pub fn demo_document() -> Value {
    json!({
        "author": "Aladdin",
        "song": "A Whole New World",
        "lyrics": ["I can show you the world"],
        "awesomeness": 42
    })
}

/// Document operations against the search store.
#[async_trait]
pub trait SearchStore: Probe {
    /// The `_source` of document `id` in `index`.
    async fn get_source(&self, index: &str, id: &str) -> Result<Value, StoreError>;

    async fn index_document(&self, index: &str, id: &str, document: &Value) -> Result<(), StoreError>;
}

/// Minimal Elasticsearch client over the REST API.
pub struct ElasticsearchClient {
    client: Client,
    base: Url,
}

impl ElasticsearchClient {
    /// `base` must end in `/`; `config::search_url` guarantees that.
    /// Building the client does not contact the server.
    pub fn new(base: Url) -> Result<Self, StoreError> {
        let client = Client::builder().build()?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        Ok(self.base.join(path)?)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, StoreError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status { status, body });
        }
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl Probe for ElasticsearchClient {
    async fn probe(&self) -> Result<String, StoreError> {
        let url = self.endpoint("_cluster/health")?;
        let health = self.send(self.client.get(url)).await?;
        Ok(health.to_string())
    }
}

#[async_trait]
impl SearchStore for ElasticsearchClient {
    async fn get_source(&self, index: &str, id: &str) -> Result<Value, StoreError> {
        let url = self.endpoint(&format!("{}/_doc/{}", index, id))?;
        let mut document = self.send(self.client.get(url)).await?;

        document
            .get_mut("_source")
            .map(Value::take)
            .ok_or_else(|| StoreError::UnexpectedResponse("document has no _source".to_string()))
    }

    async fn index_document(&self, index: &str, id: &str, document: &Value) -> Result<(), StoreError> {
        let url = self.endpoint(&format!("{}/_doc/{}", index, id))?;
        self.send(self.client.put(url).json(document)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> ElasticsearchClient {
        let base = Url::parse(&format!("{}/", server.url())).unwrap();
        ElasticsearchClient::new(base).unwrap()
    }

    #[tokio::test]
    async fn probe_returns_cluster_health_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/_cluster/health")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"cluster_name":"demo","status":"green"}"#)
            .create_async()
            .await;

        let detail = client_for(&server).probe().await.unwrap();

        mock.assert_async().await;
        let health: Value = serde_json::from_str(&detail).unwrap();
        assert_eq!(health["status"], "green");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/_cluster/health")
            .with_status(503)
            .with_body("master_not_discovered_exception")
            .create_async()
            .await;

        let err = client_for(&server).probe().await.unwrap_err();

        match err {
            StoreError::Status { status, body } => {
                assert_eq!(status.as_u16(), 503);
                assert!(body.contains("master_not_discovered"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn get_source_extracts_the_source_field() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/messages/_doc/1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "_index": "messages",
                    "_id": "1",
                    "found": true,
                    "_source": demo_document()
                })
                .to_string(),
            )
            .create_async()
            .await;

        let source = client_for(&server)
            .get_source(DEMO_INDEX, DEMO_DOCUMENT_ID)
            .await
            .unwrap();

        assert_eq!(source, demo_document());
    }

    #[tokio::test]
    async fn index_document_puts_the_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/messages/_doc/1")
            .match_body(Matcher::Json(demo_document()))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"result":"created"}"#)
            .create_async()
            .await;

        client_for(&server)
            .index_document(DEMO_INDEX, DEMO_DOCUMENT_ID, &demo_document())
            .await
            .unwrap();

        mock.assert_async().await;
    }
}
