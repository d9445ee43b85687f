// src/pods/lister.rs
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ListParams};
use kube::{Client, Config};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum PodError {
    #[error("in-cluster credentials unavailable: {0}")]
    Credentials(String),

    #[error("kubernetes api error: {0}")]
    Api(#[from] kube::Error),
}

/// Pod listing against the orchestrator.
#[async_trait]
pub trait PodApi: Send + Sync {
    /// Names of pods in `namespace` matching `label_selector`, in API order.
    async fn list_names(&self, namespace: &str, label_selector: &str) -> Result<Vec<String>, PodError>;
}

pub struct KubePodApi {
    client: Client,
}

impl KubePodApi {
    /// Service-account credentials mounted into the pod. Nothing else is
    /// supported.
    pub fn in_cluster() -> Result<Self, PodError> {
        let config = Config::incluster().map_err(|e| PodError::Credentials(e.to_string()))?;
        let client = Client::try_from(config)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PodApi for KubePodApi {
    async fn list_names(&self, namespace: &str, label_selector: &str) -> Result<Vec<String>, PodError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let list = pods
            .list(&ListParams::default().labels(label_selector))
            .await?;

        Ok(list
            .items
            .into_iter()
            .filter_map(|pod| pod.metadata.name)
            .collect())
    }
}

/// Label selector for every pod belonging to a project.
pub fn project_selector(project_name: &str) -> String {
    format!("project={}", project_name)
}

pub struct PodLister<A> {
    api: A,
    namespace: String,
    project_name: String,
}

impl<A: PodApi> PodLister<A> {
    pub fn new(api: A, namespace: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            api,
            namespace: namespace.into(),
            project_name: project_name.into(),
        }
    }

    pub async fn list_pods(&self) -> Result<Vec<String>, PodError> {
        let selector = project_selector(&self.project_name);
        debug!("Listing pods in {} with selector {}", self.namespace, selector);
        self.api.list_names(&self.namespace, &selector).await
    }
}
