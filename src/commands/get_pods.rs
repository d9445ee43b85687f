// src/commands/get_pods.rs
use crate::config::Settings;
use crate::pods::{KubePodApi, PodLister};
use anyhow::{Context, Result};

/// `get-pods` command: print this project's pod names.
pub async fn run(settings: &Settings) -> Result<()> {
    let api = KubePodApi::in_cluster().context("Failed to load in-cluster kubernetes config")?;
    let lister = PodLister::new(api, settings.namespace()?, settings.project_name.as_str());

    let names = lister.list_pods().await.context("Failed to list pods")?;
    println!("{:?}", names);
    Ok(())
}
