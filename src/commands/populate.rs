// src/commands/populate.rs
use crate::config::Settings;
use crate::connections::{demo_document, AppContext, SearchStore, DEMO_DOCUMENT_ID, DEMO_INDEX};
use anyhow::{bail, Context, Result};
use tracing::info;

/// Write the demo document that `/app/elasticsearch` serves.
pub async fn populate(search: &dyn SearchStore) -> Result<()> {
    search
        .index_document(DEMO_INDEX, DEMO_DOCUMENT_ID, &demo_document())
        .await
        .with_context(|| format!("Failed to index {}/{}", DEMO_INDEX, DEMO_DOCUMENT_ID))?;
    info!("Indexed {}/{}", DEMO_INDEX, DEMO_DOCUMENT_ID);
    Ok(())
}

/// `populate-search` command.
pub async fn run(settings: &Settings) -> Result<()> {
    let context = AppContext::open(settings)?;
    let Some(search) = context.search() else {
        bail!("ELASTICSEARCH_CREATE is false, there is no elasticsearch to populate");
    };
    populate(search).await
}
