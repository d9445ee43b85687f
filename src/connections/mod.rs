//
// src/connections/mod.rs
//
mod cache;
mod context;
mod error;
mod search;

pub use cache::{CacheStore, RedisCache};
pub use context::AppContext;
pub use error::StoreError;
pub use search::{demo_document, ElasticsearchClient, SearchStore, DEMO_DOCUMENT_ID, DEMO_INDEX};
