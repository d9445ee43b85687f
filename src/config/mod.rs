// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};

/// Load settings from the process environment.
pub fn load_settings() -> Result<Settings> {
    let source = ::config::Config::builder()
        .add_source(::config::Environment::default())
        .build()
        .context("Failed to read environment")?;

    Settings::from_config(&source)
}
