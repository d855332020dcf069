//! CLI command implementations.

pub mod application;
pub mod apply;
pub mod init;
pub mod job;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::adapters::sqlite::{initialize_database_with, PoolConfig};
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

/// Load configuration and open the configured database, applying any
/// pending migrations.
pub(crate) async fn open_database() -> Result<(Config, SqlitePool)> {
    let config = ConfigLoader::load()?;
    let url = format!("sqlite:{}", config.database.path);
    let pool = initialize_database_with(&url, Some(PoolConfig::from(&config.database)))
        .await
        .context("Failed to open database. Run 'candidacy init' first.")?;
    Ok((config, pool))
}
