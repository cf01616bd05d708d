use anyhow::Context;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::schema::SCHEMA_STATEMENTS;
use crate::database::DatabaseManager;

pub async fn handle(config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to Postgres")?;
    DatabaseManager::bootstrap_schema(&pool)
        .await
        .context("failed to apply schema")?;

    output_success(
        output_format,
        "Database schema is up to date",
        Some(json!({ "statements": SCHEMA_STATEMENTS.len() })),
    )
}
