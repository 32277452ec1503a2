use crate::cli::{utils, OutputFormat};
use crate::config;
use crate::database::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let database = &config::config().database;
    let pool = DatabaseManager::connect(database).await?;
    DatabaseManager::migrate(&pool).await?;
    pool.close().await;

    utils::output_success(&output_format, "Database migrations applied", None)
}
