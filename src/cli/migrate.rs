use crate::config::{BootstrapSettings, DatabaseConnections};

/// Connect both databases and run all pending migrations
///
/// Does not build AppData; every other command calls this first.
///
/// # Returns
/// * `Ok(DatabaseConnections)` - Migrated connection pools
/// * `Err(...)` - Connection or migration failed
pub async fn run_migrations(
    bootstrap_settings: &BootstrapSettings,
) -> Result<DatabaseConnections, Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let connections = DatabaseConnections::init(bootstrap_settings).await?;
    connections.migrate().await?;

    tracing::info!("All migrations completed successfully");

    Ok(connections)
}
