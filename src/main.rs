use std::sync::Arc;

use clap::Parser;

use report_access::app_data::AppData;
use report_access::cli::{self, Cli};
use report_access::config::{BootstrapSettings, SecuritySettings, init_logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();

    let bootstrap_settings = BootstrapSettings::from_env()?;
    let security_settings = SecuritySettings::from_env()?;
    tracing::debug!(settings = ?bootstrap_settings, "Loaded bootstrap settings");

    let connections = cli::migrate::run_migrations(&bootstrap_settings).await?;

    let app_data = Arc::new(AppData::init(&connections, security_settings));

    cli::execute_command(cli, app_data).await
}
