// CLI module for administrative operations requiring database access

pub mod account;
pub mod create_admin;
pub mod migrate;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// Report access CLI for administrative operations
#[derive(Parser)]
#[command(name = "report-access")]
#[command(about = "Report dashboard access administration CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run pending migrations on the auth and audit databases
    Migrate,

    /// Create an administrator account holding the ADMIN role
    CreateAdmin {
        /// Login name for the new account
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,
    },

    /// Reset a user's password; the user must change it on next login
    ResetPassword {
        #[arg(long)]
        username: String,

        /// New password; a temporary one is generated when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Clear the lock and failed-attempt counter on an account
    Unlock {
        #[arg(long)]
        username: String,
    },

    /// List active roles
    Roles,

    /// List users with their roles and status
    Users,
}

/// Execute CLI command
///
/// Routes the parsed CLI command to the appropriate handler function.
/// `Migrate` is handled by the caller before AppData exists.
///
/// # Arguments
/// * `cli` - Parsed CLI arguments
/// * `app_data` - Application data containing all stores and providers
///
/// # Returns
/// * `Ok(())` - Command executed successfully
/// * `Err(...)` - Command execution failed
pub async fn execute_command(
    cli: Cli,
    app_data: Arc<AppData>,
) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => {
            println!("✓ Migrations are up to date");
        }
        Commands::CreateAdmin {
            username,
            email,
            first_name,
            last_name,
        } => {
            create_admin::create_admin(app_data, username, email, first_name, last_name).await?;
        }
        Commands::ResetPassword { username, password } => {
            account::reset_password(app_data, &username, password).await?;
        }
        Commands::Unlock { username } => {
            account::unlock(app_data, &username).await?;
        }
        Commands::Roles => {
            account::list_roles(app_data).await?;
        }
        Commands::Users => {
            account::list_users(app_data).await?;
        }
    }

    Ok(())
}
