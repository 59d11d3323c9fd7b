// Account maintenance CLI commands
// Password reset, unlock and read-only listings

use std::sync::Arc;

use crate::app_data::AppData;
use crate::services::{AdminService, AuthService};
use crate::types::RequestContext;

/// Reset a user's password and require a change on next login
///
/// When no password is given a policy-compliant temporary password is
/// generated and printed once.
pub async fn reset_password(
    app_data: Arc<AppData>,
    username: &str,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("reset-password");

    let admin = AdminService::new(app_data.clone());
    let principal = admin.find_principal(username).await.map_err(|e| {
        println!("❌ {}", e.user_message());
        e
    })?;

    let (password, generated) = match password {
        Some(password) => (password, false),
        None => (app_data.crypto.generate_secure_password(), true),
    };

    let auth = AuthService::new(app_data);
    auth.reset_password(&ctx, principal.id, &password, &ctx.actor, true)
        .await
        .map_err(|e| {
            println!("❌ {}", e.user_message());
            e
        })?;

    println!("✓ Password reset for {}", principal.username);
    if generated {
        println!("  Temporary password: {}", password);
    }
    println!("  ⚠️  Password change required on next login");

    Ok(())
}

/// Administrative unlock after too many failed logins
pub async fn unlock(app_data: Arc<AppData>, username: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("unlock");
    let admin = AdminService::new(app_data);

    let principal = admin.find_principal(username).await.map_err(|e| {
        println!("❌ {}", e.user_message());
        e
    })?;

    if !principal.is_locked {
        println!("ℹ️  Account {} is not locked.", principal.username);
        return Ok(());
    }

    admin.unlock_principal(&ctx, principal.id).await?;
    println!("✓ Account {} unlocked", principal.username);

    Ok(())
}

pub async fn list_roles(app_data: Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    let admin = AdminService::new(app_data);

    for role in admin.list_roles().await? {
        println!(
            "{:<18} {:<24} {}",
            role.id,
            role.name,
            role.description.unwrap_or_default()
        );
    }

    Ok(())
}

pub async fn list_users(app_data: Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    let admin = AdminService::new(app_data);

    for user in admin.list_principals().await? {
        let roles: Vec<&str> = user.roles.iter().map(|r| r.role_id.as_str()).collect();
        let status = match (user.is_active, user.is_locked) {
            (false, _) => "inactive",
            (true, true) => "locked",
            (true, false) => "active",
        };
        println!(
            "{:<6} {:<20} {:<30} {:<9} {}",
            user.id,
            user.username,
            user.email,
            status,
            roles.join(",")
        );
    }

    Ok(())
}
