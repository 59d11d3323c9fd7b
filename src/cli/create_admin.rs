// Create-admin command implementation
// Creates the first administrator account during system setup

use std::io::{self, Write};
use std::sync::Arc;

use crate::app_data::AppData;
use crate::providers::CryptoProvider;
use crate::services::AdminService;
use crate::services::authorization::ADMIN;
use crate::services::password_validator::validate_password;
use crate::types::{NewPrincipal, RequestContext, RoleId};

/// Create an administrator account holding the ADMIN role
///
/// The password is either generated or read from stdin and checked
/// against the password policy before anything is written.
///
/// # Returns
/// * `Ok(())` - Account created
/// * `Err(...)` - I/O error or the account could not be created
pub async fn create_admin(
    app_data: Arc<AppData>,
    username: String,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== Create Administrator ===\n");

    let ctx = RequestContext::for_cli("create-admin");
    let (password, generated) = prompt_for_password(&app_data.crypto, &username)?;

    let request = NewPrincipal {
        username: username.clone(),
        email,
        password: password.clone(),
        first_name,
        last_name,
        roles: vec![RoleId::from(ADMIN)],
        // a generated password is only a bootstrap credential
        must_change_password: generated,
    };

    let service = AdminService::new(app_data);
    let id = service.create_principal(&ctx, request).await.map_err(|e| {
        println!("❌ {}", e.user_message());
        e
    })?;

    println!("\n✓ Administrator account created");
    println!("  Id: {}", id);
    println!("  Username: {}", username);
    if generated {
        println!("  Password: {}", password);
        println!("  ⚠️  Password change required on first login");
    }

    Ok(())
}

/// Prompt for the administrator password
///
/// Default is to generate one.
///
/// # Returns
/// * `Ok((password, generated))` - Valid password and whether it was generated
/// * `Err(...)` - I/O error
fn prompt_for_password(
    crypto: &CryptoProvider,
    username: &str,
) -> Result<(String, bool), Box<dyn std::error::Error>> {
    loop {
        // ANSI codes: \x1b[1m = bold, \x1b[36m = cyan, \x1b[0m = reset
        print!("Generate password for {} automatically? (\x1b[1m\x1b[36mY\x1b[0m/n) [default: Y]: ", username);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim().to_lowercase();

        match input.as_str() {
            "" | "y" | "yes" => {
                let password = crypto.generate_secure_password();
                println!("✓ Password auto-generated");
                return Ok((password, true));
            }
            "n" | "no" => loop {
                print!("Enter password for {}: ", username);
                io::stdout().flush()?;

                let mut password = String::new();
                io::stdin().read_line(&mut password)?;
                let password = password.trim().to_string();

                if password.is_empty() {
                    println!("❌ Password cannot be empty");
                    continue;
                }

                match validate_password(&password) {
                    Ok(()) => {
                        println!("✓ Password validated successfully");
                        return Ok((password, false));
                    }
                    Err(e) => {
                        println!("❌ Password validation failed: {}", e);
                        println!("Please try again or press Ctrl+C to cancel.");
                    }
                }
            },
            _ => {
                println!("Invalid input. Please enter 'y'/'yes', 'n'/'no', or press Enter for default.");
            }
        }
    }
}
