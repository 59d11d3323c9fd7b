use std::sync::Arc;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::errors::AuthError;
use crate::providers::{Clock, CryptoProvider};
use crate::services::password_validator::{validate_email, validate_password};
use crate::stores::CredentialStore;
use crate::types::{
    NewPrincipal, NewPrincipalRecord, Principal, PrincipalId, PrincipalUpdate, PrincipalView,
    RequestContext, Role, RoleGrant, RoleId,
};

/// Admin service that orchestrates account management operations
///
/// Creation, role grants, profile and status changes, unlock. Every
/// successful mutation is attributed to `ctx.actor` and written to the
/// activity log. Callers are expected to have passed an authorization check
/// (see `authorization::USER_ADMINISTRATION`) before reaching this service.
pub struct AdminService {
    credential_store: Arc<dyn CredentialStore>,
    crypto: CryptoProvider,
    audit_logger: Arc<AuditLogger>,
    clock: Arc<dyn Clock>,
}

impl AdminService {
    /// Create AdminService from AppData
    ///
    /// Extracts only the dependencies needed by AdminService from the centralized AppData.
    /// This follows the same pattern as AuthService.
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            credential_store: app_data.credential_store.clone(),
            crypto: app_data.crypto,
            audit_logger: app_data.audit_logger.clone(),
            clock: app_data.clock.clone(),
        }
    }

    /// Create a principal with its initial roles
    ///
    /// # Arguments
    /// * `ctx` - Request context; `ctx.actor` becomes created-by
    /// * `request` - Username, email, plaintext password, names and roles
    ///
    /// # Returns
    /// * `Ok(PrincipalId)` - Identifier assigned by the store
    /// * `Err(AuthError)` - InvalidInput, InvalidEmail, WeakPassword,
    ///   DuplicateUsername, DuplicateEmail, NotFound (unknown role) or StoreUnavailable
    pub async fn create_principal(
        &self,
        ctx: &RequestContext,
        request: NewPrincipal,
    ) -> Result<PrincipalId, AuthError> {
        let username = request.username.trim();
        let email = request.email.trim();

        if username.is_empty() {
            return Err(AuthError::InvalidInput("Username".to_string()));
        }
        if email.is_empty() {
            return Err(AuthError::InvalidInput("Email".to_string()));
        }
        if request.password.is_empty() {
            return Err(AuthError::InvalidInput("Password".to_string()));
        }
        if !validate_email(email) {
            return Err(AuthError::InvalidEmail);
        }
        validate_password(&request.password).map_err(|v| AuthError::WeakPassword(v.to_string()))?;

        let password_hash = self.crypto.hash_password(&request.password).await?;

        let record = NewPrincipalRecord {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            first_name: request.first_name,
            last_name: request.last_name,
            roles: request.roles,
            must_change_password: request.must_change_password,
            created_by: ctx.actor.clone(),
            created_at: self.clock.now(),
        };

        let id = self.credential_store.create_principal(record).await?;

        if let Err(audit_err) = self
            .audit_logger
            .log_user_created(ctx, id, username, &ctx.actor)
            .await
        {
            tracing::error!("Failed to log user creation: {:?}", audit_err);
        }

        tracing::info!(username = %username, created_by = %ctx.actor, "User created");
        Ok(id)
    }

    /// Grant a role to a principal
    ///
    /// # Returns
    /// * `Ok(())` - Role granted
    /// * `Err(AuthError::AlreadyAssigned)` - Principal already holds the role; nothing changed
    /// * `Err(AuthError::NotFound)` - Unknown principal, or unknown or inactive role
    pub async fn assign_role(
        &self,
        ctx: &RequestContext,
        principal_id: PrincipalId,
        role_id: &RoleId,
    ) -> Result<(), AuthError> {
        let grant = self
            .credential_store
            .assign_role(principal_id, role_id, &ctx.actor, self.clock.now())
            .await?;

        match grant {
            RoleGrant::Assigned => {}
            RoleGrant::AlreadyAssigned => {
                tracing::debug!(principal_id = %principal_id, role = %role_id, "Role already assigned");
                return Err(AuthError::AlreadyAssigned);
            }
            RoleGrant::RoleUnknown => return Err(AuthError::NotFound(format!("Role {}", role_id))),
            RoleGrant::PrincipalUnknown => {
                return Err(AuthError::NotFound(format!("User {}", principal_id)));
            }
        }

        let principal = self.require_principal(principal_id).await?;
        if let Err(audit_err) = self
            .audit_logger
            .log_role_assigned(ctx, principal.id, &principal.username, role_id, &ctx.actor)
            .await
        {
            tracing::error!("Failed to log role assignment: {:?}", audit_err);
        }

        tracing::info!(
            username = %principal.username,
            role = %role_id,
            granted_by = %ctx.actor,
            "Role assigned"
        );
        Ok(())
    }

    /// Apply profile and status changes
    ///
    /// An update with no fields set succeeds without touching the store.
    pub async fn update_principal(
        &self,
        ctx: &RequestContext,
        principal_id: PrincipalId,
        mut update: PrincipalUpdate,
    ) -> Result<(), AuthError> {
        if update.is_empty() {
            return Ok(());
        }

        if let Some(email) = update.email.take() {
            let email = email.trim().to_string();
            if !validate_email(&email) {
                return Err(AuthError::InvalidEmail);
            }
            update.email = Some(email);
        }

        let principal = self.require_principal(principal_id).await?;
        self.credential_store
            .update_profile(principal.id, &update, &ctx.actor, self.clock.now())
            .await?;

        let description = format!("User information updated by {}", ctx.actor);
        if let Err(audit_err) = self
            .audit_logger
            .log_user_updated(ctx, principal.id, &principal.username, &description)
            .await
        {
            tracing::error!("Failed to log user update: {:?}", audit_err);
        }

        tracing::info!(username = %principal.username, modified_by = %ctx.actor, "User updated");
        Ok(())
    }

    /// Deactivate a principal; there is no hard delete
    pub async fn deactivate_principal(
        &self,
        ctx: &RequestContext,
        principal_id: PrincipalId,
    ) -> Result<(), AuthError> {
        let principal = self.require_principal(principal_id).await?;
        let update = PrincipalUpdate {
            is_active: Some(false),
            ..Default::default()
        };
        self.credential_store
            .update_profile(principal.id, &update, &ctx.actor, self.clock.now())
            .await?;

        if let Err(audit_err) = self
            .audit_logger
            .log_user_deleted(ctx, principal.id, &principal.username, &ctx.actor)
            .await
        {
            tracing::error!("Failed to log user deactivation: {:?}", audit_err);
        }

        tracing::info!(username = %principal.username, deleted_by = %ctx.actor, "User deactivated");
        Ok(())
    }

    /// Clear the lock and failed-attempt counter without touching the password
    pub async fn unlock_principal(
        &self,
        ctx: &RequestContext,
        principal_id: PrincipalId,
    ) -> Result<(), AuthError> {
        let principal = self.require_principal(principal_id).await?;
        self.credential_store
            .unlock(principal.id, &ctx.actor, self.clock.now())
            .await?;

        let description = format!("Account unlocked by {}", ctx.actor);
        if let Err(audit_err) = self
            .audit_logger
            .log_user_updated(ctx, principal.id, &principal.username, &description)
            .await
        {
            tracing::error!("Failed to log account unlock: {:?}", audit_err);
        }

        tracing::info!(username = %principal.username, unlocked_by = %ctx.actor, "Account unlocked");
        Ok(())
    }

    pub async fn get_principal(&self, principal_id: PrincipalId) -> Result<PrincipalView, AuthError> {
        let principal = self.require_principal(principal_id).await?;
        self.view(principal).await
    }

    pub async fn find_principal(&self, username: &str) -> Result<PrincipalView, AuthError> {
        let principal = self
            .credential_store
            .find_by_username(username)
            .await?
            .ok_or_else(|| AuthError::NotFound(format!("User {}", username)))?;
        self.view(principal).await
    }

    /// All principals ordered by username, each with its active roles
    pub async fn list_principals(&self) -> Result<Vec<PrincipalView>, AuthError> {
        let principals = self.credential_store.list_principals().await?;
        let mut views = Vec::with_capacity(principals.len());
        for principal in principals {
            views.push(self.view(principal).await?);
        }
        Ok(views)
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>, AuthError> {
        Ok(self.credential_store.list_roles().await?)
    }

    async fn view(&self, principal: Principal) -> Result<PrincipalView, AuthError> {
        let roles = self.credential_store.roles_for(principal.id).await?;
        Ok(PrincipalView::new(principal, roles))
    }

    async fn require_principal(&self, id: PrincipalId) -> Result<Principal, AuthError> {
        self.credential_store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::NotFound(format!("User {}", id)))
    }
}

#[cfg(test)]
#[path = "admin_service_tests.rs"]
mod admin_service_tests;
