use std::sync::Arc;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::errors::AuthError;
use crate::providers::{Clock, CryptoProvider};
use crate::services::password_validator::validate_password;
use crate::stores::CredentialStore;
use crate::types::{
    AuthenticatedPrincipal, PasswordUpdate, Principal, PrincipalId, RequestContext,
};

/// Authentication service: login with lockout, password change and reset
///
/// Login outcomes, in the order they are checked:
/// unknown user, inactive, locked, wrong password, success. Unknown user and
/// wrong password both surface as `InvalidCredentials`. A lock or deactivation
/// that lands while the password is being verified still rejects the login.
pub struct AuthService {
    credential_store: Arc<dyn CredentialStore>,
    crypto: CryptoProvider,
    audit_logger: Arc<AuditLogger>,
    clock: Arc<dyn Clock>,
    lockout_threshold: u32,
}

impl AuthService {
    /// Create AuthService from AppData
    ///
    /// # Arguments
    /// * `app_data` - Centralized application data containing all stores and providers
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            credential_store: app_data.credential_store.clone(),
            crypto: app_data.crypto,
            audit_logger: app_data.audit_logger.clone(),
            clock: app_data.clock.clone(),
            lockout_threshold: app_data.security.lockout_threshold,
        }
    }

    /// Authenticate a username and password
    ///
    /// # Arguments
    /// * `ctx` - Request context; its network origin is recorded on the activity record
    /// * `username` - Username as typed
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// * `Ok(AuthenticatedPrincipal)` - Principal, active roles and the must-change flag
    /// * `Err(AuthError)` - InvalidCredentials, AccountInactive, AccountLocked or StoreUnavailable
    pub async fn authenticate(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedPrincipal, AuthError> {
        let Some(principal) = self.credential_store.find_by_username(username).await? else {
            tracing::warn!(username = %username, "Login failed: user not found");
            self.record_login_failure(ctx, None, username, "User not found", AuthError::InvalidCredentials)
                .await;
            return Err(AuthError::InvalidCredentials);
        };

        if !principal.is_active {
            tracing::warn!(username = %username, "Login failed: account inactive");
            self.record_login_failure(ctx, Some(principal.id), username, "Account inactive", AuthError::AccountInactive)
                .await;
            return Err(AuthError::AccountInactive);
        }

        if principal.is_locked {
            tracing::warn!(username = %username, "Login failed: account locked");
            self.record_login_failure(ctx, Some(principal.id), username, "Account locked", AuthError::AccountLocked)
                .await;
            return Err(AuthError::AccountLocked);
        }

        if !self.crypto.verify_password(password, &principal.password_hash).await {
            let outcome = self
                .credential_store
                .increment_failed_attempts(principal.id, self.lockout_threshold)
                .await?;

            if outcome.newly_locked {
                tracing::warn!(
                    username = %username,
                    attempts = outcome.attempts,
                    "Account locked after too many failed login attempts"
                );
            } else {
                tracing::warn!(username = %username, attempts = outcome.attempts, "Login failed: invalid password");
            }

            let description = format!("Invalid password (Attempt {})", outcome.attempts);
            self.record_login_failure(ctx, Some(principal.id), username, &description, AuthError::InvalidCredentials)
                .await;
            return Err(AuthError::InvalidCredentials);
        }

        let recorded = self
            .credential_store
            .record_successful_login(principal.id, self.clock.now())
            .await?;
        if !recorded {
            return Err(self.reject_stale_login(ctx, principal.id, username).await?);
        }

        let roles = self.credential_store.roles_for(principal.id).await?;

        if let Err(audit_err) = self
            .audit_logger
            .log_login_success(ctx, principal.id, &principal.username)
            .await
        {
            tracing::error!("Failed to log login success: {:?}", audit_err);
        }

        tracing::info!(username = %principal.username, roles = roles.len(), "User logged in");

        Ok(AuthenticatedPrincipal {
            principal_id: principal.id,
            username: principal.username,
            email: principal.email,
            first_name: principal.first_name,
            last_name: principal.last_name,
            roles,
            must_change_password: principal.must_change_password,
        })
    }

    /// Change a password after re-verifying the current one
    ///
    /// Clears the must-change flag and any lockout state.
    ///
    /// # Returns
    /// * `Ok(())` - Password changed
    /// * `Err(AuthError)` - NotFound, WeakPassword, InvalidCurrentPassword or StoreUnavailable
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        principal_id: PrincipalId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let principal = self.require_principal(principal_id).await?;

        if let Err(violation) = validate_password(new_password) {
            let reason = violation.to_string();
            tracing::warn!(username = %principal.username, "Password change rejected: {}", reason);
            if let Err(audit_err) = self
                .audit_logger
                .log_password_change_failed(ctx, principal.id, &principal.username, &reason)
                .await
            {
                tracing::error!("Failed to log password change failure: {:?}", audit_err);
            }
            return Err(AuthError::WeakPassword(reason));
        }

        if !self.crypto.verify_password(current_password, &principal.password_hash).await {
            tracing::warn!(username = %principal.username, "Password change failed: invalid current password");
            if let Err(audit_err) = self
                .audit_logger
                .log_password_change_failed(ctx, principal.id, &principal.username, "Invalid current password")
                .await
            {
                tracing::error!("Failed to log password change failure: {:?}", audit_err);
            }
            return Err(AuthError::InvalidCurrentPassword);
        }

        let password_hash = self.crypto.hash_password(new_password).await?;
        self.credential_store
            .set_password_hash(
                principal.id,
                PasswordUpdate {
                    password_hash,
                    must_change_password: false,
                    changed_at: self.clock.now(),
                    changed_by: principal.username.clone(),
                },
            )
            .await?;

        if let Err(audit_err) = self
            .audit_logger
            .log_password_changed(ctx, principal.id, &principal.username)
            .await
        {
            tracing::error!("Failed to log password change: {:?}", audit_err);
        }

        tracing::info!(username = %principal.username, "Password changed");
        Ok(())
    }

    /// Administrative password reset; the old password is not required
    ///
    /// Always clears the lock and the failed-attempt counter.
    ///
    /// # Arguments
    /// * `principal_id` - Principal whose password is replaced
    /// * `new_password` - Must satisfy the password policy
    /// * `reset_by` - Actor recorded on the principal and in the activity log
    /// * `force_change_on_next_login` - Value for the must-change flag
    pub async fn reset_password(
        &self,
        ctx: &RequestContext,
        principal_id: PrincipalId,
        new_password: &str,
        reset_by: &str,
        force_change_on_next_login: bool,
    ) -> Result<(), AuthError> {
        validate_password(new_password).map_err(|v| AuthError::WeakPassword(v.to_string()))?;

        let principal = self.require_principal(principal_id).await?;

        let password_hash = self.crypto.hash_password(new_password).await?;
        self.credential_store
            .set_password_hash(
                principal.id,
                PasswordUpdate {
                    password_hash,
                    must_change_password: force_change_on_next_login,
                    changed_at: self.clock.now(),
                    changed_by: reset_by.to_string(),
                },
            )
            .await?;

        if let Err(audit_err) = self
            .audit_logger
            .log_password_reset(ctx, principal.id, &principal.username, reset_by)
            .await
        {
            tracing::error!("Failed to log password reset: {:?}", audit_err);
        }

        tracing::info!(
            username = %principal.username,
            reset_by = %reset_by,
            force_change_on_next_login,
            "Password reset"
        );
        Ok(())
    }

    /// The account changed state between lookup and the successful-login write
    ///
    /// Re-reads the row and reports the state that now applies.
    async fn reject_stale_login(
        &self,
        ctx: &RequestContext,
        principal_id: PrincipalId,
        username: &str,
    ) -> Result<AuthError, AuthError> {
        let current = self.credential_store.find_by_id(principal_id).await?;
        let (recorded_id, description, error) = match current {
            Some(p) if !p.is_active => (Some(p.id), "Account inactive", AuthError::AccountInactive),
            Some(p) => (Some(p.id), "Account locked", AuthError::AccountLocked),
            None => (None, "User not found", AuthError::InvalidCredentials),
        };

        tracing::warn!(username = %username, "Login failed after password check: {}", description);
        self.record_login_failure(ctx, recorded_id, username, description, error.clone())
            .await;
        Ok(error)
    }

    async fn require_principal(&self, id: PrincipalId) -> Result<Principal, AuthError> {
        self.credential_store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AuthError::NotFound(format!("User {}", id)))
    }

    async fn record_login_failure(
        &self,
        ctx: &RequestContext,
        principal_id: Option<PrincipalId>,
        username: &str,
        description: &str,
        error: AuthError,
    ) {
        if let Err(audit_err) = self
            .audit_logger
            .log_login_failed(ctx, principal_id, username, description, &error.to_string())
            .await
        {
            tracing::error!("Failed to log login failure: {:?}", audit_err);
        }
    }
}

#[cfg(test)]
#[path = "auth_service_test.rs"]
mod auth_service_test;
