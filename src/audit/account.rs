use super::AuditLogger;
use crate::errors::InternalError;
use crate::types::{ActivityKind, PrincipalId, RequestContext, RoleId};

impl AuditLogger {
    /// Log a self-service password change
    pub async fn log_password_changed(
        &self,
        ctx: &RequestContext,
        principal_id: PrincipalId,
        username: &str,
    ) -> Result<(), InternalError> {
        self.builder(ActivityKind::PasswordChanged)
            .with_context(ctx)
            .principal(principal_id, username)
            .description("Password changed successfully")
            .write()
            .await
    }

    /// Log a rejected password change
    ///
    /// # Arguments
    /// * `reason` - "Invalid current password" or the policy violation
    pub async fn log_password_change_failed(
        &self,
        ctx: &RequestContext,
        principal_id: PrincipalId,
        username: &str,
        reason: &str,
    ) -> Result<(), InternalError> {
        self.builder(ActivityKind::PasswordChangeFailed)
            .with_context(ctx)
            .principal(principal_id, username)
            .description(reason)
            .failed(reason)
            .write()
            .await
    }

    /// Log an administrative password reset
    pub async fn log_password_reset(
        &self,
        ctx: &RequestContext,
        principal_id: PrincipalId,
        username: &str,
        reset_by: &str,
    ) -> Result<(), InternalError> {
        self.builder(ActivityKind::PasswordReset)
            .with_context(ctx)
            .principal(principal_id, username)
            .description(format!("Password reset by {}", reset_by))
            .write()
            .await
    }

    /// Log a role grant
    pub async fn log_role_assigned(
        &self,
        ctx: &RequestContext,
        principal_id: PrincipalId,
        username: &str,
        role_id: &RoleId,
        granted_by: &str,
    ) -> Result<(), InternalError> {
        self.builder(ActivityKind::RoleAssigned)
            .with_context(ctx)
            .principal(principal_id, username)
            .description(format!("Role {} assigned by {}", role_id, granted_by))
            .write()
            .await
    }

    /// Log principal creation
    pub async fn log_user_created(
        &self,
        ctx: &RequestContext,
        principal_id: PrincipalId,
        username: &str,
        created_by: &str,
    ) -> Result<(), InternalError> {
        self.builder(ActivityKind::UserCreated)
            .with_context(ctx)
            .principal(principal_id, username)
            .description(format!("User {} created by {}", username, created_by))
            .write()
            .await
    }

    /// Log a profile, status or lock change
    pub async fn log_user_updated(
        &self,
        ctx: &RequestContext,
        principal_id: PrincipalId,
        username: &str,
        description: &str,
    ) -> Result<(), InternalError> {
        self.builder(ActivityKind::UserUpdated)
            .with_context(ctx)
            .principal(principal_id, username)
            .description(description)
            .write()
            .await
    }

    /// Log a deactivation
    pub async fn log_user_deleted(
        &self,
        ctx: &RequestContext,
        principal_id: PrincipalId,
        username: &str,
        deleted_by: &str,
    ) -> Result<(), InternalError> {
        self.builder(ActivityKind::UserDeleted)
            .with_context(ctx)
            .principal(principal_id, username)
            .description(format!("User deactivated by {}", deleted_by))
            .write()
            .await
    }
}
