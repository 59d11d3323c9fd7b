use super::AuditLogger;
use crate::errors::InternalError;
use crate::types::{ActivityKind, PrincipalId, RequestContext};

impl AuditLogger {
    /// Log a successful login
    pub async fn log_login_success(
        &self,
        ctx: &RequestContext,
        principal_id: PrincipalId,
        username: &str,
    ) -> Result<(), InternalError> {
        self.builder(ActivityKind::LoginSuccess)
            .with_context(ctx)
            .principal(principal_id, username)
            .description("User logged in successfully")
            .write()
            .await
    }

    /// Log a failed login
    ///
    /// # Arguments
    /// * `ctx` - Request context with the caller's network origin
    /// * `principal_id` - None when the username did not resolve
    /// * `username` - Username as typed by the caller
    /// * `description` - Specific internal reason, e.g. "Invalid password (Attempt 3)"
    /// * `error` - Error reported to the caller
    pub async fn log_login_failed(
        &self,
        ctx: &RequestContext,
        principal_id: Option<PrincipalId>,
        username: &str,
        description: &str,
        error: &str,
    ) -> Result<(), InternalError> {
        let builder = self.builder(ActivityKind::LoginFailed).with_context(ctx);
        let builder = match principal_id {
            Some(id) => builder.principal(id, username),
            None => builder.username(username),
        };

        builder.description(description).failed(error).write().await
    }
}
