use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::errors::InternalError;
use crate::stores::ActivityLog;
use crate::types::{ActivityKind, ActivityRecord, PrincipalId, RequestContext};

/// Builder for activity records
///
/// Provides a fluent API for filling in the record before appending it.
///
/// # Example
/// ```ignore
/// audit_logger
///     .builder(ActivityKind::UserUpdated)
///     .with_context(ctx)
///     .principal(principal.id, &principal.username)
///     .description("User unlocked by admin")
///     .write()
///     .await?;
/// ```
pub struct AuditBuilder {
    kind: ActivityKind,
    principal_id: Option<PrincipalId>,
    username: String,
    description: String,
    ip_address: Option<String>,
    user_agent: Option<String>,
    success: bool,
    error_message: Option<String>,
    request_id: Option<String>,
    created_at: DateTime<Utc>,
    log: Arc<dyn ActivityLog>,
}

impl AuditBuilder {
    /// Create a new AuditBuilder for the given activity kind
    ///
    /// # Arguments
    /// * `log` - Sink the record is appended to
    /// * `kind` - Activity kind
    /// * `created_at` - Timestamp stamped on the record
    pub fn new(log: Arc<dyn ActivityLog>, kind: ActivityKind, created_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            principal_id: None,
            username: String::new(),
            description: String::new(),
            ip_address: None,
            user_agent: None,
            success: true,
            error_message: None,
            request_id: None,
            created_at,
            log,
        }
    }

    /// Copy the network origin and request id from the RequestContext
    pub fn with_context(mut self, ctx: &RequestContext) -> Self {
        self.ip_address = ctx.ip_address.map(|ip| ip.to_string());
        self.user_agent = ctx.user_agent.clone();
        self.request_id = Some(ctx.request_id.to_string());
        self
    }

    /// Attribute the record to a known principal
    pub fn principal(mut self, id: PrincipalId, username: impl Into<String>) -> Self {
        self.principal_id = Some(id);
        self.username = username.into();
        self
    }

    /// Attribute the record to a username that may not resolve to a principal
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark the record as a failure with an error detail
    pub fn failed(mut self, error_message: impl Into<String>) -> Self {
        self.success = false;
        self.error_message = Some(error_message.into());
        self
    }

    pub fn build(self) -> (ActivityRecord, Arc<dyn ActivityLog>) {
        let record = ActivityRecord {
            principal_id: self.principal_id,
            username: self.username,
            kind: self.kind,
            description: self.description,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            success: self.success,
            error_message: self.error_message,
            request_id: self.request_id,
            created_at: self.created_at,
        };
        (record, self.log)
    }

    /// Append the record
    pub async fn write(self) -> Result<(), InternalError> {
        let (record, log) = self.build();
        log.append(record).await
    }
}
