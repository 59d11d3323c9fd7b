use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::errors::internal::AuditError;
use crate::types::db::activity_log;
use crate::types::{ActivityRecord, PrincipalId};

/// Append-only sink for activity records
///
/// Callers treat a failed append as non-fatal; see `AuditLogger`.
#[async_trait]
pub trait ActivityLog: Send + Sync {
    async fn append(&self, record: ActivityRecord) -> Result<(), InternalError>;
}

/// Repository for activity record storage operations
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    /// Create a new AuditStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records for one principal in write order
    ///
    /// Used by administrators reviewing an account and by tests.
    pub async fn list_for_principal(
        &self,
        id: PrincipalId,
    ) -> Result<Vec<ActivityRecord>, InternalError> {
        let rows = activity_log::Entity::find()
            .filter(activity_log::Column::UserId.eq(id.0))
            .order_by_asc(activity_log::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_activity_for_principal", e))?;

        to_records(rows)
    }

    /// Records written under a username, including failed logins for unknown names
    pub async fn list_for_username(
        &self,
        username: &str,
    ) -> Result<Vec<ActivityRecord>, InternalError> {
        let rows = activity_log::Entity::find()
            .filter(activity_log::Column::Username.eq(username))
            .order_by_asc(activity_log::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_activity_for_username", e))?;

        to_records(rows)
    }
}

fn to_records(rows: Vec<activity_log::Model>) -> Result<Vec<ActivityRecord>, InternalError> {
    rows.into_iter()
        .map(|row| {
            ActivityRecord::try_from(row)
                .map_err(|kind| InternalError::from(AuditError::UnknownActivityType(kind)))
        })
        .collect()
}

#[async_trait]
impl ActivityLog for AuditStore {
    /// Write an activity record to the database
    ///
    /// # Errors
    ///
    /// Returns `InternalError` if the insert fails
    async fn append(&self, record: ActivityRecord) -> Result<(), InternalError> {
        let row = activity_log::ActiveModel {
            id: NotSet,
            user_id: Set(record.principal_id.map(|id| id.0)),
            username: Set(record.username),
            activity_type: Set(record.kind.as_str().to_owned()),
            description: Set(record.description),
            ip_address: Set(record.ip_address),
            user_agent: Set(record.user_agent),
            success: Set(record.success),
            error_message: Set(record.error_message),
            request_id: Set(record.request_id),
            created_at: Set(record.created_at.timestamp()),
        };

        row.insert(&self.db)
            .await
            .map_err(|e| InternalError::database("append_activity", e))?;

        Ok(())
    }
}

impl std::fmt::Debug for AuditStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditStore")
            .field("db", &"<connection>")
            .finish()
    }
}
