use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::db::activity_log;
use crate::types::internal::principal::{PrincipalId, from_unix};

/// Kinds of activity recorded in the activity log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ActivityKind {
    LoginSuccess,
    LoginFailed,
    PasswordChanged,
    PasswordReset,
    PasswordChangeFailed,
    UserCreated,
    UserUpdated,
    UserDeleted,
    RoleAssigned,
}

impl ActivityKind {
    /// Convert ActivityKind to string representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoginSuccess => "LOGIN_SUCCESS",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::PasswordChanged => "PASSWORD_CHANGED",
            Self::PasswordReset => "PASSWORD_RESET",
            Self::PasswordChangeFailed => "PASSWORD_CHANGE_FAILED",
            Self::UserCreated => "USER_CREATED",
            Self::UserUpdated => "USER_UPDATED",
            Self::UserDeleted => "USER_DELETED",
            Self::RoleAssigned => "ROLE_ASSIGNED",
        }
    }

    /// Parse the stored representation back into a kind
    pub fn parse(value: &str) -> Option<Self> {
        let kind = match value {
            "LOGIN_SUCCESS" => Self::LoginSuccess,
            "LOGIN_FAILED" => Self::LoginFailed,
            "PASSWORD_CHANGED" => Self::PasswordChanged,
            "PASSWORD_RESET" => Self::PasswordReset,
            "PASSWORD_CHANGE_FAILED" => Self::PasswordChangeFailed,
            "USER_CREATED" => Self::UserCreated,
            "USER_UPDATED" => Self::UserUpdated,
            "USER_DELETED" => Self::UserDeleted,
            "ROLE_ASSIGNED" => Self::RoleAssigned,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only activity log entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRecord {
    /// None when a login names a username that does not exist
    pub principal_id: Option<PrincipalId>,
    /// Username as typed by the caller
    pub username: String,
    pub kind: ActivityKind,
    pub description: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub success: bool,
    pub error_message: Option<String>,
    pub request_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<activity_log::Model> for ActivityRecord {
    type Error = String;

    fn try_from(row: activity_log::Model) -> Result<Self, Self::Error> {
        let kind = ActivityKind::parse(&row.activity_type).ok_or(row.activity_type.clone())?;
        Ok(Self {
            principal_id: row.user_id.map(PrincipalId),
            username: row.username,
            kind,
            description: row.description,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            success: row.success,
            error_message: row.error_message,
            request_id: row.request_id,
            created_at: from_unix(row.created_at),
        })
    }
}
