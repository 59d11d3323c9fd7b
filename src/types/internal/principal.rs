use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::db;

/// Opaque numeric principal identifier, assigned by the store at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PrincipalId(pub i64);

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PrincipalId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Stable role identifier such as `ADMIN` or `REPORT_VIEWER`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RoleId(String);

impl RoleId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoleId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for RoleId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A set of role ids, as granted to a principal or required by an operation
pub type RoleSet = BTreeSet<RoleId>;

/// Build a role set from string ids
pub fn role_set<I, S>(ids: I) -> RoleSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter().map(|id| RoleId::from(id.as_ref())).collect()
}

/// Stored password hash blob
///
/// Never printed: Debug and Display both redact it.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(pub String);

impl PasswordHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[password_hash]")
    }
}

/// Full principal record as held by the credential store
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub id: PrincipalId,
    pub username: String,
    pub email: String,
    pub password_hash: PasswordHash,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub is_locked: bool,
    pub failed_login_attempts: u32,
    pub must_change_password: bool,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

pub(crate) fn from_unix(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

impl From<db::user::Model> for Principal {
    fn from(u: db::user::Model) -> Self {
        Self {
            id: PrincipalId(u.id),
            username: u.username,
            email: u.email,
            password_hash: PasswordHash(u.password_hash),
            first_name: u.first_name,
            last_name: u.last_name,
            is_active: u.is_active,
            is_locked: u.is_locked,
            failed_login_attempts: u.failed_login_attempts.max(0) as u32,
            must_change_password: u.must_change_password,
            password_changed_at: u.password_changed_at.map(from_unix),
            last_login_at: u.last_login_at.map(from_unix),
            created_at: from_unix(u.created_at),
            created_by: u.created_by,
            updated_at: u.updated_at.map(from_unix),
            updated_by: u.updated_by,
        }
    }
}

/// Role reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl From<db::role::Model> for Role {
    fn from(r: db::role::Model) -> Self {
        Self {
            id: RoleId(r.id),
            name: r.name,
            description: r.description,
            is_active: r.is_active,
        }
    }
}

/// An active role held by a principal, with who granted it and when
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleAssignment {
    pub role_id: RoleId,
    pub role_name: String,
    pub description: Option<String>,
    pub granted_by: String,
    pub granted_at: DateTime<Utc>,
}

/// Outcome of a role grant at the store level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGrant {
    Assigned,
    AlreadyAssigned,
    RoleUnknown,
    PrincipalUnknown,
}

/// Result of the atomic increment-and-maybe-lock step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailedAttemptOutcome {
    /// Counter value after this attempt
    pub attempts: u32,
    /// Lock flag after this attempt
    pub locked: bool,
    /// True only for the attempt that flipped the lock
    pub newly_locked: bool,
}

/// Administrative creation request, before hashing
#[derive(Debug, Clone)]
pub struct NewPrincipal {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: Vec<RoleId>,
    pub must_change_password: bool,
}

/// Row to insert, produced once the password has been validated and hashed
#[derive(Debug, Clone)]
pub struct NewPrincipalRecord {
    pub username: String,
    pub email: String,
    pub password_hash: PasswordHash,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: Vec<RoleId>,
    pub must_change_password: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

/// Profile and status changes; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrincipalUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
}

impl PrincipalUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.is_active.is_none()
    }
}

/// New credential state written as one unit: hash, must-change flag, unlock
#[derive(Debug, Clone)]
pub struct PasswordUpdate {
    pub password_hash: PasswordHash,
    pub must_change_password: bool,
    pub changed_at: DateTime<Utc>,
    pub changed_by: String,
}

/// Successful authentication result handed to the session layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthenticatedPrincipal {
    pub principal_id: PrincipalId,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: Vec<RoleAssignment>,
    pub must_change_password: bool,
}

impl AuthenticatedPrincipal {
    /// Role ids for authorization checks
    pub fn role_ids(&self) -> RoleSet {
        self.roles.iter().map(|r| r.role_id.clone()).collect()
    }
}

/// Principal as shown to administrators: no credential material
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrincipalView {
    pub id: PrincipalId,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub is_locked: bool,
    pub must_change_password: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub roles: Vec<RoleAssignment>,
}

impl PrincipalView {
    pub fn new(principal: Principal, roles: Vec<RoleAssignment>) -> Self {
        Self {
            id: principal.id,
            username: principal.username,
            email: principal.email,
            first_name: principal.first_name,
            last_name: principal.last_name,
            is_active: principal.is_active,
            is_locked: principal.is_locked,
            must_change_password: principal.must_change_password,
            last_login_at: principal.last_login_at,
            password_changed_at: principal.password_changed_at,
            created_at: principal.created_at,
            roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_redacted() {
        let hash = PasswordHash("$2b$12$secretsecretsecret".to_string());
        assert!(!format!("{:?}", hash).contains("secret"));
        assert!(!format!("{}", hash).contains("secret"));
    }

    #[test]
    fn test_role_set_deduplicates() {
        let roles = role_set(["ADMIN", "REPORT_VIEWER", "ADMIN"]);
        assert_eq!(roles.len(), 2);
        assert!(roles.contains(&RoleId::from("ADMIN")));
    }

    #[test]
    fn test_empty_update() {
        assert!(PrincipalUpdate::default().is_empty());
        let update = PrincipalUpdate {
            is_active: Some(false),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
