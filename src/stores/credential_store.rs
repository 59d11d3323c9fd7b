use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::db::{role, user, user_role};
use crate::types::internal::principal::from_unix;
use crate::types::{
    FailedAttemptOutcome, NewPrincipalRecord, PasswordUpdate, Principal, PrincipalId,
    PrincipalUpdate, Role, RoleAssignment, RoleGrant, RoleId,
};

/// Persistence contract consumed by the authentication and account services
///
/// Every method touches a single principal's record. Methods that change more
/// than one field do so as one unit.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Principal>, InternalError>;

    async fn find_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, InternalError>;

    /// Add one to the failed-attempt counter and lock the account when the new
    /// count reaches `threshold`, as a single atomic step
    async fn increment_failed_attempts(
        &self,
        id: PrincipalId,
        threshold: u32,
    ) -> Result<FailedAttemptOutcome, InternalError>;

    /// Set the counter to zero; the lock flag is left alone
    async fn reset_failed_attempts(&self, id: PrincipalId) -> Result<(), InternalError>;

    /// Reset the counter and stamp the last-login time
    ///
    /// Applies only while the account is active and unlocked. Returns `false`
    /// when the row no longer qualifies (locked, deactivated or gone), in which
    /// case nothing is written.
    async fn record_successful_login(
        &self,
        id: PrincipalId,
        at: DateTime<Utc>,
    ) -> Result<bool, InternalError>;

    /// Store a new hash; also resets the counter and clears the lock
    async fn set_password_hash(
        &self,
        id: PrincipalId,
        update: PasswordUpdate,
    ) -> Result<(), InternalError>;

    /// Administrative unlock: clears the lock and the counter
    async fn unlock(
        &self,
        id: PrincipalId,
        unlocked_by: &str,
        at: DateTime<Utc>,
    ) -> Result<(), InternalError>;

    /// Active role assignments, ordered by role name
    async fn roles_for(&self, id: PrincipalId) -> Result<Vec<RoleAssignment>, InternalError>;

    async fn assign_role(
        &self,
        id: PrincipalId,
        role_id: &RoleId,
        granted_by: &str,
        at: DateTime<Utc>,
    ) -> Result<RoleGrant, InternalError>;

    /// Insert a principal together with its initial role grants
    async fn create_principal(
        &self,
        record: NewPrincipalRecord,
    ) -> Result<PrincipalId, InternalError>;

    async fn update_profile(
        &self,
        id: PrincipalId,
        update: &PrincipalUpdate,
        modified_by: &str,
        at: DateTime<Utc>,
    ) -> Result<(), InternalError>;

    /// All principals ordered by username
    async fn list_principals(&self) -> Result<Vec<Principal>, InternalError>;

    /// Active roles ordered by name
    async fn list_roles(&self) -> Result<Vec<Role>, InternalError>;
}

/// SeaORM-backed credential store
pub struct SqlCredentialStore {
    db: DatabaseConnection,
}

impl SqlCredentialStore {
    /// Create a new SqlCredentialStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn grant_in_txn(
        txn: &DatabaseTransaction,
        id: PrincipalId,
        role_id: &RoleId,
        granted_by: &str,
        at: DateTime<Utc>,
    ) -> Result<RoleGrant, InternalError> {
        let principal = user::Entity::find_by_id(id.0)
            .one(txn)
            .await
            .map_err(|e| InternalError::database("assign_role_find_user", e))?;
        if principal.is_none() {
            return Ok(RoleGrant::PrincipalUnknown);
        }

        let role = role::Entity::find_by_id(role_id.as_str().to_owned())
            .one(txn)
            .await
            .map_err(|e| InternalError::database("assign_role_find_role", e))?;
        if !role.is_some_and(|r| r.is_active) {
            return Ok(RoleGrant::RoleUnknown);
        }

        let held = user_role::Entity::find_by_id((id.0, role_id.as_str().to_owned()))
            .one(txn)
            .await
            .map_err(|e| InternalError::database("assign_role_find_grant", e))?;
        if held.is_some() {
            return Ok(RoleGrant::AlreadyAssigned);
        }

        let grant = user_role::ActiveModel {
            user_id: Set(id.0),
            role_id: Set(role_id.as_str().to_owned()),
            assigned_by: Set(granted_by.to_owned()),
            assigned_at: Set(at.timestamp()),
        };

        match user_role::Entity::insert(grant).exec_without_returning(txn).await {
            Ok(_) => Ok(RoleGrant::Assigned),
            // a concurrent grant of the same pair won the race
            Err(e) if is_unique_violation(&e) => Ok(RoleGrant::AlreadyAssigned),
            Err(e) => Err(InternalError::database("assign_role_insert", e)),
        }
    }

    async fn create_in_txn(
        txn: &DatabaseTransaction,
        record: NewPrincipalRecord,
    ) -> Result<PrincipalId, InternalError> {
        let username_taken = user::Entity::find()
            .filter(user::Column::Username.eq(&record.username))
            .one(txn)
            .await
            .map_err(|e| InternalError::database("create_principal_check_username", e))?;
        if username_taken.is_some() {
            return Err(CredentialError::DuplicateUsername(record.username).into());
        }

        let email_taken = user::Entity::find()
            .filter(user::Column::Email.eq(&record.email))
            .one(txn)
            .await
            .map_err(|e| InternalError::database("create_principal_check_email", e))?;
        if email_taken.is_some() {
            return Err(CredentialError::DuplicateEmail(record.email).into());
        }

        for role_id in &record.roles {
            let role = role::Entity::find_by_id(role_id.as_str().to_owned())
                .one(txn)
                .await
                .map_err(|e| InternalError::database("create_principal_check_role", e))?;
            if !role.is_some_and(|r| r.is_active) {
                return Err(CredentialError::RoleNotFound(role_id.to_string()).into());
            }
        }

        let created_at = record.created_at.timestamp();
        let new_user = user::ActiveModel {
            username: Set(record.username.clone()),
            email: Set(record.email.clone()),
            password_hash: Set(record.password_hash.0),
            first_name: Set(record.first_name),
            last_name: Set(record.last_name),
            is_active: Set(true),
            is_locked: Set(false),
            failed_login_attempts: Set(0),
            must_change_password: Set(record.must_change_password),
            password_changed_at: Set(Some(created_at)),
            last_login_at: Set(None),
            created_at: Set(created_at),
            created_by: Set(record.created_by.clone()),
            updated_at: Set(None),
            updated_by: Set(None),
            ..Default::default()
        };

        let inserted = new_user.insert(txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                if e.to_string().contains("email") {
                    CredentialError::DuplicateEmail(record.email.clone()).into()
                } else {
                    CredentialError::DuplicateUsername(record.username.clone()).into()
                }
            } else {
                InternalError::database("create_principal_insert", e)
            }
        })?;

        let mut seen: Vec<&RoleId> = Vec::new();
        for role_id in &record.roles {
            if seen.contains(&role_id) {
                continue;
            }
            seen.push(role_id);

            let grant = user_role::ActiveModel {
                user_id: Set(inserted.id),
                role_id: Set(role_id.as_str().to_owned()),
                assigned_by: Set(record.created_by.clone()),
                assigned_at: Set(created_at),
            };
            user_role::Entity::insert(grant)
                .exec_without_returning(txn)
                .await
                .map_err(|e| InternalError::database("create_principal_grant_role", e))?;
        }

        Ok(PrincipalId(inserted.id))
    }

    async fn update_in_txn(
        txn: &DatabaseTransaction,
        id: PrincipalId,
        update: &PrincipalUpdate,
        modified_by: &str,
        at: DateTime<Utc>,
    ) -> Result<(), InternalError> {
        let existing = user::Entity::find_by_id(id.0)
            .one(txn)
            .await
            .map_err(|e| InternalError::database("update_profile_find_user", e))?
            .ok_or_else(|| CredentialError::PrincipalNotFound(id.to_string()))?;

        if let Some(email) = &update.email {
            if *email != existing.email {
                let taken = user::Entity::find()
                    .filter(user::Column::Email.eq(email))
                    .filter(user::Column::Id.ne(id.0))
                    .one(txn)
                    .await
                    .map_err(|e| InternalError::database("update_profile_check_email", e))?;
                if taken.is_some() {
                    return Err(CredentialError::DuplicateEmail(email.clone()).into());
                }
            }
        }

        let mut model: user::ActiveModel = existing.into();
        if let Some(email) = &update.email {
            model.email = Set(email.clone());
        }
        if let Some(first_name) = &update.first_name {
            model.first_name = Set(Some(first_name.clone()));
        }
        if let Some(last_name) = &update.last_name {
            model.last_name = Set(Some(last_name.clone()));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(Some(at.timestamp()));
        model.updated_by = Set(Some(modified_by.to_owned()));

        model.update(txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                CredentialError::DuplicateEmail(update.email.clone().unwrap_or_default()).into()
            } else {
                InternalError::database("update_profile", e)
            }
        })?;

        Ok(())
    }

    async fn begin(&self) -> Result<DatabaseTransaction, InternalError> {
        self.db.begin().await.map_err(InternalError::transaction_begin)
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Fail with PrincipalNotFound when an UPDATE touched no row
fn ensure_updated(rows_affected: u64, id: PrincipalId) -> Result<(), InternalError> {
    if rows_affected == 0 {
        Err(CredentialError::PrincipalNotFound(id.to_string()).into())
    } else {
        Ok(())
    }
}

async fn find_user<C: ConnectionTrait>(
    conn: &C,
    id: PrincipalId,
    operation: &str,
) -> Result<Option<user::Model>, InternalError> {
    user::Entity::find_by_id(id.0)
        .one(conn)
        .await
        .map_err(|e| InternalError::database(operation, e))
}

#[async_trait]
impl CredentialStore for SqlCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Principal>, InternalError> {
        let found = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_by_username", e))?;

        Ok(found.map(Principal::from))
    }

    async fn find_by_id(&self, id: PrincipalId) -> Result<Option<Principal>, InternalError> {
        Ok(find_user(&self.db, id, "find_by_id").await?.map(Principal::from))
    }

    async fn increment_failed_attempts(
        &self,
        id: PrincipalId,
        threshold: u32,
    ) -> Result<FailedAttemptOutcome, InternalError> {
        let txn = self.begin().await?;

        // increment in SQL so concurrent attempts never read-modify-write a stale count
        let result = user::Entity::update_many()
            .col_expr(
                user::Column::FailedLoginAttempts,
                Expr::col(user::Column::FailedLoginAttempts).add(1),
            )
            .filter(user::Column::Id.eq(id.0))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("increment_failed_attempts", e))?;
        ensure_updated(result.rows_affected, id)?;

        let row = find_user(&txn, id, "increment_failed_attempts_reload")
            .await?
            .ok_or_else(|| CredentialError::PrincipalNotFound(id.to_string()))?;

        let attempts = row.failed_login_attempts.max(0) as u32;
        let newly_locked = attempts >= threshold && !row.is_locked;

        if newly_locked {
            user::Entity::update_many()
                .col_expr(user::Column::IsLocked, Expr::value(true))
                .filter(user::Column::Id.eq(id.0))
                .exec(&txn)
                .await
                .map_err(|e| InternalError::database("lock_account", e))?;
        }

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        tracing::debug!(principal_id = %id, attempts, newly_locked, "Failed attempt recorded");

        Ok(FailedAttemptOutcome {
            attempts,
            locked: row.is_locked || newly_locked,
            newly_locked,
        })
    }

    async fn reset_failed_attempts(&self, id: PrincipalId) -> Result<(), InternalError> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::FailedLoginAttempts, Expr::value(0))
            .filter(user::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("reset_failed_attempts", e))?;

        ensure_updated(result.rows_affected, id)
    }

    async fn record_successful_login(
        &self,
        id: PrincipalId,
        at: DateTime<Utc>,
    ) -> Result<bool, InternalError> {
        // a lock taken after the caller's lookup must win over this login
        let result = user::Entity::update_many()
            .col_expr(user::Column::FailedLoginAttempts, Expr::value(0))
            .col_expr(user::Column::LastLoginAt, Expr::value(at.timestamp()))
            .filter(user::Column::Id.eq(id.0))
            .filter(user::Column::IsLocked.eq(false))
            .filter(user::Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("record_successful_login", e))?;

        Ok(result.rows_affected > 0)
    }

    async fn set_password_hash(
        &self,
        id: PrincipalId,
        update: PasswordUpdate,
    ) -> Result<(), InternalError> {
        let changed_at = update.changed_at.timestamp();

        // hash, flag, unlock and counter reset in one statement
        let result = user::Entity::update_many()
            .col_expr(user::Column::PasswordHash, Expr::value(update.password_hash.0))
            .col_expr(
                user::Column::MustChangePassword,
                Expr::value(update.must_change_password),
            )
            .col_expr(user::Column::PasswordChangedAt, Expr::value(changed_at))
            .col_expr(user::Column::FailedLoginAttempts, Expr::value(0))
            .col_expr(user::Column::IsLocked, Expr::value(false))
            .col_expr(user::Column::UpdatedAt, Expr::value(changed_at))
            .col_expr(user::Column::UpdatedBy, Expr::value(update.changed_by))
            .filter(user::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("set_password_hash", e))?;

        ensure_updated(result.rows_affected, id)
    }

    async fn unlock(
        &self,
        id: PrincipalId,
        unlocked_by: &str,
        at: DateTime<Utc>,
    ) -> Result<(), InternalError> {
        let result = user::Entity::update_many()
            .col_expr(user::Column::IsLocked, Expr::value(false))
            .col_expr(user::Column::FailedLoginAttempts, Expr::value(0))
            .col_expr(user::Column::UpdatedAt, Expr::value(at.timestamp()))
            .col_expr(user::Column::UpdatedBy, Expr::value(unlocked_by))
            .filter(user::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("unlock", e))?;

        ensure_updated(result.rows_affected, id)
    }

    async fn roles_for(&self, id: PrincipalId) -> Result<Vec<RoleAssignment>, InternalError> {
        let rows = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(id.0))
            .find_also_related(role::Entity)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("roles_for", e))?;

        let mut assignments: Vec<RoleAssignment> = rows
            .into_iter()
            .filter_map(|(grant, role)| {
                let role = role.filter(|r| r.is_active)?;
                Some(RoleAssignment {
                    role_id: RoleId::from(role.id.as_str()),
                    role_name: role.name,
                    description: role.description,
                    granted_by: grant.assigned_by,
                    granted_at: from_unix(grant.assigned_at),
                })
            })
            .collect();
        assignments.sort_by(|a, b| a.role_name.cmp(&b.role_name));

        Ok(assignments)
    }

    async fn assign_role(
        &self,
        id: PrincipalId,
        role_id: &RoleId,
        granted_by: &str,
        at: DateTime<Utc>,
    ) -> Result<RoleGrant, InternalError> {
        let txn = self.begin().await?;

        match Self::grant_in_txn(&txn, id, role_id, granted_by, at).await {
            Ok(RoleGrant::Assigned) => {
                txn.commit().await.map_err(InternalError::transaction_commit)?;
                Ok(RoleGrant::Assigned)
            }
            Ok(other) => {
                txn.rollback()
                    .await
                    .map_err(|e| InternalError::database("assign_role_rollback", e))?;
                Ok(other)
            }
            Err(e) => {
                let _ = txn.rollback().await;
                Err(e)
            }
        }
    }

    async fn create_principal(
        &self,
        record: NewPrincipalRecord,
    ) -> Result<PrincipalId, InternalError> {
        let txn = self.begin().await?;

        match Self::create_in_txn(&txn, record).await {
            Ok(id) => {
                txn.commit().await.map_err(InternalError::transaction_commit)?;
                Ok(id)
            }
            Err(e) => {
                let _ = txn.rollback().await;
                Err(e)
            }
        }
    }

    async fn update_profile(
        &self,
        id: PrincipalId,
        update: &PrincipalUpdate,
        modified_by: &str,
        at: DateTime<Utc>,
    ) -> Result<(), InternalError> {
        let txn = self.begin().await?;

        match Self::update_in_txn(&txn, id, update, modified_by, at).await {
            Ok(()) => txn.commit().await.map_err(InternalError::transaction_commit),
            Err(e) => {
                let _ = txn.rollback().await;
                Err(e)
            }
        }
    }

    async fn list_principals(&self) -> Result<Vec<Principal>, InternalError> {
        let users = user::Entity::find()
            .order_by_asc(user::Column::Username)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_principals", e))?;

        Ok(users.into_iter().map(Principal::from).collect())
    }

    async fn list_roles(&self) -> Result<Vec<Role>, InternalError> {
        let roles = role::Entity::find()
            .filter(role::Column::IsActive.eq(true))
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_roles", e))?;

        Ok(roles.into_iter().map(Role::from).collect())
    }
}

impl std::fmt::Debug for SqlCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlCredentialStore")
            .field("db", &"<connection>")
            .finish()
    }
}
