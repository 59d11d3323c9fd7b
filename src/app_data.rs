use std::sync::Arc;

use crate::audit::AuditLogger;
use crate::config::{DatabaseConnections, SecuritySettings};
use crate::providers::{Clock, CryptoProvider, SystemClock};
use crate::stores::{ActivityLog, AuditStore, CredentialStore, SqlCredentialStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once by the process and shared with the
/// services, which extract what they need.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(connections, settings)
///   ↓ creates once
///   ├─ credential_store (Arc<dyn CredentialStore>)
///   ├─ audit_store (Arc<AuditStore>)
///   ├─ audit_logger (Arc<AuditLogger>)
///   ├─ crypto (CryptoProvider)
///   └─ clock (Arc<dyn Clock>)
///   ↓ wrapped in Arc<AppData>
///   ├─ AuthService::new(app_data)
///   └─ AdminService::new(app_data)
/// ```
pub struct AppData {
    pub credential_store: Arc<dyn CredentialStore>,
    pub activity_log: Arc<dyn ActivityLog>,
    pub audit_logger: Arc<AuditLogger>,
    pub crypto: CryptoProvider,
    pub clock: Arc<dyn Clock>,
    pub security: SecuritySettings,
}

impl AppData {
    /// Build application data over connected and migrated databases
    pub fn init(connections: &DatabaseConnections, security: SecuritySettings) -> Self {
        tracing::info!("Initializing AppData...");

        tracing::debug!("Creating stores...");
        let audit_store: Arc<dyn ActivityLog> = Arc::new(AuditStore::new(connections.audit.clone()));
        let credential_store: Arc<dyn CredentialStore> =
            Arc::new(SqlCredentialStore::new(connections.auth.clone()));

        let app_data = Self::from_parts(credential_store, audit_store, Arc::new(SystemClock), security);

        tracing::info!(
            lockout_threshold = security.lockout_threshold,
            hash_algorithm = ?security.hash_algorithm,
            "AppData initialized"
        );
        app_data
    }

    /// Assemble application data from already-built collaborators
    ///
    /// Used when the credential store or activity log is provided by the
    /// surrounding system instead of the bundled SeaORM implementations.
    pub fn from_parts(
        credential_store: Arc<dyn CredentialStore>,
        activity_log: Arc<dyn ActivityLog>,
        clock: Arc<dyn Clock>,
        security: SecuritySettings,
    ) -> Self {
        let audit_logger = Arc::new(AuditLogger::new(activity_log.clone(), clock.clone()));

        Self {
            credential_store,
            activity_log,
            audit_logger,
            crypto: CryptoProvider::new(security.hash_algorithm),
            clock,
            security,
        }
    }
}
