use std::sync::Arc;

use crate::audit::AuditBuilder;
use crate::providers::Clock;
use crate::stores::ActivityLog;
use crate::types::ActivityKind;

/// Activity logging front end used by the services
///
/// Each `log_*` method returns the append result; services log and drop
/// failures so that an unavailable activity log never fails the operation
/// being recorded.
pub struct AuditLogger {
    activity_log: Arc<dyn ActivityLog>,
    clock: Arc<dyn Clock>,
}

impl AuditLogger {
    /// Create a new AuditLogger
    ///
    /// # Arguments
    /// * `activity_log` - Sink for records
    /// * `clock` - Source of record timestamps
    pub fn new(activity_log: Arc<dyn ActivityLog>, clock: Arc<dyn Clock>) -> Self {
        Self { activity_log, clock }
    }

    /// Create an AuditBuilder for a record not covered by the `log_*` helpers
    pub fn builder(&self, kind: ActivityKind) -> AuditBuilder {
        AuditBuilder::new(self.activity_log.clone(), kind, self.clock.now())
    }
}
