use std::sync::LazyLock;

use crate::errors::AuthError;
use crate::types::{RoleId, RoleSet, role_set};

pub const ADMIN: &str = "ADMIN";
pub const REPORT_MANAGER: &str = "REPORT_MANAGER";
pub const REPORT_ADMIN: &str = "REPORT_ADMIN";
pub const REPORT_VIEWER: &str = "REPORT_VIEWER";
pub const REPORT_EXECUTOR: &str = "REPORT_EXECUTOR";

/// Roles allowed to manage users and role grants
pub static USER_ADMINISTRATION: LazyLock<RoleSet> =
    LazyLock::new(|| role_set([ADMIN, REPORT_ADMIN]));

/// Roles allowed to create and edit report configurations
pub static REPORT_MANAGEMENT: LazyLock<RoleSet> =
    LazyLock::new(|| role_set([ADMIN, REPORT_MANAGER]));

/// Decide whether a principal holding `granted` may perform an operation requiring `required`
///
/// ANY-of: one shared role is enough. An empty set on either side denies.
pub fn check(granted: &RoleSet, required: &RoleSet) -> bool {
    // iterate the smaller set, look up in the larger
    let (small, large) = if granted.len() <= required.len() {
        (granted, required)
    } else {
        (required, granted)
    };
    small.iter().any(|role| large.contains(role))
}

/// Same as [`check`] but as a `Result` for `?` at the top of protected operations
pub fn require(granted: &RoleSet, required: &RoleSet) -> Result<(), AuthError> {
    if check(granted, required) {
        Ok(())
    } else {
        tracing::warn!(
            granted = ?granted.iter().map(RoleId::as_str).collect::<Vec<_>>(),
            required = ?required.iter().map(RoleId::as_str).collect::<Vec<_>>(),
            "Authorization denied"
        );
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_overlap_allows() {
        assert!(check(&role_set(["R1", "R2"]), &role_set(["R2", "R3"])));
    }

    #[test]
    fn test_disjoint_denies() {
        assert!(!check(&role_set(["R1"]), &role_set(["R2", "R3"])));
    }

    #[test]
    fn test_empty_granted_denies() {
        assert!(!check(&RoleSet::new(), &role_set(["R1"])));
    }

    #[test]
    fn test_empty_required_denies() {
        assert!(!check(&role_set(["R1"]), &RoleSet::new()));
        assert!(!check(&RoleSet::new(), &RoleSet::new()));
    }

    #[test]
    fn test_named_role_groups() {
        let report_admin = role_set([REPORT_ADMIN]);
        assert!(check(&report_admin, &USER_ADMINISTRATION));
        assert!(!check(&report_admin, &REPORT_MANAGEMENT));

        let admin = role_set([ADMIN]);
        assert!(check(&admin, &USER_ADMINISTRATION));
        assert!(check(&admin, &REPORT_MANAGEMENT));

        let viewer = role_set([REPORT_VIEWER, REPORT_EXECUTOR]);
        assert!(!check(&viewer, &USER_ADMINISTRATION));
    }

    #[test]
    fn test_require_returns_forbidden() {
        assert_eq!(
            require(&role_set([REPORT_VIEWER]), &USER_ADMINISTRATION),
            Err(AuthError::Forbidden)
        );
        assert_eq!(require(&role_set([REPORT_MANAGER]), &REPORT_MANAGEMENT), Ok(()));
    }
}
