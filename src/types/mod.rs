// Types layer - All data structures
pub mod db;
pub mod internal;

pub use internal::audit::{ActivityKind, ActivityRecord};
pub use internal::context::{RequestContext, RequestId, RequestSource};
pub use internal::principal::{
    AuthenticatedPrincipal, FailedAttemptOutcome, NewPrincipal, NewPrincipalRecord, PasswordHash,
    PasswordUpdate, Principal, PrincipalId, PrincipalUpdate, PrincipalView, Role, RoleAssignment,
    RoleGrant, RoleId, RoleSet, role_set,
};
