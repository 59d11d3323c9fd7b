#[cfg(test)]
mod tests {
    use super::super::AdminService;
    use crate::app_data::AppData;
    use crate::errors::AuthError;
    use crate::services::AuthService;
    use crate::stores::AuditStore;
    use crate::test::utils::{setup_test_app, setup_test_app_with_broken_audit};
    use crate::types::{ActivityKind, NewPrincipal, PrincipalId, PrincipalUpdate, RequestContext, RoleId};
    use std::sync::Arc;

    const PASSWORD: &str = "Adm1n!Secret";

    /// Helper to build a creation request for `<username>@example.com`
    fn new_principal(username: &str, roles: &[&str]) -> NewPrincipal {
        NewPrincipal {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password: PASSWORD.to_string(),
            first_name: None,
            last_name: None,
            roles: roles.iter().map(|r| RoleId::from(*r)).collect(),
            must_change_password: false,
        }
    }

    fn admin_ctx() -> RequestContext {
        RequestContext::for_web().with_actor("root")
    }

    async fn setup() -> (Arc<AppData>, AdminService, Arc<AuditStore>) {
        let (app_data, audit, _clock) = setup_test_app().await;
        let service = AdminService::new(app_data.clone());
        (app_data, service, audit)
    }

    // ==================== Test Group 1: create_principal() ====================

    mod create_principal_tests {
        use super::*;

        #[tokio::test]
        async fn created_principal_can_authenticate_with_roles() {
            let (app_data, service, audit) = setup().await;

            let id = service
                .create_principal(&admin_ctx(), new_principal("alice", &["REPORT_VIEWER"]))
                .await
                .unwrap();

            let auth = AuthService::new(app_data.clone());
            let principal = auth
                .authenticate(&RequestContext::for_web(), "alice", PASSWORD)
                .await
                .unwrap();
            assert_eq!(principal.principal_id, id);
            assert_eq!(principal.roles.len(), 1);
            assert_eq!(principal.roles[0].granted_by, "root");

            let stored = app_data.credential_store.find_by_id(id).await.unwrap().unwrap();
            assert_eq!(stored.created_by, "root");

            let records = audit.list_for_principal(id).await.unwrap();
            assert_eq!(records[0].kind, ActivityKind::UserCreated);
            assert_eq!(records[0].description, "User alice created by root");
        }

        #[tokio::test]
        async fn blank_fields_are_invalid_input() {
            let (_app_data, service, _audit) = setup().await;

            let mut request = new_principal("alice", &[]);
            request.username = "   ".to_string();
            let err = service.create_principal(&admin_ctx(), request).await.unwrap_err();
            assert_eq!(err, AuthError::InvalidInput("Username".to_string()));

            let mut request = new_principal("alice", &[]);
            request.email = String::new();
            let err = service.create_principal(&admin_ctx(), request).await.unwrap_err();
            assert_eq!(err, AuthError::InvalidInput("Email".to_string()));

            let mut request = new_principal("alice", &[]);
            request.password = String::new();
            let err = service.create_principal(&admin_ctx(), request).await.unwrap_err();
            assert_eq!(err, AuthError::InvalidInput("Password".to_string()));
        }

        #[tokio::test]
        async fn malformed_email_is_rejected() {
            let (_app_data, service, _audit) = setup().await;

            let mut request = new_principal("alice", &[]);
            request.email = "not-an-email".to_string();
            let err = service.create_principal(&admin_ctx(), request).await.unwrap_err();
            assert_eq!(err, AuthError::InvalidEmail);
        }

        #[tokio::test]
        async fn weak_password_is_rejected() {
            let (app_data, service, _audit) = setup().await;

            let mut request = new_principal("alice", &[]);
            request.password = "NoDigits!!".to_string();
            let err = service.create_principal(&admin_ctx(), request).await.unwrap_err();
            assert_eq!(
                err,
                AuthError::WeakPassword("Password must contain at least one digit".to_string())
            );
            assert!(app_data.credential_store.find_by_username("alice").await.unwrap().is_none());
        }

        #[tokio::test]
        async fn duplicates_are_reported() {
            let (_app_data, service, _audit) = setup().await;
            service.create_principal(&admin_ctx(), new_principal("alice", &[])).await.unwrap();

            let mut request = new_principal("alice", &[]);
            request.email = "other@example.com".to_string();
            let err = service.create_principal(&admin_ctx(), request).await.unwrap_err();
            assert!(matches!(err, AuthError::DuplicateUsername(_)));

            let mut request = new_principal("alice2", &[]);
            request.email = "alice@example.com".to_string();
            let err = service.create_principal(&admin_ctx(), request).await.unwrap_err();
            assert!(matches!(err, AuthError::DuplicateEmail(_)));
        }

        #[tokio::test]
        async fn unknown_initial_role_is_not_found_and_nothing_is_created() {
            let (app_data, service, _audit) = setup().await;

            let err = service
                .create_principal(&admin_ctx(), new_principal("alice", &["REPORT_VIEWER", "AUDITOR"]))
                .await
                .unwrap_err();
            assert_eq!(err, AuthError::NotFound("Role AUDITOR".to_string()));
            assert!(app_data.credential_store.find_by_username("alice").await.unwrap().is_none());
        }

        #[tokio::test]
        async fn creation_succeeds_when_activity_log_is_down() {
            let app_data = setup_test_app_with_broken_audit().await;
            let service = AdminService::new(app_data.clone());

            let id = service
                .create_principal(&admin_ctx(), new_principal("alice", &[]))
                .await
                .unwrap();
            assert!(app_data.credential_store.find_by_id(id).await.unwrap().is_some());
        }
    }

    // ==================== Test Group 2: assign_role() ====================

    mod assign_role_tests {
        use super::*;

        #[tokio::test]
        async fn assign_then_reassign_is_already_assigned() {
            let (app_data, service, audit) = setup().await;
            let id = service.create_principal(&admin_ctx(), new_principal("bob", &[])).await.unwrap();
            let role = RoleId::from("REPORT_MANAGER");

            service.assign_role(&admin_ctx(), id, &role).await.unwrap();
            let err = service.assign_role(&admin_ctx(), id, &role).await.unwrap_err();
            assert_eq!(err, AuthError::AlreadyAssigned);

            let roles = app_data.credential_store.roles_for(id).await.unwrap();
            assert_eq!(roles.len(), 1);

            let kinds: Vec<ActivityKind> = audit
                .list_for_principal(id)
                .await
                .unwrap()
                .into_iter()
                .map(|r| r.kind)
                .collect();
            assert_eq!(kinds, vec![ActivityKind::UserCreated, ActivityKind::RoleAssigned]);
        }

        #[tokio::test]
        async fn unknown_role_or_principal_is_not_found() {
            let (_app_data, service, _audit) = setup().await;
            let id = service.create_principal(&admin_ctx(), new_principal("bob", &[])).await.unwrap();

            let err = service
                .assign_role(&admin_ctx(), id, &RoleId::from("AUDITOR"))
                .await
                .unwrap_err();
            assert_eq!(err, AuthError::NotFound("Role AUDITOR".to_string()));

            let err = service
                .assign_role(&admin_ctx(), PrincipalId(999), &RoleId::from("ADMIN"))
                .await
                .unwrap_err();
            assert_eq!(err, AuthError::NotFound("User 999".to_string()));
        }

        #[tokio::test]
        async fn granted_role_shows_up_on_next_login() {
            let (app_data, service, _audit) = setup().await;
            let id = service.create_principal(&admin_ctx(), new_principal("bob", &[])).await.unwrap();
            service
                .assign_role(&admin_ctx(), id, &RoleId::from("REPORT_EXECUTOR"))
                .await
                .unwrap();

            let auth = AuthService::new(app_data);
            let principal = auth
                .authenticate(&RequestContext::for_web(), "bob", PASSWORD)
                .await
                .unwrap();
            assert!(principal.role_ids().contains(&RoleId::from("REPORT_EXECUTOR")));
        }
    }

    // ==================== Test Group 3: update / deactivate / unlock ====================

    mod account_status_tests {
        use super::*;

        #[tokio::test]
        async fn empty_update_is_a_no_op() {
            let (_app_data, service, audit) = setup().await;
            let id = service.create_principal(&admin_ctx(), new_principal("carol", &[])).await.unwrap();

            service
                .update_principal(&admin_ctx(), id, PrincipalUpdate::default())
                .await
                .unwrap();

            let records = audit.list_for_principal(id).await.unwrap();
            assert_eq!(records.len(), 1);
        }

        #[tokio::test]
        async fn update_validates_email_and_stamps_modifier() {
            let (_app_data, service, audit) = setup().await;
            let id = service.create_principal(&admin_ctx(), new_principal("carol", &[])).await.unwrap();
            service.create_principal(&admin_ctx(), new_principal("dave", &[])).await.unwrap();

            let bad = PrincipalUpdate { email: Some("nope".to_string()), ..Default::default() };
            assert_eq!(
                service.update_principal(&admin_ctx(), id, bad).await.unwrap_err(),
                AuthError::InvalidEmail
            );

            let taken = PrincipalUpdate { email: Some("dave@example.com".to_string()), ..Default::default() };
            assert!(matches!(
                service.update_principal(&admin_ctx(), id, taken).await.unwrap_err(),
                AuthError::DuplicateEmail(_)
            ));

            let update = PrincipalUpdate {
                email: Some(" carol@reports.example.com ".to_string()),
                last_name: Some("Jones".to_string()),
                ..Default::default()
            };
            service
                .update_principal(&RequestContext::for_web().with_actor("ops"), id, update)
                .await
                .unwrap();

            let view = service.get_principal(id).await.unwrap();
            assert_eq!(view.email, "carol@reports.example.com");
            assert_eq!(view.last_name.as_deref(), Some("Jones"));

            let records = audit.list_for_principal(id).await.unwrap();
            let last = records.last().unwrap();
            assert_eq!(last.kind, ActivityKind::UserUpdated);
            assert_eq!(last.description, "User information updated by ops");
        }

        #[tokio::test]
        async fn deactivated_principal_cannot_log_in() {
            let (app_data, service, audit) = setup().await;
            let id = service.create_principal(&admin_ctx(), new_principal("erin", &[])).await.unwrap();

            service.deactivate_principal(&admin_ctx(), id).await.unwrap();

            let auth = AuthService::new(app_data);
            let err = auth
                .authenticate(&RequestContext::for_web(), "erin", PASSWORD)
                .await
                .unwrap_err();
            assert_eq!(err, AuthError::AccountInactive);

            let records = audit.list_for_principal(id).await.unwrap();
            assert_eq!(records[1].kind, ActivityKind::UserDeleted);
            assert_eq!(records[1].description, "User deactivated by root");
        }

        #[tokio::test]
        async fn unlock_restores_login_with_same_password() {
            let (app_data, service, _audit) = setup().await;
            let id = service.create_principal(&admin_ctx(), new_principal("frank", &[])).await.unwrap();
            let auth = AuthService::new(app_data.clone());
            let ctx = RequestContext::for_web();

            for _ in 0..5 {
                let _ = auth.authenticate(&ctx, "frank", "wrong").await;
            }
            assert_eq!(
                auth.authenticate(&ctx, "frank", PASSWORD).await.unwrap_err(),
                AuthError::AccountLocked
            );

            service.unlock_principal(&admin_ctx(), id).await.unwrap();

            let view = service.get_principal(id).await.unwrap();
            assert!(!view.is_locked);
            auth.authenticate(&ctx, "frank", PASSWORD).await.unwrap();
        }

        #[tokio::test]
        async fn operations_on_unknown_principal_are_not_found() {
            let (_app_data, service, _audit) = setup().await;
            let missing = PrincipalId(42);

            assert!(matches!(
                service.deactivate_principal(&admin_ctx(), missing).await.unwrap_err(),
                AuthError::NotFound(_)
            ));
            assert!(matches!(
                service.unlock_principal(&admin_ctx(), missing).await.unwrap_err(),
                AuthError::NotFound(_)
            ));
            assert!(matches!(
                service.get_principal(missing).await.unwrap_err(),
                AuthError::NotFound(_)
            ));
            assert!(matches!(
                service.find_principal("nobody").await.unwrap_err(),
                AuthError::NotFound(_)
            ));
        }
    }

    // ==================== Test Group 4: queries ====================

    mod query_tests {
        use super::*;

        #[tokio::test]
        async fn list_principals_includes_roles_in_username_order() {
            let (_app_data, service, _audit) = setup().await;
            service
                .create_principal(&admin_ctx(), new_principal("zed", &["ADMIN"]))
                .await
                .unwrap();
            service
                .create_principal(&admin_ctx(), new_principal("amy", &["REPORT_VIEWER", "REPORT_EXECUTOR"]))
                .await
                .unwrap();

            let views = service.list_principals().await.unwrap();
            let names: Vec<&str> = views.iter().map(|v| v.username.as_str()).collect();
            assert_eq!(names, vec!["amy", "zed"]);
            assert_eq!(views[0].roles.len(), 2);
            assert_eq!(views[1].roles[0].role_id.as_str(), "ADMIN");
        }

        #[tokio::test]
        async fn find_principal_by_username() {
            let (_app_data, service, _audit) = setup().await;
            let id = service.create_principal(&admin_ctx(), new_principal("gina", &[])).await.unwrap();

            let view = service.find_principal("gina").await.unwrap();
            assert_eq!(view.id, id);
            assert!(view.is_active);
            assert!(view.roles.is_empty());
        }

        #[tokio::test]
        async fn list_roles_returns_seeded_roles() {
            let (_app_data, service, _audit) = setup().await;

            let ids: Vec<String> = service
                .list_roles()
                .await
                .unwrap()
                .into_iter()
                .map(|r| r.id.to_string())
                .collect();
            for expected in ["ADMIN", "REPORT_ADMIN", "REPORT_EXECUTOR", "REPORT_MANAGER", "REPORT_VIEWER"] {
                assert!(ids.iter().any(|id| id == expected), "missing {}", expected);
            }
        }
    }
}
