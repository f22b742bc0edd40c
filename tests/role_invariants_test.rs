mod common;

use common::{create_user, setup_app_data};
use paceline_backend::errors::{ErrorKind, RoleError};
use paceline_backend::services::RoleService;
use std::collections::HashSet;

fn codes(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

async fn held_codes(service: &RoleService, user_id: i64) -> HashSet<String> {
    service
        .roles_of(user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|role| role.code)
        .collect()
}

#[tokio::test]
async fn a_user_never_ends_an_operation_with_zero_roles() {
    let app_data = setup_app_data().await;
    let service = RoleService::new(app_data.clone());

    let user_id = create_user(&app_data, "invariant_user").await;
    service
        .create_role("Editor", "editor", None)
        .await
        .unwrap();

    // Build up, tear down, always through the service
    service
        .assign_roles(user_id, &codes(&["user"]))
        .await
        .unwrap();
    service
        .assign_roles(user_id, &codes(&["editor"]))
        .await
        .unwrap();
    service.remove_role(user_id, "user").await.unwrap();
    assert_eq!(held_codes(&service, user_id).await.len(), 1);

    // The floor holds
    let err = service.remove_role(user_id, "editor").await.unwrap_err();
    assert!(matches!(err, RoleError::LastRoleProtected));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(held_codes(&service, user_id).await.len(), 1);

    // Replacement cannot reach the zero-role state either
    let err = service.replace_roles(user_id, &[]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(held_codes(&service, user_id).await.len(), 1);
}

#[tokio::test]
async fn failed_bulk_assignment_applies_nothing() {
    let app_data = setup_app_data().await;
    let service = RoleService::new(app_data.clone());

    let user_id = create_user(&app_data, "bulk_user").await;

    let err = service
        .assign_roles(user_id, &codes(&["super_admin", "nonexistent"]))
        .await
        .unwrap_err();

    match &err {
        RoleError::RolesNotFound { codes } => {
            assert_eq!(codes, &vec!["nonexistent".to_string()]);
        }
        other => panic!("expected RolesNotFound, got {:?}", other),
    }
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // The resolvable half of the request must not have been applied
    assert!(held_codes(&service, user_id).await.is_empty());
    assert!(!service.has_role(user_id, "super_admin").await.unwrap());
}

#[tokio::test]
async fn replace_roles_ends_in_exactly_the_requested_set() {
    let app_data = setup_app_data().await;
    let service = RoleService::new(app_data.clone());

    let user_id = create_user(&app_data, "replace_user").await;
    service
        .create_role("Editor", "editor", None)
        .await
        .unwrap();
    service
        .create_role("Auditor", "auditor", None)
        .await
        .unwrap();

    service
        .assign_roles(user_id, &codes(&["user", "editor"]))
        .await
        .unwrap();
    service
        .replace_roles(user_id, &codes(&["auditor", "editor"]))
        .await
        .unwrap();

    assert_eq!(
        held_codes(&service, user_id).await,
        codes(&["auditor", "editor"]).into_iter().collect()
    );

    // Independent of prior state: the same call from a different start
    // yields the same end state
    let other_user = create_user(&app_data, "replace_user_2").await;
    service
        .assign_roles(other_user, &codes(&["user"]))
        .await
        .unwrap();
    service
        .replace_roles(other_user, &codes(&["auditor", "editor"]))
        .await
        .unwrap();
    assert_eq!(
        held_codes(&service, other_user).await,
        held_codes(&service, user_id).await
    );
}

#[tokio::test]
async fn permission_checks_see_role_changes_immediately() {
    let app_data = setup_app_data().await;
    let service = RoleService::new(app_data.clone());

    let user_id = create_user(&app_data, "fresh_user").await;
    service
        .create_role("Editor", "editor", None)
        .await
        .unwrap();
    service
        .replace_role_permissions("editor", &codes(&["plan:manage"]))
        .await
        .unwrap();

    service
        .assign_roles(user_id, &codes(&["user", "editor"]))
        .await
        .unwrap();
    assert!(service.has_permission(user_id, "plan:manage").await.unwrap());

    service.remove_role(user_id, "editor").await.unwrap();
    assert!(!service.has_permission(user_id, "plan:manage").await.unwrap());
}
