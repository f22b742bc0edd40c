mod common;

use common::{add_participant, create_plan_with_owner, create_user, setup_app_data};
use paceline_backend::errors::{ErrorKind, PlanAccessError};
use paceline_backend::services::PlanAccessService;
use paceline_backend::types::internal::ParticipantRole;

#[tokio::test]
async fn admin_outranks_members_but_not_the_owner() {
    let app_data = setup_app_data().await;
    let service = PlanAccessService::new(app_data.clone());

    // Plan with U1=owner, U2=admin, U3=member
    let u1 = create_user(&app_data, "u1").await;
    let u2 = create_user(&app_data, "u2").await;
    let u3 = create_user(&app_data, "u3").await;
    let plan_id = create_plan_with_owner(&app_data, u1, false).await;
    add_participant(&app_data, plan_id, u2, ParticipantRole::Admin).await;
    add_participant(&app_data, plan_id, u3, ParticipantRole::Member).await;

    // Admin removes the member: rank 3 > rank 2
    service.remove_member(plan_id, u2, u3).await.unwrap();
    assert!(!service.is_participant(plan_id, u3).await.unwrap());

    // Admin cannot remove the owner: 3 is not > 4
    let err = service.remove_member(plan_id, u2, u1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    assert!(service.is_participant(plan_id, u1).await.unwrap());
}

#[tokio::test]
async fn not_found_and_forbidden_stay_distinct() {
    let app_data = setup_app_data().await;
    let service = PlanAccessService::new(app_data.clone());

    let owner = create_user(&app_data, "owner").await;
    let member = create_user(&app_data, "member").await;
    let plan_id = create_plan_with_owner(&app_data, owner, false).await;
    add_participant(&app_data, plan_id, member, ParticipantRole::Member).await;

    // Absent plan
    let err = service
        .remove_member(4040, owner, member)
        .await
        .unwrap_err();
    assert!(matches!(err, PlanAccessError::PlanNotFound { plan_id: 4040 }));
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // Present plan, missing rank
    let err = service
        .remove_member(plan_id, member, owner)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn elevated_invites_need_the_owner() {
    let app_data = setup_app_data().await;
    let service = PlanAccessService::new(app_data.clone());

    let owner = create_user(&app_data, "owner").await;
    let admin = create_user(&app_data, "admin").await;
    let candidate = create_user(&app_data, "candidate").await;
    let plan_id = create_plan_with_owner(&app_data, owner, false).await;
    add_participant(&app_data, plan_id, admin, ParticipantRole::Admin).await;

    // Base invite gate passes for the admin...
    assert!(service.can_invite_member(plan_id, admin).await.unwrap());

    // ...but inviting another admin is owner-only
    let err = service
        .invite_member(plan_id, admin, candidate, ParticipantRole::Admin)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    // A plain member invite from the same admin goes through
    service
        .invite_member(plan_id, admin, candidate, ParticipantRole::Member)
        .await
        .unwrap();
    assert_eq!(
        service.role_of(plan_id, candidate).await.unwrap(),
        Some(ParticipantRole::Member)
    );
}

#[tokio::test]
async fn concurrent_style_double_invite_surfaces_as_conflict() {
    let app_data = setup_app_data().await;
    let service = PlanAccessService::new(app_data.clone());

    let owner = create_user(&app_data, "owner").await;
    let invitee = create_user(&app_data, "invitee").await;
    let plan_id = create_plan_with_owner(&app_data, owner, false).await;

    service
        .invite_member(plan_id, owner, invitee, ParticipantRole::Viewer)
        .await
        .unwrap();

    // A second invite for the same user is a conflict, not a crash
    let err = service
        .invite_member(plan_id, owner, invitee, ParticipantRole::Viewer)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn sibling_invites_on_one_plan_do_not_interfere() {
    let app_data = setup_app_data().await;
    let service = PlanAccessService::new(app_data.clone());

    let owner = create_user(&app_data, "owner").await;
    let first = create_user(&app_data, "first").await;
    let second = create_user(&app_data, "second").await;
    let plan_id = create_plan_with_owner(&app_data, owner, false).await;

    service
        .invite_member(plan_id, owner, first, ParticipantRole::Member)
        .await
        .unwrap();
    service
        .invite_member(plan_id, owner, second, ParticipantRole::Member)
        .await
        .unwrap();

    assert!(service.is_participant(plan_id, first).await.unwrap());
    assert!(service.is_participant(plan_id, second).await.unwrap());
}
