mod common;

use chrono::NaiveDate;
use common::{add_participant, create_plan_with_owner, create_user, setup_app_data};
use paceline_backend::errors::PlanAccessError;
use paceline_backend::services::PlanAccessService;
use paceline_backend::types::db::{plan_participant, task, task_record, task_reminder};
use paceline_backend::types::internal::ParticipantRole;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

#[tokio::test]
async fn transfer_swaps_roles_updates_creator_and_keeps_one_owner() {
    let app_data = setup_app_data().await;
    let service = PlanAccessService::new(app_data.clone());

    let u1 = create_user(&app_data, "u1").await;
    let u2 = create_user(&app_data, "u2").await;
    let plan_id = create_plan_with_owner(&app_data, u1, false).await;
    add_participant(&app_data, plan_id, u2, ParticipantRole::Admin).await;

    let owners_before = plan_participant::Entity::find()
        .filter(plan_participant::Column::PlanId.eq(plan_id))
        .filter(plan_participant::Column::Role.eq(ParticipantRole::Owner))
        .count(&app_data.db)
        .await
        .unwrap();
    assert_eq!(owners_before, 1);

    service.transfer_ownership(plan_id, u1, u2).await.unwrap();

    assert_eq!(
        service.role_of(plan_id, u1).await.unwrap(),
        Some(ParticipantRole::Admin)
    );
    assert_eq!(
        service.role_of(plan_id, u2).await.unwrap(),
        Some(ParticipantRole::Owner)
    );

    let plan = app_data
        .plan_store
        .find_plan(&app_data.db, plan_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(plan.creator_id, u2);

    let owners_after = plan_participant::Entity::find()
        .filter(plan_participant::Column::PlanId.eq(plan_id))
        .filter(plan_participant::Column::Role.eq(ParticipantRole::Owner))
        .count(&app_data.db)
        .await
        .unwrap();
    assert_eq!(owners_after, 1);
}

#[tokio::test]
async fn the_previous_owner_can_then_leave() {
    let app_data = setup_app_data().await;
    let service = PlanAccessService::new(app_data.clone());

    let u1 = create_user(&app_data, "u1").await;
    let u2 = create_user(&app_data, "u2").await;
    let plan_id = create_plan_with_owner(&app_data, u1, false).await;
    add_participant(&app_data, plan_id, u2, ParticipantRole::Member).await;

    // Owner cannot leave while holding ownership
    let err = service.leave_plan(plan_id, u1).await.unwrap_err();
    assert!(matches!(err, PlanAccessError::OwnerCannotLeave));

    // After handing the plan over, leaving works
    service.transfer_ownership(plan_id, u1, u2).await.unwrap();
    service.leave_plan(plan_id, u1).await.unwrap();
    assert!(!service.is_participant(plan_id, u1).await.unwrap());
}

#[tokio::test]
async fn deleting_a_plan_takes_its_whole_subtree() {
    let app_data = setup_app_data().await;
    let service = PlanAccessService::new(app_data.clone());

    let owner = create_user(&app_data, "owner").await;
    let member = create_user(&app_data, "member").await;
    let plan_id = create_plan_with_owner(&app_data, owner, false).await;
    add_participant(&app_data, plan_id, member, ParticipantRole::Member).await;

    // A parent task with a nested child, plus a record and a reminder
    let parent = task::ActiveModel {
        plan_id: Set(plan_id),
        parent_task_id: Set(None),
        title: Set("drink water".to_string()),
        sort_order: Set(0),
        created_at: Set(0),
        updated_at: Set(0),
        ..Default::default()
    }
    .insert(&app_data.db)
    .await
    .unwrap();

    let child = task::ActiveModel {
        plan_id: Set(plan_id),
        parent_task_id: Set(Some(parent.id)),
        title: Set("one glass at noon".to_string()),
        sort_order: Set(0),
        created_at: Set(0),
        updated_at: Set(0),
        ..Default::default()
    }
    .insert(&app_data.db)
    .await
    .unwrap();

    task_record::ActiveModel {
        task_id: Set(child.id),
        user_id: Set(member),
        completion_date: Set(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()),
        count: Set(1),
        note: Set(None),
        created_at: Set(0),
        ..Default::default()
    }
    .insert(&app_data.db)
    .await
    .unwrap();

    task_reminder::ActiveModel {
        task_id: Set(parent.id),
        user_id: Set(member),
        remind_at: Set("12:00".to_string()),
        enabled: Set(true),
        created_at: Set(0),
        ..Default::default()
    }
    .insert(&app_data.db)
    .await
    .unwrap();

    service.delete_plan(plan_id, owner).await.unwrap();

    let remaining_tasks = task::Entity::find()
        .filter(task::Column::PlanId.eq(plan_id))
        .count(&app_data.db)
        .await
        .unwrap();
    let remaining_records = task_record::Entity::find().count(&app_data.db).await.unwrap();
    let remaining_reminders = task_reminder::Entity::find()
        .count(&app_data.db)
        .await
        .unwrap();
    let remaining_participants = plan_participant::Entity::find()
        .filter(plan_participant::Column::PlanId.eq(plan_id))
        .count(&app_data.db)
        .await
        .unwrap();

    assert_eq!(remaining_tasks, 0);
    assert_eq!(remaining_records, 0);
    assert_eq!(remaining_reminders, 0);
    assert_eq!(remaining_participants, 0);

    let err = service.can_view_plan(plan_id, Some(owner)).await.unwrap_err();
    assert!(matches!(err, PlanAccessError::PlanNotFound { .. }));
}
