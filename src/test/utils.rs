// Test utilities shared across unit tests
// Only compiled when running tests

use crate::app_data::AppData;
use crate::types::internal::ParticipantRole;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use std::sync::Arc;

/// Creates an in-memory database with migrations applied and stores wired up
pub async fn setup_app_data() -> Arc<AppData> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    AppData::new(db)
}

/// Creates a test user and returns its id
pub async fn create_test_user(app_data: &Arc<AppData>, nickname: &str) -> i64 {
    app_data
        .user_store
        .create_user(&app_data.db, nickname, None)
        .await
        .expect("Failed to create test user")
        .id
}

/// Creates a non-system role and returns its id
pub async fn create_test_role(app_data: &Arc<AppData>, name: &str, code: &str) -> i64 {
    app_data
        .role_store
        .insert_role(&app_data.db, name, code, None)
        .await
        .expect("Failed to create test role")
        .id
}

/// Creates a plan with the given user seated as owner, returns the plan id
pub async fn create_plan_with_owner(app_data: &Arc<AppData>, owner_id: i64, is_public: bool) -> i64 {
    let plan = app_data
        .plan_store
        .insert_plan(
            &app_data.db,
            owner_id,
            "test plan",
            None,
            is_public,
            "habit",
        )
        .await
        .expect("Failed to create test plan");

    app_data
        .plan_store
        .insert_participant(&app_data.db, plan.id, owner_id, ParticipantRole::Owner)
        .await
        .expect("Failed to seat plan owner");

    plan.id
}

/// Adds a participant directly, bypassing service invariant checks
pub async fn add_participant(
    app_data: &Arc<AppData>,
    plan_id: i64,
    user_id: i64,
    role: ParticipantRole,
) {
    app_data
        .plan_store
        .insert_participant(&app_data.db, plan_id, user_id, role)
        .await
        .expect("Failed to add participant");
}
