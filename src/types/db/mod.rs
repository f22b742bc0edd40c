// Database entities - SeaORM models
pub mod permission;
pub mod plan;
pub mod plan_participant;
pub mod role;
pub mod role_permission;
pub mod task;
pub mod task_record;
pub mod task_reminder;
pub mod user;
pub mod user_role;
