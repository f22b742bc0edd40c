use crate::errors::internal::DatabaseError;
use crate::types::db::{plan, plan_participant, task, task_record, task_reminder};
use crate::types::internal::ParticipantRole;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

/// Row-level access to plans, participants and the task forest beneath them.
pub struct PlanStore {}

impl PlanStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn insert_plan(
        &self,
        conn: &impl ConnectionTrait,
        creator_id: i64,
        name: &str,
        description: Option<String>,
        is_public: bool,
        plan_type: &str,
    ) -> Result<plan::Model, DatabaseError> {
        let now = Utc::now().timestamp();
        let new_plan = plan::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description),
            is_public: Set(is_public),
            creator_id: Set(creator_id),
            plan_type: Set(plan_type.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        new_plan
            .insert(conn)
            .await
            .map_err(|e| DatabaseError::operation("insert_plan", e))
    }

    pub async fn find_plan(
        &self,
        conn: &impl ConnectionTrait,
        plan_id: i64,
    ) -> Result<Option<plan::Model>, DatabaseError> {
        plan::Entity::find_by_id(plan_id)
            .one(conn)
            .await
            .map_err(|e| DatabaseError::operation("find_plan", e))
    }

    pub async fn set_plan_creator(
        &self,
        conn: &impl ConnectionTrait,
        plan_id: i64,
        creator_id: i64,
    ) -> Result<(), DatabaseError> {
        let updated = plan::ActiveModel {
            id: Set(plan_id),
            creator_id: Set(creator_id),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        updated
            .update(conn)
            .await
            .map_err(|e| DatabaseError::operation("set_plan_creator", e))?;

        Ok(())
    }

    /// Delete a plan and everything beneath it, respecting foreign-key
    /// dependency direction: records, reminders, tasks, participants, plan.
    /// Callers wrap this in a transaction.
    pub async fn delete_plan_cascade(
        &self,
        conn: &impl ConnectionTrait,
        plan_id: i64,
    ) -> Result<(), DatabaseError> {
        let task_ids: Vec<i64> = task::Entity::find()
            .filter(task::Column::PlanId.eq(plan_id))
            .all(conn)
            .await
            .map_err(|e| DatabaseError::operation("find_plan_tasks", e))?
            .into_iter()
            .map(|t| t.id)
            .collect();

        if !task_ids.is_empty() {
            task_record::Entity::delete_many()
                .filter(task_record::Column::TaskId.is_in(task_ids.clone()))
                .exec(conn)
                .await
                .map_err(|e| DatabaseError::operation("delete_task_records", e))?;

            task_reminder::Entity::delete_many()
                .filter(task_reminder::Column::TaskId.is_in(task_ids))
                .exec(conn)
                .await
                .map_err(|e| DatabaseError::operation("delete_task_reminders", e))?;

            task::Entity::delete_many()
                .filter(task::Column::PlanId.eq(plan_id))
                .exec(conn)
                .await
                .map_err(|e| DatabaseError::operation("delete_plan_tasks", e))?;
        }

        plan_participant::Entity::delete_many()
            .filter(plan_participant::Column::PlanId.eq(plan_id))
            .exec(conn)
            .await
            .map_err(|e| DatabaseError::operation("delete_plan_participants", e))?;

        plan::Entity::delete_by_id(plan_id)
            .exec(conn)
            .await
            .map_err(|e| DatabaseError::operation("delete_plan", e))?;

        Ok(())
    }

    pub async fn participant(
        &self,
        conn: &impl ConnectionTrait,
        plan_id: i64,
        user_id: i64,
    ) -> Result<Option<plan_participant::Model>, DatabaseError> {
        plan_participant::Entity::find_by_id((plan_id, user_id))
            .one(conn)
            .await
            .map_err(|e| DatabaseError::operation("find_plan_participant", e))
    }

    pub async fn participants_of_plan(
        &self,
        conn: &impl ConnectionTrait,
        plan_id: i64,
    ) -> Result<Vec<plan_participant::Model>, DatabaseError> {
        plan_participant::Entity::find()
            .filter(plan_participant::Column::PlanId.eq(plan_id))
            .all(conn)
            .await
            .map_err(|e| DatabaseError::operation("find_plan_participants", e))
    }

    pub async fn insert_participant(
        &self,
        conn: &impl ConnectionTrait,
        plan_id: i64,
        user_id: i64,
        role: ParticipantRole,
    ) -> Result<plan_participant::Model, DatabaseError> {
        let new_participant = plan_participant::ActiveModel {
            plan_id: Set(plan_id),
            user_id: Set(user_id),
            role: Set(role),
            joined_at: Set(Utc::now().timestamp()),
        };

        new_participant
            .insert(conn)
            .await
            .map_err(|e| DatabaseError::operation("insert_plan_participant", e))
    }

    pub async fn update_participant_role(
        &self,
        conn: &impl ConnectionTrait,
        plan_id: i64,
        user_id: i64,
        role: ParticipantRole,
    ) -> Result<(), DatabaseError> {
        let updated = plan_participant::ActiveModel {
            plan_id: Set(plan_id),
            user_id: Set(user_id),
            role: Set(role),
            ..Default::default()
        };

        updated
            .update(conn)
            .await
            .map_err(|e| DatabaseError::operation("update_plan_participant_role", e))?;

        Ok(())
    }

    pub async fn delete_participant(
        &self,
        conn: &impl ConnectionTrait,
        plan_id: i64,
        user_id: i64,
    ) -> Result<(), DatabaseError> {
        plan_participant::Entity::delete_many()
            .filter(plan_participant::Column::PlanId.eq(plan_id))
            .filter(plan_participant::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| DatabaseError::operation("delete_plan_participant", e))?;

        Ok(())
    }
}

impl Default for PlanStore {
    fn default() -> Self {
        Self::new()
    }
}
