use crate::errors::internal::DatabaseError;
use crate::types::db::{permission, role, role_permission, user_role};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
};

/// Row-level access to roles, permissions and their join tables.
pub struct RoleStore {}

impl RoleStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn find_by_code(
        &self,
        conn: &impl ConnectionTrait,
        code: &str,
    ) -> Result<Option<role::Model>, DatabaseError> {
        role::Entity::find()
            .filter(role::Column::Code.eq(code))
            .one(conn)
            .await
            .map_err(|e| DatabaseError::operation("find_role_by_code", e))
    }

    /// Resolve a batch of codes in one query. Codes missing from the result
    /// are the caller's to report; nothing is dropped silently.
    pub async fn find_by_codes(
        &self,
        conn: &impl ConnectionTrait,
        codes: &[String],
    ) -> Result<Vec<role::Model>, DatabaseError> {
        role::Entity::find()
            .filter(role::Column::Code.is_in(codes.to_vec()))
            .all(conn)
            .await
            .map_err(|e| DatabaseError::operation("find_roles_by_codes", e))
    }

    pub async fn find_by_name(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<Option<role::Model>, DatabaseError> {
        role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .one(conn)
            .await
            .map_err(|e| DatabaseError::operation("find_role_by_name", e))
    }

    pub async fn insert_role(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
        code: &str,
        description: Option<String>,
    ) -> Result<role::Model, DatabaseError> {
        let now = Utc::now().timestamp();
        let new_role = role::ActiveModel {
            name: Set(name.to_string()),
            code: Set(code.to_string()),
            description: Set(description),
            is_system: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        new_role
            .insert(conn)
            .await
            .map_err(|e| DatabaseError::operation("insert_role", e))
    }

    pub async fn update_role(
        &self,
        conn: &impl ConnectionTrait,
        existing: role::Model,
        new_name: Option<String>,
        new_description: Option<String>,
    ) -> Result<role::Model, DatabaseError> {
        let mut updated: role::ActiveModel = existing.into();
        if let Some(name) = new_name {
            updated.name = Set(name);
        }
        if let Some(description) = new_description {
            updated.description = Set(Some(description));
        }
        updated.updated_at = Set(Utc::now().timestamp());

        updated
            .update(conn)
            .await
            .map_err(|e| DatabaseError::operation("update_role", e))
    }

    pub async fn delete_role(
        &self,
        conn: &impl ConnectionTrait,
        role_id: i64,
    ) -> Result<(), DatabaseError> {
        role_permission::Entity::delete_many()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .exec(conn)
            .await
            .map_err(|e| DatabaseError::operation("delete_role_permissions", e))?;

        role::Entity::delete_by_id(role_id)
            .exec(conn)
            .await
            .map_err(|e| DatabaseError::operation("delete_role", e))?;

        Ok(())
    }

    pub async fn roles_of_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i64,
    ) -> Result<Vec<role::Model>, DatabaseError> {
        let role_ids = self.role_ids_of_user(conn, user_id).await?;
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        role::Entity::find()
            .filter(role::Column::Id.is_in(role_ids))
            .all(conn)
            .await
            .map_err(|e| DatabaseError::operation("find_roles_by_ids", e))
    }

    pub async fn role_ids_of_user(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i64,
    ) -> Result<Vec<i64>, DatabaseError> {
        let pairs = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .all(conn)
            .await
            .map_err(|e| DatabaseError::operation("find_user_roles", e))?;

        Ok(pairs.into_iter().map(|pair| pair.role_id).collect())
    }

    pub async fn count_users_with_role(
        &self,
        conn: &impl ConnectionTrait,
        role_id: i64,
    ) -> Result<u64, DatabaseError> {
        user_role::Entity::find()
            .filter(user_role::Column::RoleId.eq(role_id))
            .count(conn)
            .await
            .map_err(|e| DatabaseError::operation("count_users_with_role", e))
    }

    pub async fn insert_user_roles(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i64,
        role_ids: &[i64],
    ) -> Result<(), DatabaseError> {
        if role_ids.is_empty() {
            return Ok(());
        }

        let rows = role_ids.iter().map(|role_id| user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(*role_id),
        });

        user_role::Entity::insert_many(rows)
            .exec(conn)
            .await
            .map_err(|e| DatabaseError::operation("insert_user_roles", e))?;

        Ok(())
    }

    pub async fn delete_user_role(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i64,
        role_id: i64,
    ) -> Result<(), DatabaseError> {
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::RoleId.eq(role_id))
            .exec(conn)
            .await
            .map_err(|e| DatabaseError::operation("delete_user_role", e))?;

        Ok(())
    }

    pub async fn delete_all_user_roles(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i64,
    ) -> Result<(), DatabaseError> {
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| DatabaseError::operation("delete_all_user_roles", e))?;

        Ok(())
    }

    pub async fn find_permissions_by_codes(
        &self,
        conn: &impl ConnectionTrait,
        codes: &[String],
    ) -> Result<Vec<permission::Model>, DatabaseError> {
        permission::Entity::find()
            .filter(permission::Column::Code.is_in(codes.to_vec()))
            .all(conn)
            .await
            .map_err(|e| DatabaseError::operation("find_permissions_by_codes", e))
    }

    /// Permission codes granted through any of the given roles.
    pub async fn permission_codes_for_roles(
        &self,
        conn: &impl ConnectionTrait,
        role_ids: &[i64],
    ) -> Result<Vec<String>, DatabaseError> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let pairs = role_permission::Entity::find()
            .filter(role_permission::Column::RoleId.is_in(role_ids.to_vec()))
            .all(conn)
            .await
            .map_err(|e| DatabaseError::operation("find_role_permissions", e))?;

        let permission_ids: Vec<i64> = pairs.into_iter().map(|pair| pair.permission_id).collect();
        if permission_ids.is_empty() {
            return Ok(Vec::new());
        }

        let permissions = permission::Entity::find()
            .filter(permission::Column::Id.is_in(permission_ids))
            .all(conn)
            .await
            .map_err(|e| DatabaseError::operation("find_permissions_by_ids", e))?;

        Ok(permissions.into_iter().map(|p| p.code).collect())
    }

    /// Full replacement of a role's permission set: delete all rows, insert
    /// the new ones. The post-condition is exactly the requested set,
    /// independent of prior state.
    pub async fn replace_role_permissions(
        &self,
        conn: &impl ConnectionTrait,
        role_id: i64,
        permission_ids: &[i64],
    ) -> Result<(), DatabaseError> {
        role_permission::Entity::delete_many()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .exec(conn)
            .await
            .map_err(|e| DatabaseError::operation("delete_role_permissions", e))?;

        if permission_ids.is_empty() {
            return Ok(());
        }

        let rows = permission_ids
            .iter()
            .map(|permission_id| role_permission::ActiveModel {
                role_id: Set(role_id),
                permission_id: Set(*permission_id),
            });

        role_permission::Entity::insert_many(rows)
            .exec(conn)
            .await
            .map_err(|e| DatabaseError::operation("insert_role_permissions", e))?;

        Ok(())
    }
}

impl Default for RoleStore {
    fn default() -> Self {
        Self::new()
    }
}
