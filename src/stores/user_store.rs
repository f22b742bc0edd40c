use crate::errors::internal::DatabaseError;
use crate::types::db::user;
use crate::types::internal::UserLookup;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

/// Row-level access to the users table.
///
/// Stateless; callers supply the connection so they control the transaction
/// boundary.
pub struct UserStore {}

impl UserStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn create_user(
        &self,
        conn: &impl ConnectionTrait,
        nickname: &str,
        phone: Option<String>,
    ) -> Result<user::Model, DatabaseError> {
        let now = Utc::now().timestamp();
        let new_user = user::ActiveModel {
            nickname: Set(nickname.to_string()),
            phone: Set(phone),
            external_key: Set(Some(Uuid::new_v4().to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        new_user
            .insert(conn)
            .await
            .map_err(|e| DatabaseError::operation("create_user", e))
    }

    pub async fn exists(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i64,
    ) -> Result<bool, DatabaseError> {
        let count = user::Entity::find_by_id(user_id)
            .count(conn)
            .await
            .map_err(|e| DatabaseError::operation("count_user_by_id", e))?;
        Ok(count > 0)
    }

    /// Resolve a boundary-supplied identifier to a numeric user id.
    ///
    /// Returns `None` when no user matches; the services only ever see the
    /// resolved id.
    pub async fn resolve(
        &self,
        conn: &impl ConnectionTrait,
        lookup: &UserLookup,
    ) -> Result<Option<i64>, DatabaseError> {
        let found = match lookup {
            UserLookup::ById(id) => user::Entity::find_by_id(*id).one(conn).await,
            UserLookup::ByKey(key) => {
                user::Entity::find()
                    .filter(user::Column::ExternalKey.eq(key.as_str()))
                    .one(conn)
                    .await
            }
            UserLookup::ByPhone(phone) => {
                user::Entity::find()
                    .filter(user::Column::Phone.eq(phone.as_str()))
                    .one(conn)
                    .await
            }
        };

        found
            .map(|user| user.map(|u| u.id))
            .map_err(|e| DatabaseError::operation("resolve_user_lookup", e))
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
