use crate::app_data::AppData;
use crate::errors::internal::DatabaseError;
use crate::errors::RoleError;
use crate::stores::{RoleStore, UserStore};
use crate::types::db::role;
use crate::types::internal::RoleDescriptor;
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::collections::HashSet;
use std::sync::Arc;

/// Global role authority: maps users to platform-wide roles and answers
/// permission queries by unioning permissions across all held roles.
///
/// Every query hits the store fresh; there is no permission cache, so role
/// changes are visible to the next authorization check immediately.
pub struct RoleService {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    role_store: Arc<RoleStore>,
}

impl RoleService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_store: app_data.user_store.clone(),
            role_store: app_data.role_store.clone(),
        }
    }

    /// All permission codes the user holds, unioned across their roles.
    ///
    /// A user with no roles yields an empty set rather than an error; the
    /// at-least-one-role invariant makes that state unreachable through this
    /// service, but reads must not fail on it.
    pub async fn get_permissions(&self, user_id: i64) -> Result<HashSet<String>, RoleError> {
        let role_ids = self.role_store.role_ids_of_user(&self.db, user_id).await?;
        let codes = self
            .role_store
            .permission_codes_for_roles(&self.db, &role_ids)
            .await?;

        Ok(codes.into_iter().collect())
    }

    pub async fn has_permission(&self, user_id: i64, code: &str) -> Result<bool, RoleError> {
        let permissions = self.get_permissions(user_id).await?;
        Ok(permissions.contains(code))
    }

    pub async fn has_role(&self, user_id: i64, code: &str) -> Result<bool, RoleError> {
        let held = self.held_role_codes(user_id).await?;
        Ok(held.contains(code))
    }

    /// Logical OR over the given codes. Unknown codes simply never match.
    pub async fn has_any_role(&self, user_id: i64, codes: &[String]) -> Result<bool, RoleError> {
        let held = self.held_role_codes(user_id).await?;
        Ok(codes.iter().any(|code| held.contains(code)))
    }

    /// Logical AND over the given codes; vacuously true for an empty list.
    pub async fn has_all_roles(&self, user_id: i64, codes: &[String]) -> Result<bool, RoleError> {
        let held = self.held_role_codes(user_id).await?;
        Ok(codes.iter().all(|code| held.contains(code)))
    }

    pub async fn roles_of(&self, user_id: i64) -> Result<Vec<RoleDescriptor>, RoleError> {
        let roles = self.role_store.roles_of_user(&self.db, user_id).await?;
        Ok(roles.into_iter().map(RoleDescriptor::from).collect())
    }

    async fn held_role_codes(&self, user_id: i64) -> Result<HashSet<String>, RoleError> {
        let roles = self.role_store.roles_of_user(&self.db, user_id).await?;
        Ok(roles.into_iter().map(|r| r.code).collect())
    }

    /// Assign roles the user does not yet hold.
    ///
    /// Codes are case-sensitive and must all resolve; a single unknown code
    /// fails the whole call with the full list of missing codes and nothing
    /// is inserted. Assigning only already-held roles is a conflict, not a
    /// silent no-op.
    ///
    /// # Returns
    /// The newly assigned roles (already-held roles are not repeated).
    pub async fn assign_roles(
        &self,
        user_id: i64,
        codes: &[String],
    ) -> Result<Vec<RoleDescriptor>, RoleError> {
        if codes.is_empty() {
            return Err(RoleError::EmptyRoleCodes);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        if !self.user_store.exists(&txn, user_id).await? {
            return Err(RoleError::UserNotFound { user_id });
        }

        let resolved = self.resolve_all_roles(&txn, codes).await?;

        let held: HashSet<i64> = self
            .role_store
            .role_ids_of_user(&txn, user_id)
            .await?
            .into_iter()
            .collect();

        let fresh: Vec<role::Model> = resolved
            .into_iter()
            .filter(|role| !held.contains(&role.id))
            .collect();

        if fresh.is_empty() {
            return Err(RoleError::AllRolesAlreadyAssigned);
        }

        let fresh_ids: Vec<i64> = fresh.iter().map(|role| role.id).collect();
        self.role_store
            .insert_user_roles(&txn, user_id, &fresh_ids)
            .await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        tracing::info!(user_id, roles = ?fresh_ids, "roles assigned");

        Ok(fresh.into_iter().map(RoleDescriptor::from).collect())
    }

    /// Remove one role from a user.
    ///
    /// Fails if the code does not resolve, if the user does not hold the
    /// role, or if it is the user's sole remaining role (the invariant
    /// floor: a user always keeps at least one role).
    pub async fn remove_role(
        &self,
        user_id: i64,
        code: &str,
    ) -> Result<RoleDescriptor, RoleError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        let role = self
            .role_store
            .find_by_code(&txn, code)
            .await?
            .ok_or_else(|| RoleError::RoleNotFound {
                code: code.to_string(),
            })?;

        let held = self.role_store.role_ids_of_user(&txn, user_id).await?;
        if !held.contains(&role.id) {
            return Err(RoleError::RoleNotAssigned {
                code: code.to_string(),
            });
        }
        if held.len() == 1 {
            return Err(RoleError::LastRoleProtected);
        }

        self.role_store
            .delete_user_role(&txn, user_id, role.id)
            .await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        tracing::info!(user_id, role = %role.code, "role removed");

        Ok(RoleDescriptor::from(role))
    }

    /// Replace a user's entire role set.
    ///
    /// Delete-all-then-insert-all inside one transaction: the post-condition
    /// is exactly the requested set regardless of prior state, and a
    /// rollback leaves the original set untouched. An empty code list is
    /// rejected up front so the zero-role state can never be reached.
    pub async fn replace_roles(
        &self,
        user_id: i64,
        codes: &[String],
    ) -> Result<Vec<RoleDescriptor>, RoleError> {
        if codes.is_empty() {
            return Err(RoleError::EmptyRoleCodes);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        if !self.user_store.exists(&txn, user_id).await? {
            return Err(RoleError::UserNotFound { user_id });
        }

        let resolved = self.resolve_all_roles(&txn, codes).await?;
        let role_ids: Vec<i64> = resolved.iter().map(|role| role.id).collect();

        self.role_store.delete_all_user_roles(&txn, user_id).await?;
        self.role_store
            .insert_user_roles(&txn, user_id, &role_ids)
            .await?;

        let final_set = self.role_store.roles_of_user(&txn, user_id).await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        tracing::info!(user_id, roles = ?role_ids, "role set replaced");

        Ok(final_set.into_iter().map(RoleDescriptor::from).collect())
    }

    pub async fn create_role(
        &self,
        name: &str,
        code: &str,
        description: Option<String>,
    ) -> Result<RoleDescriptor, RoleError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        if self.role_store.find_by_code(&txn, code).await?.is_some() {
            return Err(RoleError::DuplicateRole {
                value: code.to_string(),
            });
        }
        if self.role_store.find_by_name(&txn, name).await?.is_some() {
            return Err(RoleError::DuplicateRole {
                value: name.to_string(),
            });
        }

        let created = self
            .role_store
            .insert_role(&txn, name, code, description)
            .await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        tracing::info!(role = %created.code, "role created");

        Ok(RoleDescriptor::from(created))
    }

    /// Rename or re-describe a role. System roles are immutable.
    pub async fn update_role(
        &self,
        code: &str,
        new_name: Option<String>,
        new_description: Option<String>,
    ) -> Result<RoleDescriptor, RoleError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        let existing = self
            .role_store
            .find_by_code(&txn, code)
            .await?
            .ok_or_else(|| RoleError::RoleNotFound {
                code: code.to_string(),
            })?;

        if existing.is_system {
            return Err(RoleError::SystemRoleImmutable {
                code: code.to_string(),
            });
        }

        if let Some(name) = &new_name {
            if let Some(clash) = self.role_store.find_by_name(&txn, name).await? {
                if clash.id != existing.id {
                    return Err(RoleError::DuplicateRole { value: name.clone() });
                }
            }
        }

        let updated = self
            .role_store
            .update_role(&txn, existing, new_name, new_description)
            .await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        Ok(RoleDescriptor::from(updated))
    }

    /// Delete a role that is not a system role and is no longer held by
    /// anyone. Its permission rows go with it in the same transaction.
    pub async fn delete_role(&self, code: &str) -> Result<(), RoleError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        let role = self
            .role_store
            .find_by_code(&txn, code)
            .await?
            .ok_or_else(|| RoleError::RoleNotFound {
                code: code.to_string(),
            })?;

        if role.is_system {
            return Err(RoleError::SystemRoleImmutable {
                code: code.to_string(),
            });
        }

        let user_count = self.role_store.count_users_with_role(&txn, role.id).await?;
        if user_count > 0 {
            return Err(RoleError::RoleInUse {
                code: code.to_string(),
                user_count,
            });
        }

        self.role_store.delete_role(&txn, role.id).await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        tracing::info!(role = %code, "role deleted");

        Ok(())
    }

    /// Replace a role's permission set with exactly the given codes.
    ///
    /// Idempotent: applying the same list twice yields the same final set.
    /// An empty list is allowed (a role may carry zero permissions); system
    /// roles are immutable here as everywhere.
    pub async fn replace_role_permissions(
        &self,
        role_code: &str,
        permission_codes: &[String],
    ) -> Result<Vec<String>, RoleError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        let role = self
            .role_store
            .find_by_code(&txn, role_code)
            .await?
            .ok_or_else(|| RoleError::RoleNotFound {
                code: role_code.to_string(),
            })?;

        if role.is_system {
            return Err(RoleError::SystemRoleImmutable {
                code: role_code.to_string(),
            });
        }

        let permissions = self
            .role_store
            .find_permissions_by_codes(&txn, permission_codes)
            .await?;

        let resolved: HashSet<&str> = permissions.iter().map(|p| p.code.as_str()).collect();
        let missing: Vec<String> = permission_codes
            .iter()
            .filter(|code| !resolved.contains(code.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(RoleError::PermissionsNotFound { codes: missing });
        }

        let permission_ids: Vec<i64> = permissions.iter().map(|p| p.id).collect();
        self.role_store
            .replace_role_permissions(&txn, role.id, &permission_ids)
            .await?;

        let final_codes = self
            .role_store
            .permission_codes_for_roles(&txn, &[role.id])
            .await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        tracing::info!(role = %role_code, permissions = final_codes.len(), "role permissions replaced");

        Ok(final_codes)
    }

    /// Resolve every code or fail naming all of the missing ones.
    async fn resolve_all_roles(
        &self,
        conn: &impl sea_orm::ConnectionTrait,
        codes: &[String],
    ) -> Result<Vec<role::Model>, RoleError> {
        let resolved = self.role_store.find_by_codes(conn, codes).await?;

        let found: HashSet<&str> = resolved.iter().map(|role| role.code.as_str()).collect();
        let mut missing: Vec<String> = codes
            .iter()
            .filter(|code| !found.contains(code.as_str()))
            .cloned()
            .collect();
        missing.dedup();

        if !missing.is_empty() {
            return Err(RoleError::RolesNotFound { codes: missing });
        }

        Ok(resolved)
    }
}

#[cfg(test)]
#[path = "role_service_tests.rs"]
mod role_service_tests;
