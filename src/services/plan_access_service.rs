use crate::app_data::AppData;
use crate::errors::internal::DatabaseError;
use crate::errors::PlanAccessError;
use crate::stores::{PlanStore, UserStore};
use crate::types::db::plan;
use crate::types::internal::{
    OwnershipTransfer, ParticipantDescriptor, ParticipantRole,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::cmp::Reverse;
use std::sync::Arc;

/// Plan access authority: resolves a user's participant rank within one plan
/// and derives every plan-scoped authorization decision from it.
///
/// Pure predicates answer "no" with `false`; only absent plans and mutation
/// rule violations surface as typed errors, so callers can always tell
/// "this plan does not exist" apart from "you lack permission".
pub struct PlanAccessService {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    plan_store: Arc<PlanStore>,
}

impl PlanAccessService {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_store: app_data.user_store.clone(),
            plan_store: app_data.plan_store.clone(),
        }
    }

    /// The user's role in the plan, or `None` for a non-participant.
    pub async fn role_of(
        &self,
        plan_id: i64,
        user_id: i64,
    ) -> Result<Option<ParticipantRole>, PlanAccessError> {
        let participant = self.plan_store.participant(&self.db, plan_id, user_id).await?;
        Ok(participant.map(|p| p.role))
    }

    pub async fn is_participant(
        &self,
        plan_id: i64,
        user_id: i64,
    ) -> Result<bool, PlanAccessError> {
        Ok(self.role_of(plan_id, user_id).await?.is_some())
    }

    /// Participant present and ranked at or above `required`.
    pub async fn at_least(
        &self,
        plan_id: i64,
        user_id: i64,
        required: ParticipantRole,
    ) -> Result<bool, PlanAccessError> {
        Ok(self
            .role_of(plan_id, user_id)
            .await?
            .is_some_and(|role| role >= required))
    }

    /// Public plans are visible to everyone, private ones to participants.
    ///
    /// `viewer` is `None` for unauthenticated callers. An absent plan is
    /// `PlanNotFound`, not `false`: the caller renders those differently.
    pub async fn can_view_plan(
        &self,
        plan_id: i64,
        viewer: Option<i64>,
    ) -> Result<bool, PlanAccessError> {
        let plan = self.require_plan(&self.db, plan_id).await?;
        if plan.is_public {
            return Ok(true);
        }
        match viewer {
            Some(user_id) => self.is_participant(plan_id, user_id).await,
            None => Ok(false),
        }
    }

    pub async fn can_view_tasks(
        &self,
        plan_id: i64,
        viewer: Option<i64>,
    ) -> Result<bool, PlanAccessError> {
        self.can_view_plan(plan_id, viewer).await
    }

    pub async fn can_create_task(
        &self,
        plan_id: i64,
        user_id: i64,
    ) -> Result<bool, PlanAccessError> {
        self.at_least(plan_id, user_id, ParticipantRole::Member).await
    }

    pub async fn can_modify_task(
        &self,
        plan_id: i64,
        user_id: i64,
    ) -> Result<bool, PlanAccessError> {
        self.at_least(plan_id, user_id, ParticipantRole::Member).await
    }

    pub async fn can_delete_task(
        &self,
        plan_id: i64,
        user_id: i64,
    ) -> Result<bool, PlanAccessError> {
        self.at_least(plan_id, user_id, ParticipantRole::Admin).await
    }

    pub async fn can_modify_plan(
        &self,
        plan_id: i64,
        user_id: i64,
    ) -> Result<bool, PlanAccessError> {
        self.at_least(plan_id, user_id, ParticipantRole::Admin).await
    }

    pub async fn can_delete_plan(
        &self,
        plan_id: i64,
        user_id: i64,
    ) -> Result<bool, PlanAccessError> {
        self.at_least(plan_id, user_id, ParticipantRole::Owner).await
    }

    pub async fn can_invite_member(
        &self,
        plan_id: i64,
        user_id: i64,
    ) -> Result<bool, PlanAccessError> {
        self.at_least(plan_id, user_id, ParticipantRole::Admin).await
    }

    pub async fn can_change_role(
        &self,
        plan_id: i64,
        user_id: i64,
    ) -> Result<bool, PlanAccessError> {
        self.at_least(plan_id, user_id, ParticipantRole::Owner).await
    }

    /// Whether `operator` may remove `target` from the plan.
    ///
    /// Owners may remove anyone except another owner; admins only
    /// strictly-lower ranks. The owner-vs-owner branch guards the
    /// dual-ownership state the schema cannot rule out.
    pub async fn can_remove_member(
        &self,
        plan_id: i64,
        operator_id: i64,
        target_id: i64,
    ) -> Result<bool, PlanAccessError> {
        let operator = self.role_of(plan_id, operator_id).await?;
        let target = self.role_of(plan_id, target_id).await?;

        let (Some(operator), Some(target)) = (operator, target) else {
            return Ok(false);
        };

        if operator < ParticipantRole::Admin {
            return Ok(false);
        }
        if operator == ParticipantRole::Owner {
            return Ok(target != ParticipantRole::Owner);
        }
        // Admin: strict inequality, never a peer or the owner
        Ok(operator > target)
    }

    /// Create a plan and seat its creator as owner in one transaction, so
    /// the exactly-one-owner invariant holds from the first observable
    /// state.
    pub async fn create_plan(
        &self,
        creator_id: i64,
        name: &str,
        description: Option<String>,
        is_public: bool,
        plan_type: &str,
    ) -> Result<plan::Model, PlanAccessError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        if !self.user_store.exists(&txn, creator_id).await? {
            return Err(PlanAccessError::UserNotFound { user_id: creator_id });
        }

        let created = self
            .plan_store
            .insert_plan(&txn, creator_id, name, description, is_public, plan_type)
            .await?;
        self.plan_store
            .insert_participant(&txn, created.id, creator_id, ParticipantRole::Owner)
            .await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        tracing::info!(plan_id = created.id, creator_id, "plan created");

        Ok(created)
    }

    /// Add a user to the plan with the given role.
    ///
    /// # Authorization
    /// Inviter must rank at least admin. Inviting as admin requires the
    /// owner; the owner role itself is never assignable here - ownership
    /// moves only through [`transfer_ownership`](Self::transfer_ownership).
    pub async fn invite_member(
        &self,
        plan_id: i64,
        inviter_id: i64,
        invitee_id: i64,
        role: ParticipantRole,
    ) -> Result<ParticipantDescriptor, PlanAccessError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        self.require_plan(&txn, plan_id).await?;

        let inviter_role = self
            .participant_role(&txn, plan_id, inviter_id)
            .await?
            .filter(|role| *role >= ParticipantRole::Admin)
            .ok_or(PlanAccessError::RankTooLow {
                required: ParticipantRole::Admin,
            })?;

        if role == ParticipantRole::Owner {
            return Err(PlanAccessError::CannotAssignOwner);
        }
        if role == ParticipantRole::Admin && inviter_role != ParticipantRole::Owner {
            return Err(PlanAccessError::ElevatedInviteRequiresOwner { role });
        }

        if !self.user_store.exists(&txn, invitee_id).await? {
            return Err(PlanAccessError::UserNotFound { user_id: invitee_id });
        }
        if self
            .participant_role(&txn, plan_id, invitee_id)
            .await?
            .is_some()
        {
            return Err(PlanAccessError::AlreadyParticipant {
                plan_id,
                user_id: invitee_id,
            });
        }

        let participant = self
            .plan_store
            .insert_participant(&txn, plan_id, invitee_id, role)
            .await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        tracing::info!(plan_id, invitee_id, role = %role, "member invited");

        Ok(ParticipantDescriptor::from(participant))
    }

    /// Self-service join for public plans; new joiners start as members.
    pub async fn join_plan(
        &self,
        plan_id: i64,
        user_id: i64,
    ) -> Result<ParticipantDescriptor, PlanAccessError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        let plan = self.require_plan(&txn, plan_id).await?;
        if !plan.is_public {
            return Err(PlanAccessError::PlanNotPublic { plan_id });
        }

        if !self.user_store.exists(&txn, user_id).await? {
            return Err(PlanAccessError::UserNotFound { user_id });
        }
        if self
            .participant_role(&txn, plan_id, user_id)
            .await?
            .is_some()
        {
            return Err(PlanAccessError::AlreadyParticipant { plan_id, user_id });
        }

        let participant = self
            .plan_store
            .insert_participant(&txn, plan_id, user_id, ParticipantRole::Member)
            .await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        Ok(ParticipantDescriptor::from(participant))
    }

    /// Remove a participant through the admin-facing path.
    ///
    /// Self-removal is denied here regardless of rank; the permissive
    /// self-service exit is [`leave_plan`](Self::leave_plan).
    pub async fn remove_member(
        &self,
        plan_id: i64,
        operator_id: i64,
        target_id: i64,
    ) -> Result<(), PlanAccessError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        self.require_plan(&txn, plan_id).await?;

        let operator_role = self
            .participant_role(&txn, plan_id, operator_id)
            .await?
            .filter(|role| *role >= ParticipantRole::Admin)
            .ok_or(PlanAccessError::RankTooLow {
                required: ParticipantRole::Admin,
            })?;

        if operator_id == target_id {
            return Err(PlanAccessError::SelfActionDenied);
        }

        let target_role = self
            .participant_role(&txn, plan_id, target_id)
            .await?
            .ok_or(PlanAccessError::ParticipantNotFound {
                plan_id,
                user_id: target_id,
            })?;

        if operator_role == ParticipantRole::Owner {
            if target_role == ParticipantRole::Owner {
                return Err(PlanAccessError::CannotRemoveOwner);
            }
        } else if operator_role <= target_role {
            return Err(PlanAccessError::RemovalRequiresHigherRank {
                operator_role,
                target_role,
            });
        }

        self.plan_store
            .delete_participant(&txn, plan_id, target_id)
            .await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        tracing::info!(plan_id, target_id, operator_id, "member removed");

        Ok(())
    }

    /// Leave a plan voluntarily. The owner cannot leave; ownership must be
    /// transferred first so the plan is never ownerless.
    pub async fn leave_plan(&self, plan_id: i64, user_id: i64) -> Result<(), PlanAccessError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        self.require_plan(&txn, plan_id).await?;

        let role = self
            .participant_role(&txn, plan_id, user_id)
            .await?
            .ok_or(PlanAccessError::ParticipantNotFound { plan_id, user_id })?;

        if role == ParticipantRole::Owner {
            return Err(PlanAccessError::OwnerCannotLeave);
        }

        self.plan_store
            .delete_participant(&txn, plan_id, user_id)
            .await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        Ok(())
    }

    /// Change a participant's role.
    ///
    /// # Authorization
    /// Operator must be the owner. Hard denials regardless of rank: no
    /// self-targeting, no touching the current owner, no granting the owner
    /// role - the last two go through ownership transfer instead.
    pub async fn update_participant_role(
        &self,
        plan_id: i64,
        operator_id: i64,
        target_id: i64,
        new_role: ParticipantRole,
    ) -> Result<(), PlanAccessError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        self.require_plan(&txn, plan_id).await?;

        self.participant_role(&txn, plan_id, operator_id)
            .await?
            .filter(|role| *role >= ParticipantRole::Owner)
            .ok_or(PlanAccessError::RankTooLow {
                required: ParticipantRole::Owner,
            })?;

        if operator_id == target_id {
            return Err(PlanAccessError::SelfActionDenied);
        }

        let target_role = self
            .participant_role(&txn, plan_id, target_id)
            .await?
            .ok_or(PlanAccessError::ParticipantNotFound {
                plan_id,
                user_id: target_id,
            })?;

        if target_role == ParticipantRole::Owner {
            return Err(PlanAccessError::OwnerRoleImmutable);
        }
        if new_role == ParticipantRole::Owner {
            return Err(PlanAccessError::CannotAssignOwner);
        }

        self.plan_store
            .update_participant_role(&txn, plan_id, target_id, new_role)
            .await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        tracing::info!(plan_id, target_id, role = %new_role, "participant role updated");

        Ok(())
    }

    /// Atomically hand the plan to another participant: the caller steps
    /// down to admin, the target becomes owner, and the plan's creator
    /// field follows. No intermediate state is observable.
    pub async fn transfer_ownership(
        &self,
        plan_id: i64,
        caller_id: i64,
        target_id: i64,
    ) -> Result<OwnershipTransfer, PlanAccessError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        self.require_plan(&txn, plan_id).await?;

        self.participant_role(&txn, plan_id, caller_id)
            .await?
            .filter(|role| *role >= ParticipantRole::Owner)
            .ok_or(PlanAccessError::RankTooLow {
                required: ParticipantRole::Owner,
            })?;

        if caller_id == target_id {
            return Err(PlanAccessError::SelfActionDenied);
        }

        self.participant_role(&txn, plan_id, target_id)
            .await?
            .ok_or(PlanAccessError::ParticipantNotFound {
                plan_id,
                user_id: target_id,
            })?;

        self.plan_store
            .update_participant_role(&txn, plan_id, caller_id, ParticipantRole::Admin)
            .await?;
        self.plan_store
            .update_participant_role(&txn, plan_id, target_id, ParticipantRole::Owner)
            .await?;
        self.plan_store
            .set_plan_creator(&txn, plan_id, target_id)
            .await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        tracing::info!(plan_id, from = caller_id, to = target_id, "ownership transferred");

        Ok(OwnershipTransfer {
            plan_id,
            previous_owner_id: caller_id,
            new_owner_id: target_id,
        })
    }

    /// Delete the plan and its whole subtree: records, reminders, tasks,
    /// participants, then the plan row, all in one transaction.
    pub async fn delete_plan(&self, plan_id: i64, caller_id: i64) -> Result<(), PlanAccessError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionBegin { source: e })?;

        self.require_plan(&txn, plan_id).await?;

        self.participant_role(&txn, plan_id, caller_id)
            .await?
            .filter(|role| *role >= ParticipantRole::Owner)
            .ok_or(PlanAccessError::RankTooLow {
                required: ParticipantRole::Owner,
            })?;

        self.plan_store.delete_plan_cascade(&txn, plan_id).await?;

        txn.commit()
            .await
            .map_err(|e| DatabaseError::TransactionCommit { source: e })?;

        tracing::info!(plan_id, caller_id, "plan deleted");

        Ok(())
    }

    /// Participants ordered by rank descending, then join time ascending.
    /// Display ordering only; decisions never depend on it.
    pub async fn list_participants(
        &self,
        plan_id: i64,
    ) -> Result<Vec<ParticipantDescriptor>, PlanAccessError> {
        self.require_plan(&self.db, plan_id).await?;

        let mut participants = self
            .plan_store
            .participants_of_plan(&self.db, plan_id)
            .await?;
        participants.sort_by_key(|p| (Reverse(p.role.rank()), p.joined_at));

        Ok(participants
            .into_iter()
            .map(ParticipantDescriptor::from)
            .collect())
    }

    async fn require_plan(
        &self,
        conn: &impl sea_orm::ConnectionTrait,
        plan_id: i64,
    ) -> Result<plan::Model, PlanAccessError> {
        self.plan_store
            .find_plan(conn, plan_id)
            .await?
            .ok_or(PlanAccessError::PlanNotFound { plan_id })
    }

    async fn participant_role(
        &self,
        conn: &impl sea_orm::ConnectionTrait,
        plan_id: i64,
        user_id: i64,
    ) -> Result<Option<ParticipantRole>, PlanAccessError> {
        let participant = self.plan_store.participant(conn, plan_id, user_id).await?;
        Ok(participant.map(|p| p.role))
    }
}

#[cfg(test)]
#[path = "plan_access_service_tests.rs"]
mod plan_access_service_tests;
