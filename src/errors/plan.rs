use crate::errors::internal::DatabaseError;
use crate::errors::ErrorKind;
use crate::types::internal::ParticipantRole;
use thiserror::Error;

/// Errors raised by plan-scoped authorization and membership operations.
///
/// "Not found" (plan/user/participant absent) and "forbidden" (present but
/// denied by a rank or ownership rule) stay distinct so callers can render
/// the right user-facing outcome.
#[derive(Error, Debug)]
pub enum PlanAccessError {
    #[error("Plan not found: {plan_id}")]
    PlanNotFound { plan_id: i64 },

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("User {user_id} is not a participant of plan {plan_id}")]
    ParticipantNotFound { plan_id: i64, user_id: i64 },

    /// Operator lacks the minimum rank (or holds no rank at all) in the plan.
    #[error("Requires at least the {required} role in this plan")]
    RankTooLow { required: ParticipantRole },

    #[error("Cannot target yourself with this operation")]
    SelfActionDenied,

    #[error("The owner role cannot be changed here; use ownership transfer")]
    OwnerRoleImmutable,

    #[error("The owner role cannot be assigned; use ownership transfer")]
    CannotAssignOwner,

    #[error("An owner cannot remove another owner")]
    CannotRemoveOwner,

    #[error("A {operator_role} may only remove lower-ranked participants, not a {target_role}")]
    RemovalRequiresHigherRank {
        operator_role: ParticipantRole,
        target_role: ParticipantRole,
    },

    #[error("Inviting with the {role} role requires the owner role")]
    ElevatedInviteRequiresOwner { role: ParticipantRole },

    #[error("The owner cannot leave the plan; transfer ownership first")]
    OwnerCannotLeave,

    #[error("User {user_id} is already a participant of plan {plan_id}")]
    AlreadyParticipant { plan_id: i64, user_id: i64 },

    #[error("Plan {plan_id} is not public")]
    PlanNotPublic { plan_id: i64 },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl PlanAccessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlanAccessError::PlanNotFound { .. }
            | PlanAccessError::UserNotFound { .. }
            | PlanAccessError::ParticipantNotFound { .. } => ErrorKind::NotFound,
            PlanAccessError::RankTooLow { .. }
            | PlanAccessError::SelfActionDenied
            | PlanAccessError::OwnerRoleImmutable
            | PlanAccessError::CannotAssignOwner
            | PlanAccessError::CannotRemoveOwner
            | PlanAccessError::RemovalRequiresHigherRank { .. }
            | PlanAccessError::ElevatedInviteRequiresOwner { .. }
            | PlanAccessError::OwnerCannotLeave
            | PlanAccessError::PlanNotPublic { .. } => ErrorKind::Forbidden,
            PlanAccessError::AlreadyParticipant { .. } => ErrorKind::Conflict,
            PlanAccessError::Database(_) => ErrorKind::Internal,
        }
    }
}
