use crate::types::db::{plan_participant, role};
use crate::types::internal::ParticipantRole;
use serde::Serialize;

/// Role summary returned by role-mutating operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDescriptor {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub is_system: bool,
}

impl From<role::Model> for RoleDescriptor {
    fn from(model: role::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            code: model.code,
            description: model.description,
            is_system: model.is_system,
        }
    }
}

/// Participant row as exposed to callers, ordered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantDescriptor {
    pub user_id: i64,
    pub role: ParticipantRole,
    pub joined_at: i64,
}

impl From<plan_participant::Model> for ParticipantDescriptor {
    fn from(model: plan_participant::Model) -> Self {
        Self {
            user_id: model.user_id,
            role: model.role,
            joined_at: model.joined_at,
        }
    }
}

/// Outcome of a completed ownership transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnershipTransfer {
    pub plan_id: i64,
    pub previous_owner_id: i64,
    pub new_owner_id: i64,
}
