use crate::errors::internal::DatabaseError;
use crate::errors::ErrorKind;
use thiserror::Error;

/// Errors raised by global role and permission operations.
///
/// Every variant maps to one transport-agnostic [`ErrorKind`] via
/// [`RoleError::kind`]; the excluded HTTP layer translates kinds to
/// status codes.
#[derive(Error, Debug)]
pub enum RoleError {
    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    /// Always enumerates every unresolved code, never just the first.
    #[error("Roles not found: {}", codes.join(", "))]
    RolesNotFound { codes: Vec<String> },

    #[error("Role not found: {code}")]
    RoleNotFound { code: String },

    #[error("Permissions not found: {}", codes.join(", "))]
    PermissionsNotFound { codes: Vec<String> },

    #[error("All requested roles are already assigned")]
    AllRolesAlreadyAssigned,

    #[error("Role not assigned to user: {code}")]
    RoleNotAssigned { code: String },

    #[error("User must keep at least one role")]
    LastRoleProtected,

    #[error("Role code list must not be empty")]
    EmptyRoleCodes,

    #[error("System role cannot be modified: {code}")]
    SystemRoleImmutable { code: String },

    #[error("Role is still assigned to {user_count} user(s): {code}")]
    RoleInUse { code: String, user_count: u64 },

    #[error("Role already exists: {value}")]
    DuplicateRole { value: String },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl RoleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RoleError::UserNotFound { .. }
            | RoleError::RolesNotFound { .. }
            | RoleError::RoleNotFound { .. }
            | RoleError::PermissionsNotFound { .. }
            | RoleError::RoleNotAssigned { .. } => ErrorKind::NotFound,
            RoleError::AllRolesAlreadyAssigned
            | RoleError::LastRoleProtected
            | RoleError::RoleInUse { .. }
            | RoleError::DuplicateRole { .. } => ErrorKind::Conflict,
            RoleError::EmptyRoleCodes => ErrorKind::InvalidArgument,
            RoleError::SystemRoleImmutable { .. } => ErrorKind::Forbidden,
            RoleError::Database(_) => ErrorKind::Internal,
        }
    }
}
