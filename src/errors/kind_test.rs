use crate::errors::{ErrorKind, PlanAccessError, RoleError};
use crate::types::internal::ParticipantRole;

#[test]
fn role_error_kinds_are_distinguishable() {
    assert_eq!(
        RoleError::RolesNotFound {
            codes: vec!["editor".to_string()]
        }
        .kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        RoleError::LastRoleProtected.kind(),
        ErrorKind::Conflict
    );
    assert_eq!(
        RoleError::EmptyRoleCodes.kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        RoleError::SystemRoleImmutable {
            code: "super_admin".to_string()
        }
        .kind(),
        ErrorKind::Forbidden
    );
}

#[test]
fn role_error_names_every_missing_code() {
    let err = RoleError::RolesNotFound {
        codes: vec!["editor".to_string(), "reviewer".to_string()],
    };
    let message = err.to_string();
    assert!(message.contains("editor"));
    assert!(message.contains("reviewer"));
}

#[test]
fn plan_error_kinds_are_distinguishable() {
    assert_eq!(
        PlanAccessError::PlanNotFound { plan_id: 7 }.kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        PlanAccessError::RankTooLow {
            required: ParticipantRole::Admin
        }
        .kind(),
        ErrorKind::Forbidden
    );
    assert_eq!(
        PlanAccessError::AlreadyParticipant {
            plan_id: 7,
            user_id: 3
        }
        .kind(),
        ErrorKind::Conflict
    );
}

#[test]
fn rank_too_low_names_the_required_rank() {
    let err = PlanAccessError::RankTooLow {
        required: ParticipantRole::Owner,
    };
    assert!(err.to_string().contains("owner"));
}
