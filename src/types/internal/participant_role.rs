use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Participant role within a single plan.
///
/// The hierarchy is total: Viewer < Member < Admin < Owner. Comparison goes
/// through [`ParticipantRole::rank`], so the ordering cannot drift with
/// variant declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    #[sea_orm(string_value = "viewer")]
    Viewer,
    #[sea_orm(string_value = "member")]
    Member,
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "owner")]
    Owner,
}

impl ParticipantRole {
    /// Numeric rank: viewer=1, member=2, admin=3, owner=4.
    pub fn rank(&self) -> u8 {
        match self {
            ParticipantRole::Viewer => 1,
            ParticipantRole::Member => 2,
            ParticipantRole::Admin => 3,
            ParticipantRole::Owner => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantRole::Viewer => "viewer",
            ParticipantRole::Member => "member",
            ParticipantRole::Admin => "admin",
            ParticipantRole::Owner => "owner",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "viewer" => Some(ParticipantRole::Viewer),
            "member" => Some(ParticipantRole::Member),
            "admin" => Some(ParticipantRole::Admin),
            "owner" => Some(ParticipantRole::Owner),
            _ => None,
        }
    }
}

impl Ord for ParticipantRole {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for ParticipantRole {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_maximal() {
        for role in [
            ParticipantRole::Viewer,
            ParticipantRole::Member,
            ParticipantRole::Admin,
            ParticipantRole::Owner,
        ] {
            assert!(ParticipantRole::Owner >= role);
        }
    }

    #[test]
    fn ranks_are_strictly_increasing() {
        assert!(ParticipantRole::Viewer < ParticipantRole::Member);
        assert!(ParticipantRole::Member < ParticipantRole::Admin);
        assert!(ParticipantRole::Admin < ParticipantRole::Owner);
    }

    #[test]
    fn parse_round_trips() {
        for role in [
            ParticipantRole::Viewer,
            ParticipantRole::Member,
            ParticipantRole::Admin,
            ParticipantRole::Owner,
        ] {
            assert_eq!(ParticipantRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(ParticipantRole::parse("superuser"), None);
    }
}
