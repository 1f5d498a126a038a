//! Snapshot types consumed by the resolver.
//!
//! Everything here is a read-only snapshot supplied by the caller for
//! the duration of one resolution call. The core never mutates these
//! and does not validate cross-references between them: a dangling role
//! id simply contributes no permissions.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::bits::PermissionSet;

/// Opaque identifier token (numeric-string snowflake).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snowflake(SmolStr);

impl Snowflake {
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(SmolStr::new(id))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Snowflake {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A role in a space's role table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role ID. The everyone role has the id of its space.
    pub id: Snowflake,
    /// Base permission bitmask granted by this role.
    pub permissions: PermissionSet,
    /// Positional rank. Higher value = higher authority; ties carry no
    /// extra privilege since rank comparisons are strict.
    pub position: i32,
}

/// A member of a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// The member's user ID.
    pub user_id: Snowflake,
    /// Explicitly held role ids (may be empty; everyone is implicit).
    pub role_ids: Vec<Snowflake>,
}

/// What an overwrite applies to: exactly one role or one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum OverwriteTarget {
    /// Applies to every member holding the role.
    Role(Snowflake),
    /// Applies to a single member directly.
    Member(Snowflake),
}

impl OverwriteTarget {
    /// Role id when targeting a role.
    #[must_use]
    pub const fn role_id(&self) -> Option<&Snowflake> {
        match self {
            Self::Role(id) => Some(id),
            Self::Member(_) => None,
        }
    }

    /// User id when targeting a member.
    #[must_use]
    pub const fn user_id(&self) -> Option<&Snowflake> {
        match self {
            Self::Member(id) => Some(id),
            Self::Role(_) => None,
        }
    }
}

/// A per-role or per-member allow/deny delta attached to a container.
///
/// `allow` and `deny` need not be disjoint: deny bits are cleared before
/// allow bits are set, so allow wins where both name the same bit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overwrite {
    /// The role or member this overwrite applies to.
    pub target: OverwriteTarget,
    /// Bits forced on.
    pub allow: PermissionSet,
    /// Bits forced off (unless also in `allow`).
    pub deny: PermissionSet,
}

/// A channel, optionally nested under a parent container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel ID.
    pub id: Snowflake,
    /// Parent container id, if the channel is nested.
    pub parent_id: Option<Snowflake>,
    /// Overwrites attached to this channel. Order is irrelevant to the
    /// resolved result.
    pub overwrites: Vec<Overwrite>,
}

/// A space (top-level community container).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    /// Space ID, doubling as the everyone-role id.
    pub id: Snowflake,
    /// The owner's user ID.
    pub owner_id: Snowflake,
}

impl Space {
    /// Id of the implicit everyone role.
    #[must_use]
    pub const fn everyone_role_id(&self) -> &Snowflake {
        &self.id
    }
}
