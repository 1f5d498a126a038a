//! Precomputed permission context for a guild-style space member.
//!
//! Bundles everything needed for repeated permission checks over one
//! consistent snapshot, so call sites do not re-derive bits per check.
//! The snapshot is supplied by the caller; consistency between the role
//! table and the member's role set is the caller's responsibility.

use thiserror::Error;

use crate::bits::PermissionSet;
use crate::hierarchy::{self, RoleActor, NO_ROLE_POS};
use crate::models::{Channel, Member, Overwrite, Role, Snowflake, Space};
use crate::resolver::{resolve_base_bits, resolve_effective_channel_bits, ChannelQuery};

/// Errors from `require_*` checks.
///
/// Authorization denial is an expected outcome; these exist so callers
/// that want a typed failure instead of a bare `false` can have one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// Actor lacks a required permission.
    #[error("missing permission: {0}")]
    MissingPermission(PermissionSet),

    /// Actor does not outrank the role it is acting on.
    #[error("cannot act on role at position {target_position} from position {actor_position}")]
    RoleHierarchy {
        actor_position: i32,
        target_position: i32,
    },
}

/// Precomputed permission context for one member of one space.
#[derive(Debug, Clone)]
pub struct MemberPermissionContext {
    /// Space id, doubling as the everyone-role id.
    pub space_id: Snowflake,

    /// The space owner's user id.
    pub space_owner_id: Snowflake,

    /// The member's user id.
    pub user_id: Snowflake,

    /// Role ids held by the member.
    pub role_ids: Vec<Snowflake>,

    /// Base permissions aggregated from the role table.
    pub base_bits: PermissionSet,

    /// The highest held role position.
    /// `None` if no role beyond everyone resolves.
    pub top_role_pos: Option<i32>,

    /// Whether this member is the space owner.
    pub is_owner: bool,
}

impl MemberPermissionContext {
    /// Build a context from a consistent snapshot of the space.
    #[tracing::instrument(skip(roles))]
    #[must_use]
    pub fn new(space: &Space, roles: &[Role], member: &Member) -> Self {
        let base_bits = resolve_base_bits(&space.id, roles, &member.role_ids);

        let top = hierarchy::top_role_pos(roles, &member.role_ids);
        let top_role_pos = (top != NO_ROLE_POS).then_some(top);

        let is_owner = hierarchy::is_owner(&space.owner_id, &member.user_id);

        tracing::debug!(base = %base_bits, ?top_role_pos, is_owner, "resolved member permissions");

        Self {
            space_id: space.id.clone(),
            space_owner_id: space.owner_id.clone(),
            user_id: member.user_id.clone(),
            role_ids: member.role_ids.clone(),
            base_bits,
            top_role_pos,
            is_owner,
        }
    }

    /// The top rank as the gate functions expect it, [`NO_ROLE_POS`]
    /// when the member holds no resolvable role.
    #[must_use]
    pub const fn top_pos(&self) -> i32 {
        match self.top_role_pos {
            Some(pos) => pos,
            None => NO_ROLE_POS,
        }
    }

    /// Check if the member has the specified permission(s) in the space.
    #[must_use]
    pub const fn has_permission(&self, required: PermissionSet) -> bool {
        self.base_bits.has_all(required)
    }

    /// Require that the member has the specified permission(s).
    pub const fn require_permission(&self, required: PermissionSet) -> Result<(), PermissionError> {
        if self.has_permission(required) {
            Ok(())
        } else {
            Err(PermissionError::MissingPermission(required))
        }
    }

    /// Require a strictly higher rank than `role_pos`.
    pub const fn require_outranks(&self, role_pos: i32) -> Result<(), PermissionError> {
        if self.top_pos() > role_pos {
            Ok(())
        } else {
            Err(PermissionError::RoleHierarchy {
                actor_position: self.top_pos(),
                target_position: role_pos,
            })
        }
    }

    /// Effective bits for `channel`, layering the parent container's
    /// overwrites (if any) and then the channel's own over the
    /// precomputed base.
    #[must_use]
    pub fn effective_channel_bits(
        &self,
        channel: &Channel,
        parent_overwrites: Option<&[Overwrite]>,
    ) -> PermissionSet {
        resolve_effective_channel_bits(&ChannelQuery {
            base_bits: self.base_bits,
            user_id: &self.user_id,
            everyone_role_id: &self.space_id,
            member_role_ids: &self.role_ids,
            parent_overwrites,
            channel_overwrites: Some(&channel.overwrites),
        })
    }

    /// Borrow this context as gate input.
    ///
    /// `has_manage_roles` stays caller-computed so the gates remain
    /// independent of the flag registry.
    #[must_use]
    pub fn actor(&self, has_manage_roles: bool) -> RoleActor<'_> {
        RoleActor {
            space_owner_id: &self.space_owner_id,
            user_id: &self.user_id,
            bits: self.base_bits,
            has_manage_roles,
            top_pos: self.top_pos(),
        }
    }
}
