//! Role-hierarchy authorization gates.
//!
//! Rank- and bypass-based decisions for viewing, editing, deleting, and
//! assigning roles. All gates are total boolean predicates: a
//! disallowed combination denies, it never errors. Rank comparisons are
//! always strict, so equal positions grant nothing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::bits::PermissionSet;
use crate::flags::SpacePermissions;
use crate::models::{Role, Snowflake};

/// Sentinel rank for a member whose only role is everyone.
pub const NO_ROLE_POS: i32 = -1;

/// A role action being authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleAction {
    View,
    Edit,
    Delete,
}

/// Actor-side inputs shared by the gate functions.
///
/// `has_manage_roles` is computed by the caller against the flag
/// registry, typically
/// `bits.has_all(SpacePermissions::MANAGE_ROLES.to_set())`, so the
/// gates themselves stay independent of which bit means what.
#[derive(Debug, Clone, Copy)]
pub struct RoleActor<'a> {
    /// The space owner's user id.
    pub space_owner_id: &'a Snowflake,
    /// The acting user's id.
    pub user_id: &'a Snowflake,
    /// The actor's effective permission bitmask.
    pub bits: PermissionSet,
    /// Whether the actor holds the manage-roles permission.
    pub has_manage_roles: bool,
    /// The actor's highest role position ([`NO_ROLE_POS`] if roleless).
    pub top_pos: i32,
}

/// Identity check against the space owner.
#[must_use]
pub fn is_owner(space_owner_id: &Snowflake, actor_user_id: &Snowflake) -> bool {
    space_owner_id == actor_user_id
}

/// `true` iff the administrator bit is fully set in `bits`.
#[must_use]
pub fn is_admin(bits: PermissionSet) -> bool {
    bits.has_all(SpacePermissions::ADMINISTRATOR.to_set())
}

/// Highest `position` among the roles that resolve from `role_ids`.
///
/// Returns [`NO_ROLE_POS`] when none resolve, meaning the member holds
/// no explicit role beyond everyone.
#[must_use]
pub fn top_role_pos(roles: &[Role], role_ids: &[Snowflake]) -> i32 {
    let by_id: HashMap<&Snowflake, i32> = roles.iter().map(|r| (&r.id, r.position)).collect();

    role_ids
        .iter()
        .filter_map(|role_id| by_id.get(role_id).copied())
        .fold(NO_ROLE_POS, i32::max)
}

/// Permission gate for role management.
///
/// Owner and administrator bypass the permission check; everyone else
/// needs the externally-computed manage-roles flag.
#[must_use]
pub fn can_manage_roles(actor: &RoleActor<'_>) -> bool {
    if is_owner(actor.space_owner_id, actor.user_id) {
        return true;
    }

    // Admin bypasses permission gating
    if is_admin(actor.bits) {
        return true;
    }

    actor.has_manage_roles
}

/// Whether `actor` may view, edit, or delete a role.
///
/// Deleting the everyone role is refused before any bypass applies,
/// owner included. Otherwise: owner short-circuits, then the
/// [`can_manage_roles`] gate must pass, then the actor must strictly
/// outrank the role.
#[must_use]
pub fn can_edit_role(
    actor: &RoleActor<'_>,
    role_pos: i32,
    is_everyone: bool,
    action: RoleAction,
) -> bool {
    // Deleting everyone is never allowed, not even for the owner, so
    // this runs before the bypasses.
    if action == RoleAction::Delete && is_everyone {
        return false;
    }

    if is_owner(actor.space_owner_id, actor.user_id) {
        return true;
    }

    if !can_manage_roles(actor) {
        return false;
    }

    // must be strictly higher
    actor.top_pos > role_pos
}

/// Whether `actor` may grant or revoke a role on a target member.
///
/// The everyone role is never assigned or removed explicitly. A
/// non-owner actor must pass the [`can_manage_roles`] gate and strictly
/// outrank both the target member and the role itself; failing either
/// rank check denies the action.
#[must_use]
pub fn can_assign_role(
    actor: &RoleActor<'_>,
    target_top_pos: i32,
    role_pos: i32,
    is_everyone: bool,
) -> bool {
    if is_everyone {
        return false;
    }

    if is_owner(actor.space_owner_id, actor.user_id) {
        return true;
    }

    if !can_manage_roles(actor) {
        return false;
    }

    // cannot touch members at/above you
    if actor.top_pos <= target_top_pos {
        return false;
    }

    // cannot grant/revoke roles at/above you
    actor.top_pos > role_pos
}
