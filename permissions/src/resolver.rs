//! Permission resolution logic.
//!
//! Computes effective permissions for a member in a space/channel
//! context from a caller-supplied snapshot. All functions are pure and
//! total: unresolved references contribute nothing, they never fail.

use std::collections::{HashMap, HashSet};

use crate::bits::PermissionSet;
use crate::models::{Overwrite, Role, Snowflake};

/// Aggregate a member's base permissions from the space's role table.
///
/// Resolution order:
/// 1. OR in the everyone role (the role whose id equals `space_id`)
/// 2. OR in every member role that resolves in the table
///
/// Role ids that do not resolve are skipped. The result is independent
/// of role order and unchanged by duplicate ids.
#[must_use]
pub fn resolve_base_bits(
    space_id: &Snowflake,
    roles: &[Role],
    member_role_ids: &[Snowflake],
) -> PermissionSet {
    let by_id: HashMap<&Snowflake, PermissionSet> =
        roles.iter().map(|r| (&r.id, r.permissions)).collect();

    let mut bits = PermissionSet::EMPTY;

    if let Some(everyone) = by_id.get(space_id) {
        bits |= *everyone;
    }

    for role_id in member_role_ids {
        if let Some(permissions) = by_id.get(role_id) {
            bits |= *permissions;
        }
    }

    bits
}

/// Clear deny bits, then set allow bits. Allow wins where both name the
/// same bit, and re-application is a no-op.
fn apply(bits: PermissionSet, allow: PermissionSet, deny: PermissionSet) -> PermissionSet {
    (bits & !deny) | allow
}

/// Apply one container's overwrites on top of `base`.
///
/// Precedence within the layer, low to high:
/// 1. The overwrite targeting the everyone role
/// 2. Overwrites targeting roles the member holds, aggregated into one
///    combined allow and one combined deny before a single application.
///    An allow from any held role therefore beats a deny from another.
/// 3. The overwrite targeting the member directly
///
/// An empty overwrite list returns `base` unchanged.
#[must_use]
pub fn apply_overwrite_layer(
    base: PermissionSet,
    overwrites: &[Overwrite],
    everyone_role_id: &Snowflake,
    member_role_ids: &[Snowflake],
    user_id: &Snowflake,
) -> PermissionSet {
    if overwrites.is_empty() {
        return base;
    }

    let mut bits = base;

    // everyone
    if let Some(ow) = overwrites
        .iter()
        .find(|ow| ow.target.role_id() == Some(everyone_role_id))
    {
        bits = apply(bits, ow.allow, ow.deny);
    }

    // roles (aggregate before applying)
    let member_set: HashSet<&Snowflake> = member_role_ids.iter().collect();
    let mut role_allow = PermissionSet::EMPTY;
    let mut role_deny = PermissionSet::EMPTY;

    for ow in overwrites {
        let Some(role_id) = ow.target.role_id() else {
            continue;
        };
        if !member_set.contains(role_id) {
            continue;
        }
        role_allow |= ow.allow;
        role_deny |= ow.deny;
    }
    bits = apply(bits, role_allow, role_deny);

    // member
    if let Some(ow) = overwrites
        .iter()
        .find(|ow| ow.target.user_id() == Some(user_id))
    {
        bits = apply(bits, ow.allow, ow.deny);
    }

    bits
}

/// Inputs for a full channel resolution.
#[derive(Debug, Clone, Copy)]
pub struct ChannelQuery<'a> {
    /// Base bitmask from [`resolve_base_bits`].
    pub base_bits: PermissionSet,
    /// The member's user id.
    pub user_id: &'a Snowflake,
    /// The everyone-role id (equal to the space id).
    pub everyone_role_id: &'a Snowflake,
    /// Role ids held by the member.
    pub member_role_ids: &'a [Snowflake],
    /// Overwrites of the channel's parent container, if any.
    pub parent_overwrites: Option<&'a [Overwrite]>,
    /// Overwrites of the channel itself, if any.
    pub channel_overwrites: Option<&'a [Overwrite]>,
}

/// Resolve the effective bitmask for a channel.
///
/// The parent container's layer applies first, then the channel's own
/// layer, so channel overwrites take final precedence. Each layer
/// follows the everyone/role/member sub-ordering of
/// [`apply_overwrite_layer`].
#[must_use]
pub fn resolve_effective_channel_bits(query: &ChannelQuery<'_>) -> PermissionSet {
    let mut bits = query.base_bits;

    if let Some(overwrites) = query.parent_overwrites {
        bits = apply_overwrite_layer(
            bits,
            overwrites,
            query.everyone_role_id,
            query.member_role_ids,
            query.user_id,
        );
    }

    if let Some(overwrites) = query.channel_overwrites {
        bits = apply_overwrite_layer(
            bits,
            overwrites,
            query.everyone_role_id,
            query.member_role_ids,
            query.user_id,
        );
    }

    bits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OverwriteTarget;

    fn id(s: &str) -> Snowflake {
        Snowflake::new(s)
    }

    fn role(rid: &str, bits: u64) -> Role {
        Role {
            id: id(rid),
            permissions: PermissionSet::from_bits(bits),
            position: 0,
        }
    }

    fn role_overwrite(rid: &str, allow: u64, deny: u64) -> Overwrite {
        Overwrite {
            target: OverwriteTarget::Role(id(rid)),
            allow: PermissionSet::from_bits(allow),
            deny: PermissionSet::from_bits(deny),
        }
    }

    fn member_overwrite(uid: &str, allow: u64, deny: u64) -> Overwrite {
        Overwrite {
            target: OverwriteTarget::Member(id(uid)),
            allow: PermissionSet::from_bits(allow),
            deny: PermissionSet::from_bits(deny),
        }
    }

    // === Base resolution ===

    #[test]
    fn test_base_bits_combine_everyone_and_member_roles() {
        let roles = [role("space", 0b0001), role("r1", 0b0010)];
        let bits = resolve_base_bits(&id("space"), &roles, &[id("r1")]);
        assert_eq!(bits.bits(), 0b0011);
    }

    #[test]
    fn test_base_bits_without_everyone_role() {
        let roles = [role("r1", 0b0100)];
        let bits = resolve_base_bits(&id("space"), &roles, &[id("r1")]);
        assert_eq!(bits.bits(), 0b0100);
    }

    #[test]
    fn test_base_bits_skip_unresolved_role_ids() {
        let roles = [role("space", 0b0001)];
        let bits = resolve_base_bits(&id("space"), &roles, &[id("gone"), id("missing")]);
        assert_eq!(bits.bits(), 0b0001);
    }

    #[test]
    fn test_base_bits_order_independent() {
        let roles = [role("space", 0b001), role("a", 0b010), role("b", 0b100)];
        let forward = resolve_base_bits(&id("space"), &roles, &[id("a"), id("b")]);
        let reverse = resolve_base_bits(&id("space"), &roles, &[id("b"), id("a")]);
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_base_bits_duplicate_ids_do_not_change_result() {
        let roles = [role("a", 0b010)];
        let once = resolve_base_bits(&id("space"), &roles, &[id("a")]);
        let thrice = resolve_base_bits(&id("space"), &roles, &[id("a"), id("a"), id("a")]);
        assert_eq!(once, thrice);
    }

    #[test]
    fn test_base_bits_empty_member_roles_yield_everyone_only() {
        let roles = [role("space", 0b1000), role("r1", 0b0001)];
        let bits = resolve_base_bits(&id("space"), &roles, &[]);
        assert_eq!(bits.bits(), 0b1000);
    }

    // === Single layer ===

    #[test]
    fn test_layer_empty_overwrites_is_noop() {
        let base = PermissionSet::from_bits(0b1010);
        let bits = apply_overwrite_layer(base, &[], &id("space"), &[], &id("u"));
        assert_eq!(bits, base);
    }

    #[test]
    fn test_layer_everyone_overwrite_applies_first() {
        let base = PermissionSet::from_bits(0b0011);
        let overwrites = [role_overwrite("space", 0b0100, 0b0001)];
        let bits = apply_overwrite_layer(base, &overwrites, &id("space"), &[], &id("u"));
        assert_eq!(bits.bits(), 0b0110);
    }

    #[test]
    fn test_layer_role_aggregate_allow_beats_deny() {
        // Role a denies bit 1, role b allows it. The aggregate applies
        // allow after deny, so the bit survives no matter how many
        // roles deny it.
        let overwrites = [role_overwrite("a", 0, 0b10), role_overwrite("b", 0b10, 0)];
        let bits = apply_overwrite_layer(
            PermissionSet::EMPTY,
            &overwrites,
            &id("space"),
            &[id("a"), id("b")],
            &id("u"),
        );
        assert!(bits.has_all(PermissionSet::from_bits(0b10)));
    }

    #[test]
    fn test_layer_role_overwrites_for_unheld_roles_ignored() {
        let base = PermissionSet::from_bits(0b01);
        let overwrites = [role_overwrite("other", 0b10, 0b01)];
        let bits = apply_overwrite_layer(base, &overwrites, &id("space"), &[id("a")], &id("u"));
        assert_eq!(bits, base);
    }

    #[test]
    fn test_layer_member_overwrite_beats_role_aggregate() {
        let overwrites = [
            role_overwrite("a", 0b01, 0),
            member_overwrite("u", 0, 0b01),
        ];
        let bits = apply_overwrite_layer(
            PermissionSet::EMPTY,
            &overwrites,
            &id("space"),
            &[id("a")],
            &id("u"),
        );
        assert!(bits.is_empty());
    }

    #[test]
    fn test_layer_member_overwrite_beats_everyone_deny() {
        let overwrites = [
            role_overwrite("space", 0, 0b01),
            member_overwrite("u", 0b01, 0),
        ];
        let bits = apply_overwrite_layer(
            PermissionSet::from_bits(0b01),
            &overwrites,
            &id("space"),
            &[],
            &id("u"),
        );
        assert!(bits.has_all(PermissionSet::from_bits(0b01)));
    }

    #[test]
    fn test_layer_allow_wins_within_one_overwrite() {
        // deny is cleared before allow is set, so a bit named in both
        // ends up allowed
        let overwrites = [member_overwrite("u", 0b01, 0b01)];
        let bits = apply_overwrite_layer(
            PermissionSet::EMPTY,
            &overwrites,
            &id("space"),
            &[],
            &id("u"),
        );
        assert!(bits.has_all(PermissionSet::from_bits(0b01)));
    }

    #[test]
    fn test_layer_is_idempotent() {
        let base = PermissionSet::from_bits(0b1111);
        let overwrites = [
            role_overwrite("space", 0b1_0000, 0b0001),
            role_overwrite("a", 0b10_0000, 0b0010),
            member_overwrite("u", 0b100_0000, 0b0100),
        ];
        let member_roles = [id("a")];

        let once = apply_overwrite_layer(base, &overwrites, &id("space"), &member_roles, &id("u"));
        let twice =
            apply_overwrite_layer(once, &overwrites, &id("space"), &member_roles, &id("u"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_layer_other_members_overwrite_ignored() {
        let overwrites = [member_overwrite("someone-else", 0b01, 0)];
        let bits = apply_overwrite_layer(
            PermissionSet::EMPTY,
            &overwrites,
            &id("space"),
            &[],
            &id("u"),
        );
        assert!(bits.is_empty());
    }

    // === Layered channel resolution ===

    #[test]
    fn test_channel_layer_overrides_parent_layer() {
        let parent = [role_overwrite("space", 0, 0b01)];
        let channel = [role_overwrite("space", 0b01, 0)];

        let bits = resolve_effective_channel_bits(&ChannelQuery {
            base_bits: PermissionSet::from_bits(0b01),
            user_id: &id("u"),
            everyone_role_id: &id("space"),
            member_role_ids: &[],
            parent_overwrites: Some(&parent),
            channel_overwrites: Some(&channel),
        });

        assert!(bits.has_all(PermissionSet::from_bits(0b01)));
    }

    #[test]
    fn test_channel_only_equals_single_layer_application() {
        let base = PermissionSet::from_bits(0b1100);
        let channel = [
            role_overwrite("space", 0b0001, 0b1000),
            member_overwrite("u", 0b0010, 0),
        ];

        let layered = resolve_effective_channel_bits(&ChannelQuery {
            base_bits: base,
            user_id: &id("u"),
            everyone_role_id: &id("space"),
            member_role_ids: &[],
            parent_overwrites: None,
            channel_overwrites: Some(&channel),
        });
        let direct = apply_overwrite_layer(base, &channel, &id("space"), &[], &id("u"));

        assert_eq!(layered, direct);
    }

    #[test]
    fn test_no_layers_returns_base() {
        let base = PermissionSet::from_bits(0b101);
        let bits = resolve_effective_channel_bits(&ChannelQuery {
            base_bits: base,
            user_id: &id("u"),
            everyone_role_id: &id("space"),
            member_role_ids: &[],
            parent_overwrites: None,
            channel_overwrites: None,
        });
        assert_eq!(bits, base);
    }

    #[test]
    fn test_parent_deny_survives_when_channel_is_silent() {
        let parent = [role_overwrite("space", 0, 0b01)];

        let bits = resolve_effective_channel_bits(&ChannelQuery {
            base_bits: PermissionSet::from_bits(0b11),
            user_id: &id("u"),
            everyone_role_id: &id("space"),
            member_role_ids: &[],
            parent_overwrites: Some(&parent),
            channel_overwrites: None,
        });

        assert_eq!(bits.bits(), 0b10);
    }
}
