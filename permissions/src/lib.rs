//! Permission resolution core for spaces, channels, and roles.
//!
//! Computes effective 64-bit permission bitmasks from a caller-supplied
//! snapshot (role table, member role set, channel overwrites) and makes
//! rank-based authorization decisions over the role hierarchy. The crate
//! performs no I/O and holds no state: every entry point is a pure
//! function over the snapshot passed into it.

pub mod bits;
pub mod context;
pub mod flags;
pub mod hierarchy;
pub mod models;
pub mod resolver;

pub use bits::{ParseError, PermissionSet};
pub use context::{MemberPermissionContext, PermissionError};
pub use flags::{MemberFlags, SpacePermissions};
pub use hierarchy::{
    can_assign_role, can_edit_role, can_manage_roles, is_admin, is_owner, top_role_pos,
    RoleAction, RoleActor, NO_ROLE_POS,
};
pub use models::{Channel, Member, Overwrite, OverwriteTarget, Role, Snowflake, Space};
pub use resolver::{
    apply_overwrite_layer, resolve_base_bits, resolve_effective_channel_bits, ChannelQuery,
};
