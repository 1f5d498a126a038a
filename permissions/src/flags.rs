//! Named permission flags.
//!
//! The resolution algebra is flag-agnostic and operates on raw 64-bit
//! masks; this registry gives the platform's bits their names. Flags are
//! organized into categories:
//! - Access (bits 0-2): Channel visibility and invites
//! - Administration (bits 3-7): Space, role, and channel management
//! - Messaging (bits 8-12): Message content permissions
//! - Moderation (bits 13-16): Member management permissions
//! - Voice (bits 17-21): Voice channel permissions

use bitflags::bitflags;

use crate::bits::PermissionSet;

bitflags! {
    /// Space-level permissions as a 64-bit bitfield.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct SpacePermissions: u64 {
        // === Access (bits 0-2) ===
        /// Permission to view a channel and read its message history
        const VIEW_CHANNEL       = 1 << 0;
        /// Permission to create invite links
        const CREATE_INVITE      = 1 << 1;
        /// Permission to manage (revoke) invite links
        const MANAGE_INVITES     = 1 << 2;

        // === Administration (bits 3-7) ===
        /// Every permission, and bypass of the role-management gate
        const ADMINISTRATOR      = 1 << 3;
        /// Permission to modify space settings
        const MANAGE_SPACE       = 1 << 4;
        /// Permission to create, edit, and delete roles
        const MANAGE_ROLES       = 1 << 5;
        /// Permission to create, edit, and delete channels
        const MANAGE_CHANNELS    = 1 << 6;
        /// Permission to view the space audit log
        const VIEW_AUDIT_LOG     = 1 << 7;

        // === Messaging (bits 8-12) ===
        /// Permission to send text messages in channels
        const SEND_MESSAGES      = 1 << 8;
        /// Permission to embed links in messages (auto-preview)
        const EMBED_LINKS        = 1 << 9;
        /// Permission to attach files to messages
        const ATTACH_FILES       = 1 << 10;
        /// Permission to add reactions to messages
        const ADD_REACTIONS      = 1 << 11;
        /// Permission to mention @everyone and @here
        const MENTION_EVERYONE   = 1 << 12;

        // === Moderation (bits 13-16) ===
        /// Permission to delete messages from other members
        const MANAGE_MESSAGES    = 1 << 13;
        /// Permission to timeout members (temporary mute)
        const TIMEOUT_MEMBERS    = 1 << 14;
        /// Permission to kick members from the space
        const KICK_MEMBERS       = 1 << 15;
        /// Permission to ban members from the space
        const BAN_MEMBERS        = 1 << 16;

        // === Voice (bits 17-21) ===
        /// Permission to connect to voice channels
        const VOICE_CONNECT       = 1 << 17;
        /// Permission to speak in voice channels
        const VOICE_SPEAK         = 1 << 18;
        /// Permission to mute other members in voice channels
        const VOICE_MUTE_OTHERS   = 1 << 19;
        /// Permission to deafen other members in voice channels
        const VOICE_DEAFEN_OTHERS = 1 << 20;
        /// Permission to move members between voice channels
        const VOICE_MOVE_MEMBERS  = 1 << 21;
    }
}

impl SpacePermissions {
    // === Preset Combinations ===

    /// Default permissions for the everyone role.
    pub const EVERYONE_DEFAULT: Self = Self::VIEW_CHANNEL
        .union(Self::CREATE_INVITE)
        .union(Self::SEND_MESSAGES)
        .union(Self::EMBED_LINKS)
        .union(Self::ATTACH_FILES)
        .union(Self::ADD_REACTIONS)
        .union(Self::VOICE_CONNECT)
        .union(Self::VOICE_SPEAK);

    /// Default permissions for moderators.
    pub const MODERATOR_DEFAULT: Self = Self::EVERYONE_DEFAULT
        .union(Self::MANAGE_INVITES)
        .union(Self::MENTION_EVERYONE)
        .union(Self::MANAGE_MESSAGES)
        .union(Self::TIMEOUT_MEMBERS)
        .union(Self::KICK_MEMBERS)
        .union(Self::VIEW_AUDIT_LOG)
        .union(Self::VOICE_MUTE_OTHERS)
        .union(Self::VOICE_DEAFEN_OTHERS)
        .union(Self::VOICE_MOVE_MEMBERS);

    /// Permissions the everyone role can never carry.
    ///
    /// Used for validation when the everyone role is modified.
    pub const EVERYONE_FORBIDDEN: Self = Self::ADMINISTRATOR
        .union(Self::MANAGE_SPACE)
        .union(Self::MANAGE_ROLES)
        .union(Self::MANAGE_CHANNELS)
        .union(Self::VIEW_AUDIT_LOG)
        .union(Self::MANAGE_INVITES)
        .union(Self::MENTION_EVERYONE)
        .union(Self::MANAGE_MESSAGES)
        .union(Self::TIMEOUT_MEMBERS)
        .union(Self::KICK_MEMBERS)
        .union(Self::BAN_MEMBERS)
        .union(Self::VOICE_MUTE_OTHERS)
        .union(Self::VOICE_DEAFEN_OTHERS)
        .union(Self::VOICE_MOVE_MEMBERS);

    /// Check if this permission set includes the specified permission(s).
    #[must_use]
    pub const fn has(self, permission: Self) -> bool {
        self.contains(permission)
    }

    /// Validate that these permissions are safe for the everyone role.
    ///
    /// Returns `true` if none of the forbidden permissions are present.
    #[must_use]
    pub const fn validate_for_everyone(self) -> bool {
        !self.intersects(Self::EVERYONE_FORBIDDEN)
    }

    /// This flag set as an exact bitmask for the resolution algebra.
    #[must_use]
    pub const fn to_set(self) -> PermissionSet {
        PermissionSet::from_bits(self.bits())
    }
}

impl Default for SpacePermissions {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<SpacePermissions> for PermissionSet {
    fn from(flags: SpacePermissions) -> Self {
        flags.to_set()
    }
}

bitflags! {
    /// Identity flags on a member record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct MemberFlags: u64 {
        /// Member owns the space
        const OWNER = 1 << 0;
    }
}
