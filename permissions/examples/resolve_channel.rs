//! Resolve a member's effective bits in a locked-down channel.
//!
//! Run with: `cargo run --example resolve_channel`

use vc_permissions::{
    resolve_base_bits, resolve_effective_channel_bits, ChannelQuery, Member, Overwrite,
    OverwriteTarget, PermissionSet, Role, Snowflake, Space, SpacePermissions,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let space = Space {
        id: Snowflake::new("9000"),
        owner_id: Snowflake::new("1"),
    };

    let roles = vec![
        Role {
            id: space.id.clone(),
            permissions: SpacePermissions::EVERYONE_DEFAULT.to_set(),
            position: 0,
        },
        Role {
            id: Snowflake::new("mod"),
            permissions: SpacePermissions::MODERATOR_DEFAULT.to_set(),
            position: 10,
        },
    ];

    let member = Member {
        user_id: Snowflake::new("42"),
        role_ids: vec![Snowflake::new("mod")],
    };

    // The channel denies sending for everyone but lets moderators back in.
    let overwrites = vec![
        Overwrite {
            target: OverwriteTarget::Role(space.id.clone()),
            allow: PermissionSet::EMPTY,
            deny: SpacePermissions::SEND_MESSAGES.to_set(),
        },
        Overwrite {
            target: OverwriteTarget::Role(Snowflake::new("mod")),
            allow: SpacePermissions::SEND_MESSAGES.to_set(),
            deny: PermissionSet::EMPTY,
        },
    ];

    let base = resolve_base_bits(&space.id, &roles, &member.role_ids);
    let effective = resolve_effective_channel_bits(&ChannelQuery {
        base_bits: base,
        user_id: &member.user_id,
        everyone_role_id: space.everyone_role_id(),
        member_role_ids: &member.role_ids,
        parent_overwrites: None,
        channel_overwrites: Some(&overwrites),
    });

    println!("base bits:      {base}");
    println!("effective bits: {effective}");
    println!(
        "can send:       {}",
        effective.has_all(SpacePermissions::SEND_MESSAGES.to_set())
    );
}
