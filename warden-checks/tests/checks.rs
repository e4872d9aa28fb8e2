use async_trait::async_trait;
use warden_checks::names::{
    ADMINISTRATOR, BAN_MEMBERS, EMBED_LINKS, KICK_MEMBERS, MANAGE_GUILD, MANAGE_MESSAGES,
};
use warden_checks::{
    admin_or_permissions, check_guild_permissions, check_permissions, embed_perms,
    has_guild_permissions, has_permissions, is_admin, is_in_guilds, is_mod, mod_or_permissions,
    resolve_embed_links, Check, CheckContext, Combine, EmbedCapability, MessageContext,
    OwnerOracle, PermissionSet, Requirements, ResolveError, StaticOwners,
};
use warden_common::{ChannelId, GuildId, UserId};

const OWNER: UserId = UserId::new(1);
const MEMBER: UserId = UserId::new(2);

/// Invocation context whose owner check goes through a `StaticOwners` oracle.
struct FakeContext {
    author: UserId,
    guild: Option<GuildId>,
    owners: StaticOwners,
    channel: PermissionSet,
    guild_wide: PermissionSet,
}

impl FakeContext {
    fn member() -> Self {
        Self {
            author: MEMBER,
            guild: Some(GuildId::new(111)),
            owners: StaticOwners::new([OWNER]),
            channel: PermissionSet::new(),
            guild_wide: PermissionSet::new(),
        }
    }

    fn owner() -> Self {
        Self {
            author: OWNER,
            ..Self::member()
        }
    }

    fn in_dm(mut self) -> Self {
        self.guild = None;
        self
    }

    fn in_guild(mut self, id: u64) -> Self {
        self.guild = Some(GuildId::new(id));
        self
    }

    fn channel(mut self, perms: PermissionSet) -> Self {
        self.channel = perms;
        self
    }

    fn guild_wide(mut self, perms: PermissionSet) -> Self {
        self.guild_wide = perms;
        self
    }
}

#[async_trait]
impl CheckContext for FakeContext {
    fn author_id(&self) -> UserId {
        self.author
    }

    fn guild_id(&self) -> Option<GuildId> {
        self.guild
    }

    async fn is_owner(&self) -> bool {
        self.owners.is_owner(self.author).await
    }

    fn channel_permissions(&self) -> PermissionSet {
        self.channel.clone()
    }

    fn guild_permissions(&self) -> Option<PermissionSet> {
        self.guild.map(|_| self.guild_wide.clone())
    }
}

struct FakeMessage {
    perms: Result<PermissionSet, fn() -> ResolveError>,
}

impl MessageContext for FakeMessage {
    fn author_id(&self) -> UserId {
        MEMBER
    }

    fn channel_id(&self) -> ChannelId {
        ChannelId::new(5)
    }

    fn author_channel_permissions(&self) -> Result<PermissionSet, ResolveError> {
        self.perms.clone().map_err(|make| make())
    }
}

fn perms(pairs: &[(&str, bool)]) -> PermissionSet {
    pairs.iter().map(|(n, v)| (*n, *v)).collect()
}

#[tokio::test]
async fn owner_bypasses_every_requirement() {
    let ctx = FakeContext::owner();
    let impossible = Requirements::from([(ADMINISTRATOR, true), (MANAGE_GUILD, true)]);

    assert!(check_permissions(&ctx, &impossible, Combine::All).await);
    assert!(check_guild_permissions(&ctx, &impossible, Combine::All).await);
    assert!(check_guild_permissions(&ctx.in_dm(), &impossible, Combine::Any).await);
}

#[tokio::test]
async fn all_requires_every_permission_in_channel() {
    let reqs = Requirements::from([(KICK_MEMBERS, true), (BAN_MEMBERS, true)]);

    let both = FakeContext::member().channel(perms(&[(KICK_MEMBERS, true), (BAN_MEMBERS, true)]));
    assert!(check_permissions(&both, &reqs, Combine::All).await);

    let one = FakeContext::member().channel(perms(&[(KICK_MEMBERS, true), (BAN_MEMBERS, false)]));
    assert!(!check_permissions(&one, &reqs, Combine::All).await);
    assert!(check_permissions(&one, &reqs, Combine::Any).await);

    let none = FakeContext::member().channel(perms(&[(KICK_MEMBERS, false)]));
    assert!(!check_permissions(&none, &reqs, Combine::Any).await);
}

#[tokio::test]
async fn channel_and_guild_scopes_are_separate() {
    let reqs = Requirements::from([(MANAGE_MESSAGES, true)]);
    let ctx = FakeContext::member()
        .channel(perms(&[(MANAGE_MESSAGES, true)]))
        .guild_wide(perms(&[(MANAGE_MESSAGES, false)]));

    assert!(check_permissions(&ctx, &reqs, Combine::All).await);
    assert!(!check_guild_permissions(&ctx, &reqs, Combine::All).await);
}

#[tokio::test]
async fn guild_check_fails_without_guild_even_when_empty() {
    let ctx = FakeContext::member().in_dm();
    assert!(!check_guild_permissions(&ctx, &Requirements::new(), Combine::All).await);
    assert!(!has_guild_permissions(Combine::All, Requirements::new()).evaluate(&ctx).await);
}

#[tokio::test]
async fn predicates_delegate_to_check_functions() {
    let ctx = FakeContext::member()
        .channel(perms(&[(EMBED_LINKS, true)]))
        .guild_wide(perms(&[(ADMINISTRATOR, true)]));

    assert!(has_permissions(Combine::All, [(EMBED_LINKS, true)]).evaluate(&ctx).await);
    assert!(!has_permissions(Combine::All, [(ADMINISTRATOR, true)]).evaluate(&ctx).await);
    assert!(is_admin().evaluate(&ctx).await);
    assert!(!is_mod().evaluate(&ctx).await);
}

#[tokio::test]
async fn moderator_passes_mod_or_permissions_regardless() {
    let moderator = FakeContext::member().guild_wide(perms(&[(MANAGE_GUILD, true)]));
    assert!(mod_or_permissions(Requirements::new()).evaluate(&moderator).await);
    assert!(
        mod_or_permissions([(BAN_MEMBERS, true), (KICK_MEMBERS, true)])
            .evaluate(&moderator)
            .await
    );

    let kicker = FakeContext::member().guild_wide(perms(&[(KICK_MEMBERS, true)]));
    assert!(
        mod_or_permissions([(BAN_MEMBERS, true), (KICK_MEMBERS, true)])
            .evaluate(&kicker)
            .await
    );
    assert!(!mod_or_permissions([(BAN_MEMBERS, true)]).evaluate(&kicker).await);
    assert!(!mod_or_permissions(Requirements::new()).evaluate(&kicker).await);
}

#[tokio::test]
async fn admin_or_permissions_mirrors_mod_variant() {
    let admin = FakeContext::member().guild_wide(perms(&[(ADMINISTRATOR, true)]));
    assert!(admin_or_permissions([(BAN_MEMBERS, true)]).evaluate(&admin).await);

    let moderator = FakeContext::member().guild_wide(perms(&[(MANAGE_GUILD, true)]));
    assert!(!admin_or_permissions([(BAN_MEMBERS, true)]).evaluate(&moderator).await);
    assert!(
        admin_or_permissions([(MANAGE_GUILD, true)])
            .evaluate(&moderator)
            .await
    );
}

#[tokio::test]
async fn override_permission_set_false_does_not_admit_members() {
    let member = FakeContext::member()
        .guild_wide(perms(&[(MANAGE_GUILD, false), (ADMINISTRATOR, false)]));

    assert!(!mod_or_permissions([(MANAGE_GUILD, false)]).evaluate(&member).await);
    assert!(!admin_or_permissions([(ADMINISTRATOR, false)]).evaluate(&member).await);
    assert!(
        !mod_or_permissions([(MANAGE_GUILD, false), (KICK_MEMBERS, true)])
            .evaluate(&member)
            .await
    );

    // Other requested values still apply.
    assert!(
        admin_or_permissions([(ADMINISTRATOR, false), (MANAGE_GUILD, false)])
            .evaluate(&member)
            .await
    );
}

#[tokio::test]
async fn in_guilds_matches_listed_ids_only() {
    let check = is_in_guilds([111, 222]);

    assert!(check.evaluate(&FakeContext::member().in_guild(111)).await);
    assert!(check.evaluate(&FakeContext::member().in_guild(222)).await);
    assert!(!check.evaluate(&FakeContext::member().in_guild(333)).await);
    assert!(!check.evaluate(&FakeContext::member().in_dm()).await);
}

#[tokio::test]
async fn stacked_checks_all_must_pass() {
    let ctx = FakeContext::member()
        .in_guild(111)
        .guild_wide(perms(&[(MANAGE_GUILD, true)]));

    assert!(is_in_guilds([111]).and(is_mod()).evaluate(&ctx).await);
    assert!(!is_in_guilds([222]).and(is_mod()).evaluate(&ctx).await);
    assert!(!Check::all([is_mod(), is_admin()]).evaluate(&ctx).await);
    assert!(Check::all([]).evaluate(&ctx).await);
}

#[tokio::test]
async fn checks_work_through_trait_objects() {
    let ctx: Box<dyn CheckContext> = Box::new(FakeContext::member().guild_wide(perms(&[(
        MANAGE_GUILD,
        true,
    )])));
    assert!(is_mod().evaluate(ctx.as_ref()).await);
}

#[tokio::test]
async fn configured_owners_bypass_checks() {
    let cfg = warden_config::WardenConfigLoader::new()
        .with_yaml_str("owners: [2]")
        .load()
        .unwrap();
    let ctx = FakeContext {
        owners: cfg.owners.iter().copied().collect(),
        ..FakeContext::member().in_dm()
    };

    assert!(is_admin().evaluate(&ctx).await);
}

#[test]
fn embed_perms_reports_resolved_value() {
    let allowed = FakeMessage {
        perms: Ok(perms(&[(EMBED_LINKS, true)])),
    };
    let denied = FakeMessage {
        perms: Ok(perms(&[(EMBED_LINKS, false)])),
    };
    let unset = FakeMessage {
        perms: Ok(PermissionSet::new()),
    };

    assert!(embed_perms(&allowed));
    assert!(!embed_perms(&denied));
    assert!(!embed_perms(&unset));
}

#[test]
fn embed_perms_fails_open_when_unresolvable() {
    let gone = FakeMessage {
        perms: Err(|| ResolveError::AuthorGone(MEMBER)),
    };

    assert!(matches!(
        resolve_embed_links(&gone),
        EmbedCapability::Unresolvable(ResolveError::AuthorGone(id)) if id == MEMBER
    ));
    assert!(embed_perms(&gone));
}
