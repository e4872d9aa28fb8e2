//! Permission checks consulted by the command dispatcher.
//!
//! Owners always pass. Everyone else is measured against a set of required
//! permission values, either at channel scope (overrides included) or at guild
//! scope. Moderator (`manage_guild`) and administrator bypasses are separate
//! checks OR-ed onto the requested ones.
use crate::context::CheckContext;
use crate::permissions::{names, Combine, Requirements};
use futures::future::{BoxFuture, FutureExt};
use std::collections::BTreeSet;
use warden_common::GuildId;

/// Owner bypass, then `combine` over the author's channel permissions.
pub async fn check_permissions<C>(ctx: &C, requirements: &Requirements, combine: Combine) -> bool
where
    C: CheckContext + ?Sized,
{
    if ctx.is_owner().await {
        tracing::debug!(author=%ctx.author_id(), scope="channel", "check.owner_bypass");
        return true;
    }

    let resolved = ctx.channel_permissions();
    let passed = requirements.is_satisfied_by(&resolved, combine);
    tracing::debug!(
        author=%ctx.author_id(),
        scope="channel",
        ?combine,
        required=requirements.len(),
        passed,
        "check.permissions"
    );
    passed
}

/// Owner bypass, then `combine` over the author's guild-wide permissions.
/// Always false outside a guild.
pub async fn check_guild_permissions<C>(
    ctx: &C,
    requirements: &Requirements,
    combine: Combine,
) -> bool
where
    C: CheckContext + ?Sized,
{
    if ctx.is_owner().await {
        tracing::debug!(author=%ctx.author_id(), scope="guild", "check.owner_bypass");
        return true;
    }

    let Some(resolved) = ctx.guild_permissions().filter(|_| ctx.guild_id().is_some()) else {
        tracing::debug!(author=%ctx.author_id(), scope="guild", "check.no_guild");
        return false;
    };

    let passed = requirements.is_satisfied_by(&resolved, combine);
    tracing::debug!(
        author=%ctx.author_id(),
        guild=?ctx.guild_id(),
        scope="guild",
        ?combine,
        required=requirements.len(),
        passed,
        "check.permissions"
    );
    passed
}

/// A predicate attached to a command and evaluated before it runs.
///
/// ```
/// use warden_checks::{Check, Requirements};
/// use warden_checks::names::KICK_MEMBERS;
///
/// let check = warden_checks::mod_or_permissions(Requirements::from([(KICK_MEMBERS, true)]));
/// assert!(matches!(check, Check::Or(..)));
///
/// let both = warden_checks::is_in_guilds([1, 2]).and(warden_checks::is_admin());
/// assert!(matches!(both, Check::All(ref checks) if checks.len() == 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Permissions {
        requirements: Requirements,
        combine: Combine,
    },
    GuildPermissions {
        requirements: Requirements,
        combine: Combine,
    },
    InGuilds(BTreeSet<GuildId>),
    Or(Box<Check>, Box<Check>),
    /// Every check must pass; an empty list passes.
    All(Vec<Check>),
}

impl Check {
    pub fn or(self, other: Check) -> Check {
        Check::Or(Box::new(self), Box::new(other))
    }

    pub fn and(self, other: Check) -> Check {
        match self {
            Check::All(mut checks) => {
                checks.push(other);
                Check::All(checks)
            }
            first => Check::All(vec![first, other]),
        }
    }

    pub fn all(checks: impl IntoIterator<Item = Check>) -> Check {
        Check::All(checks.into_iter().collect())
    }

    /// Evaluate against an invocation context. Short-circuits left to right.
    pub fn evaluate<'a, C>(&'a self, ctx: &'a C) -> BoxFuture<'a, bool>
    where
        C: CheckContext + ?Sized,
    {
        async move {
            match self {
                Check::Permissions {
                    requirements,
                    combine,
                } => check_permissions(ctx, requirements, *combine).await,
                Check::GuildPermissions {
                    requirements,
                    combine,
                } => check_guild_permissions(ctx, requirements, *combine).await,
                Check::InGuilds(ids) => {
                    let passed = ctx.guild_id().is_some_and(|g| ids.contains(&g));
                    tracing::debug!(guild=?ctx.guild_id(), passed, "check.in_guilds");
                    passed
                }
                Check::Or(left, right) => left.evaluate(ctx).await || right.evaluate(ctx).await,
                Check::All(checks) => {
                    for check in checks {
                        if !check.evaluate(ctx).await {
                            return false;
                        }
                    }
                    true
                }
            }
        }
        .boxed()
    }
}

pub fn has_permissions(combine: Combine, requirements: impl Into<Requirements>) -> Check {
    Check::Permissions {
        requirements: requirements.into(),
        combine,
    }
}

pub fn has_guild_permissions(combine: Combine, requirements: impl Into<Requirements>) -> Check {
    Check::GuildPermissions {
        requirements: requirements.into(),
        combine,
    }
}

// Moderator and admin checks do not take channel overrides into account.

pub fn is_mod() -> Check {
    has_guild_permissions(Combine::All, [(names::MANAGE_GUILD, true)])
}

pub fn is_admin() -> Check {
    has_guild_permissions(Combine::All, [(names::ADMINISTRATOR, true)])
}

/// Moderators pass; anyone else needs at least one of `requirements`.
///
/// A `manage_guild` entry in `requirements` is ignored: it is always required
/// to be `true`, and only through the moderator branch.
pub fn mod_or_permissions(requirements: impl Into<Requirements>) -> Check {
    let rest = requirements.into().without(names::MANAGE_GUILD);
    is_mod().or(has_guild_permissions(Combine::Any, rest))
}

/// Administrators pass; anyone else needs at least one of `requirements`.
///
/// An `administrator` entry in `requirements` is ignored, as in
/// [`mod_or_permissions`].
pub fn admin_or_permissions(requirements: impl Into<Requirements>) -> Check {
    let rest = requirements.into().without(names::ADMINISTRATOR);
    is_admin().or(has_guild_permissions(Combine::Any, rest))
}

/// Passes only inside one of the given guilds (raw snowflake ids).
pub fn is_in_guilds(guild_ids: impl IntoIterator<Item = u64>) -> Check {
    Check::InGuilds(guild_ids.into_iter().map(GuildId::new).collect())
}
