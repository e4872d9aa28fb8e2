//! Seams to the host bot framework.
//!
//! The framework owns command dispatch, owner identification and permission
//! resolution; these traits are the only things the checks ask of it.
use crate::permissions::PermissionSet;
use async_trait::async_trait;
use std::collections::HashSet;
use warden_common::{ChannelId, GuildId, UserId};

/// Invocation context of a command.
#[async_trait]
pub trait CheckContext: Send + Sync {
    fn author_id(&self) -> UserId;

    /// `None` for direct messages.
    fn guild_id(&self) -> Option<GuildId>;

    /// Owner oracle. May suspend on I/O (e.g. fetching application info).
    async fn is_owner(&self) -> bool;

    /// Author's effective permissions in the invoking channel, channel
    /// overrides included.
    fn channel_permissions(&self) -> PermissionSet;

    /// Author's guild-wide permissions, ignoring channel overrides. `None`
    /// outside a guild.
    fn guild_permissions(&self) -> Option<PermissionSet>;
}

/// Why permissions for a message author could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("author {0} is no longer resolvable")]
    AuthorGone(UserId),
    #[error("channel {0} is no longer resolvable")]
    ChannelGone(ChannelId),
    #[error("permission lookup failed: {0}")]
    Lookup(String),
}

/// A received message, as far as embed checks are concerned.
pub trait MessageContext: Send + Sync {
    fn author_id(&self) -> UserId;

    fn channel_id(&self) -> ChannelId;

    fn author_channel_permissions(&self) -> Result<PermissionSet, ResolveError>;
}

/// Answers whether a user is a bot owner.
#[async_trait]
pub trait OwnerOracle: Send + Sync {
    async fn is_owner(&self, user: UserId) -> bool;
}

/// Owner oracle backed by a fixed set of ids, typically `owners` from config.
///
/// ```
/// # futures::executor::block_on(async {
/// use warden_checks::{OwnerOracle, StaticOwners};
/// use warden_common::UserId;
///
/// let owners: StaticOwners = [UserId::new(1)].into_iter().collect();
/// assert!(owners.is_owner(UserId::new(1)).await);
/// assert!(!owners.is_owner(UserId::new(2)).await);
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticOwners(HashSet<UserId>);

impl StaticOwners {
    pub fn new(owners: impl IntoIterator<Item = UserId>) -> Self {
        Self(owners.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<UserId> for StaticOwners {
    fn from_iter<I: IntoIterator<Item = UserId>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[async_trait]
impl OwnerOracle for StaticOwners {
    async fn is_owner(&self, user: UserId) -> bool {
        self.0.contains(&user)
    }
}
