//! Command checks for the bot.
//!
//! A [`Check`] is attached to a command and evaluated against the command's
//! [`CheckContext`] before it runs. The host framework supplies the context:
//! who invoked the command, where, whether they own the bot, and what they
//! are allowed to do there.
//!
//! ```
//! use warden_checks::names::{BAN_MEMBERS, KICK_MEMBERS};
//! use warden_checks::{has_permissions, mod_or_permissions, Combine};
//!
//! let purge = has_permissions(Combine::All, [("manage_messages", true)]);
//! let ban = mod_or_permissions([(BAN_MEMBERS, true), (KICK_MEMBERS, true)]);
//! # let _ = (purge, ban);
//! ```
//!
//! [`embed_perms`] is unrelated to command gating: it tells reply code
//! whether embeds can be used, erring on the side of "yes".
pub mod checks;
pub mod context;
pub mod embed;
pub mod permissions;

pub use checks::{
    admin_or_permissions, check_guild_permissions, check_permissions, has_guild_permissions,
    has_permissions, is_admin, is_in_guilds, is_mod, mod_or_permissions, Check,
};
pub use context::{CheckContext, MessageContext, OwnerOracle, ResolveError, StaticOwners};
pub use embed::{embed_perms, resolve_embed_links, EmbedCapability};
pub use permissions::{names, Combine, PermissionSet, Requirements};
