//! Common types and utilities shared across Warden crates.
//!
//! This crate holds the identifier newtypes handed around by the host bot
//! framework and the observability helpers used by binaries and tests. It is
//! kept small so every other crate can depend on it without pulling in
//! anything heavy.
//!
//! # Overview
//!
//! - [`UserId`], [`GuildId`], [`ChannelId`]: opaque snowflake identifiers
//! - [`observability`]: Centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use warden_common::GuildId;
//!
//! let guild = GuildId::new(111);
//! assert_eq!(guild.get(), 111);
//! assert_eq!(guild.to_string(), "111");
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod observability;

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

snowflake!(
    /// Identifier of a chat user (command author, bot owner).
    UserId
);
snowflake!(
    /// Identifier of a guild (server).
    GuildId
);
snowflake!(
    /// Identifier of a text channel.
    ChannelId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_deserialize_from_bare_integers() {
        let ids: Vec<UserId> = serde_json::from_str("[1, 42]").unwrap();
        assert_eq!(ids, vec![UserId::new(1), UserId::new(42)]);
    }

    #[test]
    fn ids_of_different_kinds_do_not_mix() {
        let guild = GuildId::from(7);
        let channel = ChannelId::from(7);
        assert_eq!(guild.get(), channel.get());
        assert_eq!(format!("{guild}/{channel}"), "7/7");
    }
}
