//! Permission sets resolved by the host and the requirements checked against them.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known permission names as resolved by the host framework.
pub mod names {
    pub const ADMINISTRATOR: &str = "administrator";
    pub const MANAGE_GUILD: &str = "manage_guild";
    pub const MANAGE_CHANNELS: &str = "manage_channels";
    pub const MANAGE_MESSAGES: &str = "manage_messages";
    pub const MANAGE_ROLES: &str = "manage_roles";
    pub const KICK_MEMBERS: &str = "kick_members";
    pub const BAN_MEMBERS: &str = "ban_members";
    pub const SEND_MESSAGES: &str = "send_messages";
    pub const EMBED_LINKS: &str = "embed_links";
    pub const ATTACH_FILES: &str = "attach_files";
}

/// How per-permission results are folded into one answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Combine {
    /// Every requirement must match. Vacuously true when empty.
    #[default]
    All,
    /// At least one requirement must match. False when empty.
    Any,
}

/// Effective permissions of one user at channel or guild scope.
///
/// A name that is not present is *unset*: it matches neither a `true` nor a
/// `false` requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeMap<String, bool>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: bool) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: bool) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Required permission values, kept in the order they were declared.
///
/// ```
/// use warden_checks::{Combine, PermissionSet, Requirements};
/// use warden_checks::names::{BAN_MEMBERS, KICK_MEMBERS};
///
/// let reqs = Requirements::new().require(KICK_MEMBERS, true).require(BAN_MEMBERS, true);
/// let resolved = PermissionSet::new().with(KICK_MEMBERS, true).with(BAN_MEMBERS, false);
///
/// assert!(!reqs.is_satisfied_by(&resolved, Combine::All));
/// assert!(reqs.is_satisfied_by(&resolved, Combine::Any));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirements(Vec<(String, bool)>);

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the expected value for `name`.
    pub fn require(mut self, name: impl Into<String>, expected: bool) -> Self {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = expected,
            None => self.0.push((name, expected)),
        }
        self
    }

    /// Drop any requirement on `name`.
    pub fn without(mut self, name: &str) -> Self {
        self.0.retain(|(n, _)| n != name);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fold `resolved[name] == expected` over every requirement.
    pub fn is_satisfied_by(&self, resolved: &PermissionSet, combine: Combine) -> bool {
        let mut matches = self
            .iter()
            .map(|(name, expected)| resolved.get(name) == Some(expected));
        match combine {
            Combine::All => matches.all(|m| m),
            Combine::Any => matches.any(|m| m),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for Requirements {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Requirements::new(), |reqs, (n, v)| reqs.require(n, v))
    }
}

impl<S: Into<String>, const N: usize> From<[(S, bool); N]> for Requirements {
    fn from(pairs: [(S, bool); N]) -> Self {
        pairs.into_iter().collect()
    }
}
