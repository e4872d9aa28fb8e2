//! Whether replies to a message may carry embeds.
use crate::context::{MessageContext, ResolveError};
use crate::permissions::names;

/// Outcome of resolving the `embed_links` permission for a message author.
#[derive(Debug)]
pub enum EmbedCapability {
    Granted,
    /// Resolved, and `embed_links` is false or unset.
    Denied,
    /// The author's permissions could not be resolved. Embeds are permitted.
    Unresolvable(ResolveError),
}

impl EmbedCapability {
    pub fn permits(&self) -> bool {
        match self {
            EmbedCapability::Granted | EmbedCapability::Unresolvable(_) => true,
            EmbedCapability::Denied => false,
        }
    }
}

pub fn resolve_embed_links<M>(message: &M) -> EmbedCapability
where
    M: MessageContext + ?Sized,
{
    match message.author_channel_permissions() {
        Ok(resolved) if resolved.get(names::EMBED_LINKS) == Some(true) => EmbedCapability::Granted,
        Ok(_) => EmbedCapability::Denied,
        Err(err) => {
            tracing::debug!(
                author=%message.author_id(),
                channel=%message.channel_id(),
                error=%err,
                "embed.unresolvable"
            );
            EmbedCapability::Unresolvable(err)
        }
    }
}

/// `true` if the author may embed links in the message's channel, or if that
/// cannot be determined.
pub fn embed_perms<M>(message: &M) -> bool
where
    M: MessageContext + ?Sized,
{
    resolve_embed_links(message).permits()
}
