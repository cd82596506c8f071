//! Mention handler: group admins tag the bot together with a user to learn
//! that user's numeric ID.

use log::{debug, error, info};
use teloxide::types::{Me, Message, MessageEntityKind, User};
use teloxide::utils::markdown::{code_inline, escape};

use crate::error::{BotError, Result};
use crate::membership::is_admin;
use crate::types::ChatRef;

use super::{CommandContext, Reply};

const TAG_A_USER: &str = "Please tag a user (other than me) to get their user ID.";

/// What the message points at besides the bot
enum MentionTarget {
    /// Telegram attached the user object to the mention
    Resolved(User),
    /// A plain `@username`, which Telegram does not resolve to an ID
    Unresolved(String),
    Nothing,
}

/// Whether `message` mentions the bot by `@username` or by text mention
pub fn mentions_bot(message: &Message, me: &Me) -> bool {
    message
        .parse_entities()
        .unwrap_or_default()
        .iter()
        .any(|entity| match entity.kind() {
            MessageEntityKind::Mention => is_own_mention(entity.text(), me),
            MessageEntityKind::TextMention { user } => user.id == me.id,
            _ => false,
        })
}

fn is_own_mention(mention: &str, me: &Me) -> bool {
    let name = mention.strip_prefix('@').unwrap_or(mention);
    me.user
        .username
        .as_deref()
        .is_some_and(|own| own.eq_ignore_ascii_case(name))
}

fn find_target(message: &Message, me: &Me) -> MentionTarget {
    let entities = message.parse_entities().unwrap_or_default();

    let resolved = entities.iter().find_map(|entity| match entity.kind() {
        MessageEntityKind::TextMention { user } if user.id != me.id => Some(user.clone()),
        _ => None,
    });
    if let Some(user) = resolved {
        return MentionTarget::Resolved(user);
    }

    entities
        .iter()
        .filter(|entity| *entity.kind() == MessageEntityKind::Mention)
        .map(|entity| entity.text())
        .find(|mention| !is_own_mention(mention, me))
        .map_or(MentionTarget::Nothing, |mention| {
            MentionTarget::Unresolved(mention.to_string())
        })
}

/// Handles a group message that mentions the bot.
///
/// Only administrators of the chat get an answer; the admin list is fetched
/// fresh every time.
pub async fn handle_mention(ctx: &CommandContext<'_>, message: &Message) -> Reply {
    match answer_mention(ctx, message).await {
        Ok(reply) => reply,
        Err(e @ (BotError::PermissionDenied(_) | BotError::NoSender)) => {
            info!("Mention ignored ({}): {}", e.kind(), e);
            Reply::text(e.user_message())
        }
        Err(e) => {
            error!("Mention handling error ({}): {}", e.kind(), e);
            Reply::text(e.user_message())
        }
    }
}

async fn answer_mention(ctx: &CommandContext<'_>, message: &Message) -> Result<Reply> {
    let sender = message.from.as_ref().ok_or(BotError::NoSender)?;

    if !is_admin(ctx.api, &ChatRef::Id(message.chat.id.0), sender.id).await? {
        return Err(BotError::PermissionDenied(sender.id));
    }

    let reply = match find_target(message, ctx.me) {
        MentionTarget::Resolved(user) => {
            debug!("Admin {} asked for the ID of {}", sender.id, user.id);
            Reply::markdown(format!(
                "User ID of {}: {}",
                escape(&user.first_name),
                code_inline(&user.id.to_string())
            ))
        }
        MentionTarget::Unresolved(mention) => Reply::text(format!(
            "I can't see the user ID behind {mention}. Telegram doesn't share IDs for plain \
             @username mentions. Tag the user by picking them from the member list so their \
             name is highlighted, then try again."
        )),
        MentionTarget::Nothing => Reply::text(TAG_A_USER),
    };

    Ok(reply)
}
