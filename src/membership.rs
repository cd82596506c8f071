//! Membership lookups against the upstream group.
//!
//! Every call asks Telegram directly; nothing is cached between requests.

use log::debug;
use teloxide::types::UserId;

use crate::error::{BotError, Result};
use crate::telegram::TelegramApi;
use crate::types::{ChatRef, MemberRef, Membership};

/// Look up a member of `group` by numeric user id
pub async fn lookup_by_id(
    api: &dyn TelegramApi,
    group: &ChatRef,
    user_id: u64,
) -> Result<Membership> {
    debug!("Looking up user {} in {}", user_id, group);
    let member = api.get_chat_member(group, &MemberRef::Id(user_id)).await?;
    Ok(member.into())
}

/// Resolve a username to a member of `group`.
///
/// Tries `getChatMember` with the `@username` form first, then searches the
/// administrator list case-insensitively. Telegram offers no way to resolve a
/// regular member's username, so those always end in [`BotError::NotFound`].
pub async fn resolve_username(
    api: &dyn TelegramApi,
    group: &ChatRef,
    username: &str,
) -> Result<Membership> {
    let username = username.trim();
    let username = username.strip_prefix('@').unwrap_or(username);
    if username.is_empty() {
        return Err(BotError::NotFound("empty username".to_string()));
    }

    match api
        .get_chat_member(group, &MemberRef::Username(username.to_string()))
        .await
    {
        Ok(member) => return Ok(member.into()),
        Err(e) => debug!(
            "Direct lookup of @{} failed ({}), searching administrators",
            username, e
        ),
    }

    let admins = api.get_chat_administrators(group).await?;
    debug!("Searching {} administrators of {}", admins.len(), group);

    admins
        .into_iter()
        .find(|admin| {
            admin
                .user
                .username
                .as_deref()
                .is_some_and(|name| name.eq_ignore_ascii_case(username))
        })
        .map(Membership::from)
        .ok_or_else(|| BotError::NotFound(format!("@{username} in {group}")))
}

/// Whether `user_id` is currently an administrator of `chat`
pub async fn is_admin(api: &dyn TelegramApi, chat: &ChatRef, user_id: UserId) -> Result<bool> {
    let admins = api.get_chat_administrators(chat).await?;
    Ok(admins.iter().any(|admin| admin.user.id == user_id))
}
