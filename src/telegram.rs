//! Telegram Bot API access through teloxide.

mod client;
#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use teloxide::types::{BotCommand, Chat, ChatId, ChatMember, Me, ParseMode};

use crate::error::Result;
use crate::types::{ChatRef, MemberRef};

pub use client::TelegramClient;

/// Upstream operations the bot consumes.
///
/// Implemented by [`TelegramClient`] against the real Bot API. Callers own no
/// retry or backoff around these calls. Updates are not part of this seam:
/// teloxide's dispatcher polls for them directly.
#[async_trait]
pub trait TelegramApi: Send + Sync {
    async fn get_me(&self) -> Result<Me>;

    async fn get_chat(&self, chat: &ChatRef) -> Result<Chat>;

    async fn get_chat_member(&self, chat: &ChatRef, member: &MemberRef) -> Result<ChatMember>;

    async fn get_chat_administrators(&self, chat: &ChatRef) -> Result<Vec<ChatMember>>;

    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<()>;

    async fn set_my_commands(&self, commands: Vec<BotCommand>) -> Result<()>;
}
