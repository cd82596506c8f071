use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use teloxide::Bot;
use teloxide::payloads::SendMessageSetters;
use teloxide::requests::Requester;
use teloxide::types::{BotCommand, Chat, ChatId, ChatMember, Me, ParseMode, Recipient, UserId};

use crate::error::{BotError, Result};
use crate::types::{ChatRef, MemberRef};

use super::TelegramApi;

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Bot API response envelope
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

#[derive(Debug, Serialize)]
struct ChatMemberParams<'a> {
    chat_id: &'a ChatRef,
    user_id: &'a MemberRef,
}

/// Bot API client.
///
/// Typed calls go through teloxide. `getChatMember` with an `@username`
/// argument is sent as a raw request, because teloxide only accepts numeric
/// user ids there.
pub struct TelegramClient {
    bot: Bot,
    http: reqwest::Client,
    method_base: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Self {
        Self {
            bot: Bot::new(token),
            http: reqwest::Client::new(),
            method_base: format!("{TELEGRAM_API_URL}/bot{token}"),
        }
    }

    /// The teloxide bot, used by the dispatcher to poll for updates
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    async fn get_chat_member_by_username(
        &self,
        chat: &ChatRef,
        member: &MemberRef,
    ) -> Result<ChatMember> {
        const METHOD: &str = "getChatMember";
        debug!("Calling Telegram method {} for {}", METHOD, member);

        let params = ChatMemberParams {
            chat_id: chat,
            user_id: member,
        };

        // The URL carries the bot token, keep it out of errors and logs
        let response = self
            .http
            .post(format!("{}/{}", self.method_base, METHOD))
            .json(&params)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        let body = response.text().await.map_err(reqwest::Error::without_url)?;

        let envelope: ApiResponse<ChatMember> = serde_json::from_str(&body).map_err(|e| {
            BotError::TelegramResponse(format!("{METHOD} returned {status} with unreadable body: {e}"))
        })?;

        if !envelope.ok {
            return Err(BotError::TelegramApi {
                method: METHOD,
                code: envelope.error_code,
                description: envelope
                    .description
                    .unwrap_or_else(|| status.to_string()),
            });
        }

        envelope
            .result
            .ok_or_else(|| BotError::TelegramResponse(format!("{METHOD} returned no result")))
    }
}

#[async_trait]
impl TelegramApi for TelegramClient {
    async fn get_me(&self) -> Result<Me> {
        Ok(self.bot.get_me().await?)
    }

    async fn get_chat(&self, chat: &ChatRef) -> Result<Chat> {
        Ok(self.bot.get_chat(Recipient::from(chat)).await?)
    }

    async fn get_chat_member(&self, chat: &ChatRef, member: &MemberRef) -> Result<ChatMember> {
        match member {
            MemberRef::Id(id) => Ok(self
                .bot
                .get_chat_member(Recipient::from(chat), UserId(*id))
                .await?),
            MemberRef::Username(_) => self.get_chat_member_by_username(chat, member).await,
        }
    }

    async fn get_chat_administrators(&self, chat: &ChatRef) -> Result<Vec<ChatMember>> {
        Ok(self
            .bot
            .get_chat_administrators(Recipient::from(chat))
            .await?)
    }

    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<()> {
        let mut request = self.bot.send_message(chat_id, text);
        if let Some(parse_mode) = parse_mode {
            request = request.parse_mode(parse_mode);
        }
        request.await?;
        Ok(())
    }

    async fn set_my_commands(&self, commands: Vec<BotCommand>) -> Result<()> {
        self.bot.set_my_commands(commands).await?;
        Ok(())
    }
}
