//! In-memory [`TelegramApi`] for handler tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use teloxide::types::{
    Administrator, Banned, BotCommand, Chat, ChatId, ChatMember, ChatMemberKind, Me, Owner,
    ParseMode, Restricted, UntilDate, User, UserId,
};
use teloxide::{ApiError, RequestError};

use crate::error::{BotError, Result};
use crate::types::{ChatRef, MemberRef, MembershipStatus};

use super::TelegramApi;

pub(crate) const BOT_ID: u64 = 999;
pub(crate) const BOT_USERNAME: &str = "gatebot";

pub(crate) fn user(id: u64, username: Option<&str>) -> User {
    User {
        id: UserId(id),
        is_bot: false,
        first_name: format!("User{id}"),
        last_name: None,
        username: username.map(str::to_string),
        language_code: None,
        is_premium: false,
        added_to_attachment_menu: false,
    }
}

pub(crate) fn bot_me() -> Me {
    let mut bot = user(BOT_ID, Some(BOT_USERNAME));
    bot.is_bot = true;
    bot.first_name = "Gate".to_string();
    Me {
        user: bot,
        can_join_groups: true,
        can_read_all_group_messages: false,
        supports_inline_queries: false,
    }
}

fn kind_for(status: MembershipStatus) -> ChatMemberKind {
    match status {
        MembershipStatus::Creator => ChatMemberKind::Owner(Owner {
            custom_title: None,
            is_anonymous: false,
        }),
        MembershipStatus::Administrator => ChatMemberKind::Administrator(Administrator {
            custom_title: None,
            is_anonymous: false,
            can_be_edited: false,
            can_manage_chat: true,
            can_change_info: false,
            can_post_messages: false,
            can_edit_messages: false,
            can_delete_messages: false,
            can_post_stories: false,
            can_edit_stories: false,
            can_delete_stories: false,
            can_manage_video_chats: false,
            can_invite_users: false,
            can_restrict_members: false,
            can_pin_messages: false,
            can_manage_topics: false,
            can_promote_members: false,
        }),
        MembershipStatus::Member => ChatMemberKind::Member,
        MembershipStatus::Restricted => ChatMemberKind::Restricted(Restricted {
            until_date: UntilDate::Forever,
            is_member: true,
            can_send_messages: false,
            can_send_audios: false,
            can_send_documents: false,
            can_send_photos: false,
            can_send_videos: false,
            can_send_video_notes: false,
            can_send_voice_notes: false,
            can_send_other_messages: false,
            can_add_web_page_previews: false,
            can_change_info: false,
            can_invite_users: false,
            can_pin_messages: false,
            can_manage_topics: false,
            can_send_polls: false,
        }),
        MembershipStatus::Left => ChatMemberKind::Left,
        MembershipStatus::Kicked => ChatMemberKind::Banned(Banned {
            until_date: UntilDate::Forever,
        }),
    }
}

pub(crate) fn member(id: u64, username: Option<&str>, status: MembershipStatus) -> ChatMember {
    ChatMember {
        user: user(id, username),
        kind: kind_for(status),
    }
}

/// A chat as `getChat` returns it; `kind` is the Bot API `type` field
pub(crate) fn chat(id: i64, title: &str, kind: &str) -> Chat {
    serde_json::from_value(json!({"id": id, "type": kind, "title": title}))
        .expect("valid chat fixture")
}

fn api_error(description: &str) -> BotError {
    BotError::Telegram(RequestError::Api(ApiError::Unknown(description.to_string())))
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SentMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub parse_mode: Option<ParseMode>,
}

pub(crate) struct FakeTelegram {
    chat: Option<Chat>,
    members: HashMap<u64, ChatMember>,
    by_username: HashMap<String, ChatMember>,
    admins: Option<Vec<ChatMember>>,
    unavailable: bool,
    send_delay: Option<Duration>,
    calls: Mutex<Vec<&'static str>>,
    sent: Mutex<Vec<SentMessage>>,
    commands: Mutex<Vec<BotCommand>>,
}

impl FakeTelegram {
    pub(crate) fn new() -> Self {
        Self {
            chat: None,
            members: HashMap::new(),
            by_username: HashMap::new(),
            admins: None,
            unavailable: false,
            send_delay: None,
            calls: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails as if Telegram were unreachable
    pub(crate) fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new()
        }
    }

    /// Registers a member reachable by numeric id only
    pub(crate) fn with_member(mut self, member: ChatMember) -> Self {
        self.members.insert(member.user.id.0, member);
        self
    }

    /// Registers a member that `getChatMember` also resolves by `@username`
    pub(crate) fn with_username_member(mut self, member: ChatMember) -> Self {
        if let Some(username) = member.user.username.as_deref() {
            self.by_username
                .insert(username.to_lowercase(), member.clone());
        }
        self.with_member(member)
    }

    pub(crate) fn with_admins(mut self, admins: Vec<ChatMember>) -> Self {
        self.admins = Some(admins);
        self
    }

    pub(crate) fn with_chat(mut self, title: &str, kind: &str) -> Self {
        self.chat = Some(chat(-100, title, kind));
        self
    }

    /// Holds every `sendMessage` for `delay` before recording it
    pub(crate) fn with_send_delay(mut self, delay: Duration) -> Self {
        self.send_delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn registered_commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.command.clone())
            .collect()
    }

    fn record(&self, method: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(method);
        if self.unavailable {
            return Err(BotError::TelegramApi {
                method,
                code: Some(502),
                description: "Bad Gateway".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TelegramApi for FakeTelegram {
    async fn get_me(&self) -> Result<Me> {
        self.record("getMe")?;
        Ok(bot_me())
    }

    async fn get_chat(&self, _chat: &ChatRef) -> Result<Chat> {
        self.record("getChat")?;
        self.chat
            .clone()
            .ok_or(BotError::Telegram(RequestError::Api(ApiError::ChatNotFound)))
    }

    async fn get_chat_member(&self, _chat: &ChatRef, member: &MemberRef) -> Result<ChatMember> {
        self.record("getChatMember")?;
        match member {
            MemberRef::Id(id) => self
                .members
                .get(id)
                .cloned()
                .ok_or_else(|| api_error("Bad Request: member not found")),
            MemberRef::Username(name) => self
                .by_username
                .get(&name.to_lowercase())
                .cloned()
                .ok_or_else(|| BotError::TelegramApi {
                    method: "getChatMember",
                    code: Some(400),
                    description: "Bad Request: invalid user_id specified".to_string(),
                }),
        }
    }

    async fn get_chat_administrators(&self, _chat: &ChatRef) -> Result<Vec<ChatMember>> {
        self.record("getChatAdministrators")?;
        self.admins
            .clone()
            .ok_or(BotError::Telegram(RequestError::Api(ApiError::ChatNotFound)))
    }

    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<()> {
        self.record("sendMessage")?;
        if let Some(delay) = self.send_delay {
            tokio::time::sleep(delay).await;
        }
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_string(),
            parse_mode,
        });
        Ok(())
    }

    async fn set_my_commands(&self, commands: Vec<BotCommand>) -> Result<()> {
        self.record("setMyCommands")?;
        *self.commands.lock().unwrap() = commands;
        Ok(())
    }
}
