//! Common types used throughout the groupgate bot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use strum::Display;
use teloxide::types::{ChatId, ChatMember, ChatMemberStatus, Recipient, User};

use crate::error::BotError;

/// A Telegram account as reported upstream. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: u64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl Identity {
    /// Username if the account has one, otherwise the first name
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.first_name.as_deref())
            .unwrap_or_default()
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Identity {
            user_id: user.id.0,
            username: user.username.clone(),
            first_name: Some(user.first_name.clone()),
        }
    }
}

/// Membership status of a user in a chat.
///
/// Maps to the `status` field of Telegram's `ChatMember` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MembershipStatus {
    /// Owner of the chat
    Creator,
    Administrator,
    Member,
    /// Member with restrictions applied
    Restricted,
    Left,
    /// Banned from the chat
    Kicked,
}

impl MembershipStatus {
    pub fn is_member(self) -> bool {
        !matches!(self, MembershipStatus::Left | MembershipStatus::Kicked)
    }

    pub fn is_admin(self) -> bool {
        matches!(
            self,
            MembershipStatus::Creator | MembershipStatus::Administrator
        )
    }
}

impl From<ChatMemberStatus> for MembershipStatus {
    fn from(status: ChatMemberStatus) -> Self {
        match status {
            ChatMemberStatus::Owner => MembershipStatus::Creator,
            ChatMemberStatus::Administrator => MembershipStatus::Administrator,
            ChatMemberStatus::Member => MembershipStatus::Member,
            ChatMemberStatus::Restricted => MembershipStatus::Restricted,
            ChatMemberStatus::Left => MembershipStatus::Left,
            ChatMemberStatus::Banned => MembershipStatus::Kicked,
        }
    }
}

/// Result of a single membership lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub identity: Identity,
    pub status: MembershipStatus,
}

impl From<ChatMember> for Membership {
    fn from(member: ChatMember) -> Self {
        Membership {
            identity: Identity::from(&member.user),
            status: member.status().into(),
        }
    }
}

/// A chat as Telegram addresses it: numeric id or `@channelusername`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRef {
    Id(i64),
    Username(String),
}

impl FromStr for ChatRef {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<i64>() {
            return Ok(ChatRef::Id(id));
        }
        match s.strip_prefix('@') {
            Some(name) if !name.is_empty() => Ok(ChatRef::Username(name.to_string())),
            _ => Err(BotError::Config(format!("invalid chat identifier: {s:?}"))),
        }
    }
}

impl fmt::Display for ChatRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRef::Id(id) => write!(f, "{id}"),
            ChatRef::Username(name) => write!(f, "@{name}"),
        }
    }
}

impl From<i64> for ChatRef {
    fn from(id: i64) -> Self {
        ChatRef::Id(id)
    }
}

impl From<&ChatRef> for Recipient {
    fn from(chat: &ChatRef) -> Self {
        match chat {
            ChatRef::Id(id) => Recipient::Id(ChatId(*id)),
            ChatRef::Username(_) => Recipient::ChannelUsername(chat.to_string()),
        }
    }
}

impl Serialize for ChatRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ChatRef::Id(id) => serializer.serialize_i64(*id),
            ChatRef::Username(_) => serializer.collect_str(self),
        }
    }
}

/// How a member is addressed in a `getChatMember` call.
///
/// Telegram only documents numeric ids here; the `@username` form is sent
/// anyway and is expected to fail for regular users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberRef {
    Id(u64),
    Username(String),
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberRef::Id(id) => write!(f, "{id}"),
            MemberRef::Username(name) => write!(f, "@{name}"),
        }
    }
}

impl Serialize for MemberRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MemberRef::Id(id) => serializer.serialize_u64(*id),
            MemberRef::Username(_) => serializer.collect_str(self),
        }
    }
}
