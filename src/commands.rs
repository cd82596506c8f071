//! Bot commands and the mention handler.

mod help;
mod ids;
mod mention;
mod status;
mod verify;

use teloxide::types::{Me, Message, ParseMode};
use teloxide::utils::command::BotCommands;

use crate::config::Config;
use crate::telegram::TelegramApi;

pub use help::help;
pub use ids::{group_id, user_id};
pub use mention::{handle_mention, mentions_bot};
pub use status::status;
pub use verify::verify;

/// Everything a command needs besides the message itself
pub struct CommandContext<'a> {
    pub api: &'a dyn TelegramApi,
    pub config: &'a Config,
    /// The bot's own account, resolved once at startup
    pub me: &'a Me,
}

/// Text sent back to the chat the command came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub parse_mode: Option<ParseMode>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: None,
        }
    }

    /// A MarkdownV2 reply; callers escape any user-supplied text
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parse_mode: Some(ParseMode::MarkdownV2),
        }
    }
}

#[derive(BotCommands, Debug, Clone, Copy, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Verify that you are a member of the group")]
    Verify,
    #[command(description = "Show bot and group status")]
    Status,
    #[command(description = "Show your Telegram user ID")]
    UserId,
    #[command(description = "Show this chat's ID")]
    GroupId,
    #[command(description = "List available commands")]
    Help,
}

impl Command {
    /// Parses the leading command of `text`.
    ///
    /// Returns `None` for plain text, unknown commands, and commands addressed
    /// to a different bot (`/verify@otherbot`).
    pub fn from_text(text: &str, bot_username: &str) -> Option<Self> {
        Command::parse(text.trim_start(), bot_username).ok()
    }
}

/// Runs `command` for `message`. Never fails: upstream errors become replies.
pub async fn run_command(ctx: &CommandContext<'_>, command: Command, message: &Message) -> Reply {
    match command {
        Command::Verify => verify(ctx, message).await,
        Command::Status => status(ctx).await,
        Command::UserId => user_id(message),
        Command::GroupId => group_id(message),
        Command::Help => help(),
    }
}
