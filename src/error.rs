use strum::Display;
use teloxide::types::UserId;
use teloxide::{ApiError, RequestError};
use thiserror::Error;

/// Coarse classification of a [`BotError`], kept for logs.
///
/// Callers never see the kind directly: the dispatcher answers with a generic
/// message and the HTTP endpoint collapses everything into `exists: false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    MissingConfig,
    NotFound,
    UpstreamUnavailable,
    PermissionDenied,
}

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable {name} error: {source}")]
    EnvVar {
        name: &'static str,
        #[source]
        source: std::env::VarError,
    },

    #[error("Telegram request error: {0}")]
    Telegram(#[from] RequestError),

    #[error("Telegram API error in {method} ({code:?}): {description}")]
    TelegramApi {
        method: &'static str,
        code: Option<i64>,
        description: String,
    },

    #[error("Telegram response error: {0}")]
    TelegramResponse(String),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("User {0} is not a group administrator")]
    PermissionDenied(UserId),

    #[error("Message has no sender to check for admin rights")]
    NoSender,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BotError::Config(_) | BotError::EnvVar { .. } => ErrorKind::MissingConfig,
            BotError::Telegram(RequestError::Api(
                ApiError::UserNotFound | ApiError::ChatNotFound,
            ))
            | BotError::NotFound(_) => ErrorKind::NotFound,
            BotError::Telegram(RequestError::Api(ApiError::Unknown(description)))
                if mentions_not_found(description) =>
            {
                ErrorKind::NotFound
            }
            BotError::TelegramApi {
                code: Some(400),
                description,
                ..
            } if mentions_not_found(description) => ErrorKind::NotFound,
            BotError::PermissionDenied(_) | BotError::NoSender => ErrorKind::PermissionDenied,
            BotError::Telegram(_)
            | BotError::TelegramApi { .. }
            | BotError::TelegramResponse(_)
            | BotError::Reqwest(_)
            | BotError::Io(_) => ErrorKind::UpstreamUnavailable,
        }
    }

    /// Returns a user-friendly error message suitable for a chat reply
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::PermissionDenied => {
                "Sorry, only group administrators can use this feature."
            }
            ErrorKind::MissingConfig => {
                "Sorry, there's a configuration issue on my end. Please contact the bot administrator."
            }
            ErrorKind::NotFound | ErrorKind::UpstreamUnavailable => {
                "An error occurred. Please try again later."
            }
        }
    }
}

// Telegram reports "user not found", "member not found" and "chat not found"
// as plain 400 descriptions.
fn mentions_not_found(description: &str) -> bool {
    description.to_lowercase().contains("not found")
}

pub type Result<T> = std::result::Result<T, BotError>;
