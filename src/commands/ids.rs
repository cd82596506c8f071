//! `/userid` and `/groupid` - echo identifiers Telegram already sent us.

use teloxide::types::Message;
use teloxide::utils::markdown::{code_inline, escape};

use crate::types::Identity;

use super::Reply;

pub fn user_id(message: &Message) -> Reply {
    match message.from.as_ref().map(Identity::from) {
        Some(identity) => Reply::markdown(format!(
            "Your Telegram user ID is: {}\nUsername: @{}",
            code_inline(&identity.user_id.to_string()),
            escape(identity.display_name())
        )),
        None => Reply::text("Could not retrieve your user ID."),
    }
}

pub fn group_id(message: &Message) -> Reply {
    Reply::markdown(format!(
        "This group's ID is: {}",
        code_inline(&message.chat.id.to_string())
    ))
}
