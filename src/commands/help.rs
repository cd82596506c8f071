use teloxide::utils::command::BotCommands;

use super::{Command, Reply};

pub fn help() -> Reply {
    Reply::text(Command::descriptions().to_string())
}
