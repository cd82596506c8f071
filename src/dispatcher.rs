//! Update routing on top of teloxide's dispatcher.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, error, info, warn};
use teloxide::Bot;
use teloxide::dispatching::{Dispatcher, UpdateFilterExt, UpdateHandler};
use teloxide::dptree;
use teloxide::types::{Me, Message, Update};
use teloxide::utils::command::BotCommands;

use crate::commands::{Command, CommandContext, Reply, handle_mention, mentions_bot, run_command};
use crate::config::Config;
use crate::error::{BotError, Result};
use crate::telegram::TelegramApi;

/// Answers incoming messages through the [`TelegramApi`] seam
pub struct Handler {
    api: Arc<dyn TelegramApi>,
    config: Arc<Config>,
    me: Me,
}

impl Handler {
    /// Resolves the bot's own account and builds the handler.
    pub async fn new(api: Arc<dyn TelegramApi>, config: Arc<Config>) -> Result<Self> {
        let me = api.get_me().await?;
        info!(
            "Connected to Telegram as @{} ({})",
            me.user.username.as_deref().unwrap_or("unknown"),
            me.id
        );
        Ok(Self { api, config, me })
    }

    /// Registers the command menu. Failure is not fatal.
    pub async fn register_commands(&self) {
        debug!("Registering bot commands");
        match self.api.set_my_commands(Command::bot_commands()).await {
            Ok(()) => info!("Commands registered successfully"),
            Err(e) => warn!("Failed to register commands: {}", e),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn context(&self) -> CommandContext<'_> {
        CommandContext {
            api: self.api.as_ref(),
            config: &self.config,
            me: &self.me,
        }
    }

    /// Picks the handler for `message` and returns its reply, if any.
    pub async fn route(&self, message: &Message) -> Option<Reply> {
        let text = message.text()?;
        let ctx = self.context();
        let own_username = self.me.user.username.as_deref().unwrap_or_default();

        if let Some(command) = Command::from_text(text, own_username) {
            debug!(
                "Command {:?} from {:?} in chat {}",
                command,
                message.from.as_ref().map(|user| user.id),
                message.chat.id
            );
            return Some(run_command(&ctx, command, message).await);
        }

        let in_group = message.chat.is_group() || message.chat.is_supergroup();
        if in_group && mentions_bot(message, &self.me) {
            debug!("Bot mentioned in chat {}", message.chat.id);
            return Some(handle_mention(&ctx, message).await);
        }

        None
    }

    /// Routes `message` and sends the reply. Errors are logged, never returned.
    pub async fn handle(&self, message: Message) {
        let start = Instant::now();

        if let Some(reply) = self.route(&message).await
            && let Err(e) = self
                .api
                .send_message(message.chat.id, &reply.text, reply.parse_mode)
                .await
        {
            error!(
                "Failed to reply in chat {} ({}): {}",
                message.chat.id,
                e.kind(),
                e
            );
        }

        info!("Response time: {}ms", start.elapsed().as_millis());
    }
}

/// Builds the long-polling dispatcher for `bot`.
///
/// Every update runs concurrently, so a slow upstream call only delays the
/// update that made it. On shutdown the dispatcher stops polling and waits
/// for the updates already in flight.
pub fn build(bot: Bot, handler: Arc<Handler>) -> Dispatcher<Bot, BotError, ()> {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![handler])
        .default_handler(|_| async {})
        .distribution_function(|_| None::<()>)
        .build()
}

fn schema() -> UpdateHandler<BotError> {
    Update::filter_message().endpoint(on_message)
}

async fn on_message(message: Message, handler: Arc<Handler>) -> Result<()> {
    handler.handle(message).await;
    Ok(())
}
