//! `/status` - bot identity and group summary.

use log::error;

use crate::error::Result;

use super::{CommandContext, Reply};

const FAILED: &str = "Error checking bot status.";

pub async fn status(ctx: &CommandContext<'_>) -> Reply {
    match render_status(ctx).await {
        Ok(text) => Reply::text(text),
        Err(e) => {
            error!("Status check error ({}): {}", e.kind(), e);
            Reply::text(FAILED)
        }
    }
}

async fn render_status(ctx: &CommandContext<'_>) -> Result<String> {
    let bot = ctx.api.get_me().await?;
    let group = ctx.api.get_chat(&ctx.config.group_id).await?;

    let group_title = match group.title() {
        Some(title) if group.is_group() || group.is_supergroup() => title,
        _ => "N/A",
    };

    Ok(format!(
        "Bot Status:\n\
         Name: {}\n\
         Username: @{}\n\
         Group: {}\n\
         Group ID: {}\n\
         Environment: {}",
        bot.first_name,
        bot.user.username.as_deref().unwrap_or_default(),
        group_title,
        ctx.config.group_id,
        ctx.config.environment,
    ))
}
