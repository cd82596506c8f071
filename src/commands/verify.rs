//! `/verify` - confirm the sender belongs to the configured group.

use log::{error, info};

use teloxide::types::Message;

use crate::membership::lookup_by_id;

use super::{CommandContext, Reply};

const NO_IDENTITY: &str = "Could not verify your Telegram account.";
const NOT_A_MEMBER: &str = "You need to be a member of the group to verify.";
const VERIFIED: &str = "Your Telegram account has been verified! You are a member of the group.";
const FAILED: &str = "An error occurred during verification. Please try again later.";

pub async fn verify(ctx: &CommandContext<'_>, message: &Message) -> Reply {
    let Some(sender) = message.from.as_ref() else {
        return Reply::text(NO_IDENTITY);
    };

    match lookup_by_id(ctx.api, &ctx.config.group_id, sender.id.0).await {
        Ok(membership) if membership.status.is_member() => {
            info!(
                "User {} ({}) verified as a member",
                sender.id,
                sender.username.as_deref().unwrap_or("no username")
            );
            Reply::text(VERIFIED)
        }
        Ok(membership) => {
            info!(
                "User {} is not a member of {} (status: {})",
                sender.id, ctx.config.group_id, membership.status
            );
            Reply::text(NOT_A_MEMBER)
        }
        Err(e) => {
            error!("Verification error ({}): {}", e.kind(), e);
            Reply::text(FAILED)
        }
    }
}
