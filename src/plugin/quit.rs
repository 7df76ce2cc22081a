use crate::{
    context::Context,
    error::RoleBotError,
    event::*,
    helper::MessageHelper,
    log_internal,
    logging::PrintColor,
    platform::{Platform, SerenityPlatform},
    plugin::*,
    policy::{check_channel_restriction, require_admin},
};
use anyhow::Result;

/// `quit` - shut the bot down (admins only)
pub struct Quit;

#[serenity::async_trait]
impl Plugin for Quit {
    fn name(&self) -> &'static str {
        "quit"
    }

    async fn usage(&self, ctx: &Context<'_>) -> Option<String> {
        Some(format!(
            "{}{} - shut the bot down (admin only)",
            ctx.cfg.command_prefix,
            self.name()
        ))
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Some((msg, _)) = event.is_bot_cmd(ctx, self.name()) else {
            return Ok(EventHandled::No);
        };

        let session = session(ctx)?;
        let platform = SerenityPlatform::new(ctx.cache_http, session.guild_id);
        let Some(actor) = platform.resolve_member(msg.author.id).await? else {
            report_failure(ctx, msg, RoleBotError::UnresolvedMember(msg.author.id)).await?;
            return Ok(EventHandled::Yes);
        };

        let invocation = msg.invocation_context(ctx).await;
        if let Err(err) = check_channel_restriction(&invocation, ctx.cfg.bot_channel.as_deref())
            .and_then(|| require_admin(&actor, &session.admin))
            .into_result(actor.user_id, self.name())
        {
            report_failure(ctx, msg, err).await?;
            return Ok(EventHandled::Yes);
        }

        log_internal!("Quitting on request of {}", actor.color());
        msg.react_success(ctx).await?;
        ctx.shutdown.notify_one();
        Ok(EventHandled::Yes)
    }
}
