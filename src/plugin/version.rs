use crate::{
    context::Context, event::*, helper::MessageHelper, log_internal, logging::PrintColor,
    plugin::*,
    policy::check_channel_restriction,
};
use anyhow::Result;

/// `version` - report which build of the bot is running
pub struct Version;

#[serenity::async_trait]
impl Plugin for Version {
    fn name(&self) -> &'static str {
        "version"
    }

    async fn usage(&self, ctx: &Context<'_>) -> Option<String> {
        Some(format!(
            "{}{} - show the bot version",
            ctx.cfg.command_prefix,
            self.name()
        ))
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Some((msg, _)) = event.is_bot_cmd(ctx, self.name()) else {
            return Ok(EventHandled::No);
        };

        let invocation = msg.invocation_context(ctx).await;
        if let Err(err) = check_channel_restriction(&invocation, ctx.cfg.bot_channel.as_deref())
            .into_result(msg.author.id, self.name())
        {
            report_failure(ctx, msg, err).await?;
            return Ok(EventHandled::Yes);
        }

        log_internal!("User {} queried version information", msg.author.color());
        msg.reply(ctx.cache_http, format!("Git commit: {}", ctx.version))
            .await?;
        Ok(EventHandled::Yes)
    }
}
