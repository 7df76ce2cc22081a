use crate::{
    admin_channel::{AdminChannel, AdminReply},
    context::Context,
    event::*,
    log_internal,
    platform::SerenityPlatform,
    plugin::*,
};
use anyhow::Result;

/// Freeform operator commands (`quit`, `version`) sent to the bot in private messages
pub struct AdminDm;

#[serenity::async_trait]
impl Plugin for AdminDm {
    fn name(&self) -> &'static str {
        "admin_dm"
    }

    async fn usage(&self, _ctx: &Context<'_>) -> Option<String> {
        // Not advertised
        None
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Event::Message(msg) = event else {
            return Ok(EventHandled::No);
        };
        if msg.guild_id.is_some() || msg.content.starts_with(ctx.cfg.command_prefix.as_str()) {
            return Ok(EventHandled::No);
        }

        let session = session(ctx)?;
        let platform = SerenityPlatform::new(ctx.cache_http, session.guild_id);
        let channel = AdminChannel {
            admin: &session.admin,
            version: ctx.version,
        };

        match channel
            .dispatch(&platform, msg.author.id, &msg.content)
            .await?
        {
            AdminReply::Ignore => {}
            AdminReply::Reply(text) => {
                msg.reply(ctx.cache_http, text).await?;
            }
            AdminReply::Shutdown(text) => {
                msg.reply(ctx.cache_http, text).await?;
                log_internal!("Quitting");
                ctx.shutdown.notify_one();
            }
        }

        Ok(EventHandled::Yes)
    }
}
