use crate::{context::Context, event::*, log_warn, logging::PrintColor, plugin::*};
use anyhow::Result;

/// Logs prefixed messages no other plugin recognized.  Says nothing on Discord.
pub struct UnknownCmd;

#[serenity::async_trait]
impl Plugin for UnknownCmd {
    fn name(&self) -> &'static str {
        "unknown_cmd"
    }

    async fn usage(&self, _ctx: &Context<'_>) -> Option<String> {
        None
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Event::Message(msg) = event else {
            return Ok(EventHandled::No);
        };

        let is_command = msg
            .content
            .strip_prefix(ctx.cfg.command_prefix.as_str())
            .is_some_and(|rest| rest.starts_with(|c: char| c.is_alphanumeric()));
        if !is_command {
            return Ok(EventHandled::No);
        }

        log_warn!(
            "User {} tried to run non-existent command \"{}\"",
            msg.author.color(),
            msg.content
        );
        Ok(EventHandled::Yes)
    }
}
