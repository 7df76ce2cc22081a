use crate::{context::Context, event::*, log_event, logging::*, plugin::*};
use anyhow::Result;
use serenity::all::Interaction;

/// Prints debug information about event to stdout
pub struct Debug;

#[serenity::async_trait]
impl Plugin for Debug {
    fn name(&self) -> &'static str {
        "debug"
    }

    async fn usage(&self, _ctx: &Context<'_>) -> Option<String> {
        None
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        match event {
            Event::Ready(ready) => {
                log_event!(
                    "Connected to {} server(s) as {}",
                    ready.guilds.len(),
                    ready.user.color(),
                );
            }
            Event::Message(msg) => {
                log_event!(
                    "{}{}{}{}{}{} {}",
                    msg.guild_id.color(ctx.http).await,
                    Glue {}.color(),
                    msg.channel_id.color(ctx.http).await,
                    Glue {}.color(),
                    msg.author.color(),
                    Glue {}.color(),
                    msg.content,
                );
            }
            Event::Interaction(Interaction::Command(command)) => {
                log_event!(
                    "{}{}{} used /{}",
                    command.guild_id.color(ctx.http).await,
                    Glue {}.color(),
                    command.user.color(),
                    command.data.name,
                );
            }
            Event::Interaction(Interaction::Component(component)) => {
                log_event!(
                    "{}{}{} used component {}",
                    component.guild_id.color(ctx.http).await,
                    Glue {}.color(),
                    component.user.color(),
                    component.data.custom_id,
                );
            }
            Event::Interaction(_) => {}
        }

        Ok(EventHandled::No)
    }
}
