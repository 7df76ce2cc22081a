use crate::{context::Context, event::*, log_debug, logging::PrintColor, plugin::*};
use anyhow::Result;
use serenity::all::Message;

/// Keeps automated messages away from the command plugins.  Another bot posting `!game add`
/// must not change anyone's roles.
pub struct IgnoreBots;

fn is_automated(msg: &Message) -> bool {
    msg.author.bot || msg.webhook_id.is_some()
}

#[serenity::async_trait]
impl Plugin for IgnoreBots {
    fn name(&self) -> &'static str {
        "ignore_bots"
    }

    async fn usage(&self, _ctx: &Context<'_>) -> Option<String> {
        None
    }

    async fn handle(&self, _ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Event::Message(msg) = event else {
            return Ok(EventHandled::No);
        };
        if !is_automated(msg) {
            return Ok(EventHandled::No);
        }

        log_debug!("Ignoring automated message from {}", msg.author.color());
        Ok(EventHandled::Yes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity::all::WebhookId;

    #[test]
    fn bots_and_webhooks_are_automated() {
        let mut msg = Message::default();
        assert!(!is_automated(&msg));

        msg.author.bot = true;
        assert!(is_automated(&msg));

        msg.author.bot = false;
        msg.webhook_id = Some(WebhookId::new(5));
        assert!(is_automated(&msg));
    }
}
