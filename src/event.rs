//! The Serenity crate we're using for the Discord API is designed around callbacks to handle
//! events.  However, this does not mesh well with our plugin framework here.  To resolve this,
//! this module translates the callbacks a distinct Event enum.

use crate::{context::Context, log_error};
use serenity::all::{Interaction, Message, Ready};

/// A Discord event
pub enum Event {
    Ready(Ready),
    Message(Message),
    Interaction(Interaction),
}

impl Event {
    // When an event occurs, iterate over all the plugins to see if any can/should handle it.
    pub async fn handle(self, ctx: Context<'_>) {
        for plugin in crate::plugin::plugins() {
            match plugin.handle(&ctx, &self).await {
                Ok(EventHandled::Yes) => return,
                Ok(EventHandled::No) => continue,
                Err(err) => {
                    log_error!("Error in plugin {}: {:#}", plugin.name(), err);
                    return;
                }
            }
        }
    }

    // Check if a message should be interpreted as a special bot command.
    //
    // These are prefixed with the configured prefix, e. g. `!game add iidx`.  Returns the message
    // and the words following the command name.
    pub fn is_bot_cmd<'a>(
        &'a self,
        ctx: &Context<'_>,
        cmd: &str,
    ) -> Option<(&'a Message, Vec<&'a str>)> {
        let Event::Message(msg) = self else {
            return None;
        };

        let mut words = msg.content.split_whitespace();
        let name = words.next()?.strip_prefix(ctx.cfg.command_prefix.as_str())?;
        if !name.eq_ignore_ascii_case(cmd) {
            return None;
        }
        Some((msg, words.collect()))
    }
}

pub enum EventHandled {
    Yes,
    No,
}
