use crate::{
    context::Context,
    error::{Feedback, RoleBotError},
    event::EventHandled,
    helper::{marked, MessageHelper},
    log_error, log_warn,
    logging::PrintColor,
    volatile_state::VolatileState,
};
use anyhow::{anyhow, Result};
use serenity::all::{CreateInteractionResponse, CreateInteractionResponseMessage, Message};

mod admin_dm;
mod debug;
mod help;
mod ignore_bots;
mod quit;
mod ready;
mod role_cmd;
mod role_menu;
mod slash;
mod unknown_cmd;
mod version;

#[serenity::async_trait]
pub trait Plugin: Sync + Send {
    /// Plugin name.  Used for debug
    fn name(&self) -> &'static str;
    /// Help message line(s).  None if no help message
    async fn usage(&self, ctx: &Context<'_>) -> Option<String>;
    /// Potentially handle event.  Returns:
    /// - Ok(EventHandled::Yes) if the event has been handled and no other plugin should attempt to
    /// handle it
    /// - Ok(EventHandled::No) if another plugin should attempt to handle the event
    /// - Err if an error occurred
    async fn handle(&self, ctx: &Context<'_>, event: &crate::event::Event) -> Result<EventHandled>;
}

/// Ordered list of available plugins
pub fn plugins() -> Vec<Box<dyn Plugin>> {
    vec![
        // Core bot operations
        Box::new(debug::Debug),
        Box::new(ready::Ready),
        Box::new(ignore_bots::IgnoreBots),
        Box::new(help::Help),
        // Role management
        Box::new(role_cmd::RoleCmd),
        Box::new(slash::Slash),
        Box::new(role_menu::RoleMenu),
        // Operator commands
        Box::new(version::Version),
        Box::new(quit::Quit),
        Box::new(admin_dm::AdminDm),
        // Prefixed messages nobody handled.
        // Keep last.
        Box::new(unknown_cmd::UnknownCmd),
    ]
}

/// Server state, or an error if the connection to Discord is not ready yet
fn session<'a>(ctx: &'a Context<'_>) -> Result<&'a VolatileState> {
    ctx.session()
        .ok_or(anyhow!("Received a command before the role catalog was built"))
}

/// Report a failed text command the way its error kind asks for
async fn report_failure(ctx: &Context<'_>, msg: &Message, err: RoleBotError) -> Result<()> {
    match err.feedback() {
        Feedback::Silent => log_warn!("{} ({})", err, msg.author.color()),
        Feedback::FailureMarker => {
            if let RoleBotError::Platform(_) = &err {
                log_error!("{} ({})", err, msg.author.color());
            } else {
                log_warn!("{} ({})", err, msg.author.color());
            }
            msg.react_failure(ctx).await?;
        }
        Feedback::Reply => {
            log_warn!("{} ({})", err, msg.author.color());
            msg.reply(ctx.cache_http, err.user_message()).await?;
        }
    }
    Ok(())
}

/// Interaction response only the invoker can see
fn ephemeral(success: bool, text: impl std::fmt::Display) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(marked(success, text))
            .ephemeral(true),
    )
}

/// Interaction response for a failed command.  Interactions always need an answer, so even
/// silent failures get one; it is only visible to the invoker.
fn ephemeral_failure(err: &RoleBotError) -> CreateInteractionResponse {
    match err {
        RoleBotError::Platform(_) => log_error!("{}", err),
        _ => log_warn!("{}", err),
    }
    ephemeral(false, err.user_message())
}
