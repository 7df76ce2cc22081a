use crate::{
    catalog::{Category, RoleCatalog},
    context::Context,
    event::*,
    log_error, log_internal, log_warn,
    logging::PrintColor,
    plugin::*,
    policy::AdminIdentity,
    volatile_state::VolatileState,
};
use anyhow::{anyhow, Result};

/// Builds the role catalog when the connection to Discord is ready.
pub struct Ready;

#[serenity::async_trait]
impl Plugin for Ready {
    fn name(&self) -> &'static str {
        "ready"
    }

    async fn usage(&self, _ctx: &Context<'_>) -> Option<String> {
        None
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Event::Ready(ready) = event else {
            return Ok(EventHandled::No);
        };

        // Ready fires again after a reconnect.  The catalog is only built once per process.
        if ctx.session().is_some() {
            log_internal!("Reconnected, keeping the existing role catalog");
            return Ok(EventHandled::Yes);
        }

        let guild_id = ctx
            .cfg
            .guild_id
            .or_else(|| ready.guilds.first().map(|guild| guild.id))
            .ok_or(anyhow!("The bot is not a member of any server"))?;

        let live_roles = guild_id.roles(ctx.http).await?;
        let catalog = RoleCatalog::build(&ctx.cfg.game_roles, &ctx.cfg.area_roles, &live_roles);
        let admin = AdminIdentity::resolve(
            ctx.cfg.admin_role_id,
            ctx.cfg.admin_role.as_deref(),
            &live_roles,
        );

        if catalog.is_empty() {
            log_warn!("None of the configured roles exist on the server");
        } else {
            log_internal!("{} self-service role(s) available", catalog.len());
        }
        for category in Category::ALL {
            let known: Vec<_> = catalog.roles(category).cloned().collect();
            log_internal!("Known {} roles: {}", category, known.color());
        }

        if ctx
            .vstate
            .set(VolatileState {
                guild_id,
                catalog,
                admin,
            })
            .is_err()
        {
            log_warn!("Role catalog was built concurrently, keeping the first one");
        }

        if let Some(nick) = &ctx.cfg.nick {
            log_internal!("Changing nick to {}", nick);
            if let Err(e) = guild_id.edit_nickname(ctx.http, Some(nick.as_str())).await {
                log_error!("Could not change nick: {}", e);
            }
        }

        if let Err(e) = guild_id
            .set_commands(ctx.http, super::slash::commands())
            .await
        {
            log_error!("Could not register slash commands: {}", e);
        }

        log_internal!("Ready");
        Ok(EventHandled::Yes)
    }
}
