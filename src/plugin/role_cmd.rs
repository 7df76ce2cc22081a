use crate::{
    catalog::Category,
    context::Context,
    event::*,
    helper::MessageHelper,
    log_internal, log_warn,
    logging::PrintColor,
    membership::{apply_change, RequestError, RoleRequest},
    platform::SerenityPlatform,
    plugin::*,
    policy::{check_channel_restriction, InvocationContext},
};
use anyhow::Result;

/// `game add|remove <name>` and `area add|remove <name>`
pub struct RoleCmd;

#[serenity::async_trait]
impl Plugin for RoleCmd {
    fn name(&self) -> &'static str {
        "roles"
    }

    async fn usage(&self, ctx: &Context<'_>) -> Option<String> {
        let prefix = &ctx.cfg.command_prefix;
        Some(
            Category::ALL
                .iter()
                .map(|category| {
                    format!(
                        "{}{} add <name> - join a {} role\n\
                         {}{} remove <name|*> - leave a {} role, or all of them with *",
                        prefix, category, category, prefix, category, category
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Some((category, msg, args)) = Category::ALL.into_iter().find_map(|category| {
            event
                .is_bot_cmd(ctx, category.name())
                .map(|(msg, args)| (category, msg, args))
        }) else {
            return Ok(EventHandled::No);
        };

        let invocation = msg.invocation_context(ctx).await;
        if let Err(err) = check_channel_restriction(&invocation, ctx.cfg.bot_channel.as_deref())
            .into_result(msg.author.id, category.name())
        {
            report_failure(ctx, msg, err).await?;
            return Ok(EventHandled::Yes);
        }

        let request = match RoleRequest::parse(category, &args) {
            Ok(request) => request,
            Err(err) => {
                match err {
                    RequestError::MissingSubcommand => {
                        log_warn!("No subcommand given for {} command", category)
                    }
                    RequestError::UnknownSubcommand(subcommand) => log_warn!(
                        "User {} tried to run unknown subcommand \"{} {}\"",
                        msg.author.color(),
                        category,
                        subcommand
                    ),
                    RequestError::MissingRoleName => log_warn!(
                        "User {} did not supply a role name for command \"{}\"",
                        msg.author.color(),
                        category
                    ),
                }
                msg.react_failure(ctx).await?;
                return Ok(EventHandled::Yes);
            }
        };

        if invocation == InvocationContext::Private {
            log_internal!(
                "{} role {} request in private message from {}",
                category,
                request.action.name(),
                msg.author.color()
            );
        }

        let session = session(ctx)?;
        let platform = SerenityPlatform::new(ctx.cache_http, session.guild_id);
        match apply_change(&platform, &session.catalog, msg.author.id, &request).await {
            Ok(_) => msg.react_success(ctx).await?,
            Err(err) => report_failure(ctx, msg, err).await?,
        }

        Ok(EventHandled::Yes)
    }
}
