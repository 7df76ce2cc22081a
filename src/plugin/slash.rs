//! Slash commands registered in the managed server

use crate::{
    catalog::Category,
    context::Context,
    error::RoleBotError,
    event::*,
    helper::ChannelIdHelper,
    log_internal,
    logging::PrintColor,
    membership::{apply_change, RoleAction, RoleRequest},
    platform::SerenityPlatform,
    plugin::*,
    policy::check_channel_restriction,
    reconcile::RoleOpPlan,
};
use anyhow::Result;
use serenity::all::{
    CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption, Interaction,
    ResolvedOption, ResolvedValue,
};

const ROLES_COMMAND: &str = "roles";
const VERSION_COMMAND: &str = "version";
const NAME_OPTION: &str = "name";

pub struct Slash;

/// Commands to register with Discord
pub fn commands() -> Vec<CreateCommand> {
    let mut commands = vec![
        CreateCommand::new(ROLES_COMMAND).description("Pick your game and area roles"),
        CreateCommand::new(VERSION_COMMAND).description("Show which version of the bot is running"),
    ];

    for category in Category::ALL {
        let name_option = |description: String| {
            CreateCommandOption::new(CommandOptionType::String, NAME_OPTION, description)
                .required(true)
        };
        commands.push(
            CreateCommand::new(category.name())
                .description(format!("Join or leave {} roles", category))
                .add_option(
                    CreateCommandOption::new(
                        CommandOptionType::SubCommand,
                        RoleAction::Add.name(),
                        format!("Join a {} role", category),
                    )
                    .add_sub_option(name_option(format!("{} role to join", category))),
                )
                .add_option(
                    CreateCommandOption::new(
                        CommandOptionType::SubCommand,
                        RoleAction::Remove.name(),
                        format!("Leave a {} role", category),
                    )
                    .add_sub_option(name_option(format!(
                        "{} role to leave, or * for all of them",
                        category
                    ))),
                ),
        );
    }

    commands
}

/// Turn the resolved options of `/game` or `/area` into a request
fn role_request(category: Category, options: &[ResolvedOption<'_>]) -> Option<RoleRequest> {
    let subcommand = options.first()?;
    let ResolvedValue::SubCommand(sub_options) = &subcommand.value else {
        return None;
    };
    let action = subcommand.name.parse::<RoleAction>().ok()?;
    let name = sub_options.iter().find_map(|option| match option.value {
        ResolvedValue::String(name) if option.name == NAME_OPTION => Some(name),
        _ => None,
    })?;

    Some(RoleRequest {
        category,
        action,
        name: name.to_owned(),
    })
}

/// Human-readable summary of what a plan changed
pub fn describe_plan(plan: &RoleOpPlan) -> String {
    let names = |roles: &[crate::catalog::RoleDefinition]| {
        roles
            .iter()
            .map(|role| role.display_name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    if plan.is_empty() {
        return "No changes".to_owned();
    }
    match (plan.add.is_empty(), plan.remove.is_empty()) {
        (false, true) => format!("Added {}", names(&plan.add)),
        (true, false) => format!("Removed {}", names(&plan.remove)),
        _ => format!(
            "Added {}. Removed {}",
            names(&plan.add),
            names(&plan.remove)
        ),
    }
}

#[serenity::async_trait]
impl Plugin for Slash {
    fn name(&self) -> &'static str {
        "slash"
    }

    async fn usage(&self, _ctx: &Context<'_>) -> Option<String> {
        Some(
            "/roles - pick roles from a menu\n\
             /game, /area - same as the text commands\n\
             /version - show the bot version"
                .to_owned(),
        )
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Event::Interaction(Interaction::Command(command)) = event else {
            return Ok(EventHandled::No);
        };

        let invocation = command
            .channel_id
            .invocation_context(ctx, command.guild_id)
            .await;
        if let Err(err) = check_channel_restriction(&invocation, ctx.cfg.bot_channel.as_deref())
            .into_result(command.user.id, &command.data.name)
        {
            command
                .create_response(ctx.cache_http, ephemeral_failure(&err))
                .await?;
            return Ok(EventHandled::Yes);
        }

        let name = command.data.name.as_str();
        match Category::ALL.into_iter().find(|category| category.name() == name) {
            Some(category) => handle_role_command(ctx, command, category).await?,
            None if name == ROLES_COMMAND => super::role_menu::open(ctx, command).await?,
            None if name == VERSION_COMMAND => {
                log_internal!("User {} queried version information", command.user.color());
                let response = ephemeral(true, format!("Git commit: {}", ctx.version));
                command.create_response(ctx.cache_http, response).await?;
            }
            None => {
                let err = RoleBotError::UnknownCommand(name.to_owned());
                command
                    .create_response(ctx.cache_http, ephemeral_failure(&err))
                    .await?;
            }
        }

        Ok(EventHandled::Yes)
    }
}

async fn handle_role_command(
    ctx: &Context<'_>,
    command: &CommandInteraction,
    category: Category,
) -> Result<()> {
    let Some(request) = role_request(category, &command.data.options()) else {
        let err = RoleBotError::UnknownCommand(format!("/{}", category));
        command
            .create_response(ctx.cache_http, ephemeral_failure(&err))
            .await?;
        return Ok(());
    };

    let session = session(ctx)?;
    let platform = SerenityPlatform::new(ctx.cache_http, session.guild_id);
    let response = match apply_change(&platform, &session.catalog, command.user.id, &request).await
    {
        Ok(plan) => ephemeral(true, describe_plan(&plan)),
        Err(err) => ephemeral_failure(&err),
    };
    command.create_response(ctx.cache_http, response).await?;
    Ok(())
}
