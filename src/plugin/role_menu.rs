//! Interactive role picker opened with `/roles`.
//!
//! One select menu per category lists its roles with the user's current ones pre-selected.
//! Submitting a menu makes the user's roles in that category match the selection.  Each menu
//! has a button next to it removing every role of the category.

use crate::{
    catalog::{Category, RoleCatalog, MAX_MENU_OPTIONS, WILDCARD},
    context::Context,
    error::RoleBotError,
    event::*,
    log_warn,
    membership::{apply_change, apply_selection, RoleAction, RoleRequest},
    platform::{Platform, SerenityPlatform},
    plugin::*,
};
use anyhow::Result;
use serenity::all::{
    ButtonStyle, CommandInteraction, ComponentInteractionDataKind, CreateActionRow, CreateButton,
    CreateInteractionResponse, CreateInteractionResponseMessage, CreateSelectMenu,
    CreateSelectMenuKind, CreateSelectMenuOption, Interaction, RoleId,
};

const CUSTOM_ID_PREFIX: &str = "rolebot";

/// What a component on the role picker does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Select(Category),
    Clear(Category),
}

impl MenuAction {
    fn custom_id(self) -> String {
        let (verb, category) = match self {
            MenuAction::Select(category) => ("select", category),
            MenuAction::Clear(category) => ("clear", category),
        };
        format!("{}:{}:{}", CUSTOM_ID_PREFIX, verb, category)
    }

    fn parse(custom_id: &str) -> Option<Self> {
        let mut parts = custom_id.split(':');
        if parts.next() != Some(CUSTOM_ID_PREFIX) {
            return None;
        }
        let verb = parts.next()?;
        let category_name = parts.next()?;
        let category = Category::ALL
            .into_iter()
            .find(|category| category.name() == category_name)?;
        if parts.next().is_some() {
            return None;
        }

        match verb {
            "select" => Some(MenuAction::Select(category)),
            "clear" => Some(MenuAction::Clear(category)),
            _ => None,
        }
    }
}

fn menu_rows(catalog: &RoleCatalog, held: &[RoleId]) -> Vec<CreateActionRow> {
    let mut rows = Vec::new();

    for category in Category::ALL {
        let configured = catalog.roles(category).count();
        if configured == 0 {
            continue;
        }
        if configured > MAX_MENU_OPTIONS {
            log_warn!(
                "{} {} roles configured, only the first {} fit in the role menu",
                configured,
                category,
                MAX_MENU_OPTIONS
            );
        }

        let options: Vec<_> = catalog
            .menu_roles(category)
            .map(|role| {
                let option = CreateSelectMenuOption::new(&role.display_name, &role.canonical_name)
                    .default_selection(held.contains(&role.external_id));
                match &role.description {
                    Some(description) => option.description(description),
                    None => option,
                }
            })
            .collect();
        let max_values = options.len() as u8;

        let menu = CreateSelectMenu::new(
            MenuAction::Select(category).custom_id(),
            CreateSelectMenuKind::String { options },
        )
        .placeholder(format!("Your {} roles", category))
        .min_values(0)
        .max_values(max_values);
        let clear = CreateButton::new(MenuAction::Clear(category).custom_id())
            .label(format!("Remove all {} roles", category))
            .style(ButtonStyle::Danger);

        rows.push(CreateActionRow::SelectMenu(menu));
        rows.push(CreateActionRow::Buttons(vec![clear]));
    }

    rows
}

/// Answer `/roles` with the role picker
pub async fn open(ctx: &Context<'_>, command: &CommandInteraction) -> Result<()> {
    let session = session(ctx)?;
    let platform = SerenityPlatform::new(ctx.cache_http, session.guild_id);

    let Some(held) = platform.user_roles(command.user.id).await? else {
        let err = RoleBotError::UnresolvedMember(command.user.id);
        command
            .create_response(ctx.cache_http, ephemeral_failure(&err))
            .await?;
        return Ok(());
    };

    let rows = menu_rows(&session.catalog, &held);
    let response = if rows.is_empty() {
        ephemeral(false, "There are no roles to pick from")
    } else {
        CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content("Pick your roles")
                .components(rows)
                .ephemeral(true),
        )
    };
    command.create_response(ctx.cache_http, response).await?;
    Ok(())
}

/// Handles submissions from the role picker
pub struct RoleMenu;

#[serenity::async_trait]
impl Plugin for RoleMenu {
    fn name(&self) -> &'static str {
        "role_menu"
    }

    async fn usage(&self, _ctx: &Context<'_>) -> Option<String> {
        None
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Event::Interaction(Interaction::Component(component)) = event else {
            return Ok(EventHandled::No);
        };
        let Some(action) = MenuAction::parse(&component.data.custom_id) else {
            return Ok(EventHandled::No);
        };

        let session = session(ctx)?;
        let platform = SerenityPlatform::new(ctx.cache_http, session.guild_id);
        let user = component.user.id;

        let result = match (action, &component.data.kind) {
            (MenuAction::Select(category), ComponentInteractionDataKind::StringSelect { values }) => {
                apply_selection(&platform, &session.catalog, user, category, values.as_slice())
                    .await
            }
            (MenuAction::Clear(category), ComponentInteractionDataKind::Button) => {
                let request = RoleRequest {
                    category,
                    action: RoleAction::Remove,
                    name: WILDCARD.to_owned(),
                };
                apply_change(&platform, &session.catalog, user, &request).await
            }
            _ => Err(RoleBotError::UnknownCommand(component.data.custom_id.clone())),
        };

        let response = match result {
            Ok(plan) => ephemeral(true, super::slash::describe_plan(&plan)),
            Err(err) => ephemeral_failure(&err),
        };
        component.create_response(ctx.cache_http, response).await?;
        Ok(EventHandled::Yes)
    }
}
