//! Applies role requests through a [`Platform`].
//!
//! Shared by the text commands, slash commands and the role menu so every surface follows the
//! same path: fetch the user's roles, plan the change, submit it.

use crate::{
    catalog::{Category, RoleCatalog},
    error::RoleBotError,
    log_internal,
    logging::PrintColor,
    platform::Platform,
    reconcile::{RoleOpPlan, RoleReconciler},
};
use serenity::all::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleAction {
    Add,
    Remove,
}

impl RoleAction {
    pub fn name(self) -> &'static str {
        match self {
            RoleAction::Add => "add",
            RoleAction::Remove => "remove",
        }
    }
}

impl std::str::FromStr for RoleAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" => Ok(RoleAction::Add),
            "remove" => Ok(RoleAction::Remove),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRequest {
    pub category: Category,
    pub action: RoleAction,
    /// Role name as typed by the user, or the wildcard
    pub name: String,
}

/// Why the arguments of a role command could not be understood
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    MissingSubcommand,
    UnknownSubcommand(String),
    MissingRoleName,
}

impl RoleRequest {
    /// Parse `add <name>` / `remove <name>`.  Role names may contain spaces.
    pub fn parse(category: Category, args: &[&str]) -> Result<Self, RequestError> {
        let Some((subcommand, rest)) = args.split_first() else {
            return Err(RequestError::MissingSubcommand);
        };
        let action = subcommand
            .parse::<RoleAction>()
            .map_err(|_| RequestError::UnknownSubcommand(subcommand.to_string()))?;
        if rest.is_empty() {
            return Err(RequestError::MissingRoleName);
        }

        Ok(RoleRequest {
            category,
            action,
            name: rest.join(" "),
        })
    }
}

/// Plan `request` against the user's current roles and submit it.
pub async fn apply_change<P: Platform + ?Sized>(
    platform: &P,
    catalog: &RoleCatalog,
    user: UserId,
    request: &RoleRequest,
) -> Result<RoleOpPlan, RoleBotError> {
    let roles = platform
        .user_roles(user)
        .await?
        .ok_or(RoleBotError::UnresolvedMember(user))?;
    let state = catalog.user_state(&roles);
    let reconciler = RoleReconciler::new(catalog, &state);

    let plan = match request.action {
        RoleAction::Add => reconciler.plan_add(request.category, &request.name)?,
        RoleAction::Remove => reconciler.plan_remove(request.category, &request.name)?,
    };

    submit(platform, user, &plan).await?;
    Ok(plan)
}

/// Make the user's roles in `category` exactly the `selected` ones.
pub async fn apply_selection<P: Platform + ?Sized, S: AsRef<str> + Sync>(
    platform: &P,
    catalog: &RoleCatalog,
    user: UserId,
    category: Category,
    selected: &[S],
) -> Result<RoleOpPlan, RoleBotError> {
    let roles = platform
        .user_roles(user)
        .await?
        .ok_or(RoleBotError::UnresolvedMember(user))?;
    let state = catalog.user_state(&roles);
    let plan = RoleReconciler::new(catalog, &state).plan_select(category, selected)?;

    submit(platform, user, &plan).await?;
    Ok(plan)
}

async fn submit<P: Platform + ?Sized>(
    platform: &P,
    user: UserId,
    plan: &RoleOpPlan,
) -> anyhow::Result<()> {
    if !plan.add.is_empty() {
        log_internal!("Adding role(s) {} for user {}", plan.add.color(), user);
        platform.add_roles(user, &plan.add_ids()).await?;
    }
    if !plan.remove.is_empty() {
        log_internal!("Removing role(s) {} from user {}", plan.remove.color(), user);
        platform.remove_roles(user, &plan.remove_ids()).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::RoleEntry,
        platform::{
            fake::{Call, FakePlatform},
            LiveRole,
        },
        policy::Actor,
    };
    use serenity::all::RoleId;

    const USER: UserId = UserId::new(42);

    fn catalog() -> RoleCatalog {
        let live: Vec<LiveRole> = [(1, "IIDX"), (2, "DDR"), (3, "Helsinki"), (4, "Tampere")]
            .into_iter()
            .map(|(id, name)| LiveRole {
                id: RoleId::new(id),
                name: name.to_owned(),
            })
            .collect();
        RoleCatalog::build(
            &[
                RoleEntry::Name("IIDX".to_owned()),
                RoleEntry::Name("DDR".to_owned()),
            ],
            &[
                RoleEntry::Name("Helsinki".to_owned()),
                RoleEntry::Name("Tampere".to_owned()),
            ],
            live.as_slice(),
        )
    }

    fn member(roles: &[u64]) -> Actor {
        Actor {
            user_id: USER,
            name: "player".to_owned(),
            roles: roles.iter().copied().map(RoleId::new).collect(),
            is_administrator: false,
        }
    }

    fn request(category: Category, action: RoleAction, name: &str) -> RoleRequest {
        RoleRequest {
            category,
            action,
            name: name.to_owned(),
        }
    }

    #[test]
    fn parse_requests() {
        assert_eq!(
            RoleRequest::parse(Category::Game, &["add", "Sound", "Voltex"]),
            Ok(request(Category::Game, RoleAction::Add, "Sound Voltex"))
        );
        assert_eq!(
            RoleRequest::parse(Category::Area, &["REMOVE", "*"]),
            Ok(request(Category::Area, RoleAction::Remove, "*"))
        );
        assert_eq!(
            RoleRequest::parse(Category::Game, &[]),
            Err(RequestError::MissingSubcommand)
        );
        assert_eq!(
            RoleRequest::parse(Category::Game, &["add"]),
            Err(RequestError::MissingRoleName)
        );
        assert_eq!(
            RoleRequest::parse(Category::Game, &["join", "iidx"]),
            Err(RequestError::UnknownSubcommand("join".to_owned()))
        );
    }

    #[tokio::test]
    async fn add_submits_one_role() {
        let platform = FakePlatform::default().with_member(member(&[]));
        let plan = apply_change(
            &platform,
            &catalog(),
            USER,
            &request(Category::Game, RoleAction::Add, "iidx"),
        )
        .await
        .unwrap();

        assert_eq!(plan.add_ids(), vec![RoleId::new(1)]);
        assert_eq!(platform.calls(), vec![Call::Add(USER, vec![RoleId::new(1)])]);
        assert_eq!(platform.roles_of(USER), vec![RoleId::new(1)]);
    }

    #[tokio::test]
    async fn remove_all_areas_keeps_games() {
        let platform = FakePlatform::default().with_member(member(&[1, 3]));
        apply_change(
            &platform,
            &catalog(),
            USER,
            &request(Category::Area, RoleAction::Remove, "*"),
        )
        .await
        .unwrap();

        assert_eq!(
            platform.calls(),
            vec![Call::Remove(USER, vec![RoleId::new(3), RoleId::new(4)])]
        );
        assert_eq!(platform.roles_of(USER), vec![RoleId::new(1)]);
    }

    #[tokio::test]
    async fn unknown_role_submits_nothing() {
        let platform = FakePlatform::default().with_member(member(&[]));
        let result = apply_change(
            &platform,
            &catalog(),
            USER,
            &request(Category::Game, RoleAction::Add, "jubeat"),
        )
        .await;

        assert!(matches!(result, Err(RoleBotError::RoleNotFound { .. })));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn non_member_is_unresolved() {
        let platform = FakePlatform::default();
        let result = apply_change(
            &platform,
            &catalog(),
            USER,
            &request(Category::Game, RoleAction::Add, "iidx"),
        )
        .await;

        assert!(matches!(result, Err(RoleBotError::UnresolvedMember(user)) if user == USER));
    }

    #[tokio::test]
    async fn selection_only_submits_differences() {
        let platform = FakePlatform::default().with_member(member(&[1, 3]));
        let plan = apply_selection(&platform, &catalog(), USER, Category::Game, &["ddr"])
            .await
            .unwrap();

        assert_eq!(plan.add_ids(), vec![RoleId::new(2)]);
        assert_eq!(plan.remove_ids(), vec![RoleId::new(1)]);
        assert_eq!(
            platform.calls(),
            vec![
                Call::Add(USER, vec![RoleId::new(2)]),
                Call::Remove(USER, vec![RoleId::new(1)]),
            ]
        );

        // Selecting what the user already has changes nothing
        let plan = apply_selection(&platform, &catalog(), USER, Category::Game, &["ddr"])
            .await
            .unwrap();
        assert!(plan.is_empty());
        assert_eq!(platform.calls().len(), 2);
    }
}
