//! The verified set of roles users may manage themselves.
//!
//! Built once from configuration when the connection to Discord is ready.  Configured roles
//! which do not exist on the server are left out, never substituted.

use crate::{
    config::RoleEntry,
    log_warn,
    platform::{LiveRole, RoleLookup},
};
use serenity::all::RoleId;
use std::collections::{BTreeMap, HashMap};

/// Requests naming this token target every role in a category
pub const WILDCARD: &str = "*";

/// Discord refuses select menus with more options than this
pub const MAX_MENU_OPTIONS: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Game,
    Area,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Game, Category::Area];

    pub fn name(self) -> &'static str {
        match self {
            Category::Game => "game",
            Category::Area => "area",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoleDefinition {
    /// Lowercased role name, unique within the category
    pub canonical_name: String,
    /// Role name as it appears on the server
    pub display_name: String,
    pub external_id: RoleId,
    pub category: Category,
    pub description: Option<String>,
}

/// Outcome of looking up a user-supplied role name
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<'a> {
    Role(&'a RoleDefinition),
    /// The wildcard: every role in the category
    All,
    NotFound,
}

#[derive(Debug, Default)]
pub struct RoleCatalog {
    game: BTreeMap<String, RoleDefinition>,
    area: BTreeMap<String, RoleDefinition>,
    by_id: HashMap<RoleId, RoleDefinition>,
}

/// Catalog roles a user currently holds
#[derive(Debug, Default)]
pub struct UserRoleState<'a> {
    pub game: Vec<&'a RoleDefinition>,
    pub area: Vec<&'a RoleDefinition>,
}

pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl RoleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(
        game_entries: &[RoleEntry],
        area_entries: &[RoleEntry],
        live_roles: &(impl RoleLookup + ?Sized),
    ) -> Self {
        let mut catalog = Self::new();
        catalog.register(game_entries, Category::Game, live_roles);
        catalog.register(area_entries, Category::Area, live_roles);
        catalog
    }

    /// Add the configured entries of one category, skipping any that do not match a live role.
    pub fn register(
        &mut self,
        entries: &[RoleEntry],
        category: Category,
        live_roles: &(impl RoleLookup + ?Sized),
    ) {
        for entry in entries {
            let (live, description) = match entry {
                RoleEntry::Name(name) => (live_roles.role_by_name(name), None),
                RoleEntry::Record {
                    id, description, ..
                } => (live_roles.role_by_id(*id), description.clone()),
            };

            let Some(LiveRole { id, name }) = live else {
                log_warn!(
                    "Configured {} role {} does not exist on the server, ignoring it",
                    category,
                    entry
                );
                continue;
            };

            let canonical_name = normalize(&name);
            if canonical_name.is_empty() || canonical_name == WILDCARD {
                log_warn!(
                    "Role \"{}\" ({}) cannot be used as a {} role, ignoring it",
                    name,
                    id,
                    category
                );
                continue;
            }

            let definition = RoleDefinition {
                canonical_name: canonical_name.clone(),
                display_name: name,
                external_id: id,
                category,
                description,
            };

            if let Some(previous) = self.by_id.insert(id, definition.clone()) {
                log_warn!(
                    "Role \"{}\" is configured more than once ({} and {}), keeping the {} entry",
                    previous.display_name,
                    previous.category,
                    category,
                    category
                );
                self.map_mut(previous.category)
                    .remove(&previous.canonical_name);
            }
            if let Some(previous) = self.map_mut(category).insert(canonical_name, definition) {
                log_warn!(
                    "Two {} roles share the name \"{}\", keeping role {}",
                    category,
                    previous.canonical_name,
                    id
                );
                self.by_id.remove(&previous.external_id);
            }
        }
    }

    fn map(&self, category: Category) -> &BTreeMap<String, RoleDefinition> {
        match category {
            Category::Game => &self.game,
            Category::Area => &self.area,
        }
    }

    fn map_mut(&mut self, category: Category) -> &mut BTreeMap<String, RoleDefinition> {
        match category {
            Category::Game => &mut self.game,
            Category::Area => &mut self.area,
        }
    }

    pub fn resolve(&self, name: &str, category: Category) -> Resolution<'_> {
        let name = normalize(name);
        if name == WILDCARD {
            return Resolution::All;
        }
        match self.map(category).get(&name) {
            Some(role) => Resolution::Role(role),
            None => Resolution::NotFound,
        }
    }

    /// Roles of one category, ordered by canonical name
    pub fn roles(&self, category: Category) -> impl Iterator<Item = &RoleDefinition> {
        self.map(category).values()
    }

    /// The roles of a category the role picker can offer: the first [`MAX_MENU_OPTIONS`] by
    /// canonical name
    pub fn menu_roles(&self, category: Category) -> impl Iterator<Item = &RoleDefinition> {
        self.roles(category).take(MAX_MENU_OPTIONS)
    }

    pub fn by_external_id(&self, id: RoleId) -> Option<&RoleDefinition> {
        self.by_id.get(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Intersect a user's live roles with the catalog.  Roles unknown to the catalog are dropped.
    pub fn user_state(&self, user_roles: &[RoleId]) -> UserRoleState<'_> {
        let mut state = UserRoleState::default();
        for role in user_roles.iter().filter_map(|id| self.by_external_id(*id)) {
            match role.category {
                Category::Game => state.game.push(role),
                Category::Area => state.area.push(role),
            }
        }
        state
    }
}

impl UserRoleState<'_> {
    pub fn in_category(&self, category: Category) -> &[&RoleDefinition] {
        match category {
            Category::Game => &self.game,
            Category::Area => &self.area,
        }
    }

    pub fn holds(&self, role: &RoleDefinition) -> bool {
        self.in_category(role.category)
            .iter()
            .any(|held| held.external_id == role.external_id)
    }
}
