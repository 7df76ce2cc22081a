use crate::{
    catalog::{normalize, Category, Resolution, RoleCatalog, RoleDefinition, UserRoleState},
    error::RoleBotError,
};
use serenity::all::RoleId;

/// Roles to submit to Discord for one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleOpPlan {
    pub add: Vec<RoleDefinition>,
    pub remove: Vec<RoleDefinition>,
}

impl RoleOpPlan {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }

    pub fn add_ids(&self) -> Vec<RoleId> {
        self.add.iter().map(|role| role.external_id).collect()
    }

    pub fn remove_ids(&self) -> Vec<RoleId> {
        self.remove.iter().map(|role| role.external_id).collect()
    }
}

/// Plans role changes for one user.  Never talks to Discord.
pub struct RoleReconciler<'a> {
    catalog: &'a RoleCatalog,
    state: &'a UserRoleState<'a>,
}

impl<'a> RoleReconciler<'a> {
    pub fn new(catalog: &'a RoleCatalog, state: &'a UserRoleState<'a>) -> Self {
        Self { catalog, state }
    }

    fn not_found(category: Category, requested: &str) -> RoleBotError {
        RoleBotError::RoleNotFound {
            category,
            name: normalize(requested),
        }
    }

    /// Add exactly one role.  Adding a role the user already has is fine.
    pub fn plan_add(&self, category: Category, requested: &str) -> Result<RoleOpPlan, RoleBotError> {
        match self.catalog.resolve(requested, category) {
            Resolution::Role(role) => Ok(RoleOpPlan {
                add: vec![role.clone()],
                remove: Vec::new(),
            }),
            Resolution::All | Resolution::NotFound => Err(Self::not_found(category, requested)),
        }
    }

    /// Remove one role, or with the wildcard every role of the category whether held or not.
    pub fn plan_remove(
        &self,
        category: Category,
        requested: &str,
    ) -> Result<RoleOpPlan, RoleBotError> {
        let remove = match self.catalog.resolve(requested, category) {
            Resolution::Role(role) => vec![role.clone()],
            Resolution::All => self.catalog.roles(category).cloned().collect(),
            Resolution::NotFound => return Err(Self::not_found(category, requested)),
        };

        Ok(RoleOpPlan {
            add: Vec::new(),
            remove,
        })
    }

    /// Make the user's roles in `category` match a submitted role picker.
    ///
    /// Only roles the picker offered are touched.  Held roles it could not show are kept.
    pub fn plan_select<S: AsRef<str>>(
        &self,
        category: Category,
        selected: &[S],
    ) -> Result<RoleOpPlan, RoleBotError> {
        let offered: Vec<&RoleDefinition> = self.catalog.menu_roles(category).collect();

        let mut wanted: Vec<&RoleDefinition> = Vec::with_capacity(selected.len());
        for name in selected {
            match self.catalog.resolve(name.as_ref(), category) {
                Resolution::Role(role) if offered.contains(&role) => {
                    if !wanted.contains(&role) {
                        wanted.push(role);
                    }
                }
                Resolution::Role(_) | Resolution::All | Resolution::NotFound => {
                    return Err(Self::not_found(category, name.as_ref()))
                }
            }
        }

        let add = wanted
            .iter()
            .filter(|role| !self.state.holds(role))
            .map(|role| (*role).clone())
            .collect();
        let remove = self
            .state
            .in_category(category)
            .iter()
            .filter(|held| offered.contains(held) && !wanted.contains(held))
            .map(|held| (*held).clone())
            .collect();

        Ok(RoleOpPlan { add, remove })
    }
}
