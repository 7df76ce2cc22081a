//! The seam between role logic and Discord.
//!
//! Everything the role logic needs from the chat platform goes through [`RoleLookup`] (at
//! startup) or [`Platform`] (per command), so it can run against an in-memory fake in tests.

use crate::{context::CacheHttp, policy::Actor};
use anyhow::Result;
use serenity::all::{GuildId, HttpError, Role, RoleId, UserId};
use std::collections::HashMap;

/// A role as it currently exists on the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveRole {
    pub id: RoleId,
    pub name: String,
}

/// Synchronous lookup of the server's roles, used to build the catalog
pub trait RoleLookup {
    fn role_by_id(&self, id: RoleId) -> Option<LiveRole>;
    fn role_by_name(&self, name: &str) -> Option<LiveRole>;
}

impl RoleLookup for [LiveRole] {
    fn role_by_id(&self, id: RoleId) -> Option<LiveRole> {
        self.iter().find(|role| role.id == id).cloned()
    }

    fn role_by_name(&self, name: &str) -> Option<LiveRole> {
        self.iter().find(|role| role.name == name).cloned()
    }
}

impl RoleLookup for HashMap<RoleId, Role> {
    fn role_by_id(&self, id: RoleId) -> Option<LiveRole> {
        self.get(&id).map(|role| LiveRole {
            id: role.id,
            name: role.name.clone(),
        })
    }

    fn role_by_name(&self, name: &str) -> Option<LiveRole> {
        self.values()
            .find(|role| role.name == name)
            .map(|role| LiveRole {
                id: role.id,
                name: role.name.clone(),
            })
    }
}

/// Per-command access to server members and their roles
#[serenity::async_trait]
pub trait Platform: Sync + Send {
    /// Look the user up as a member of the managed server.  `None` if they are not a member.
    async fn resolve_member(&self, user: UserId) -> Result<Option<Actor>>;

    async fn user_roles(&self, user: UserId) -> Result<Option<Vec<RoleId>>> {
        Ok(self.resolve_member(user).await?.map(|actor| actor.roles))
    }

    async fn add_roles(&self, user: UserId, roles: &[RoleId]) -> Result<()>;

    async fn remove_roles(&self, user: UserId, roles: &[RoleId]) -> Result<()>;
}

/// [`Platform`] backed by the live Discord connection
pub struct SerenityPlatform<'a> {
    pub discord: &'a CacheHttp,
    pub guild_id: GuildId,
}

impl<'a> SerenityPlatform<'a> {
    pub fn new(discord: &'a CacheHttp, guild_id: GuildId) -> Self {
        Self { discord, guild_id }
    }

    async fn member(&self, user: UserId) -> Result<Option<serenity::all::Member>> {
        match self.guild_id.member(self.discord, user).await {
            Ok(member) => Ok(Some(member)),
            Err(e) if is_missing_member(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Discord's JSON error codes for "Unknown Member" and "Unknown User"
const UNKNOWN_MEMBER_CODES: [isize; 2] = [10007, 10013];

/// Whether a member lookup failed because the user is not on the server.  Any other failure,
/// e.g. a timeout or rate limit, is a platform error.
fn is_missing_member(err: &serenity::Error) -> bool {
    match err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
            is_unknown_member_response(response.status_code.as_u16(), response.error.code)
        }
        _ => false,
    }
}

fn is_unknown_member_response(status: u16, code: isize) -> bool {
    status == 404 && UNKNOWN_MEMBER_CODES.contains(&code)
}

#[serenity::async_trait]
impl Platform for SerenityPlatform<'_> {
    async fn resolve_member(&self, user: UserId) -> Result<Option<Actor>> {
        let Some(member) = self.member(user).await? else {
            return Ok(None);
        };

        // Cache references must not be held across an await
        #[allow(deprecated)]
        let is_administrator = self
            .discord
            .cache
            .guild(self.guild_id)
            .map(|guild| guild.member_permissions(&member).administrator())
            .unwrap_or(false);

        Ok(Some(Actor {
            user_id: member.user.id,
            name: member.user.name.clone(),
            roles: member.roles.clone(),
            is_administrator,
        }))
    }

    async fn add_roles(&self, user: UserId, roles: &[RoleId]) -> Result<()> {
        for role in roles {
            self.discord
                .http
                .add_member_role(self.guild_id, user, *role, Some("self-service role"))
                .await?;
        }
        Ok(())
    }

    async fn remove_roles(&self, user: UserId, roles: &[RoleId]) -> Result<()> {
        for role in roles {
            self.discord
                .http
                .remove_member_role(self.guild_id, user, *role, Some("self-service role"))
                .await?;
        }
        Ok(())
    }
}


#[cfg(test)]
pub mod fake {
    //! In-memory [`Platform`] for tests

    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Add(UserId, Vec<RoleId>),
        Remove(UserId, Vec<RoleId>),
    }

    #[derive(Default)]
    pub struct FakePlatform {
        members: Mutex<HashMap<UserId, Actor>>,
        pub calls: Mutex<Vec<Call>>,
    }

    impl FakePlatform {
        pub fn with_member(self, actor: Actor) -> Self {
            self.members
                .lock()
                .unwrap()
                .insert(actor.user_id, actor);
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn roles_of(&self, user: UserId) -> Vec<RoleId> {
            self.members.lock().unwrap()[&user].roles.clone()
        }
    }

    #[serenity::async_trait]
    impl Platform for FakePlatform {
        async fn resolve_member(&self, user: UserId) -> Result<Option<Actor>> {
            Ok(self.members.lock().unwrap().get(&user).cloned())
        }

        async fn add_roles(&self, user: UserId, roles: &[RoleId]) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Add(user, roles.to_vec()));
            let mut members = self.members.lock().unwrap();
            if let Some(member) = members.get_mut(&user) {
                for role in roles {
                    if !member.roles.contains(role) {
                        member.roles.push(*role);
                    }
                }
            }
            Ok(())
        }

        async fn remove_roles(&self, user: UserId, roles: &[RoleId]) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Remove(user, roles.to_vec()));
            let mut members = self.members.lock().unwrap();
            if let Some(member) = members.get_mut(&user) {
                member.roles.retain(|role| !roles.contains(role));
            }
            Ok(())
        }
    }
}
