//! Who may run which command, and where.
//!
//! Each check is a plain predicate returning an [`Authorization`] which command handlers call
//! before doing anything else.  Checks compose with [`Authorization::and_then`].

use crate::{error::RoleBotError, log_debug, log_warn, platform::RoleLookup};
use serenity::all::{RoleId, UserId};

/// A server member invoking a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub name: String,
    pub roles: Vec<RoleId>,
    /// Discord reports the member has the administrator permission
    pub is_administrator: bool,
}

/// The role marking bot administrators
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminIdentity {
    /// Nothing configured, every member counts as an administrator
    Open,
    Role(RoleId),
    /// Configured by a name no role on the server has.  Only Discord administrators pass.
    Unresolved(String),
}

impl AdminIdentity {
    /// Find the configured admin role on the server.  An id takes precedence over a name.
    pub fn resolve(
        id: Option<RoleId>,
        name: Option<&str>,
        live_roles: &(impl RoleLookup + ?Sized),
    ) -> Self {
        match (id, name) {
            (Some(id), _) => {
                if live_roles.role_by_id(id).is_none() {
                    log_warn!("Admin role {} does not exist on the server", id);
                }
                AdminIdentity::Role(id)
            }
            (None, Some(name)) => match live_roles.role_by_name(name) {
                Some(role) => AdminIdentity::Role(role.id),
                None => {
                    log_warn!(
                        "Admin role \"{}\" does not exist on the server, only server administrators can run admin commands",
                        name
                    );
                    AdminIdentity::Unresolved(name.to_owned())
                }
            },
            (None, None) => {
                log_debug!("No admin role configured, admin commands are open to everyone");
                AdminIdentity::Open
            }
        }
    }
}

/// Where a command was invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationContext {
    Private,
    Channel { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    NotAdmin,
    WrongChannel { channel: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Allowed,
    Denied(Denial),
}

impl Authorization {
    /// Run the next check only if this one passed
    pub fn and_then(self, next: impl FnOnce() -> Authorization) -> Authorization {
        match self {
            Authorization::Allowed => next(),
            denied => denied,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Authorization::Allowed)
    }

    pub fn into_result(self, actor: UserId, command: &str) -> Result<(), RoleBotError> {
        match self {
            Authorization::Allowed => Ok(()),
            Authorization::Denied(Denial::NotAdmin) => Err(RoleBotError::NotAdmin(actor)),
            Authorization::Denied(Denial::WrongChannel { channel }) => {
                Err(RoleBotError::ChannelRestriction {
                    command: command.to_owned(),
                    channel,
                })
            }
        }
    }
}

pub fn is_admin(actor: &Actor, admin: &AdminIdentity) -> bool {
    match admin {
        AdminIdentity::Open => true,
        AdminIdentity::Role(role) => actor.is_administrator || actor.roles.contains(role),
        AdminIdentity::Unresolved(_) => actor.is_administrator,
    }
}

pub fn require_admin(actor: &Actor, admin: &AdminIdentity) -> Authorization {
    if is_admin(actor, admin) {
        Authorization::Allowed
    } else {
        Authorization::Denied(Denial::NotAdmin)
    }
}

/// Public commands are only accepted in the bot channel.  Private messages only affect the
/// sender and are always accepted.  Without a configured bot channel every channel is accepted.
pub fn check_channel_restriction(
    invocation: &InvocationContext,
    bot_channel: Option<&str>,
) -> Authorization {
    match (invocation, bot_channel) {
        (InvocationContext::Private, _) => Authorization::Allowed,
        (InvocationContext::Channel { .. }, None) => Authorization::Allowed,
        (InvocationContext::Channel { name }, Some(allowed)) if name == allowed => {
            Authorization::Allowed
        }
        (InvocationContext::Channel { name }, Some(_)) => {
            Authorization::Denied(Denial::WrongChannel {
                channel: name.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::LiveRole;

    const ADMIN_ROLE: RoleId = RoleId::new(100);

    fn actor(roles: &[u64], is_administrator: bool) -> Actor {
        Actor {
            user_id: UserId::new(1),
            name: "someone".to_owned(),
            roles: roles.iter().copied().map(RoleId::new).collect(),
            is_administrator,
        }
    }

    fn channel(name: &str) -> InvocationContext {
        InvocationContext::Channel {
            name: name.to_owned(),
        }
    }

    #[test]
    fn admin_identity_resolution() {
        let live = vec![LiveRole {
            id: ADMIN_ROLE,
            name: "Admins".to_owned(),
        }];
        let live = live.as_slice();

        assert_eq!(AdminIdentity::resolve(None, None, live), AdminIdentity::Open);
        assert_eq!(
            AdminIdentity::resolve(None, Some("Admins"), live),
            AdminIdentity::Role(ADMIN_ROLE)
        );
        assert_eq!(
            AdminIdentity::resolve(None, Some("Mods"), live),
            AdminIdentity::Unresolved("Mods".to_owned())
        );
        assert_eq!(
            AdminIdentity::resolve(Some(RoleId::new(7)), Some("Admins"), live),
            AdminIdentity::Role(RoleId::new(7))
        );
    }

    #[test]
    fn open_policy_admits_everyone() {
        assert!(is_admin(&actor(&[], false), &AdminIdentity::Open));
        assert!(is_admin(&actor(&[5, 6], false), &AdminIdentity::Open));
    }

    #[test]
    fn admin_role_or_permission_flag() {
        let admin = AdminIdentity::Role(ADMIN_ROLE);
        assert!(is_admin(&actor(&[100], false), &admin));
        assert!(is_admin(&actor(&[], true), &admin));
        assert!(!is_admin(&actor(&[5], false), &admin));
    }

    #[test]
    fn unresolved_admin_role_only_admits_administrators() {
        let admin = AdminIdentity::Unresolved("Admins".to_owned());
        assert!(!is_admin(&actor(&[100], false), &admin));
        assert!(is_admin(&actor(&[], true), &admin));
    }

    #[test]
    fn private_messages_are_always_allowed() {
        assert!(check_channel_restriction(&InvocationContext::Private, Some("bots")).is_allowed());
        assert!(check_channel_restriction(&InvocationContext::Private, None).is_allowed());
    }

    #[test]
    fn public_commands_only_in_bot_channel() {
        assert!(check_channel_restriction(&channel("bots"), Some("bots")).is_allowed());
        assert_eq!(
            check_channel_restriction(&channel("general"), Some("bots")),
            Authorization::Denied(Denial::WrongChannel {
                channel: "general".to_owned()
            })
        );
        assert!(!check_channel_restriction(&channel("Bots"), Some("bots")).is_allowed());
    }

    #[test]
    fn no_bot_channel_means_no_restriction() {
        assert!(check_channel_restriction(&channel("general"), None).is_allowed());
    }

    #[test]
    fn checks_compose_in_order() {
        let admin = AdminIdentity::Role(ADMIN_ROLE);
        let outsider = actor(&[], false);

        let auth = check_channel_restriction(&channel("general"), Some("bots"))
            .and_then(|| require_admin(&outsider, &admin));
        assert!(matches!(
            auth.into_result(outsider.user_id, "quit"),
            Err(RoleBotError::ChannelRestriction { .. })
        ));

        let auth = check_channel_restriction(&channel("bots"), Some("bots"))
            .and_then(|| require_admin(&outsider, &admin));
        assert!(matches!(
            auth.into_result(outsider.user_id, "quit"),
            Err(RoleBotError::NotAdmin(_))
        ));
    }
}
