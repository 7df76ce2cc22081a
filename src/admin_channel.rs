//! Operator commands sent to the bot in private messages.
//!
//! Only administrators get an answer.  Everyone else, and any text which is not a known
//! command, is ignored so the commands' existence is not advertised.

use crate::{
    error::RoleBotError,
    log_internal, log_warn,
    platform::Platform,
    policy::{require_admin, AdminIdentity},
};
use serenity::all::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    Quit,
    Version,
}

impl AdminCommand {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "quit" => Some(AdminCommand::Quit),
            "version" => Some(AdminCommand::Version),
            _ => None,
        }
    }
}

/// What the caller should do after a private message was dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminReply {
    Ignore,
    Reply(String),
    /// Acknowledge with the message, then shut the bot down
    Shutdown(String),
}

pub struct AdminChannel<'a> {
    pub admin: &'a AdminIdentity,
    pub version: &'a str,
}

impl AdminChannel<'_> {
    pub async fn dispatch<P: Platform + ?Sized>(
        &self,
        platform: &P,
        sender: UserId,
        text: &str,
    ) -> Result<AdminReply, RoleBotError> {
        let Some(actor) = platform.resolve_member(sender).await? else {
            log_warn!("Could not get user {} from the server", sender);
            return Ok(AdminReply::Reply(
                RoleBotError::UnresolvedMember(sender).user_message(),
            ));
        };

        if !require_admin(&actor, self.admin).is_allowed() {
            return Ok(AdminReply::Ignore);
        }

        let reply = match AdminCommand::parse(text) {
            Some(AdminCommand::Quit) => {
                log_internal!("Admin {} asked to quit", actor.name);
                AdminReply::Shutdown("Quitting".to_owned())
            }
            Some(AdminCommand::Version) => {
                log_internal!("Admin {} queried version information", actor.name);
                AdminReply::Reply(format!("Git commit: {}", self.version))
            }
            None => AdminReply::Ignore,
        };
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{platform::fake::FakePlatform, policy::Actor};
    use serenity::all::RoleId;

    const ADMIN: UserId = UserId::new(1);
    const PLAYER: UserId = UserId::new(2);
    const ADMIN_ROLE: RoleId = RoleId::new(10);

    fn platform() -> FakePlatform {
        FakePlatform::default()
            .with_member(Actor {
                user_id: ADMIN,
                name: "admin".to_owned(),
                roles: vec![ADMIN_ROLE],
                is_administrator: false,
            })
            .with_member(Actor {
                user_id: PLAYER,
                name: "player".to_owned(),
                roles: vec![],
                is_administrator: false,
            })
    }

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(AdminCommand::parse("QUIT"), Some(AdminCommand::Quit));
        assert_eq!(AdminCommand::parse(" Version\n"), Some(AdminCommand::Version));
        assert_eq!(AdminCommand::parse("quit now"), None);
        assert_eq!(AdminCommand::parse("!quit"), None);
    }

    #[tokio::test]
    async fn admin_gets_answers() {
        let admin = AdminIdentity::Role(ADMIN_ROLE);
        let channel = AdminChannel {
            admin: &admin,
            version: "abc123",
        };
        let platform = platform();

        assert_eq!(
            channel.dispatch(&platform, ADMIN, "version").await.unwrap(),
            AdminReply::Reply("Git commit: abc123".to_owned())
        );
        assert!(matches!(
            channel.dispatch(&platform, ADMIN, "Quit").await.unwrap(),
            AdminReply::Shutdown(_)
        ));
        assert_eq!(
            channel.dispatch(&platform, ADMIN, "hello").await.unwrap(),
            AdminReply::Ignore
        );
    }

    #[tokio::test]
    async fn non_admins_are_ignored() {
        let admin = AdminIdentity::Role(ADMIN_ROLE);
        let channel = AdminChannel {
            admin: &admin,
            version: "abc123",
        };

        assert_eq!(
            channel.dispatch(&platform(), PLAYER, "quit").await.unwrap(),
            AdminReply::Ignore
        );
    }

    #[tokio::test]
    async fn open_policy_answers_any_member() {
        let channel = AdminChannel {
            admin: &AdminIdentity::Open,
            version: "?",
        };

        assert_eq!(
            channel.dispatch(&platform(), PLAYER, "version").await.unwrap(),
            AdminReply::Reply("Git commit: ?".to_owned())
        );
    }

    #[tokio::test]
    async fn strangers_are_told_to_join() {
        let channel = AdminChannel {
            admin: &AdminIdentity::Open,
            version: "?",
        };

        let reply = channel
            .dispatch(&platform(), UserId::new(99), "version")
            .await
            .unwrap();
        assert_eq!(
            reply,
            AdminReply::Reply("Could not get your user info. Are you on the server?".to_owned())
        );
    }
}
