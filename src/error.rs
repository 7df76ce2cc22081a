use crate::catalog::Category;
use serenity::all::UserId;

/// Failures a role command can end in.
///
/// Each variant maps to one way of reporting back to the invoker; see [`Feedback`].
#[derive(Debug, thiserror::Error)]
pub enum RoleBotError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("no {category} role named \"{name}\"")]
    RoleNotFound { category: Category, name: String },
    #[error("user {0} is not a member of the server")]
    UnresolvedMember(UserId),
    #[error("command \"{command}\" is not allowed in #{channel}")]
    ChannelRestriction { command: String, channel: String },
    #[error("user {0} is not an administrator")]
    NotAdmin(UserId),
    #[error("unknown command \"{0}\"")]
    UnknownCommand(String),
    #[error(transparent)]
    Platform(#[from] anyhow::Error),
}

/// How a failure is surfaced to whoever invoked the command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Log only, say nothing on Discord
    Silent,
    /// Mark the command as failed, e.g. with a ❌ reaction
    FailureMarker,
    /// Tell the invoker what went wrong in words
    Reply,
}

impl RoleBotError {
    pub fn feedback(&self) -> Feedback {
        match self {
            RoleBotError::ChannelRestriction { .. } => Feedback::Silent,
            RoleBotError::UnresolvedMember(_) => Feedback::Reply,
            RoleBotError::Config(_)
            | RoleBotError::RoleNotFound { .. }
            | RoleBotError::NotAdmin(_)
            | RoleBotError::UnknownCommand(_)
            | RoleBotError::Platform(_) => Feedback::FailureMarker,
        }
    }

    /// Text shown to the invoker when `feedback()` asks for words rather than a marker.
    pub fn user_message(&self) -> String {
        match self {
            RoleBotError::UnresolvedMember(_) => {
                "Could not get your user info. Are you on the server?".to_owned()
            }
            RoleBotError::RoleNotFound { category, name } if name == "*" => {
                format!("Pick a single {} role to add", category)
            }
            RoleBotError::Platform(_) => "Something went wrong, please try again later".to_owned(),
            other => other.to_string(),
        }
    }
}
