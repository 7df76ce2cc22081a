//! Logging to the terminal with colors

use crate::{catalog::RoleDefinition, policy::Actor};
use serenity::all::Http;
use std::borrow::Cow;
use std::io::IsTerminal;
use std::sync::{Arc, LazyLock};

const DEFAULT: &str = "\x1b[0m";
const FG_BLUE: &str = "\x1b[38;5;33m";
const FG_CYAN: &str = "\x1b[36m";
const FG_GRAY: &str = "\x1b[90m";
const FG_GREEN: &str = "\x1b[32m";
const FG_MAGENTA: &str = "\x1b[35m";
const FG_ORANGE: &str = "\x1b[38;5;208m";
const FG_RED: &str = "\x1b[31m";
const FG_YELLOW: &str = "\x1b[33m";

/// Environment variable enabling `log_debug!` output
const DEBUG_ENV: &str = "ROLEBOT_DEBUG";

pub enum Color {
    Default,
    Event,
    Internal,
    Warning,
    Error,
    Debug,
    User,
    Channel,
    Guild,
    Role,
    Glue,
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        // Only print colors when printing to a terminal
        //
        // This won't change during the program's execution, so we can cache it.
        static STDOUT_IS_TERMINAL: LazyLock<bool> =
            LazyLock::new(|| std::io::stdout().is_terminal());

        if !*STDOUT_IS_TERMINAL {
            return Ok(());
        }

        write!(
            f,
            "{}",
            match self {
                Color::Default => DEFAULT,
                Color::Event => FG_YELLOW,
                Color::Internal => FG_MAGENTA,
                Color::Warning => FG_ORANGE,
                Color::Error => FG_RED,
                Color::Debug => FG_GRAY,
                Color::User => FG_GREEN,
                Color::Channel => FG_CYAN,
                Color::Guild => FG_BLUE,
                Color::Role => FG_ORANGE,
                Color::Glue => FG_GRAY,
            }
        )
    }
}

pub fn debug_enabled() -> bool {
    static DEBUG: LazyLock<bool> = LazyLock::new(|| std::env::var_os(DEBUG_ENV).is_some());
    *DEBUG
}

/// Shared body of the logging macros: a colored marker followed by the message.
#[doc(hidden)]
#[macro_export]
macro_rules! log_marked {
    ($marker:literal, $color:ident, $fmtstr:expr) => {{
        println!(
            concat!("{}", $marker, "{} ", $fmtstr),
            $crate::logging::Color::$color,
            $crate::logging::Color::Default
        )
    }};

    ($marker:literal, $color:ident, $fmtstr:expr, $($args:expr),* $(,)?) => {{
        println!(
            concat!("{}", $marker, "{} ", $fmtstr),
            $crate::logging::Color::$color,
            $crate::logging::Color::Default,
            $($args),*
        )
    }};
}

/// Something happened on Discord
#[macro_export]
macro_rules! log_event {
    ($($tt:tt)*) => {{
        $crate::log_marked!("*", Event, $($tt)*)
    }};
}

/// Something happened within the bot
#[macro_export]
macro_rules! log_internal {
    ($($tt:tt)*) => {{
        $crate::log_marked!("+", Internal, $($tt)*)
    }};
}

/// Recoverable problem, e.g. a user asking for a role which does not exist
#[macro_export]
macro_rules! log_warn {
    ($($tt:tt)*) => {{
        $crate::log_marked!("!", Warning, $($tt)*)
    }};
}

#[macro_export]
macro_rules! log_error {
    ($($tt:tt)*) => {{
        $crate::log_marked!("x", Error, $($tt)*)
    }};
}

/// Only printed when `ROLEBOT_DEBUG` is set
#[macro_export]
macro_rules! log_debug {
    ($($tt:tt)*) => {{
        if $crate::logging::debug_enabled() {
            $crate::log_marked!("-", Debug, $($tt)*)
        }
    }};
}

pub trait PrintColor {
    fn color(&self) -> String;
}

#[serenity::async_trait]
pub trait AsyncPrintColor {
    async fn color(&self, http: &Arc<Http>) -> String;
}

// Field separator
pub struct Glue;
impl PrintColor for Glue {
    fn color(&self) -> String {
        format!("{}{}{}", Color::Glue, ":", Color::Default)
    }
}

impl PrintColor for serenity::all::CurrentUser {
    fn color(&self) -> String {
        format!("{}{}{}", Color::User, self.name.as_str(), Color::Default)
    }
}

impl PrintColor for serenity::all::User {
    fn color(&self) -> String {
        format!("{}{}{}", Color::User, self.name.as_str(), Color::Default)
    }
}

impl PrintColor for Actor {
    fn color(&self) -> String {
        format!("{}{}{}", Color::User, self.name, Color::Default)
    }
}

impl PrintColor for RoleDefinition {
    fn color(&self) -> String {
        format!("{}{}{}", Color::Role, self.display_name, Color::Default)
    }
}

impl PrintColor for [RoleDefinition] {
    fn color(&self) -> String {
        if self.is_empty() {
            return "-".to_owned();
        }
        self.iter()
            .map(|role| role.color())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[serenity::async_trait]
impl AsyncPrintColor for serenity::all::ChannelId {
    async fn color(&self, http: &Arc<Http>) -> String {
        match self.name(http).await {
            Ok(name) => format!("{}{}{}", Color::Channel, name, Color::Default),
            Err(_) => format!(
                "{}{}{}",
                Color::Channel,
                "<unknown-channel>",
                Color::Default
            ),
        }
    }
}

#[serenity::async_trait]
impl AsyncPrintColor for Option<serenity::all::GuildId> {
    async fn color(&self, http: &Arc<Http>) -> String {
        let name = match self {
            Some(guild_id) => match guild_id.to_partial_guild(http).await {
                Ok(guild) => Cow::Owned(guild.name),
                Err(_) => Cow::Borrowed("<unknown-guild>"),
            },
            None => Cow::Borrowed("<direct-message>"),
        };

        format!("{}{}{}", Color::Guild, name, Color::Default)
    }
}
