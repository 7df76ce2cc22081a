use crate::{error::RoleBotError, log_internal};
use anyhow::{anyhow, Result};
use serde::{de::Error as _, Deserialize};
use serde_json::{Map, Value};
use serenity::all::{GuildId, RoleId};
use std::path::{Path, PathBuf};

const CONFIG_PATH_REL_HOME: &str = ".config/rolebot/config.toml";

/// Bot configuration
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub token: String,
    /// Nickname the bot gives itself on the server
    #[serde(default)]
    pub nick: Option<String>,
    /// Only channel in which public role commands are accepted
    #[serde(default)]
    pub bot_channel: Option<String>,
    #[serde(default)]
    pub admin_role: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub admin_role_id: Option<RoleId>,
    /// Server to manage.  Defaults to the first server the bot is in.
    #[serde(default, deserialize_with = "optional_id")]
    pub guild_id: Option<GuildId>,
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    #[serde(default, alias = "roles")]
    pub game_roles: Vec<RoleEntry>,
    #[serde(default, alias = "areas")]
    pub area_roles: Vec<RoleEntry>,
}

/// A configured role: either just the role's name on the server, or its id with some metadata
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(untagged)]
pub enum RoleEntry {
    Name(String),
    Record {
        id: RoleId,
        name: String,
        #[serde(default)]
        description: Option<String>,
    },
}

impl std::fmt::Display for RoleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            RoleEntry::Name(name) => write!(f, "\"{}\"", name),
            RoleEntry::Record { id, name, .. } => write!(f, "\"{}\" ({})", name, id),
        }
    }
}

/// Discord ids written as numbers or strings.  An empty string leaves the id unset.
fn optional_id<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: From<u64>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    let id = match Option::<RawId>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawId::Number(id)) => id,
        Some(RawId::Text(text)) if text.trim().is_empty() => return Ok(None),
        Some(RawId::Text(text)) => text
            .trim()
            .parse::<u64>()
            .map_err(|e| D::Error::custom(format!("invalid id \"{}\": {}", text, e)))?,
    };
    if id == 0 {
        return Err(D::Error::custom("ids cannot be 0"));
    }
    Ok(Some(T::from(id)))
}

fn default_command_prefix() -> String {
    "!".to_owned()
}

/// Supported configuration file formats, picked by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
    /// `key = value` and `key = [a, b, c]` lines
    Legacy,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Format::Toml,
            Some("json") => Format::Json,
            _ => Format::Legacy,
        }
    }
}

impl Config {
    fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|p| p.join(CONFIG_PATH_REL_HOME))
            .ok_or(anyhow!("Could not find home directory"))
    }

    /// Load the configuration from `path`, or from the default location if none is given.
    pub async fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };

        let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
            anyhow!(
                "Could not read configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        let config = Self::parse(&contents, Format::of(&path)).map_err(|e| {
            anyhow!(
                "Could not parse configuration at `{}`: {}",
                path.to_string_lossy(),
                e
            )
        })?;

        log_internal!("Config read from `{}`", path.to_string_lossy());
        Ok(config)
    }

    fn parse(contents: &str, format: Format) -> Result<Self, RoleBotError> {
        let config: Config = match format {
            Format::Toml => {
                toml::from_str(contents).map_err(|e| RoleBotError::Config(e.to_string()))?
            }
            Format::Json => serde_json::from_str(contents)
                .map_err(|e| RoleBotError::Config(e.to_string()))?,
            Format::Legacy => serde_json::from_value(parse_legacy(contents)?)
                .map_err(|e| RoleBotError::Config(e.to_string()))?,
        };

        config.normalized()
    }

    /// Treat empty strings as unset and reject unusable values
    fn normalized(mut self) -> Result<Self, RoleBotError> {
        fn non_empty(value: Option<String>) -> Option<String> {
            value
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
        }

        self.token = self.token.trim().to_owned();
        if self.token.is_empty() {
            return Err(RoleBotError::Config("`token` is empty".to_owned()));
        }
        self.command_prefix = self.command_prefix.trim().to_owned();
        if self.command_prefix.is_empty() {
            return Err(RoleBotError::Config("`command_prefix` is empty".to_owned()));
        }

        self.nick = non_empty(self.nick);
        self.bot_channel = non_empty(self.bot_channel.map(|c| c.trim_start_matches('#').to_owned()));
        self.admin_role = non_empty(self.admin_role);

        let is_blank = |entry: &RoleEntry| matches!(entry, RoleEntry::Name(name) if name.trim().is_empty());
        self.game_roles.retain(|entry| !is_blank(entry));
        self.area_roles.retain(|entry| !is_blank(entry));

        Ok(self)
    }
}

/// Translate `key = value` lines into a document serde can read.
///
/// Blank lines and lines starting with `#` are skipped.  Any other line which is not a
/// `key = value` pair fails the whole file.
fn parse_legacy(contents: &str) -> Result<Value, RoleBotError> {
    let mut document = Map::new();

    for (line_no, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let invalid = |reason: &str| {
            RoleBotError::Config(format!("invalid line {}: {}", line_no + 1, reason))
        };

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| invalid("expected `key = value`"))?;
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() {
            return Err(invalid("missing key"));
        }

        let value = match value.strip_prefix('[') {
            Some(list) => {
                let list = list
                    .strip_suffix(']')
                    .ok_or_else(|| invalid("list is missing its closing `]`"))?;
                Value::Array(
                    list.split(',')
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(|item| Value::String(item.to_owned()))
                        .collect(),
                )
            }
            None => Value::String(value.to_owned()),
        };

        if document.insert(key.to_owned(), value).is_some() {
            return Err(invalid(&format!("`{}` is set twice", key)));
        }
    }

    Ok(Value::Object(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn legacy_format() {
        let config = Config::parse(
            "# BemaniFi\n\
             token = abc123\n\
             nick = BemaniBot\n\
             bot_channel = bot-commands\n\
             admin_role =\n\
             \n\
             roles = [IIDX, Sound Voltex, DDR]\n\
             areas = [Helsinki, Tampere]\n",
            Format::Legacy,
        )
        .unwrap();

        assert_eq!(config.token, "abc123");
        assert_eq!(config.nick.as_deref(), Some("BemaniBot"));
        assert_eq!(config.bot_channel.as_deref(), Some("bot-commands"));
        assert_eq!(config.admin_role, None);
        assert_eq!(config.command_prefix, "!");
        assert_eq!(
            config.game_roles,
            vec![
                RoleEntry::Name("IIDX".to_owned()),
                RoleEntry::Name("Sound Voltex".to_owned()),
                RoleEntry::Name("DDR".to_owned()),
            ]
        );
        assert_eq!(config.area_roles.len(), 2);
    }

    #[test]
    fn legacy_format_fails_fast() {
        let err = Config::parse("token = abc\nthis is not a pair\n", Format::Legacy).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{}", err);

        let err = Config::parse("token = abc\nroles = [a, b\n", Format::Legacy).unwrap_err();
        assert!(err.to_string().contains("closing"), "{}", err);

        assert!(Config::parse("token = a\ntoken = b\n", Format::Legacy).is_err());
    }

    #[test]
    fn blank_ids_are_unset() {
        let config = Config::parse(
            "token = abc\nadmin_role_id =\nguild_id =\n",
            Format::Legacy,
        )
        .unwrap();
        assert_eq!(config.admin_role_id, None);
        assert_eq!(config.guild_id, None);

        let config = Config::parse(
            r#"{"token": "abc", "admin_role_id": "", "guild_id": " "}"#,
            Format::Json,
        )
        .unwrap();
        assert_eq!(config.admin_role_id, None);
        assert_eq!(config.guild_id, None);

        let config = Config::parse(
            r#"{"token": "abc", "admin_role_id": null, "guild_id": 1234}"#,
            Format::Json,
        )
        .unwrap();
        assert_eq!(config.admin_role_id, None);
        assert_eq!(config.guild_id, Some(GuildId::new(1234)));
    }

    #[test]
    fn malformed_ids_are_rejected() {
        let err = Config::parse("token = abc\nadmin_role_id = mods\n", Format::Legacy).unwrap_err();
        assert!(err.to_string().contains("invalid id"), "{}", err);
        assert!(Config::parse("token = abc\nguild_id = 0\n", Format::Legacy).is_err());
    }

    #[test]
    fn empty_list_is_empty() {
        let config = Config::parse("token = abc\nareas = []\n", Format::Legacy).unwrap();
        assert!(config.area_roles.is_empty());
    }

    #[test]
    fn json_records() {
        let config = Config::parse(
            r#"{
                "token": "abc",
                "admin_role_id": "445566",
                "game_roles": [
                    {"id": "1001", "name": "IIDX", "description": "beatmania IIDX"},
                    "DDR"
                ],
                "area_roles": [{"id": 2002, "name": "Helsinki"}]
            }"#,
            Format::Json,
        )
        .unwrap();

        assert_eq!(config.admin_role_id, Some(RoleId::new(445566)));
        assert_eq!(
            config.game_roles[0],
            RoleEntry::Record {
                id: RoleId::new(1001),
                name: "IIDX".to_owned(),
                description: Some("beatmania IIDX".to_owned()),
            }
        );
        assert_eq!(config.game_roles[1], RoleEntry::Name("DDR".to_owned()));
        assert_eq!(
            config.area_roles[0],
            RoleEntry::Record {
                id: RoleId::new(2002),
                name: "Helsinki".to_owned(),
                description: None,
            }
        );
    }

    #[test]
    fn toml_format() {
        let config = Config::parse(
            r##"
            token = "abc"
            bot_channel = "#bots"
            command_prefix = ";"
            guild_id = "1234"

            game_roles = ["IIDX"]

            [[area_roles]]
            id = "2002"
            name = "Helsinki"
            "##,
            Format::Toml,
        )
        .unwrap();

        assert_eq!(config.bot_channel.as_deref(), Some("bots"));
        assert_eq!(config.command_prefix, ";");
        assert_eq!(config.guild_id, Some(GuildId::new(1234)));
        assert_eq!(config.game_roles, vec![RoleEntry::Name("IIDX".to_owned())]);
        assert_eq!(config.area_roles.len(), 1);
    }

    #[test]
    fn token_is_required() {
        assert!(Config::parse("nick = bot\n", Format::Legacy).is_err());
        assert!(Config::parse("token =\n", Format::Legacy).is_err());
    }

    #[tokio::test]
    async fn load_picks_format_from_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"token": "abc", "nick": "RoleBot"}}"#).unwrap();

        let config = Config::load(Some(file.path().to_path_buf())).await.unwrap();
        assert_eq!(config.nick.as_deref(), Some("RoleBot"));
    }

    #[tokio::test]
    async fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(dir.path().join("bemani.conf")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Could not read configuration"));
    }
}
