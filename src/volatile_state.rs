use crate::{catalog::RoleCatalog, policy::AdminIdentity};
use serenity::all::GuildId;

/// State which is lost across sessions.
///
/// Built once when the connection to Discord first becomes ready and read-only afterwards.  A
/// restart is the only way to pick up role changes made on the server.
pub struct VolatileState {
    pub guild_id: GuildId,
    pub catalog: RoleCatalog,
    pub admin: AdminIdentity,
}
