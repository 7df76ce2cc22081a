use crate::{config::Config, volatile_state::VolatileState};
use std::sync::{Arc, OnceLock};
use tokio::sync::Notify;

/// Collection of data that is shared across events
pub struct Context<'a> {
    // Rolebot's own context types
    pub cfg: &'a Config,
    pub vstate: &'a OnceLock<VolatileState>,
    pub version: &'a str,
    pub shutdown: &'a Notify,
    // Discord/Serenity context types
    pub http: &'a Arc<serenity::all::Http>,
    pub cache_http: &'a CacheHttp,
}

/// Many Serenity functions take a `impl CacheHttp` in order to first check the cache if the item
/// is available and fall back to an http request otherwise.  The most readily available type that
/// impl's this is named very differently in a way that could be confusing, and so we alias it.
pub type CacheHttp = serenity::all::Context;

impl Context<'_> {
    /// Server state, available once the connection to Discord is ready
    pub fn session(&self) -> Option<&VolatileState> {
        self.vstate.get()
    }
}
