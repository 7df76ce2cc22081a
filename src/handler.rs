use crate::{config::Config, context::Context, event::Event, volatile_state::VolatileState};
use serenity::all::{Interaction, Message, Ready};
use std::sync::{Arc, OnceLock};
use tokio::sync::Notify;

/// Discord event handler
pub struct Handler {
    cfg: Config,
    vstate: OnceLock<VolatileState>,
    version: String,
    shutdown: Arc<Notify>,
}

impl<'a> Handler {
    pub fn new(cfg: Config, version: String, shutdown: Arc<Notify>) -> Self {
        Self {
            cfg,
            vstate: OnceLock::new(),
            version,
            shutdown,
        }
    }

    fn ctx(&'a self, discord_ctx: &'a serenity::all::Context) -> Context<'a> {
        Context {
            cfg: &self.cfg,
            vstate: &self.vstate,
            version: &self.version,
            shutdown: &self.shutdown,
            http: &discord_ctx.http,
            cache_http: discord_ctx,
        }
    }
}

#[serenity::async_trait]
impl serenity::all::EventHandler for Handler {
    async fn ready(&self, discord_ctx: serenity::all::Context, ready: Ready) {
        Event::Ready(ready).handle(self.ctx(&discord_ctx)).await;
    }

    async fn message(&self, discord_ctx: serenity::all::Context, msg: Message) {
        Event::Message(msg).handle(self.ctx(&discord_ctx)).await;
    }

    async fn interaction_create(&self, discord_ctx: serenity::all::Context, interaction: Interaction) {
        Event::Interaction(interaction)
            .handle(self.ctx(&discord_ctx))
            .await;
    }
}
