mod admin_channel;
mod catalog;
mod config;
mod context;
mod error;
mod event;
mod handler;
mod helper;
mod logging;
mod membership;
mod platform;
mod plugin;
mod policy;
mod reconcile;
mod version;
mod volatile_state;

use serenity::{all::GatewayIntents, Client};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Notify;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional path to the config file, otherwise the default location is used
    let cfg_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = crate::config::Config::load(cfg_path).await?;
    let token = cfg.token.clone();
    let version = crate::version::detect().await;
    log_internal!("Starting rolebot {}", version);

    let shutdown = Arc::new(Notify::new());
    let handler = handler::Handler::new(cfg, version, shutdown.clone());

    // Things we want discord to tell us about.
    let intents = GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&token, intents)
        .event_handler(handler)
        .await?;

    // Stop the event loop on `quit` or Ctrl-C
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown.notified() => {}
            _ = tokio::signal::ctrl_c() => log_internal!("Interrupted"),
        }
        shard_manager.shutdown_all().await;
    });

    log_internal!("Starting event loop");
    client.start().await?;
    log_internal!("Event loop ended");
    Ok(())
}
