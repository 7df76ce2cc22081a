//! Miscellaneous convenience methods

use crate::{context::Context, policy::InvocationContext};
use anyhow::Result;
use serenity::all::{ChannelId, GuildId, ReactionType};

const SUCCESS_REACTION: &str = "\u{2705}"; // white heavy check mark
const FAILURE_REACTION: &str = "\u{274c}"; // cross mark

#[serenity::async_trait]
pub trait ChannelIdHelper {
    /// Where a command arriving in this channel was invoked
    async fn invocation_context(
        &self,
        ctx: &Context<'_>,
        guild_id: Option<GuildId>,
    ) -> InvocationContext;
}

#[serenity::async_trait]
impl ChannelIdHelper for ChannelId {
    async fn invocation_context(
        &self,
        ctx: &Context<'_>,
        guild_id: Option<GuildId>,
    ) -> InvocationContext {
        if guild_id.is_none() {
            return InvocationContext::Private;
        }

        // An unnamed channel can never be the bot channel
        let name = self.name(ctx.cache_http).await.unwrap_or_default();
        InvocationContext::Channel { name }
    }
}

#[serenity::async_trait]
pub trait MessageHelper {
    async fn invocation_context(&self, ctx: &Context<'_>) -> InvocationContext;
    async fn react_success(&self, ctx: &Context<'_>) -> Result<()>;
    async fn react_failure(&self, ctx: &Context<'_>) -> Result<()>;
}

#[serenity::async_trait]
impl MessageHelper for serenity::all::Message {
    async fn invocation_context(&self, ctx: &Context<'_>) -> InvocationContext {
        self.channel_id
            .invocation_context(ctx, self.guild_id)
            .await
    }

    async fn react_success(&self, ctx: &Context<'_>) -> Result<()> {
        let reaction = ReactionType::Unicode(SUCCESS_REACTION.to_owned());
        self.react(ctx.cache_http, reaction).await?;
        Ok(())
    }

    async fn react_failure(&self, ctx: &Context<'_>) -> Result<()> {
        let reaction = ReactionType::Unicode(FAILURE_REACTION.to_owned());
        self.react(ctx.cache_http, reaction).await?;
        Ok(())
    }
}

/// Prefix a user-facing result message with the success or failure marker
pub fn marked(success: bool, text: impl std::fmt::Display) -> String {
    let marker = if success {
        SUCCESS_REACTION
    } else {
        FAILURE_REACTION
    };
    format!("{} {}", marker, text)
}
