//! Telegram Bot API client bound to the community chat

mod config;

use crate::prelude::*;
use crate::{not_configured, Result};
use async_trait::async_trait;
use teloxide::adaptors::trace::{self, Trace};
use teloxide::payloads::setters::*;
use teloxide::prelude::*;
use teloxide::requests::Request;
use teloxide::types::{ChatId, ParseMode};
use teloxide::RequestError;

pub(crate) use config::*;

pub(crate) type Bot = Trace<teloxide::Bot>;

/// Outbound operations against the configured Telegram chat
#[async_trait]
pub(crate) trait ChatGateway: Send + Sync {
    /// Sends a Markdown message with link previews disabled
    async fn send_digest(&self, text: String) -> Result;

    async fn member_count(&self) -> Result<u32>;
}

pub(crate) struct TgClient {
    bot: Bot,
    chat_id: ChatId,
}

impl TgClient {
    /// Fails with a configuration error if either the bot token or the
    /// chat id is missing. No network requests are made here.
    pub(crate) fn from_config(cfg: &Config) -> Result<Self> {
        let Some(token) = &cfg.bot_token else {
            return Err(not_configured!("TELEGRAM_BOT_TOKEN"));
        };
        let Some(chat_id) = cfg.chat_id else {
            return Err(not_configured!("TELEGRAM_CHAT_ID"));
        };

        let mut bot = teloxide::Bot::with_client(token, teloxide::net::client_from_env());

        if let Some(api_url) = &cfg.api_url {
            bot = bot.set_api_url(api_url.clone());
        }

        let bot = bot.trace(trace::Settings::all());

        Ok(Self { bot, chat_id })
    }
}

#[async_trait]
impl ChatGateway for TgClient {
    async fn send_digest(&self, text: String) -> Result {
        // The digest uses the legacy Markdown syntax (`*bold*`, `_italic_`)
        #[allow(deprecated)]
        let parse_mode = ParseMode::Markdown;

        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(parse_mode)
            .disable_web_page_preview(true)
            .send()
            .with_duration_log("Sent the digest to Telegram")
            .await?;

        Ok(())
    }

    async fn member_count(&self) -> Result<u32> {
        let count = self
            .bot
            .get_chat_member_count(self.chat_id)
            .send()
            .with_duration_log("Fetched the chat member count")
            .await?;

        Ok(count)
    }
}

/// Returns `true` if the error came from Telegram itself: an `ok: false`
/// response, a response that couldn't be parsed, or a rate limit.
/// Transport failures don't count as such.
pub(crate) fn is_upstream_error(err: &RequestError) -> bool {
    !matches!(err, RequestError::Network(_) | RequestError::Io(_))
}
