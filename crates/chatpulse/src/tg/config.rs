use serde::Deserialize;
use teloxide::types::ChatId;

#[derive(Deserialize, Clone, Default)]
pub(crate) struct Config {
    pub(crate) bot_token: Option<String>,

    /// The group where the digest is posted and whose members are counted
    pub(crate) chat_id: Option<ChatId>,

    /// Base URL of the Bot API server. Points to `https://api.telegram.org`
    /// when not set. Useful with a self-hosted Bot API server.
    pub(crate) api_url: Option<url::Url>,
}
