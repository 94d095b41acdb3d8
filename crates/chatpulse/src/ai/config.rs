use serde::Deserialize;
use url::Url;

#[derive(Deserialize, Clone)]
pub(crate) struct Config {
    pub(crate) api_key: Option<String>,

    /// Chat completions endpoint of the gateway
    #[serde(default = "default_url")]
    pub(crate) url: Url,

    #[serde(default = "default_model")]
    pub(crate) model: String,
}

fn default_url() -> Url {
    "https://ai.gateway.lovable.dev/v1/chat/completions"
        .parse()
        .expect("BUG: invalid default AI gateway URL")
}

fn default_model() -> String {
    "google/gemini-2.5-flash-image-preview".to_owned()
}
