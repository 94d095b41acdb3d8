use serde::Deserialize;

#[derive(Deserialize)]
pub(crate) struct Config {
    /// Postgres connection URL. The credentials may be part of the URL
    /// or supplied separately via `service_key`.
    pub(crate) url: Option<url::Url>,

    /// Password of the service role, overrides the one from the URL
    pub(crate) service_key: Option<String>,

    #[serde(default = "default_database_pool_size")]
    pub(crate) pool_size: u32,

    /// Apply the bundled migrations at startup. The schema is owned by
    /// the ingestion side, so this is meant for local development only.
    #[serde(default)]
    pub(crate) migrate: bool,
}

fn default_database_pool_size() -> u32 {
    // Managed Postgres instances are shared with the ingestion bot and the
    // dashboard, so we stay modest with the number of connections.
    10
}
