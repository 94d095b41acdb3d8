use crate::{ai, db, digest, server, tg};
use serde::de::DeserializeOwned;

/// Whole application configuration. It is loaded from the environment once
/// at startup and then handed out to the components that need it.
pub struct Config {
    pub(crate) db: db::Config,
    pub(crate) tg: tg::Config,
    pub(crate) ai: ai::Config,
    pub(crate) server: server::Config,
    pub(crate) digest: digest::Config,
}

impl Config {
    pub fn load_or_panic() -> Config {
        Self {
            db: from_env_or_panic("DATABASE_"),
            tg: from_env_or_panic("TELEGRAM_"),
            ai: from_env_or_panic("AI_GATEWAY_"),
            server: from_env_or_panic("SERVER_"),
            digest: from_env_or_panic("DIGEST_"),
        }
    }
}

/// Required configuration values are optional in the environment on purpose.
/// A job, that needs a missing value, fails with this error at the time it
/// is invoked, instead of preventing the whole service from starting.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigError {
    #[error("{var} not configured")]
    NotConfigured { var: &'static str },
}

pub(crate) fn from_env_or_panic<T: DeserializeOwned>(prefix: &str) -> T {
    envy::prefixed(prefix).from_env().unwrap_or_else(|err| {
        panic!(
            "BUG: Couldn't load config from environment for {}: {:#?}",
            std::any::type_name::<T>(),
            err
        );
    })
}
