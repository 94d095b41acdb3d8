mod ai;
mod config;
mod ctx;
mod db;
mod digest;
mod error;
mod http;
mod leaderboard;
mod observability;
mod panel;
mod server;
mod tg;

#[cfg(test)]
mod testing;

pub mod util;

pub use crate::error::*;
pub use config::*;
pub use observability::*;
pub use panel::LeaderboardOptions;

pub(crate) use ctx::Ctx;

use std::sync::Arc;
use std::time::Duration;

#[allow(unused_imports)]
mod prelude {
    pub(crate) use crate::error::ResultExt as _;
    pub(crate) use crate::http::prelude::*;
    pub(crate) use crate::observability::logging::prelude::*;
    pub(crate) use crate::util::prelude::*;
}

/// Run the HTTP server with the jobs, and the digest schedule if it's enabled
pub async fn run(config: Config) -> Result {
    let ctx = Arc::new(Ctx::from_config(&config).await?);

    if let Some(secs) = config.digest.interval_secs {
        tokio::spawn(digest::run_schedule(ctx.clone(), Duration::from_secs(secs)));
    }

    server::run(ctx, &config.server).await
}

/// Print the leaderboard of the most active chat users to stdout
pub async fn show_leaderboard(config: Config, opts: LeaderboardOptions) -> Result {
    let ctx = Ctx::from_config(&config).await?;
    panel::show_leaderboard(&ctx, opts).await
}

/// Invoke the digest job of a running server at the given endpoint
pub async fn trigger_digest(endpoint: url::Url) -> Result {
    panel::trigger_digest(&http::create_client(), endpoint).await
}
