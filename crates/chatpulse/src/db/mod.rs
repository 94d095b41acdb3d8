mod cfg;
mod model;
mod repo;
mod schema;

use crate::prelude::*;
use crate::util::DynError;
use crate::{err_ctx, not_configured, Result};
use async_trait::async_trait;
use chrono::prelude::*;
use futures::prelude::*;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;
use uuid::Uuid;

pub(crate) use cfg::*;
pub(crate) use model::*;
pub(crate) use repo::*;

/// Read-only view of the chat history collected by the ingestion bot.
#[async_trait]
pub(crate) trait ChatStore: Send + Sync {
    /// Messages created at or after `since` that mention X.com or Twitter
    /// (case-insensitively), joined with their authors, newest first.
    async fn link_messages_since(&self, since: DateTime<Utc>) -> Result<Vec<LinkMessage>>;

    /// All users ordered by `last_active_at` descending, nulls last.
    async fn users_by_activity(&self) -> Result<Vec<TgUser>>;

    /// Number of messages of the given user created at or after `since`.
    async fn count_user_messages_since(&self, user: Uuid, since: DateTime<Utc>) -> Result<u64>;
}

/// Creates the connection pool. The connections are established lazily,
/// so a database outage doesn't prevent the service from starting, the
/// queries just fail until the database is back.
pub(crate) async fn init(cfg: &Config) -> Result<sqlx::PgPool> {
    let Some(url) = &cfg.url else {
        return Err(not_configured!("DATABASE_URL"));
    };

    let mut opts =
        PgConnectOptions::from_str(url.as_str()).map_err(err_ctx!(DbError::Connect))?;

    if let Some(service_key) = &cfg.service_key {
        opts = opts.password(service_key);
    }

    let pool = PgPoolOptions::new()
        .max_connections(cfg.pool_size)
        .connect_lazy_with(opts);

    if cfg.migrate {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .with_duration_log("Applied database migrations")
            .await
            .map_err(err_ctx!(DbError::Migrate))?;
    }

    Ok(pool)
}

async fn metered<T>(query: &'static str, fut: impl Future<Output = Result<T>> + Send) -> Result<T>
where
    T: Send,
{
    let (result, duration) = fut.with_duration().await;

    let result_label = if result.is_ok() { "ok" } else { "err" };

    metrics::histogram!(
        "db_query_duration_seconds",
        duration.as_secs_f64(),
        "query" => query,
        "result" => result_label,
    );

    debug!(query, duration = tracing_duration(duration), "Database query finished");

    result
}

/// Most likely unrecoverable errors from database communication layer
#[derive(Debug, thiserror::Error)]
pub(crate) enum DbError {
    #[error("Failed to connect to the database: {source}")]
    Connect { source: sqlx::Error },

    #[error("Failed to migrate the database: {source}")]
    Migrate { source: sqlx::migrate::MigrateError },

    #[error("Database query failed: {source}")]
    Query { source: sqlx::Error },

    #[error(
        "Failed to deserialize db value into app repr.\n\
        App type: {app_ty}\n\
        Db type: {db_ty}\n\
        Db value: {db_val}"
    )]
    Deserialize {
        source: Box<DynError>,
        app_ty: &'static str,
        db_ty: &'static str,
        db_val: String,
    },
}

impl From<sqlx::Error> for crate::ErrorKind {
    fn from(source: sqlx::Error) -> Self {
        Self::Db {
            source: DbError::Query { source },
        }
    }
}

/// Start of the trailing 24-hour window that ends at `now`
pub(crate) fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - chrono::Duration::hours(24)
}
