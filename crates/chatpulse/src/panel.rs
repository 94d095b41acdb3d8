//! Terminal views of the dashboard: the leaderboard and the digest trigger

use crate::leaderboard::{self, LeaderboardRow};
use crate::prelude::*;
use crate::{http, Ctx, Result};
use chrono::prelude::*;
use serde::Deserialize;
use std::fmt::{self, Write};
use std::time::Duration;

const LEADERBOARD_REFRESH_PERIOD: Duration = Duration::from_secs(30);

pub struct LeaderboardOptions {
    /// Show up to 1000 users instead of the top 10
    pub expanded: bool,

    /// Refresh the leaderboard periodically until the process is stopped
    pub watch: bool,
}

pub(crate) async fn show_leaderboard(ctx: &Ctx, opts: LeaderboardOptions) -> Result {
    let store = ctx.store()?;

    println!("Loading users...");

    let mut interval = tokio::time::interval(LEADERBOARD_REFRESH_PERIOD);

    loop {
        interval.tick().await;

        let rows = leaderboard::build(store, Utc::now(), opts.expanded)
            .with_duration_log("Built the leaderboard")
            .await?;

        println!("{}", render_leaderboard(&rows));

        if !opts.watch {
            return Ok(());
        }
    }
}

fn render_leaderboard(rows: &[LeaderboardRow]) -> String {
    if rows.is_empty() {
        return "No users yet. Start chatting in your Telegram group!".to_owned();
    }

    let mut out = String::new();

    for row in rows {
        let initial = row.name.chars().next().unwrap_or('?');

        // Writing to a `String` never fails
        let _ = writeln!(
            out,
            "#{} [{initial}] {} - {} messages, {}% engagement",
            row.rank, row.name, row.messages, row.engagement,
        );
    }

    out.truncate(out.trim_end().len());
    out
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DigestReply {
    #[serde(default)]
    posts_count: Option<usize>,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Notice {
    Success { posts_count: usize },
    Info,
    Error,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { posts_count } => {
                let plural = if *posts_count == 1 { "" } else { "s" };
                write!(
                    f,
                    "✅ Posted summary of {posts_count} X.com post{plural} to Telegram! 🐦"
                )
            }
            Self::Info => f.write_str("ℹ️ No X.com posts found in the last 24 hours"),
            Self::Error => f.write_str("❌ Failed to consolidate X.com posts"),
        }
    }
}

/// Invokes the digest job over HTTP and prints the notice about its outcome.
/// Returns an error if the job has failed.
pub(crate) async fn trigger_digest(http: &http::Client, endpoint: url::Url) -> Result {
    println!("Consolidating...");

    let result = request_digest(http, endpoint).await;

    let notice = match &result {
        Ok(DigestReply {
            posts_count: Some(posts_count),
        }) if *posts_count > 0 => Notice::Success {
            posts_count: *posts_count,
        },
        Ok(_) => Notice::Info,
        Err(_) => Notice::Error,
    };

    println!("{notice}");

    result.map(drop)
}

async fn request_digest(http: &http::Client, endpoint: url::Url) -> Result<DigestReply> {
    let reply: DigestReply = http
        .post(endpoint)
        .read_json()
        .with_duration_log("Invoked the digest job")
        .await?;

    debug!(?reply, "Digest job responded");

    Ok(reply)
}
