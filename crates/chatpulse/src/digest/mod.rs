//! Digest of the X.com posts shared in the chat during the last 24 hours

mod extract;
mod render;

use crate::prelude::*;
use crate::{db, Ctx, Result};
use chrono::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub(crate) use extract::*;
pub(crate) use render::*;

#[derive(Deserialize, Clone, Default)]
pub(crate) struct Config {
    /// Posts the digest periodically when set. Otherwise the digest is
    /// posted only when it is triggered via HTTP.
    pub(crate) interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// No messages mention X.com or Twitter in the window
    NoPosts,

    /// Some messages mention X.com, but none of them contain a link to it
    NoValidLinks,

    Sent { posts_count: usize },
}

impl Outcome {
    pub(crate) fn message(self) -> &'static str {
        match self {
            Self::NoPosts => "No X.com posts found",
            Self::NoValidLinks => "No valid X.com links found",
            Self::Sent { .. } => "Consolidated X.com posts sent successfully",
        }
    }
}

/// Collects the links shared during the 24 hours before `now` and posts
/// them to the chat as a single message. Nothing is sent if there are none.
pub(crate) async fn consolidate(ctx: &Ctx, now: DateTime<Utc>) -> Result<Outcome> {
    let tg = ctx.tg()?;
    let store = ctx.store()?;

    let messages = store.link_messages_since(db::window_start(now)).await?;

    info!(messages = messages.len(), "Found messages mentioning X.com");

    if messages.is_empty() {
        return Ok(Outcome::NoPosts);
    }

    let posts: Vec<_> = messages
        .iter()
        .filter_map(ExtractedPost::from_message)
        .collect();

    if posts.is_empty() {
        return Ok(Outcome::NoValidLinks);
    }

    tg.send_digest(render_digest(&posts)).await?;

    Ok(Outcome::Sent {
        posts_count: posts.len(),
    })
}

/// Posts the digest every `period` forever. The first digest is posted
/// one `period` after the start. Failures don't stop the schedule.
pub(crate) async fn run_schedule(ctx: Arc<Ctx>, period: Duration) {
    info!(?period, "Starting the digest schedule");

    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);

    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let result = consolidate(&ctx, Utc::now())
            .with_duration_log("Scheduled digest run")
            .await;

        match result {
            Ok(outcome) => info!(?outcome, "{}", outcome.message()),
            Err(err) => error!(err = tracing_err(&err), "Scheduled digest failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::not_configured;
    use crate::testing::{link_message, FakeStore, FakeTg};
    use expect_test::expect;

    fn now() -> DateTime<Utc> {
        "2024-10-20T08:00:00Z".parse().unwrap()
    }

    async fn run(store: FakeStore) -> (Result<Outcome>, Arc<FakeStore>, Arc<FakeTg>) {
        let store = Arc::new(store);
        let tg = Arc::new(FakeTg::default());
        let ctx = Ctx::fake(store.clone(), tg.clone());
        (consolidate(&ctx, now()).await, store, tg)
    }

    #[test_log::test(tokio::test)]
    async fn no_messages() {
        let (outcome, store, tg) = run(FakeStore::default()).await;

        assert_eq!(outcome.unwrap(), Outcome::NoPosts);
        assert!(tg.sent.lock().is_empty());
        assert_eq!(
            *store.queried_since.lock(),
            ["2024-10-19T08:00:00Z".parse::<DateTime<Utc>>().unwrap()]
        );
    }

    #[test_log::test(tokio::test)]
    async fn no_valid_links() {
        let store = FakeStore {
            link_messages: vec![link_message("jane", "I love x.com so much")],
            ..Default::default()
        };

        let (outcome, _, tg) = run(store).await;

        assert_eq!(outcome.unwrap(), Outcome::NoValidLinks);
        assert!(tg.sent.lock().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn posts_count_excludes_dropped_messages() {
        let store = FakeStore {
            link_messages: vec![
                link_message("jane", "https://x.com/a/status/1"),
                link_message("john", "twitter.com is down again"),
                link_message(
                    "kate",
                    "check this out https://twitter.com/u/status/2 thoughts?",
                ),
            ],
            ..Default::default()
        };

        let (outcome, _, tg) = run(store).await;

        assert_eq!(outcome.unwrap(), Outcome::Sent { posts_count: 2 });

        let sent = tg.sent.lock();
        assert_eq!(sent.len(), 1);

        expect![[r#"
            🐦 *X.com Posts from the Last 24 Hours*

            Found 2 posts shared by the community:

            1. *@jane* (Oct 19, 02:30 PM)
               🔗 https://x.com/a/status/1

            2. *@kate* (Oct 19, 02:30 PM)
               _"check this out  thoughts?"_
               🔗 https://twitter.com/u/status/2

            ---
            _This is an automated summary posted every 12 hours_ 📊"#]]
        .assert_eq(&sent[0]);
    }

    #[test_log::test(tokio::test)]
    async fn missing_telegram_config_is_checked_before_the_store() {
        let store = Arc::new(FakeStore::default());
        let ctx = Ctx {
            tg: Err(not_configured!("TELEGRAM_CHAT_ID")),
            ..Ctx::fake(store.clone(), Default::default())
        };

        let err = consolidate(&ctx, now()).await.unwrap_err();

        assert_eq!(err.message(), "TELEGRAM_CHAT_ID not configured");
        assert!(store.queried_since.lock().is_empty());
    }
}
