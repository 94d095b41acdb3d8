//! Ranking of the chat users by the number of messages in the last 24 hours

use crate::db::{self, ChatStore, TgUser};
use crate::prelude::*;
use crate::{Error, Result};
use chrono::prelude::*;
use futures::prelude::*;
use serde::Serialize;

/// Max number of message counting queries in flight at the same time
const MAX_CONCURRENT_COUNTS: usize = 8;

const TOP_LEN: usize = 10;
const EXPANDED_TOP_LEN: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct LeaderboardRow {
    /// Starts with 1
    pub(crate) rank: usize,
    pub(crate) name: String,
    pub(crate) messages: u64,

    /// Same as `messages` for now
    pub(crate) engagement: u64,
}

pub(crate) async fn build(
    store: &dyn ChatStore,
    now: DateTime<Utc>,
    expanded: bool,
) -> Result<Vec<LeaderboardRow>> {
    let since = db::window_start(now);

    let users = store.users_by_activity().await?;

    debug!(users = users.len(), "Counting messages of the users");

    let mut counted: Vec<(TgUser, u64)> = stream::iter(users)
        .map(|user| async move {
            let count = store.count_user_messages_since(user.id, since).await?;
            Ok::<_, Error>((user, count))
        })
        .buffered(MAX_CONCURRENT_COUNTS)
        .try_collect()
        .await?;

    // The sort is stable, so users with equal counts stay ordered by activity
    counted.sort_by(|(_, lhs), (_, rhs)| rhs.cmp(lhs));
    counted.truncate(if expanded { EXPANDED_TOP_LEN } else { TOP_LEN });

    let rows = counted
        .into_iter()
        .enumerate()
        .map(|(i, (user, messages))| LeaderboardRow {
            rank: i + 1,
            name: display_name(&user),
            messages,
            engagement: messages,
        })
        .collect();

    Ok(rows)
}

fn display_name(user: &TgUser) -> String {
    [&user.first_name, &user.username]
        .into_iter()
        .flatten()
        .find(|name| !name.is_empty())
        .cloned()
        .unwrap_or_else(|| "Anonymous".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::not_configured;
    use crate::testing::{user, FakeStore};
    use std::collections::HashMap;

    fn store_with_counts(counts: &[(&str, u64)]) -> FakeStore {
        let users: Vec<_> = counts.iter().map(|(name, _)| user(name)).collect();
        let message_counts: HashMap<_, _> = users
            .iter()
            .zip(counts)
            .map(|(user, (_, count))| (user.id, *count))
            .collect();

        FakeStore {
            users,
            message_counts,
            ..Default::default()
        }
    }

    fn ranking(rows: &[LeaderboardRow]) -> Vec<(usize, &str, u64)> {
        rows.iter()
            .map(|row| (row.rank, row.name.as_str(), row.messages))
            .collect()
    }

    #[test_log::test(tokio::test)]
    async fn sorted_by_message_count() {
        let store = store_with_counts(&[("Three", 3), ("Five", 5)]);

        let rows = build(&store, Utc::now(), false).await.unwrap();

        assert_eq!(ranking(&rows), [(1, "Five", 5), (2, "Three", 3)]);
        assert!(rows.iter().all(|row| row.engagement == row.messages));
    }

    #[test_log::test(tokio::test)]
    async fn equal_counts_keep_activity_order() {
        let store = store_with_counts(&[("A", 1), ("B", 2), ("C", 1)]);

        let rows = build(&store, Utc::now(), false).await.unwrap();

        assert_eq!(ranking(&rows), [(1, "B", 2), (2, "A", 1), (3, "C", 1)]);
    }

    #[test_log::test(tokio::test)]
    async fn truncation() {
        let counts: Vec<_> = (0..15).map(|i| ("user", i)).collect();
        let store = store_with_counts(&counts);

        let top = build(&store, Utc::now(), false).await.unwrap();
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].messages, 14);
        assert_eq!(top[9].rank, 10);

        let expanded = build(&store, Utc::now(), true).await.unwrap();
        assert_eq!(expanded.len(), 15);
    }

    #[test_log::test(tokio::test)]
    async fn counts_in_the_trailing_day() {
        let store = store_with_counts(&[("A", 1)]);
        let now = "2024-10-20T08:00:00Z".parse().unwrap();

        build(&store, now, false).await.unwrap();

        let expected: DateTime<Utc> = "2024-10-19T08:00:00Z".parse().unwrap();
        assert_eq!(*store.queried_since.lock(), [expected]);
    }

    #[test_log::test(tokio::test)]
    async fn failed_count_aborts_the_whole_board() {
        let store = FakeStore {
            error: Some(not_configured!("DATABASE_URL")),
            ..store_with_counts(&[("A", 1), ("B", 2)])
        };

        let err = build(&store, Utc::now(), false).await.unwrap_err();

        assert_eq!(err.message(), "DATABASE_URL not configured");
    }

    #[test]
    fn name_fallbacks() {
        let with_names = |first_name: Option<&str>, username: Option<&str>| TgUser {
            first_name: first_name.map(ToOwned::to_owned),
            username: username.map(ToOwned::to_owned),
            ..user("")
        };

        assert_eq!(display_name(&with_names(Some("Jane"), Some("jane"))), "Jane");
        assert_eq!(display_name(&with_names(None, Some("jane"))), "jane");
        assert_eq!(display_name(&with_names(Some(""), Some("jane"))), "jane");
        assert_eq!(display_name(&with_names(None, None)), "Anonymous");
    }
}
