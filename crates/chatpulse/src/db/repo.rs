use super::schema::{Messages, TelegramUsers};
use super::{metered, ChatStore, DbError, LinkMessage, LinkMessageRecord, TgUser};
use crate::{err, Result};
use async_trait::async_trait;
use chrono::prelude::*;
use sea_query::extension::postgres::PgExpr;
use sea_query::{
    Cond, Expr, Func, NullOrdering, Order, PostgresQueryBuilder, Query, SelectStatement,
};
use sea_query_binder::SqlxBinder;
use std::any::type_name;
use uuid::Uuid;

/// Substrings that mark a message as one that shares a post from X.com.
/// The match is case-insensitive.
const LINK_PATTERNS: &[&str] = &["%x.com%", "%twitter.com%"];

pub(crate) struct PgChatStore {
    db: sqlx::PgPool,
}

impl PgChatStore {
    pub(crate) fn new(db: sqlx::PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChatStore for PgChatStore {
    async fn link_messages_since(&self, since: DateTime<Utc>) -> Result<Vec<LinkMessage>> {
        let (sql, values) = link_messages_query(since).build_sqlx(PostgresQueryBuilder);

        metered("link_messages_since", async {
            let records: Vec<LinkMessageRecord> = sqlx::query_as_with(&sql, values)
                .fetch_all(&self.db)
                .await?;

            Ok(records.into_iter().map(LinkMessage::from).collect())
        })
        .await
    }

    async fn users_by_activity(&self) -> Result<Vec<TgUser>> {
        let (sql, values) = users_query().build_sqlx(PostgresQueryBuilder);

        metered("users_by_activity", async {
            let users: Vec<TgUser> = sqlx::query_as_with(&sql, values)
                .fetch_all(&self.db)
                .await?;

            Ok(users)
        })
        .await
    }

    async fn count_user_messages_since(&self, user: Uuid, since: DateTime<Utc>) -> Result<u64> {
        let (sql, values) = message_count_query(user, since).build_sqlx(PostgresQueryBuilder);

        metered("count_user_messages_since", async {
            let count: i64 = sqlx::query_scalar_with(&sql, values)
                .fetch_one(&self.db)
                .await?;

            u64::try_from(count).map_err(|source| {
                err!(DbError::Deserialize {
                    source: Box::new(source),
                    app_ty: type_name::<u64>(),
                    db_ty: type_name::<i64>(),
                    db_val: count.to_string(),
                })
            })
        })
        .await
    }
}

fn link_messages_query(since: DateTime<Utc>) -> SelectStatement {
    Query::select()
        .columns([
            (Messages::Table, Messages::MessageText),
            (Messages::Table, Messages::CreatedAt),
        ])
        .columns([
            (TelegramUsers::Table, TelegramUsers::Username),
            (TelegramUsers::Table, TelegramUsers::FirstName),
        ])
        .from(Messages::Table)
        .inner_join(
            TelegramUsers::Table,
            Expr::col((Messages::Table, Messages::TelegramUserId))
                .equals((TelegramUsers::Table, TelegramUsers::Id)),
        )
        .cond_where(
            Cond::all()
                .add(Expr::col((Messages::Table, Messages::CreatedAt)).gte(since))
                .add(mentions_link()),
        )
        .order_by((Messages::Table, Messages::CreatedAt), Order::Desc)
        .to_owned()
}

fn users_query() -> SelectStatement {
    Query::select()
        .columns([
            TelegramUsers::Id,
            TelegramUsers::FirstName,
            TelegramUsers::Username,
        ])
        .from(TelegramUsers::Table)
        .order_by_with_nulls(
            TelegramUsers::LastActiveAt,
            Order::Desc,
            NullOrdering::Last,
        )
        .to_owned()
}

fn message_count_query(user: Uuid, since: DateTime<Utc>) -> SelectStatement {
    Query::select()
        .expr(Func::count(Expr::col(Messages::CreatedAt)))
        .from(Messages::Table)
        .and_where(Expr::col(Messages::TelegramUserId).eq(user))
        .and_where(Expr::col(Messages::CreatedAt).gte(since))
        .to_owned()
}

fn mentions_link() -> Cond {
    LINK_PATTERNS.iter().fold(Cond::any(), |cond, &pattern| {
        cond.add(Expr::col((Messages::Table, Messages::MessageText)).ilike(pattern))
    })
}
