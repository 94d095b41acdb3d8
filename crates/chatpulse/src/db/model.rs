use chrono::prelude::*;
use uuid::Uuid;

/// The part of a chat member's profile the leaderboard shows
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct TgUser {
    pub(crate) id: Uuid,
    pub(crate) first_name: Option<String>,
    pub(crate) username: Option<String>,
}

/// Names of the message's author as they are stored in the database
#[derive(Debug, Clone, Default)]
pub(crate) struct Author {
    pub(crate) username: Option<String>,
    pub(crate) first_name: Option<String>,
}

/// A message that mentions a link, together with its author
#[derive(Debug, Clone)]
pub(crate) struct LinkMessage {
    pub(crate) text: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) author: Author,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct LinkMessageRecord {
    pub(crate) message_text: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) username: Option<String>,
    pub(crate) first_name: Option<String>,
}

impl From<LinkMessageRecord> for LinkMessage {
    fn from(record: LinkMessageRecord) -> Self {
        let LinkMessageRecord {
            message_text,
            created_at,
            username,
            first_name,
        } = record;

        Self {
            text: message_text,
            created_at,
            author: Author {
                username,
                first_name,
            },
        }
    }
}
