//! In-memory collaborators for the tests

use crate::ai::{CombineImages, ImageCombiner};
use crate::db::{Author, ChatStore, LinkMessage, TgUser};
use crate::tg::ChatGateway;
use crate::{not_configured, Ctx, Error, Result};
use async_trait::async_trait;
use chrono::prelude::*;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Default)]
pub(crate) struct FakeStore {
    pub(crate) link_messages: Vec<LinkMessage>,
    pub(crate) users: Vec<TgUser>,
    pub(crate) message_counts: HashMap<Uuid, u64>,
    pub(crate) error: Option<Error>,
    pub(crate) queried_since: Mutex<Vec<DateTime<Utc>>>,
}

#[async_trait]
impl ChatStore for FakeStore {
    async fn link_messages_since(&self, since: DateTime<Utc>) -> Result<Vec<LinkMessage>> {
        self.queried_since.lock().push(since);
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        Ok(self.link_messages.clone())
    }

    async fn users_by_activity(&self) -> Result<Vec<TgUser>> {
        Ok(self.users.clone())
    }

    async fn count_user_messages_since(&self, user: Uuid, since: DateTime<Utc>) -> Result<u64> {
        self.queried_since.lock().push(since);
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        Ok(self.message_counts.get(&user).copied().unwrap_or_default())
    }
}

pub(crate) struct FakeTg {
    pub(crate) sent: Mutex<Vec<String>>,
    pub(crate) send_error: Option<Error>,
    pub(crate) member_count: Result<u32>,
}

impl Default for FakeTg {
    fn default() -> Self {
        Self {
            sent: Mutex::default(),
            send_error: None,
            member_count: Ok(0),
        }
    }
}

#[async_trait]
impl ChatGateway for FakeTg {
    async fn send_digest(&self, text: String) -> Result {
        if let Some(err) = &self.send_error {
            return Err(err.clone());
        }
        self.sent.lock().push(text);
        Ok(())
    }

    async fn member_count(&self) -> Result<u32> {
        self.member_count.clone()
    }
}

pub(crate) struct FakeAi {
    pub(crate) inputs: Mutex<Vec<CombineImages>>,
    pub(crate) image: Result<String>,
}

#[async_trait]
impl ImageCombiner for FakeAi {
    async fn combine(&self, input: CombineImages) -> Result<String> {
        self.inputs.lock().push(input);
        self.image.clone()
    }
}

impl Ctx {
    pub(crate) fn fake(store: Arc<FakeStore>, tg: Arc<FakeTg>) -> Self {
        Self {
            store: Ok(store),
            tg: Ok(tg),
            ai: Err(not_configured!("AI_GATEWAY_API_KEY")),
        }
    }
}

pub(crate) fn user(first_name: &str) -> TgUser {
    TgUser {
        id: Uuid::new_v4(),
        first_name: Some(first_name.to_owned()),
        username: None,
    }
}

pub(crate) fn link_message(username: &str, text: &str) -> LinkMessage {
    LinkMessage {
        text: text.to_owned(),
        created_at: "2024-10-19T14:30:00Z".parse().unwrap(),
        author: Author {
            username: Some(username.to_owned()),
            first_name: None,
        },
    }
}
