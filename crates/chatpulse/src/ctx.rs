use crate::ai::{AiClient, ImageCombiner};
use crate::db::{self, ChatStore, PgChatStore};
use crate::tg::{ChatGateway, TgClient};
use crate::{http, Config, ErrorKind, Result};
use std::sync::Arc;

/// Shared collaborators of the jobs. It is immutable once created.
///
/// A collaborator that lacks its configuration is stored as the error,
/// which is returned from every job that needs it.
pub(crate) struct Ctx {
    pub(crate) store: Result<Arc<dyn ChatStore>>,
    pub(crate) tg: Result<Arc<dyn ChatGateway>>,
    pub(crate) ai: Result<Arc<dyn ImageCombiner>>,
}

impl Ctx {
    pub(crate) async fn from_config(cfg: &Config) -> Result<Self> {
        let store = match db::init(&cfg.db).await {
            Ok(pool) => Ok(Arc::new(PgChatStore::new(pool)) as Arc<dyn ChatStore>),
            Err(err) if matches!(err.kind(), ErrorKind::Config { .. }) => Err(err),
            Err(err) => return Err(err),
        };

        let tg = TgClient::from_config(&cfg.tg)
            .map(|client| Arc::new(client) as Arc<dyn ChatGateway>);

        let ai = AiClient::from_config(&cfg.ai, http::create_client())
            .map(|client| Arc::new(client) as Arc<dyn ImageCombiner>);

        Ok(Self { store, tg, ai })
    }

    pub(crate) fn store(&self) -> Result<&dyn ChatStore> {
        self.store.as_deref().map_err(Clone::clone)
    }

    pub(crate) fn tg(&self) -> Result<&dyn ChatGateway> {
        self.tg.as_deref().map_err(Clone::clone)
    }

    pub(crate) fn ai(&self) -> Result<&dyn ImageCombiner> {
        self.ai.as_deref().map_err(Clone::clone)
    }
}
