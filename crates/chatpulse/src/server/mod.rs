//! HTTP surface of the jobs

mod handlers;
mod response;

use crate::prelude::*;
use crate::{Ctx, Result};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::HeaderName;
use axum::routing::{any, get};
use axum::Router;
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Deserialize, Clone)]
pub(crate) struct Config {
    #[serde(default = "default_addr")]
    pub(crate) addr: SocketAddr,
}

fn default_addr() -> SocketAddr {
    ([0, 0, 0, 0], 3000).into()
}

pub(crate) fn router(ctx: Arc<Ctx>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ]);

    // The jobs accept any HTTP method. `OPTIONS` requests are answered by
    // the CORS layer with an empty response.
    Router::new()
        .route("/consolidate-x-posts", any(handlers::consolidate_x_posts))
        .route("/get-chat-member-count", any(handlers::get_chat_member_count))
        .route("/combine-images", any(handlers::combine_images))
        .route("/leaderboard", get(handlers::get_leaderboard))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(ctx)
}

pub(crate) async fn run(ctx: Arc<Ctx>, cfg: &Config) -> Result {
    let listener = tokio::net::TcpListener::bind(cfg.addr)
        .await
        .fatal_ctx(|| format!("Failed to bind the HTTP server to {}", cfg.addr))?;

    info!(addr = %cfg.addr, "HTTP server is listening");

    axum::serve(listener, router(ctx))
        .await
        .fatal_ctx(|| "HTTP server has failed")
}
