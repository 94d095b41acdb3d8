use super::response::JobError;
use crate::ai::CombineImages;
use crate::leaderboard::{self, LeaderboardRow};
use crate::prelude::*;
use crate::util::encoding;
use crate::{digest, tg, Ctx, ErrorKind, Result};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use bytes::Bytes;
use chrono::prelude::*;
use futures::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

type JobResult<T> = std::result::Result<Json<T>, JobError>;

/// Runs the job within its own span and records its outcome
async fn run_job<T: Send>(job: &'static str, fut: impl Future<Output = Result<T>> + Send) -> Result<T> {
    let result = fut
        .instrument(info_span!("job", job))
        .with_duration_log("Job finished")
        .await;

    let status = match &result {
        Ok(_) => "ok",
        Err(err) => {
            error!(job, err = tracing_err(err), "Job failed");
            "err"
        }
    };

    metrics::increment_counter!("jobs_total", "job" => job, "status" => status);

    result
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DigestResponse {
    ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    posts_count: Option<usize>,

    message: &'static str,
}

pub(super) async fn consolidate_x_posts(State(ctx): State<Arc<Ctx>>) -> JobResult<DigestResponse> {
    let outcome = run_job("consolidate_x_posts", digest::consolidate(&ctx, Utc::now())).await?;

    let posts_count = match outcome {
        digest::Outcome::Sent { posts_count } => Some(posts_count),
        digest::Outcome::NoPosts | digest::Outcome::NoValidLinks => None,
    };

    Ok(Json(DigestResponse {
        ok: true,
        posts_count,
        message: outcome.message(),
    }))
}

#[derive(Serialize)]
pub(super) struct MemberCountResponse {
    success: bool,
    count: u32,
}

pub(super) async fn get_chat_member_count(
    State(ctx): State<Arc<Ctx>>,
) -> JobResult<MemberCountResponse> {
    let count = run_job("get_chat_member_count", async {
        ctx.tg()?.member_count().await
    })
    .await
    .map_err(|err| match err.kind() {
        ErrorKind::Config { .. } => JobError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Missing TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID",
        ),
        ErrorKind::Tg { source } if tg::is_upstream_error(source) => JobError::new(
            StatusCode::BAD_GATEWAY,
            "Failed to fetch member count from Telegram",
        )
        .with_details(err.message()),
        _ => JobError::new(StatusCode::INTERNAL_SERVER_ERROR, "Unexpected error")
            .with_details(err.message()),
    })?;

    Ok(Json(MemberCountResponse {
        success: true,
        count,
    }))
}

#[derive(Serialize)]
pub(super) struct CombineImagesResponse {
    image: String,
}

pub(super) async fn combine_images(
    State(ctx): State<Arc<Ctx>>,
    body: Bytes,
) -> JobResult<CombineImagesResponse> {
    let image = run_job("combine_images", async {
        let input: CombineImages = encoding::from_json_slice(&body)?;
        ctx.ai()?.combine(input).await
    })
    .await?;

    Ok(Json(CombineImagesResponse { image }))
}

#[derive(Deserialize)]
pub(super) struct LeaderboardQuery {
    #[serde(default)]
    expanded: bool,
}

#[derive(Serialize)]
pub(super) struct LeaderboardResponse {
    users: Vec<LeaderboardRow>,
}

pub(super) async fn get_leaderboard(
    State(ctx): State<Arc<Ctx>>,
    Query(query): Query<LeaderboardQuery>,
) -> JobResult<LeaderboardResponse> {
    let users = run_job("leaderboard", async {
        leaderboard::build(ctx.store()?, Utc::now(), query.expanded).await
    })
    .await?;

    Ok(Json(LeaderboardResponse { users }))
}

#[derive(Serialize)]
pub(super) struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub(super) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
