use super::HttpClientError;
use crate::prelude::*;
use crate::{err, Result};
use async_trait::async_trait;
use easy_ext::ext;
use reqwest_middleware::RequestBuilder;
use serde::{de::DeserializeOwned, Serialize};

/// Image generation responses embed whole pictures as data URIs, so only
/// the head of a malformed body ends up in the logs.
const MAX_LOGGED_BODY_CHARS: usize = 2048;

#[ext(RequestBuilderJsonExt)]
#[async_trait]
pub(crate) impl RequestBuilder {
    async fn send_and_read_json<Req: Serialize + Send + Sync, Res: DeserializeOwned>(
        self,
        req: Req,
    ) -> Result<Res> {
        self.json(&req).read_json().await
    }

    async fn read_json<Res: DeserializeOwned>(self) -> Result<Res> {
        let response = self.try_send().await?;
        let path = response.url().path().to_owned();

        let bytes = response
            .bytes()
            .await
            .map_err(|source| err!(HttpClientError::ReadPayload { source }))?;

        serde_json::from_slice(&bytes).map_err(|source| {
            let body = String::from_utf8_lossy(&bytes);
            warn!(
                %path,
                body_len = bytes.len(),
                response_body = body_head(&body),
                "Bad JSON response"
            );
            err!(HttpClientError::UnexpectedResponseJsonShape { source })
        })
    }
}

fn body_head(body: &str) -> &str {
    match body.char_indices().nth(MAX_LOGGED_BODY_CHARS) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}
