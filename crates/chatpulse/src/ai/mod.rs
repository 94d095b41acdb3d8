//! Client of the AI gateway that merges two images into one

mod config;
mod model;

use crate::http::{self, HttpClientError};
use crate::prelude::*;
use crate::{err, not_configured, ErrorKind, Result};
use async_trait::async_trait;
use model::*;

pub(crate) use config::*;
pub(crate) use model::CombineImages;

#[async_trait]
pub(crate) trait ImageCombiner: Send + Sync {
    /// Returns the URL (or a data URI) of the combined image
    async fn combine(&self, input: CombineImages) -> Result<String>;
}

pub(crate) struct AiClient {
    http: http::Client,
    api_key: String,
    url: url::Url,
    model: String,
}

impl AiClient {
    pub(crate) fn from_config(cfg: &Config, http: http::Client) -> Result<Self> {
        let Some(api_key) = cfg.api_key.clone() else {
            return Err(not_configured!("AI_GATEWAY_API_KEY"));
        };

        Ok(Self {
            http,
            api_key,
            url: cfg.url.clone(),
            model: cfg.model.clone(),
        })
    }

    fn completion_request(&self, input: CombineImages) -> ChatCompletionRequest {
        let CombineImages {
            image_url1,
            image_url2,
            description,
        } = input;

        let text = format!(
            "Combine these two images: {description}. \
            Merge elements from both images to create a cohesive result."
        );

        let content = [image_url1, image_url2]
            .into_iter()
            .map(|url| ContentPart::ImageUrl {
                image_url: ImageUrl { url },
            });

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: Role::User,
                content: std::iter::once(ContentPart::Text { text })
                    .chain(content)
                    .collect(),
            }],
            modalities: vec![Modality::Image, Modality::Text],
        }
    }
}

#[async_trait]
impl ImageCombiner for AiClient {
    async fn combine(&self, input: CombineImages) -> Result<String> {
        info!(description = %input.description, "Combining images");

        let request = self.completion_request(input);

        let response: serde_json::Value = self
            .http
            .post(self.url.clone())
            .bearer_auth(&self.api_key)
            .send_and_read_json(request)
            .with_duration_log("AI gateway chat completion")
            .await
            .map_err(|err| {
                let ErrorKind::HttpClient {
                    source: HttpClientError::BadResponseStatusCode { status, body },
                } = err.kind()
                else {
                    return err;
                };
                warn!(%status, %body, "AI gateway responded with an error");
                err!(AiError::CombineFailed {
                    status: *status,
                    body: body.clone(),
                })
            })?;

        first_image(&response).ok_or_else(|| err!(AiError::NoImage))
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum AiError {
    #[error("AI combine failed")]
    CombineFailed {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("No image returned from AI")]
    NoImage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> AiClient {
        let cfg = Config {
            api_key: Some("test-key".to_owned()),
            url: format!("{}/v1/chat/completions", server.uri()).parse().unwrap(),
            model: "test-model".to_owned(),
        };
        AiClient::from_config(&cfg, http::create_client()).unwrap()
    }

    fn input() -> CombineImages {
        CombineImages {
            image_url1: "https://img.test/1.png".to_owned(),
            image_url2: "https://img.test/2.png".to_owned(),
            description: "a pony on the moon".to_owned(),
        }
    }

    async fn mock_completion(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }

    #[test_log::test(tokio::test)]
    async fn request_body_shape() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_json(json!({
                "model": "test-model",
                "messages": [{
                    "role": "user",
                    "content": [
                        {
                            "type": "text",
                            "text": "Combine these two images: a pony on the moon. \
                                Merge elements from both images to create a cohesive result.",
                        },
                        {
                            "type": "image_url",
                            "image_url": { "url": "https://img.test/1.png" },
                        },
                        {
                            "type": "image_url",
                            "image_url": { "url": "https://img.test/2.png" },
                        },
                    ],
                }],
                "modalities": ["image", "text"],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {
                        "images": [{ "image_url": { "url": "data:image/png;base64,AAAA" } }],
                    },
                }],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let image = test_client(&server).combine(input()).await.unwrap();

        assert_eq!(image, "data:image/png;base64,AAAA");
    }

    #[test_log::test(tokio::test)]
    async fn no_image_in_response() {
        let server = MockServer::start().await;

        mock_completion(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": "I can't do that" } }],
            })),
        )
        .await;

        let err = test_client(&server).combine(input()).await.unwrap_err();

        assert_eq!(err.message(), "No image returned from AI");
    }

    #[test_log::test(tokio::test)]
    async fn null_levels_in_response() {
        let responses = [
            json!({ "choices": [{ "message": { "content": "sorry", "images": null } }] }),
            json!({ "choices": [{ "message": null }] }),
            json!({ "choices": [null] }),
            json!({ "choices": null }),
            json!({ "choices": [{ "message": { "images": [{ "image_url": { "url": 42 } }] } }] }),
            json!({ "choices": [{ "message": { "images": [{ "image_url": { "url": "" } }] } }] }),
        ];

        for body in responses {
            let server = MockServer::start().await;
            mock_completion(&server, ResponseTemplate::new(200).set_body_json(&body)).await;

            let err = test_client(&server).combine(input()).await.unwrap_err();

            assert_eq!(err.message(), "No image returned from AI", "{body}");
        }
    }

    #[test_log::test(tokio::test)]
    async fn upstream_error() {
        let server = MockServer::start().await;

        mock_completion(
            &server,
            ResponseTemplate::new(429).set_body_string("rate limited"),
        )
        .await;

        let err = test_client(&server).combine(input()).await.unwrap_err();

        assert_eq!(err.message(), "AI combine failed");
    }

    #[test]
    fn missing_api_key() {
        let cfg = Config {
            api_key: None,
            url: "http://127.0.0.1/".parse().unwrap(),
            model: "test-model".to_owned(),
        };

        let err = AiClient::from_config(&cfg, http::create_client())
            .err()
            .unwrap();

        assert_eq!(err.message(), "AI_GATEWAY_API_KEY not configured");
    }
}
