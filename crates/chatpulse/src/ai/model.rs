use serde::{Deserialize, Serialize};

/// Body of the `combine-images` request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CombineImages {
    pub(crate) image_url1: String,
    pub(crate) image_url2: String,
    pub(crate) description: String,
}

#[derive(Serialize)]
pub(super) struct ChatCompletionRequest {
    pub(super) model: String,
    pub(super) messages: Vec<ChatMessage>,
    pub(super) modalities: Vec<Modality>,
}

#[derive(Serialize)]
pub(super) struct ChatMessage {
    pub(super) role: Role,
    pub(super) content: Vec<ContentPart>,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub(super) enum Role {
    User,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub(super) enum Modality {
    Image,
    Text,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(super) enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
pub(super) struct ImageUrl {
    pub(super) url: String,
}

/// Path to the first generated image in a chat completion response.
/// Any level of it may be missing or `null`.
const FIRST_IMAGE_POINTER: &str = "/choices/0/message/images/0/image_url/url";

/// URL or a data URI of the first generated image
pub(super) fn first_image(response: &serde_json::Value) -> Option<String> {
    response
        .pointer(FIRST_IMAGE_POINTER)
        .and_then(serde_json::Value::as_str)
        .filter(|url| !url.is_empty())
        .map(ToOwned::to_owned)
}
