use crate::{err_ctx, Result};
use serde::de::DeserializeOwned;
use std::any::type_name;

/// Parses the body of an incoming HTTP request.
pub(crate) fn from_json_slice<T: DeserializeOwned>(input: &[u8]) -> Result<T> {
    serde_json::from_slice(input).map_err(err_ctx!(DeserializeError::Json {
        target_ty: type_name::<T>(),
    }))
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum DeserializeError {
    #[error("Failed to parse JSON as `{target_ty}`: {source}")]
    Json {
        target_ty: &'static str,
        source: serde_json::Error,
    },
}
