//! Image upload support endpoints.

use serde_json::json;
use std::sync::Arc;

use crate::client::{ApiClient, ApiRequest};
use crate::envelope::Envelope;
use crate::error::ClientResult;

const URL_PREFIX: &str = "/api/v1";

pub struct UploadApi {
    client: Arc<ApiClient>,
}

impl UploadApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Short-lived token for direct uploads to the object store.
    pub async fn upload_token(&self) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::get(format!("{}/files/token", URL_PREFIX)))
            .await
    }

    /// Delete a previously uploaded image from the object store.
    pub async fn delete_image(&self, bucket: &str, key: &str) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::delete(
                format!("{}/del_image", URL_PREFIX),
                Some(json!({ "bucket": bucket, "key": key })),
            ))
            .await
    }
}
