//! System log endpoints, admin only.

use serde_json::json;
use std::sync::Arc;

use crate::client::{ApiClient, ApiRequest};
use crate::envelope::Envelope;
use crate::error::ClientResult;

const URL_PREFIX: &str = "/api/v1";

pub struct LogApi {
    client: Arc<ApiClient>,
}

impl LogApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Paged system log entries.
    pub async fn list(&self, page: u32) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::get(format!("{}/logs", URL_PREFIX)).with_query("page", page))
            .await
    }

    /// Delete log entries by id.
    pub async fn delete(&self, ids: &[i64]) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::delete(
                format!("{}/logs", URL_PREFIX),
                Some(json!(ids)),
            ))
            .await
    }
}
