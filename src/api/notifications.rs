//! Notification endpoints.

use serde_json::Value;
use std::sync::Arc;

use crate::client::{ApiClient, ApiRequest};
use crate::envelope::Envelope;
use crate::error::ClientResult;

const URL_PREFIX: &str = "/api/v1";

pub struct NotificationsApi {
    client: Arc<ApiClient>,
}

impl NotificationsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// All notifications for the signed-in user.
    pub async fn list(&self) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::get(format!("{}/notifications", URL_PREFIX)))
            .await
    }

    /// Mark notifications as read.
    pub async fn mark_read(&self, params: Value) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::patch(
                format!("{}/notifications", URL_PREFIX),
                Some(params),
            ))
            .await
    }

    /// Currently online users.
    pub async fn online_users(&self) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::get(format!("{}/online-users", URL_PREFIX)))
            .await
    }
}
