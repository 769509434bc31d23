//! Comment endpoints.

use serde_json::{json, Value};
use std::sync::Arc;

use crate::client::{ApiClient, ApiRequest};
use crate::envelope::Envelope;
use crate::error::ClientResult;

const URL_PREFIX: &str = "/api/v1";

pub struct CommentsApi {
    client: Arc<ApiClient>,
}

impl CommentsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn submit(&self, post_id: i64, comment: Value) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::post(
                format!("{}/posts/{}/comments", URL_PREFIX, post_id),
                Some(comment),
            ))
            .await
    }

    pub async fn list(&self, post_id: i64, page: u32) -> ClientResult<Envelope> {
        self.client
            .envelope(
                ApiRequest::get(format!("{}/posts/{}/comments/", URL_PREFIX, post_id))
                    .with_query("page", page),
            )
            .await
    }

    pub async fn replies(&self, parent_comment_id: i64, page: u32) -> ClientResult<Envelope> {
        self.client
            .envelope(
                ApiRequest::get(format!(
                    "{}/comments/{}/replies",
                    URL_PREFIX, parent_comment_id
                ))
                .with_query("page", page),
            )
            .await
    }

    /// Moderation queue, admin only.
    pub async fn list_all(&self, page: u32) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::get(format!("{}/comments", URL_PREFIX)).with_query("page", page))
            .await
    }

    /// Disable or restore a comment. `action` is `"disable"` or `"enable"`.
    pub async fn moderate(&self, comment_id: i64, action: &str) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::patch(
                format!("{}/comments/{}", URL_PREFIX, comment_id),
                Some(json!({ "action": action })),
            ))
            .await
    }
}
