//! Like endpoints for posts and comments.

use std::sync::Arc;

use crate::client::{ApiClient, ApiRequest};
use crate::envelope::Envelope;
use crate::error::ClientResult;

const URL_PREFIX: &str = "/api/v1";

pub struct PraiseApi {
    client: Arc<ApiClient>,
}

impl PraiseApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Toggle the current user's like on a post.
    pub async fn like_post(&self, post_id: i64) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::post(
                format!("{}/posts/{}/likes", URL_PREFIX, post_id),
                None,
            ))
            .await
    }

    /// Like count for a post.
    pub async fn post_likes(&self, post_id: i64) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::get(format!(
                "{}/posts/{}/likes",
                URL_PREFIX, post_id
            )))
            .await
    }

    /// Toggle the current user's like on a comment.
    pub async fn like_comment(&self, comment_id: i64) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::post(
                format!("{}/comments/{}/likes", URL_PREFIX, comment_id),
                None,
            ))
            .await
    }

    /// Ids of comments under a post the current user has already liked.
    pub async fn praised_comment_ids(&self, post_id: i64) -> ClientResult<Envelope> {
        self.client
            .envelope(
                ApiRequest::get(format!(
                    "{}/posts/{}/comments/praised",
                    URL_PREFIX, post_id
                ))
                .with_query("liked", "true"),
            )
            .await
    }
}
