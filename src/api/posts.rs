//! Post feed endpoints.

use serde_json::Value;
use std::sync::Arc;

use crate::client::{ApiClient, ApiRequest};
use crate::envelope::Envelope;
use crate::error::ClientResult;

const URL_PREFIX: &str = "/api/v1";

pub struct PostsApi {
    client: Arc<ApiClient>,
}

impl PostsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// List posts for a feed tab. `per_page` is only sent when the caller
    /// wants to override the backend default (wide layouts show 9).
    pub async fn list(
        &self,
        page: u32,
        tab_name: &str,
        per_page: Option<u32>,
    ) -> ClientResult<Envelope> {
        let mut request = ApiRequest::get(format!("{}/posts", URL_PREFIX))
            .with_query("page", page)
            .with_query("tabName", tab_name);
        if let Some(per_page) = per_page {
            request = request.with_query("per_page", per_page);
        }
        self.client.envelope(request).await
    }

    pub async fn get(&self, id: i64) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::get(format!("{}/posts/{}", URL_PREFIX, id)))
            .await
    }

    pub async fn publish(&self, post: Value) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::post(format!("{}/posts", URL_PREFIX), Some(post)))
            .await
    }

    pub async fn edit(&self, id: i64, post: Value) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::patch(
                format!("{}/posts/{}", URL_PREFIX, id),
                Some(post),
            ))
            .await
    }

    pub async fn delete(&self, id: i64) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::delete(
                format!("{}/posts/{}", URL_PREFIX, id),
                None,
            ))
            .await
    }
}
