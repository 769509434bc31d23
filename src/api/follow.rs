//! Follow graph endpoints.

use std::sync::Arc;

use crate::client::{ApiClient, ApiRequest};
use crate::envelope::Envelope;
use crate::error::ClientResult;

const URL_PREFIX: &str = "/api/v1";

pub struct FollowApi {
    client: Arc<ApiClient>,
}

impl FollowApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Users the given user follows, optionally filtered by name.
    pub async fn following(&self, username: &str, page: u32, name: &str) -> ClientResult<Envelope> {
        self.client
            .envelope(
                ApiRequest::get(format!("{}/users/{}/following", URL_PREFIX, username))
                    .with_query("page", page)
                    .with_query("name", name),
            )
            .await
    }

    /// Followers of the given user, optionally filtered by name.
    pub async fn followers(&self, username: &str, page: u32, name: &str) -> ClientResult<Envelope> {
        self.client
            .envelope(
                ApiRequest::get(format!("{}/users/{}/followers", URL_PREFIX, username))
                    .with_query("page", page)
                    .with_query("name", name),
            )
            .await
    }
}
