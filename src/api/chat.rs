//! Chat history endpoints. Live messaging goes over the realtime channel.

use std::sync::Arc;

use crate::client::{ApiClient, ApiRequest};
use crate::envelope::Envelope;
use crate::error::ClientResult;

const URL_PREFIX: &str = "/api/v1";

pub struct ChatApi {
    client: Arc<ApiClient>,
}

impl ChatApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Paged message history for a conversation with the given user.
    pub async fn history(&self, user_id: &str, page: u32) -> ClientResult<Envelope> {
        self.client
            .envelope(
                ApiRequest::get(format!(
                    "{}/conversations/{}/messages",
                    URL_PREFIX, user_id
                ))
                .with_query("page", page),
            )
            .await
    }
}
