//! User profile, tag, and avatar endpoints.

use serde_json::Value;
use std::sync::Arc;

use crate::client::{ApiClient, ApiRequest};
use crate::envelope::Envelope;
use crate::error::ClientResult;

const URL_PREFIX: &str = "/api/v1";

pub struct UserApi {
    client: Arc<ApiClient>,
}

impl UserApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Profile of a user by id.
    pub async fn get(&self, user_id: i64) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::get(format!("{}/users/{}", URL_PREFIX, user_id)))
            .await
    }

    /// Paged posts authored by a user.
    pub async fn posts(&self, username: &str, page: u32) -> ClientResult<Envelope> {
        self.client
            .envelope(
                ApiRequest::get(format!("{}/users/{}/posts", URL_PREFIX, username))
                    .with_query("page", page),
            )
            .await
    }

    /// Start following a user.
    pub async fn follow(&self, username: &str) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::post(
                format!("{}/users/{}/follow", URL_PREFIX, username),
                None,
            ))
            .await
    }

    /// Stop following a user.
    pub async fn unfollow(&self, username: &str) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::delete(
                format!("{}/users/{}/follow", URL_PREFIX, username),
                None,
            ))
            .await
    }

    /// Edit the user's own profile fields.
    pub async fn edit(&self, user_id: i64, fields: Value) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::patch(
                format!("{}/users/{}", URL_PREFIX, user_id),
                Some(fields),
            ))
            .await
    }

    /// Edit any user's profile, admin only. `profile` must carry the target
    /// user's `id`.
    pub async fn edit_profile_admin(&self, user_id: i64, profile: Value) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::post(
                format!("{}/edit-profile/{}", URL_PREFIX, user_id),
                Some(profile),
            ))
            .await
    }

    /// Replace the user's interest tags.
    pub async fn set_tags(&self, user_id: i64, tags: Value) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::post(
                format!("{}/users/{}/tags", URL_PREFIX, user_id),
                Some(tags),
            ))
            .await
    }

    /// The shared tag catalogue.
    pub async fn tags(&self) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::get(format!("{}/tags", URL_PREFIX)))
            .await
    }

    /// Add entries to the shared tag catalogue.
    pub async fn update_tags(&self, tags: Value) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::post(
                format!("{}/tags", URL_PREFIX),
                Some(tags),
            ))
            .await
    }

    /// Store the user's avatar image location.
    pub async fn save_image(&self, user_id: i64, image: Value) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::post(
                format!("{}/users/{}/image", URL_PREFIX, user_id),
                Some(image),
            ))
            .await
    }

    /// List a directory of selectable images (avatars, profile backgrounds)
    /// from the object store.
    pub async fn list_images(
        &self,
        prefix: &str,
        page: u32,
        page_size: u32,
    ) -> ClientResult<Envelope> {
        self.client
            .envelope(
                ApiRequest::get(format!("{}/dir_name", URL_PREFIX))
                    .with_query("prefix", prefix)
                    .with_query("currentPage", page)
                    .with_query("pageSize", page_size)
                    .with_query("completeUrl", 1),
            )
            .await
    }
}
