//! Authentication endpoints.

use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::client::{ApiClient, ApiRequest};
use crate::envelope::Envelope;
use crate::error::{ClientResult, NetworkError};
use crate::session::UserInfo;

const URL_PREFIX: &str = "/auth";

/// Token pair returned by the login endpoint. Tokens carry their scheme
/// prefix already.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub user_info: Option<UserInfo>,
}

pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Sign in. Persists the returned token pair (and profile, when the
    /// backend includes one) into the session store.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginData> {
        let body = json!({
            "uiAccountName": username,
            "uiPassword": password,
        });
        let env = self
            .client
            .envelope(ApiRequest::post(format!("{}/login", URL_PREFIX), Some(body)))
            .await?;
        let data: LoginData = env.data_as().map_err(|e| NetworkError::InvalidBody {
            message: e.to_string(),
        })?;

        self.client
            .session()
            .set_tokens(data.access_token.clone(), data.refresh_token.clone());
        if let Some(user_info) = &data.user_info {
            self.client.session().set_user_info(user_info.clone());
        }
        Ok(data)
    }

    /// Sign out locally. The caller also disconnects the realtime channel.
    pub fn logout(&self) {
        self.client.session().clear();
    }

    /// Whether the stored access token is still accepted.
    pub async fn logined(&self) -> ClientResult<Envelope> {
        self.client.envelope(ApiRequest::get("/logined")).await
    }

    pub async fn register(&self, params: serde_json::Value) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::post(
                format!("{}/register", URL_PREFIX),
                Some(params),
            ))
            .await
    }

    /// Request an email confirmation code.
    pub async fn apply_code(&self, params: serde_json::Value) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::post(
                format!("{}/applyCode", URL_PREFIX),
                Some(params),
            ))
            .await
    }

    /// Confirm the account with a received code.
    pub async fn confirm_code(&self, params: serde_json::Value) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::post(
                format!("{}/confirm", URL_PREFIX),
                Some(params),
            ))
            .await
    }

    pub async fn change_password(&self, params: serde_json::Value) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::post(
                format!("{}/changePassword", URL_PREFIX),
                Some(params),
            ))
            .await
    }

    pub async fn reset_password(&self, params: serde_json::Value) -> ClientResult<Envelope> {
        self.client
            .envelope(ApiRequest::post(
                format!("{}/resetPassword", URL_PREFIX),
                Some(params),
            ))
            .await
    }
}
