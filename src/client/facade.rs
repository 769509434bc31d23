//! The HTTP client facade.
//!
//! Every outgoing call goes through [`ApiClient`]: the right credential is
//! attached, the response envelope is normalized, failed statuses run the
//! policy table, and an expired access token is recovered by a transparent
//! single-flight refresh before the original request is replayed.

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::envelope::{Body, Envelope, CODE_FRESH_LOGIN_REQUIRED, CODE_OK, CODE_TOKEN_EXPIRED};
use crate::error::{classify_reqwest_error, ApiError, ClientError, ClientResult, NetworkError};
use crate::session::SessionStore;
use crate::traits::{Route, ToastKind, UiBridge};

use super::policy::{self, msg, ErrorAction};
use super::refresh::{RefreshCoordinator, RefreshTicket};

/// The refresh endpoint. Requests to this path carry the refresh token and
/// are never themselves recovered by another refresh.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// A request to the backend, before credentials are attached.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    pub fn patch(path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method: Method::PATCH,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    pub fn delete(path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    fn is_refresh(&self) -> bool {
        self.path == REFRESH_PATH
    }
}

/// The configured HTTP client facade.
pub struct ApiClient {
    config: ApiConfig,
    /// Client for ordinary requests.
    http: Client,
    /// Identically configured client for the refresh call; its responses
    /// never re-enter the normal handling chain.
    bare: Client,
    session: Arc<SessionStore>,
    ui: Arc<dyn UiBridge>,
    refresh: RefreshCoordinator,
}

impl ApiClient {
    pub fn new(config: ApiConfig, session: Arc<SessionStore>, ui: Arc<dyn UiBridge>) -> Self {
        Self {
            config,
            http: Client::new(),
            bare: Client::new(),
            session: session.clone(),
            ui,
            refresh: RefreshCoordinator::new(),
        }
    }

    /// The session store backing this client.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Execute a request through the full pipeline.
    pub async fn execute(&self, request: ApiRequest) -> ClientResult<Body> {
        let token = if request.is_refresh() {
            self.session.refresh_token()
        } else {
            self.session.access_token()
        };
        self.dispatch(request, token, true).await
    }

    /// Execute a request and require an enveloped response.
    pub async fn envelope(&self, request: ApiRequest) -> ClientResult<Envelope> {
        match self.execute(request).await? {
            Body::Envelope(env) => Ok(env),
            Body::Raw(_) => Err(NetworkError::InvalidBody {
                message: "expected a response envelope".to_string(),
            }
            .into()),
        }
    }

    async fn dispatch(
        &self,
        request: ApiRequest,
        token: Option<String>,
        allow_refresh: bool,
    ) -> ClientResult<Body> {
        debug!(method = %request.method, path = %request.path, "dispatching request");
        let response = match self.send(&self.http, &request, token.as_deref()).await {
            Ok(response) => response,
            Err(err) => return Err(self.fail_network(err)),
        };

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.json::<Value>().await.ok();
            self.apply_policy(Some(status), body.as_ref());
            return Err(NetworkError::HttpStatus {
                status,
                message: format!("{} {}", request.method, request.path),
            }
            .into());
        }

        let value: Value = response.json().await.map_err(|e| NetworkError::InvalidBody {
            message: e.to_string(),
        })?;
        let body = Body::decode(value).map_err(|e| NetworkError::InvalidBody {
            message: e.to_string(),
        })?;

        let env = match body {
            Body::Raw(value) => return Ok(Body::Raw(value)),
            Body::Envelope(env) => env,
        };

        match env.code {
            CODE_OK => Ok(Body::Envelope(env)),
            CODE_FRESH_LOGIN_REQUIRED => {
                warn!(path = %request.path, "fresh login demanded, forcing logout");
                self.ui.toast(ToastKind::Warning, msg::FRESH_LOGIN);
                self.force_logout();
                Err(ApiError::FreshLoginRequired.into())
            }
            CODE_TOKEN_EXPIRED if allow_refresh => Box::pin(self.recover_expired(request)).await,
            CODE_TOKEN_EXPIRED => Err(ApiError::SessionExpired {
                message: env.message_or_default().to_string(),
            }
            .into()),
            code => {
                let message = env.message_or_default().to_string();
                self.ui.toast(ToastKind::Error, &message);
                Err(ApiError::Business { code, message }.into())
            }
        }
    }

    /// The refresh protocol: single flight, FIFO drain, forced logout on
    /// failure. Replays carry `allow_refresh = false` so a second expiry
    /// surfaces instead of looping.
    async fn recover_expired(&self, request: ApiRequest) -> ClientResult<Body> {
        if request.is_refresh() {
            // Recursion guard: the refresh call itself came back expired.
            warn!("refresh endpoint returned expired, not retrying");
            self.ui.toast(ToastKind::Warning, msg::SESSION_EXPIRED);
            self.force_logout();
            return Err(ApiError::SessionExpired {
                message: "refresh token expired".to_string(),
            }
            .into());
        }

        match self.refresh.begin() {
            RefreshTicket::Follower(outcome) => match outcome.await {
                Ok(Ok(token)) => self.dispatch(request, Some(token), false).await,
                Ok(Err(err)) => Err(err.into()),
                Err(_) => Err(ApiError::SessionExpired {
                    message: "refresh cycle abandoned".to_string(),
                }
                .into()),
            },
            RefreshTicket::Leader => match self.run_refresh().await {
                Ok(token) => {
                    self.session.set_access_token(token.clone());
                    // Replay the leader's own request first, then release
                    // the queued waiters with the same token.
                    let replay = self.dispatch(request, Some(token.clone()), false).await;
                    self.refresh.settle(Ok(token));
                    replay
                }
                Err(err) => {
                    if matches!(err, ApiError::RefreshRejected { .. }) {
                        self.ui.toast(ToastKind::Warning, msg::SESSION_EXPIRED);
                    }
                    self.force_logout();
                    self.refresh.settle(Err(err.clone()));
                    Err(err.into())
                }
            },
        }
    }

    /// Issue the refresh call through the bare client, outside the normal
    /// handling chain.
    async fn run_refresh(&self) -> Result<String, ApiError> {
        let refresh_token = self
            .session
            .refresh_token()
            .ok_or(ApiError::NotAuthenticated)?;
        debug!("issuing token refresh");

        let request = ApiRequest::post(REFRESH_PATH, None);
        let response = self
            .send(&self.bare, &request, Some(&refresh_token))
            .await
            .map_err(|err| ApiError::SessionExpired {
                message: err.to_string(),
            })?;

        let status = response.status().as_u16();
        if status == 401 {
            return Err(ApiError::RefreshRejected {
                message: "refresh token unauthorized".to_string(),
            });
        }
        if status != 200 {
            return Err(ApiError::SessionExpired {
                message: format!("refresh failed with status {}", status),
            });
        }

        let value: Value = response.json().await.map_err(|e| ApiError::SessionExpired {
            message: e.to_string(),
        })?;
        let env: Envelope =
            serde_json::from_value(value).map_err(|e| ApiError::SessionExpired {
                message: e.to_string(),
            })?;

        match env.code {
            CODE_OK => env
                .data
                .get("access_token")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| ApiError::SessionExpired {
                    message: "refresh response missing access_token".to_string(),
                }),
            401 | CODE_TOKEN_EXPIRED | CODE_FRESH_LOGIN_REQUIRED => {
                Err(ApiError::RefreshRejected {
                    message: env.message_or_default().to_string(),
                })
            }
            _ => Err(ApiError::SessionExpired {
                message: env.message_or_default().to_string(),
            }),
        }
    }

    async fn send(
        &self,
        client: &Client,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<reqwest::Response, NetworkError> {
        let url = join_url(&self.config.base_url, &request.path);
        let mut builder = client
            .request(request.method.clone(), url)
            .timeout(self.config.timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            // Stored tokens already carry any scheme prefix; attach verbatim.
            builder = builder.header(AUTHORIZATION, token);
        }
        builder
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e, self.config.timeout.as_secs()))
    }

    fn fail_network(&self, err: NetworkError) -> ClientError {
        self.apply_policy(err.status(), None);
        err.into()
    }

    /// Run the policy table for a failed request. Every caller rejects
    /// afterwards; this only performs the visible effect.
    fn apply_policy(&self, status: Option<u16>, body: Option<&Value>) {
        match policy::action_for(status) {
            ErrorAction::Toast(text) => self.ui.toast(ToastKind::Error, text),
            ErrorAction::ToastAndNavigate(text, route) => {
                self.ui.toast(ToastKind::Error, text);
                self.ui.navigate(route);
            }
            ErrorAction::Navigate(route) => self.ui.navigate(route),
            ErrorAction::Silent => {}
            ErrorAction::SurfaceEnvelope => {
                let envelope_message = body
                    .cloned()
                    .and_then(|value| Body::decode(value).ok())
                    .and_then(|body| match body {
                        Body::Envelope(env) if env.code != CODE_OK => {
                            Some(env.message_or_default().to_string())
                        }
                        _ => None,
                    });
                match envelope_message {
                    Some(message) => self.ui.toast(ToastKind::Error, &message),
                    None => self.ui.toast(ToastKind::Error, msg::GENERIC_RETRY),
                }
            }
        }
    }

    /// End the session: clear persisted state, notify the UI, go to login.
    fn force_logout(&self) {
        self.session.clear();
        self.ui.session_expired();
        self.ui.navigate(Route::Login);
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}
