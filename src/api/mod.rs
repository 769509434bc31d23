//! Thin typed wrappers over the REST surface. Each resource gets a small
//! struct holding an [`ApiClient`](crate::client::ApiClient) handle; every
//! call routes through the shared facade so token refresh and error policy
//! apply uniformly.

pub mod auth;
pub mod chat;
pub mod comments;
pub mod follow;
pub mod log;
pub mod notifications;
pub mod posts;
pub mod praise;
pub mod upload;
pub mod user;

pub use auth::{AuthApi, LoginData};
pub use chat::ChatApi;
pub use comments::CommentsApi;
pub use follow::FollowApi;
pub use log::LogApi;
pub use notifications::NotificationsApi;
pub use posts::PostsApi;
pub use praise::PraiseApi;
pub use upload::UploadApi;
pub use user::UserApi;
