//! Integration tests for the typed REST wrappers: each call must hit the
//! backend with the right verb, path, query, and body.

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use blogline::adapters::mock::RecordingBridge;
use blogline::api::{LogApi, PraiseApi, UserApi};
use blogline::client::ApiClient;
use blogline::config::ApiConfig;
use blogline::session::SessionStore;

async fn client_for(server: &MockServer, temp: &TempDir) -> Arc<ApiClient> {
    let session = Arc::new(SessionStore::open_at(temp.path().join("session.json")));
    session.set_tokens("Bearer tok".to_string(), "Bearer ref".to_string());
    Arc::new(ApiClient::new(
        ApiConfig::with_base_url(server.uri()),
        session,
        Arc::new(RecordingBridge::new()),
    ))
}

fn ok_envelope(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": 200, "message": "ok", "data": data}))
}

#[tokio::test]
async fn post_and_comment_likes_hit_their_routes() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let praise = PraiseApi::new(client_for(&server, &temp).await);

    Mock::given(method("POST"))
        .and(path("/api/v1/posts/7/likes"))
        .respond_with(ok_envelope(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/posts/7/likes"))
        .respond_with(ok_envelope(json!({"count": 3})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/comments/21/likes"))
        .respond_with(ok_envelope(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    praise.like_post(7).await.unwrap();
    let env = praise.post_likes(7).await.unwrap();
    assert_eq!(env.data["count"], 3);
    praise.like_comment(21).await.unwrap();
}

#[tokio::test]
async fn praised_comment_ids_sends_liked_filter() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let praise = PraiseApi::new(client_for(&server, &temp).await);

    Mock::given(method("GET"))
        .and(path("/api/v1/posts/7/comments/praised"))
        .and(query_param("liked", "true"))
        .respond_with(ok_envelope(json!([4, 9])))
        .expect(1)
        .mount(&server)
        .await;

    let env = praise.praised_comment_ids(7).await.unwrap();
    let ids: Vec<i64> = env.data_as().unwrap();
    assert_eq!(ids, vec![4, 9]);
}

#[tokio::test]
async fn profile_edits_use_the_right_verbs() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let user = UserApi::new(client_for(&server, &temp).await);

    Mock::given(method("PATCH"))
        .and(path("/api/v1/users/9"))
        .and(body_json(json!({"about_me": "hello"})))
        .respond_with(ok_envelope(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/edit-profile/12"))
        .and(body_json(json!({"id": 12, "nickname": "Ada"})))
        .respond_with(ok_envelope(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    user.edit(9, json!({"about_me": "hello"})).await.unwrap();
    user.edit_profile_admin(12, json!({"id": 12, "nickname": "Ada"}))
        .await
        .unwrap();
}

#[tokio::test]
async fn follow_and_unfollow_share_the_route() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let user = UserApi::new(client_for(&server, &temp).await);

    Mock::given(method("POST"))
        .and(path("/api/v1/users/ada/follow"))
        .respond_with(ok_envelope(json!(null)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/users/ada/follow"))
        .respond_with(ok_envelope(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    user.follow("ada").await.unwrap();
    user.unfollow("ada").await.unwrap();
}

#[tokio::test]
async fn image_listing_carries_paging_params() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let user = UserApi::new(client_for(&server, &temp).await);

    Mock::given(method("GET"))
        .and(path("/api/v1/dir_name"))
        .and(query_param("prefix", "userAvatars/"))
        .and(query_param("currentPage", "2"))
        .and(query_param("pageSize", "12"))
        .and(query_param("completeUrl", "1"))
        .respond_with(ok_envelope(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    user.list_images("userAvatars/", 2, 12).await.unwrap();
}

#[tokio::test]
async fn log_delete_sends_ids_as_body() {
    let server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let logs = LogApi::new(client_for(&server, &temp).await);

    Mock::given(method("GET"))
        .and(path("/api/v1/logs"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"code": 200, "message": "ok", "data": [], "total": 0}),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/logs"))
        .and(body_json(json!([3, 5])))
        .respond_with(ok_envelope(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let env = logs.list(1).await.unwrap();
    assert_eq!(env.total, Some(0));
    logs.delete(&[3, 5]).await.unwrap();
}
