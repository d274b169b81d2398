use dormant_common::{DormantError, Handle};
use dormant_social::SocialApi;
use dormant_social::twitter::TwitterApi;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn api_for(server: &MockServer) -> TwitterApi {
    TwitterApi::with_base_url(&server.uri(), "test-bearer".into())
        .unwrap()
        .with_retries(0)
}

fn handle(s: &str) -> Handle {
    s.parse().unwrap()
}

#[tokio::test]
async fn lookup_resolves_identity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/users/by/username/alice"))
        .and(header("authorization", "Bearer test-bearer"))
        .and(query_param("user.fields", "public_metrics,protected"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "1",
                "name": "Alice",
                "username": "alice",
                "protected": false,
                "public_metrics": { "following_count": 2, "followers_count": 10 }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = api_for(&server).await.lookup_user(&handle("alice")).await.unwrap();
    assert_eq!(user.id, "1");
    assert_eq!(user.name, "Alice");
    assert_eq!(user.following_count, Some(2));
}

#[tokio::test]
async fn lookup_maps_not_found_problem() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/users/by/username/ghost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{
                "value": "ghost",
                "detail": "Could not find user with username: [ghost].",
                "title": "Not Found Error",
                "type": "https://api.twitter.com/2/problems/resource-not-found"
            }]
        })))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .await
        .lookup_user(&handle("ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, DormantError::UserNotFound(ref h) if h == "ghost"));
}

#[tokio::test]
async fn unauthorized_is_distinguished() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "title": "Unauthorized",
            "type": "about:blank",
            "status": 401,
            "detail": "Unauthorized"
        })))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .await
        .lookup_user(&handle("alice"))
        .await
        .unwrap_err();
    assert!(matches!(err, DormantError::Unauthorized(_)));
}

#[tokio::test]
async fn forbidden_app_is_distinguished() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/users/2/tweets"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "title": "Client Forbidden",
            "detail": "This app is not enrolled for this endpoint.",
            "reason": "client-not-enrolled",
            "type": "https://api.twitter.com/2/problems/client-forbidden"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = api_for(&server).await.recent_posts("2").await.unwrap_err();
    assert!(matches!(err, DormantError::Forbidden(ref m) if m.contains("not enrolled")));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn following_pages_carry_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/users/1/following"))
        .and(query_param_is_missing("pagination_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "2", "name": "Bob", "username": "bob", "protected": false }],
            "meta": { "result_count": 1, "next_token": "T" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2/users/1/following"))
        .and(query_param("pagination_token", "T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "3", "name": "Carol", "username": "carol", "protected": true }],
            "meta": { "result_count": 1 }
        })))
        .mount(&server)
        .await;

    let api = api_for(&server).await;
    let first = api.following_page("1", None).await.unwrap();
    assert_eq!(first.items[0].username, "bob");
    assert_eq!(first.next_token.as_deref(), Some("T"));

    let second = api.following_page("1", Some("T")).await.unwrap();
    assert_eq!(second.items[0].username, "carol");
    assert!(second.items[0].protected);
    assert_eq!(second.next_token, None);
}

#[tokio::test]
async fn following_page_size_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/users/1/following"))
        .and(query_param("max_results", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "result_count": 0 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server)
        .await
        .with_following_page_size(Some(1000));
    let page = api.following_page("1", None).await.unwrap();
    assert!(page.items.is_empty());
    assert!(page.next_token.is_none());
}

#[tokio::test]
async fn recent_posts_requests_five_newest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/users/2/tweets"))
        .and(query_param("max_results", "5"))
        .and(query_param("tweet.fields", "created_at,author_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": "20", "text": "newest", "author_id": "2", "created_at": "2023-01-01T00:00:00.000Z" },
                { "id": "19", "text": "older", "author_id": "2", "created_at": "2022-12-31T10:00:00.000Z" }
            ],
            "meta": { "result_count": 2, "newest_id": "20", "oldest_id": "19" }
        })))
        .mount(&server)
        .await;

    let posts = api_for(&server).await.recent_posts("2").await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, "20");
}

#[tokio::test]
async fn recent_posts_for_silent_account_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/users/4/tweets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "result_count": 0 }
        })))
        .mount(&server)
        .await;

    let posts = api_for(&server).await.recent_posts("4").await.unwrap();
    assert!(posts.is_empty());
}

#[tokio::test]
async fn partial_errors_without_data_are_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2/users/5/tweets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "title": "Authorization Error", "detail": "Sorry, you are not authorized to see the user with id: [5]." }]
        })))
        .mount(&server)
        .await;

    let err = api_for(&server).await.recent_posts("5").await.unwrap_err();
    match err {
        DormantError::Api { status, message } => {
            assert_eq!(status, None);
            assert!(message.contains("not authorized"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}
