use serde_json::json;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{preview_url, Credential, E621Client, Error};

fn pool_json(id: u64, name: &str, updated_at: &str, post_ids: &[u64]) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "created_at": "2023-05-01T12:00:00.000-04:00",
        "updated_at": updated_at,
        "creator_id": 1,
        "description": "",
        "is_active": true,
        "category": "series",
        "post_ids": post_ids,
        "creator_name": "someone",
        "post_count": post_ids.len(),
    })
}

#[tokio::test]
async fn test_pools_by_ids_sends_joined_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pools.json"))
        .and(query_param("search[id]", "5,7"))
        .and(query_param("limit", "2"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            pool_json(7, "second_pool", "2024-01-03T00:00:00.000+00:00", &[1, 2]),
            pool_json(5, "foo_bar", "2024-01-02T00:00:00.000+00:00", &[10, 20, 30]),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = E621Client::with_base_url(&server.uri(), "bell-test/0.1").unwrap();
    let pools = client.pools_by_ids(&[5, 7]).await.unwrap();

    assert_eq!(pools.len(), 2);
    assert_eq!(pools[0].id, 7);
    assert_eq!(pools[1].name, "foo_bar");
    assert_eq!(pools[1].post_ids, vec![10, 20, 30]);
}

#[tokio::test]
async fn test_pools_by_ids_skips_request_when_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let client = E621Client::with_base_url(&server.uri(), "bell-test/0.1").unwrap();
    let pools = client.pools_by_ids(&[]).await.unwrap();
    assert!(pools.is_empty());
}

#[tokio::test]
async fn test_post_unwraps_file_md5() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/10.json"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "post": {
                "id": 10,
                "file": { "width": 100, "height": 80, "ext": "png", "size": 1234, "md5": "d41d8cd98f00b204e9800998ecf8427e", "url": null },
                "preview": { "width": 150, "height": 120, "url": null },
                "rating": "s",
            }
        })))
        .mount(&server)
        .await;

    let client = E621Client::with_base_url(&server.uri(), "bell-test/0.1")
        .unwrap()
        .with_credential(Credential {
            login: "alice".to_string(),
            api_key: "secret".to_string(),
        });
    let post = client.post(10).await.unwrap();
    assert_eq!(post.id, 10);
    assert_eq!(post.file.md5, "d41d8cd98f00b204e9800998ecf8427e");
    assert!(post.file.url.is_none());
}

#[tokio::test]
async fn test_missing_post_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/404.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = E621Client::with_base_url(&server.uri(), "bell-test/0.1").unwrap();
    let err = client.post(404).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(p) if p == "/posts/404.json"));
}

#[tokio::test]
async fn test_server_error_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pools.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = E621Client::with_base_url(&server.uri(), "bell-test/0.1").unwrap();
    let err = client.pools_by_ids(&[1]).await.unwrap_err();
    assert!(matches!(err, Error::NetworkError(_)));
}

#[tokio::test]
async fn test_malformed_body_is_json_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pools.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = E621Client::with_base_url(&server.uri(), "bell-test/0.1").unwrap();
    let err = client.pools_by_ids(&[1]).await.unwrap_err();
    assert!(matches!(err, Error::JSONError(_)));
}

#[test]
fn test_preview_url() {
    assert_eq!(
        preview_url("d41d8cd98f00b204e9800998ecf8427e"),
        "https://static1.e621.net/data/preview/d4/1d/d41d8cd98f00b204e9800998ecf8427e.jpg"
    );
    assert_eq!(preview_url(""), "");
}
