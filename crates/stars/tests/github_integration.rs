//! GitHub gateway tests against a local mock server.

#![cfg(feature = "github")]

use serde_json::json;
use stars::github::GitHubClient;
use stars::{GatewayError, StarGateway};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn repo_json(owner: &str, name: &str) -> serde_json::Value {
    json!({
        "id": 1,
        "name": name,
        "url": format!("https://api.github.com/repos/{owner}/{name}"),
        "html_url": format!("https://github.com/{owner}/{name}"),
        "language": "Rust",
        "description": "A repository",
        "stargazers_count": 42,
        "archived": false,
        "pushed_at": "2024-01-02T03:04:05Z",
        "topics": ["cli"]
    })
}

fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::with_api_base("test-token", &server.uri()).expect("client")
}

#[tokio::test]
async fn test_list_starred_reads_link_header() {
    let server = MockServer::start().await;
    let link = format!(
        "<{uri}/users/octocat/starred?per_page=2&page=3>; rel=\"next\", \
         <{uri}/users/octocat/starred?per_page=2&page=5>; rel=\"last\"",
        uri = server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/users/octocat/starred"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "2"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", link.as_str())
                .set_body_json(json!([repo_json("a", "one"), repo_json("b", "two")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server)
        .list_starred("octocat", 2, 2)
        .await
        .expect("page");

    assert_eq!(page.meta.last_page, 5);
    assert_eq!(page.repos.len(), 2);
    assert_eq!(page.repos[0].url, "https://github.com/a/one");
    assert_eq!(page.repos[0].language.as_deref(), Some("Rust"));
    assert_eq!(page.repos[0].stargazers, 42);
    assert_eq!(page.repos[0].topics, vec!["cli"]);
}

#[tokio::test]
async fn test_list_starred_without_link_header_is_single_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/starred"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([repo_json("a", "one")])))
        .mount(&server)
        .await;

    let page = client(&server)
        .list_starred("octocat", 1, 100)
        .await
        .expect("page");

    assert_eq!(page.meta.last_page, 1);
    assert_eq!(page.repos.len(), 1);
}

#[tokio::test]
async fn test_list_starred_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/starred"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Bad credentials"
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_starred("octocat", 1, 100)
        .await
        .expect_err("401");
    assert!(matches!(err, GatewayError::AuthRequired));
}

#[tokio::test]
async fn test_list_starred_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/starred"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("x-ratelimit-reset", "1700000000"),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .list_starred("octocat", 1, 100)
        .await
        .expect_err("403");
    assert!(err.is_rate_limited());
}

#[tokio::test]
async fn test_unstar_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/user/starred/octocat/hello-world"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .unstar("octocat", "hello-world")
        .await
        .expect("unstar");
}

#[tokio::test]
async fn test_unstar_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/user/starred/octocat/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server)
        .unstar("octocat", "missing")
        .await
        .expect_err("404");
    assert!(matches!(err, GatewayError::NotFound { .. }));
}

#[tokio::test]
async fn test_authenticated_username() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "octocat",
            "id": 1
        })))
        .mount(&server)
        .await;

    let login = client(&server)
        .authenticated_username()
        .await
        .expect("login");
    assert_eq!(login, "octocat");
}
