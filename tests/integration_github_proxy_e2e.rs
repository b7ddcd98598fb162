mod common;

use common::TestApp;
use serde_json::{Value, json};

#[tokio::test]
async fn root_says_hello() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn repositories_are_relayed_verbatim() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/api/github/octocat/repos"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );

    let repos: Value = response.json().await.unwrap();
    let repos = repos.as_array().unwrap();
    assert_eq!(repos.len(), 2);
    for repo in repos {
        assert!(repo["id"].is_number());
        assert!(repo["name"].is_string());
        assert!(repo["html_url"].is_string());
    }
    // Fields the backend never looks at still come through.
    assert_eq!(repos[0]["full_name"], "octocat/Hello-World");
}

#[tokio::test]
async fn upstream_failure_is_a_500() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/api/github/nonexistent-user-xyz/repos"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Failed to fetch GitHub repos" }));
}

#[tokio::test]
async fn proxy_does_not_need_a_session() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/api/github/octocat/repos"))
        .header("cookie", "supabase_token=forged")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(app.store.calls(), 0);
}
