mod common;

use common::{TestApp, session_set_cookie, token_for, USER_ID};
use serde_json::{Value, json};

#[tokio::test]
async fn login_with_valid_credentials_sets_session_cookie() {
    let app = TestApp::spawn().await;

    let response = app.login().await;
    assert_eq!(response.status().as_u16(), 200, "Login failed");

    let cookie = session_set_cookie(&response).expect("session cookie not set");
    assert!(cookie.starts_with(&format!("supabase_token={}", token_for(USER_ID))));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Token set");
}

#[tokio::test]
async fn login_with_bad_credentials_is_generic_and_sets_no_cookie() {
    let app = TestApp::spawn().await;

    for payload in [
        json!({ "email": common::EMAIL, "password": "wrong" }),
        json!({ "email": "nobody@example.com", "password": common::PASSWORD }),
        json!({ "email": "", "password": "" }),
        json!({}),
    ] {
        let response = app
            .client
            .post(app.url("/api/login"))
            .json(&payload)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400, "payload: {payload}");
        assert!(session_set_cookie(&response).is_none());
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Login failed" }));
    }
}

#[tokio::test]
async fn malformed_login_body_is_a_login_failure() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/login"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Login failed");
}

#[tokio::test]
async fn logout_without_session_still_succeeds() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/logout"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let cookie = session_set_cookie(&response).expect("logout should clear the cookie");
    assert!(cookie.starts_with("supabase_token=;"));
    for attribute in ["Max-Age=0", "HttpOnly", "SameSite=Lax", "Path=/"] {
        assert!(cookie.contains(attribute), "{attribute} missing from {cookie}");
    }
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Logged out");
}

#[tokio::test]
async fn logout_ends_the_session() {
    let app = TestApp::spawn().await;
    assert_eq!(app.login().await.status().as_u16(), 200);

    let favourites = app.client.get(app.url("/api/favorites")).send().await.unwrap();
    assert_eq!(favourites.status().as_u16(), 200);

    let logout = app.client.post(app.url("/api/logout")).send().await.unwrap();
    assert_eq!(logout.status().as_u16(), 200);

    let favourites = app.client.get(app.url("/api/favorites")).send().await.unwrap();
    assert_eq!(favourites.status().as_u16(), 401);
    let body: Value = favourites.json().await.unwrap();
    assert_eq!(body["error"], "Not authenticated");
}
