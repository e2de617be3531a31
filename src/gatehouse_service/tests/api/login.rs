use reqwest::StatusCode;
use serde_json::Value;

use crate::helpers::{SESSION_COOKIE, TestApp, TestOptions, cookie};

#[tokio::test]
async fn valid_login_returns_principal_and_session() {
    let app = TestApp::new().await;

    let response = app.post_login("foo", "bar").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(cookie(&response, SESSION_COOKIE).is_some());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "foo");
    assert_eq!(body["authorities"], serde_json::json!(["ROLE_ABUSER", "ROLE_USER"]));

    let principal: Value = app.get_principal().await.json().await.unwrap();
    assert_eq!(principal["name"], "foo");
}

#[tokio::test]
async fn rejected_logins_are_client_authentication_faults() {
    let app = TestApp::new().await;

    for (username, password, reason) in [
        ("foo", "wrong", "bad_credential"),
        ("nobody", "bar", "unknown_identity"),
        ("", "bar", "unknown_identity"),
    ] {
        let response = app.post_login(username, password).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["fault_code"], "Client.Authentication");
        assert_eq!(body["reason"], reason);
    }

    assert_eq!(app.get_principal().await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .http_client
        .post(format!("{}/login", app.address))
        .json(&serde_json::json!({ "user": "foo" }))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn relogin_rotates_the_session_id() {
    let app = TestApp::new().await;
    let first = app.post_login("foo", "bar").await;
    let first_id = cookie(&first, SESSION_COOKIE)
        .expect("session cookie")
        .value()
        .to_string();

    let second = app.post_login("bob", "bob-pw").await;

    assert_eq!(second.status(), StatusCode::OK);
    let second_id = cookie(&second, SESSION_COOKIE)
        .expect("rotated session cookie")
        .value()
        .to_string();
    assert_ne!(first_id, second_id);
    let principal: Value = app.get_principal().await.json().await.unwrap();
    assert_eq!(principal["name"], "bob");

    // The id issued before the relogin no longer names a session.
    let stale = app
        .get_principal_with_session(&TestApp::client(), &first_id)
        .await;
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn per_client_login_is_not_remembered_across_requests() {
    let app = TestApp::with_options(TestOptions {
        per_client: true,
        ..Default::default()
    })
    .await;

    let response = app.post_login("foo", "bar").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(cookie(&response, SESSION_COOKIE).is_none());

    assert_eq!(app.get_principal().await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn per_client_login_ignores_a_presented_session_cookie() {
    let app = TestApp::with_options(TestOptions {
        per_client: true,
        ..Default::default()
    })
    .await;
    let presented = "6f1c0c8e-3a9f-4d8e-9b1a-2f0d5c7e4a11";

    let response = app
        .http_client
        .post(format!("{}/login", app.address))
        .header("cookie", format!("{SESSION_COOKIE}={presented}"))
        .json(&serde_json::json!({ "username": "foo", "password": "bar" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(cookie(&response, SESSION_COOKIE).is_none());
}

#[tokio::test]
async fn concurrent_clients_keep_their_own_identity() {
    let app = std::sync::Arc::new(TestApp::new().await);

    let mut tasks = Vec::new();
    for _ in 0..8 {
        for (username, password, role) in [
            ("alice", "alice-pw", "ROLE_USER"),
            ("bob", "bob-pw", "ROLE_ADMIN"),
        ] {
            let app = std::sync::Arc::clone(&app);
            tasks.push(tokio::spawn(async move {
                let client = TestApp::client();
                let login = app.post_login_with(&client, username, password).await;
                assert_eq!(login.status(), StatusCode::OK);

                let principal: Value = app.get_principal_with(&client).await.json().await.unwrap();
                assert_eq!(principal["name"], username);
                assert!(app.post_authorize_with(&client, &[role]).await);
            }));
        }
    }

    for task in tasks {
        task.await.unwrap();
    }
}
