use reqwest::StatusCode;

use crate::helpers::{SESSION_COOKIE, TestApp, cookie};

#[tokio::test]
async fn logout_ends_the_session() {
    let app = TestApp::new().await;
    app.post_login("foo", "bar").await;

    let response = app.post_logout().await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        cookie(&response, SESSION_COOKIE).map(|c| c.value().to_string()),
        Some(String::new())
    );
    assert_eq!(app.get_principal().await.status(), StatusCode::UNAUTHORIZED);
    assert!(!app.post_authorize(&["ROLE_USER"]).await);
}

#[tokio::test]
async fn logged_out_session_id_is_not_honoured() {
    let app = TestApp::new().await;
    let login = app.post_login("foo", "bar").await;
    let session_id = cookie(&login, SESSION_COOKIE)
        .expect("session cookie")
        .value()
        .to_string();

    app.post_logout().await;

    let response = app
        .get_principal_with_session(&TestApp::client(), &session_id)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_without_login_is_harmless() {
    let app = TestApp::new().await;

    assert_eq!(app.post_logout().await.status(), StatusCode::OK);
    assert_eq!(app.post_logout().await.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_after_logout_works() {
    let app = TestApp::new().await;
    app.post_login("foo", "bar").await;
    app.post_logout().await;

    let response = app.post_login("bob", "bob-pw").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.post_authorize(&["ROLE_ADMIN"]).await);
    assert!(!app.post_authorize(&["ROLE_USER"]).await);
}
