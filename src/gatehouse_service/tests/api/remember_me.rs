use reqwest::StatusCode;
use serde_json::Value;

use crate::helpers::{REMEMBER_ME_COOKIE, SESSION_COOKIE, TestApp, TestOptions, cookie};

async fn app() -> TestApp {
    TestApp::with_options(TestOptions {
        remember_me: true,
        ..Default::default()
    })
    .await
}

#[tokio::test]
async fn remembered_client_is_logged_back_in_without_session() {
    let app = app().await;
    let login = app.post_login("foo", "bar").await;
    let token = cookie(&login, REMEMBER_ME_COOKIE)
        .expect("remember-me cookie")
        .value()
        .to_string();

    // Another browser presenting only the remember-me cookie.
    let response = reqwest::Client::new()
        .get(format!("{}/principal", app.address))
        .header("cookie", format!("{REMEMBER_ME_COOKIE}={token}"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(cookie(&response, SESSION_COOKIE).is_some());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["name"], "foo");
}

#[tokio::test]
async fn failed_login_clears_the_remember_me_cookie() {
    let app = app().await;
    app.post_login("foo", "bar").await;

    let response = app.post_login("foo", "wrong").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        cookie(&response, REMEMBER_ME_COOKIE).map(|c| c.value().to_string()),
        Some(String::new())
    );
}

#[tokio::test]
async fn logout_clears_the_remember_me_cookie() {
    let app = app().await;
    app.post_login("foo", "bar").await;

    let response = app.post_logout().await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        cookie(&response, REMEMBER_ME_COOKIE).map(|c| c.value().to_string()),
        Some(String::new())
    );
    assert_eq!(app.get_principal().await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn forged_remember_me_cookie_is_ignored() {
    let app = app().await;

    let response = reqwest::Client::new()
        .get(format!("{}/principal", app.address))
        .header("cookie", format!("{REMEMBER_ME_COOKIE}=forged.token.value"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        cookie(&response, REMEMBER_ME_COOKIE).map(|c| c.value().to_string()),
        Some(String::new())
    );
}
