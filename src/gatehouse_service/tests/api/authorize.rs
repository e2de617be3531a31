use crate::helpers::TestApp;

#[tokio::test]
async fn authorization_checks_the_session_principal() {
    let app = TestApp::new().await;
    app.post_login("foo", "bar").await;

    assert!(app.post_authorize(&["ROLE_ADMIN", "ROLE_USER"]).await);
    assert!(!app.post_authorize(&["ROLE_ADMIN"]).await);
}

#[tokio::test]
async fn empty_role_requirement_is_denied() {
    let app = TestApp::new().await;
    app.post_login("foo", "bar").await;

    assert!(!app.post_authorize(&[]).await);
}

#[tokio::test]
async fn anonymous_caller_is_denied_without_fault() {
    let app = TestApp::new().await;

    assert!(!app.post_authorize(&["ROLE_USER"]).await);
}
