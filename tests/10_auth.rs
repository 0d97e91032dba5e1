mod common;

use anyhow::Result;
use httpmock::prelude::*;
use serde_json::json;

use murojaat_admin::api::auth::LOGIN_FAILED;
use murojaat_admin::types::Role;
use murojaat_admin::{ClientError, SessionStore};

#[tokio::test]
async fn login_normalizes_phone_and_returns_session() -> Result<()> {
    let server = common::start().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/auth/admin/login")
                .json_body(json!({ "phone": "+998901234567", "password": "secret" }));
            then.status(200)
                .json_body(json!({ "token": "jwt-1", "user": common::admin_json("a1", "owner") }));
        })
        .await;

    let session = common::anonymous(&server)?
        .login("+998 (90) 123-45-67", "secret")
        .await?;

    login.assert_async().await;
    assert_eq!(session.token, "jwt-1");
    assert_eq!(session.user.role, Role::Owner);
    Ok(())
}

#[tokio::test]
async fn short_phone_is_rejected_before_any_request() -> Result<()> {
    let server = common::start().await;
    let login = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/admin/login");
            then.status(200);
        })
        .await;

    let err = common::anonymous(&server)?.login("90 123", "secret").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation { .. }));

    let err = common::anonymous(&server)?.login("998901234567", "").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation { field: Some(ref f), .. } if f == "password"));

    assert_eq!(login.hits_async().await, 0);
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_not_a_session_expiry() -> Result<()> {
    let server = common::start().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/admin/login");
            then.status(401).json_body(json!({ "message": "Telefon yoki parol noto'g'ri" }));
        })
        .await;

    let err = common::client(&server)?
        .login("998901234567", "wrong")
        .await
        .unwrap_err();

    assert!(!err.is_session_expired());
    assert_eq!(err.status_code(), 401);
    assert_eq!(err.user_message_or(LOGIN_FAILED), "Telefon yoki parol noto'g'ri");
    Ok(())
}

#[tokio::test]
async fn login_failure_without_message_uses_login_fallback() -> Result<()> {
    let server = common::start().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/admin/login");
            then.status(500).body("upstream down");
        })
        .await;

    let err = common::anonymous(&server)?
        .login("998901234567", "secret")
        .await
        .unwrap_err();
    assert_eq!(err.user_message_or(LOGIN_FAILED), LOGIN_FAILED);
    Ok(())
}

#[tokio::test]
async fn me_accepts_wrapped_and_bare_profiles() -> Result<()> {
    let server = common::start().await;
    let me = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/auth/me").header("authorization", common::BEARER);
            then.status(200).json_body(json!({ "user": common::admin_json("a1", "admin") }));
        })
        .await;

    let admin = common::client(&server)?.me().await?;
    me.assert_async().await;
    assert_eq!(admin.id, "a1");
    assert_eq!(admin.display_name(), "operator");

    let bare_server = common::start().await;
    bare_server
        .mock_async(|when, then| {
            when.method(GET).path("/api/auth/me");
            then.status(200).json_body(common::admin_json("a2", "owner"));
        })
        .await;
    assert!(common::client(&bare_server)?.me().await?.is_owner());
    Ok(())
}

#[tokio::test]
async fn unauthorized_response_clears_the_stored_session() -> Result<()> {
    let server = common::start().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/admin/login");
            then.status(200)
                .json_body(json!({ "token": common::TOKEN, "user": common::admin_json("a1", "owner") }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/admins");
            then.status(401).json_body(json!({ "message": "jwt expired" }));
        })
        .await;

    let dir = tempfile::tempdir()?;
    let store = SessionStore::new(dir.path());
    let session = common::anonymous(&server)?.login("998901234567", "secret").await?;
    store.save(&session)?;

    let client = common::anonymous(&server)?
        .with_session(&session)
        .with_session_store(store.clone());
    let err = client.list_admins().await.unwrap_err();

    assert!(err.is_session_expired());
    assert!(store.load()?.is_none());
    Ok(())
}

#[tokio::test]
async fn refreshed_session_keeps_the_token() -> Result<()> {
    let server = common::start().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/auth/me");
            then.status(200).json_body(common::admin_json("a1", "owner"));
        })
        .await;

    let stale = murojaat_admin::Session::new(
        common::TOKEN,
        serde_json::from_value(common::admin_json("a1", "admin"))?,
    );
    let fresh = common::client(&server)?.refresh_session(&stale).await?;
    assert_eq!(fresh.token, common::TOKEN);
    assert!(fresh.user.is_owner());
    Ok(())
}
