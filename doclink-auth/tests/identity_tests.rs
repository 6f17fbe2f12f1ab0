//! Identity client tests against a mock provider.

use doclink_auth::{AuthConfig, IdentityClient};
use doclink_types::Severity;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_config(server: &MockServer) -> AuthConfig {
    AuthConfig {
        api_key: "test_key".to_string(),
        api_base_url: server.uri(),
        ..Default::default()
    }
}

#[test]
fn auth_config_default() {
    let cfg = AuthConfig::default();
    assert!(cfg.api_key.is_empty());
    assert_eq!(cfg.api_base_url, "https://identity.doclink.dev");
    assert_eq!(cfg.timeout_secs, 30);
}

#[tokio::test]
async fn sign_up_returns_principal_and_opens_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signUp"))
        .and(query_param("key", "test_key"))
        .and(body_partial_json(json!({
            "email": "new@example.com",
            "returnSecureToken": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-1",
            "idToken": "id-token-1",
            "refreshToken": "refresh-1",
            "email": "new@example.com"
        })))
        .mount(&server)
        .await;

    let client = IdentityClient::new(mock_config(&server));
    let principal = client
        .sign_up_with_password("new@example.com", "hunter22")
        .await
        .unwrap();

    assert_eq!(principal.uid, "uid-1");
    assert_eq!(principal.email.as_deref(), Some("new@example.com"));
    assert_eq!(principal.provider_id, "password");
    assert!(!principal.email_verified);

    let session = client.session().await.unwrap();
    assert_eq!(session.uid, "uid-1");
    assert_eq!(session.id_token, "id-token-1");
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn sign_in_provider_error_passes_code_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "code": "EMAIL_NOT_FOUND",
                "message": "There is no user record corresponding to this identifier."
            }
        })))
        .mount(&server)
        .await;

    let client = IdentityClient::new(mock_config(&server));
    let err = client
        .sign_in_with_password("ghost@example.com", "pw")
        .await
        .unwrap_err();

    assert_eq!(err.code, "EMAIL_NOT_FOUND");
    assert_eq!(err.name, "AuthError");
    assert_eq!(err.severity, Severity::Error);
    assert!(!client.is_signed_in().await);
}

#[tokio::test]
async fn sign_in_with_profile_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-2",
            "idToken": "id-token-2",
            "email": "user@example.com",
            "displayName": "Test User",
            "photoUrl": "https://example.com/pic.png",
            "emailVerified": true
        })))
        .mount(&server)
        .await;

    let client = IdentityClient::new(mock_config(&server));
    let principal = client
        .sign_in_with_password("user@example.com", "pw")
        .await
        .unwrap();

    assert_eq!(principal.display_name.as_deref(), Some("Test User"));
    assert_eq!(principal.photo_url.as_deref(), Some("https://example.com/pic.png"));
    assert!(principal.email_verified);
}

#[tokio::test]
async fn oauth_sign_in_uses_provider_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithIdp"))
        .and(body_partial_json(json!({
            "providerId": "google.com",
            "accessToken": "oauth-token"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-3",
            "idToken": "id-token-3",
            "email": "g@example.com",
            "providerId": "google.com"
        })))
        .mount(&server)
        .await;

    let client = IdentityClient::new(mock_config(&server));
    let principal = client
        .sign_in_with_oauth("google.com", "oauth-token")
        .await
        .unwrap();

    assert_eq!(principal.provider_id, "google.com");
    assert!(client.is_signed_in().await);
}

#[tokio::test]
async fn sign_out_clears_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-4",
            "idToken": "id-token-4"
        })))
        .mount(&server)
        .await;

    let client = IdentityClient::new(mock_config(&server));
    client.sign_in_with_password("a@b.c", "pw").await.unwrap();
    assert!(client.is_signed_in().await);

    let message = client.sign_out().await.unwrap();
    assert_eq!(message.message, "User has successfully signed out!");
    assert!(!client.is_signed_in().await);
}

#[tokio::test]
async fn verification_email_requires_session() {
    let server = MockServer::start().await;
    let client = IdentityClient::new(mock_config(&server));

    let principal = doclink_types::Principal {
        uid: "uid-5".to_string(),
        display_name: None,
        email: Some("x@example.com".to_string()),
        email_verified: false,
        phone_number: None,
        photo_url: None,
        provider_id: "password".to_string(),
    };

    let err = client.send_verification_email(&principal).await.unwrap_err();
    assert_eq!(err.code, "auth/no-active-session");
}

#[tokio::test]
async fn verification_email_sends_session_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localId": "uid-6",
            "idToken": "id-token-6"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/accounts:sendOobCode"))
        .and(body_partial_json(json!({
            "requestType": "VERIFY_EMAIL",
            "idToken": "id-token-6"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "email": "x@example.com" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = IdentityClient::new(mock_config(&server));
    let principal = client.sign_in_with_password("x@example.com", "pw").await.unwrap();

    let message = client.send_verification_email(&principal).await.unwrap();
    assert_eq!(message.message, "Success");
}

#[tokio::test]
async fn transport_failure_becomes_unknown_default() {
    let config = AuthConfig {
        api_key: "k".to_string(),
        api_base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 2,
        ..Default::default()
    };
    let client = IdentityClient::new(config);

    let err = client.sign_in_with_password("a@b.c", "pw").await.unwrap_err();
    assert_eq!(err.code, "Unknown/Default");
    assert_eq!(err.severity, Severity::Error);
}
