//! Identity-provider HTTP client and session state.
//!
//! Talks to the provider's account endpoints
//! (`accounts:signUp`, `accounts:signInWithPassword`,
//! `accounts:signInWithIdp`, `accounts:sendOobCode`, `accounts:lookup`).
//! Error bodies of the form `{"error": {"code", "message"}}` pass through
//! verbatim; transport and parse failures collapse into the unknown error
//! with this client's default message.

use crate::error::{AuthError, AuthResult};
use doclink_types::{ErrorObject, OpResult, Principal, Severity};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Configuration for the identity-provider client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Project API key sent with every request.
    pub api_key: String,
    /// Base URL of the provider's REST endpoint.
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Message used when a failure has no provider detail.
    pub default_error_message: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: "https://identity.doclink.dev".to_string(),
            timeout_secs: 30,
            default_error_message: "Some Unknown Error Occurred During Authentication".to_string(),
        }
    }
}

/// The tokens and identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub uid: String,
    pub id_token: String,
    pub refresh_token: Option<String>,
}

/// Success payload for operations whose result is just a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthMessage {
    pub message: String,
}

/// Wire shape shared by the sign-in/sign-up responses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    id_token: String,
    refresh_token: Option<String>,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
    phone_number: Option<String>,
    #[serde(default)]
    email_verified: bool,
    provider_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Client for the identity provider's account operations.
///
/// Holds the active session behind a lock so one client can be shared by
/// concurrent callers; sign-out clears it.
pub struct IdentityClient {
    config: AuthConfig,
    client: Client,
    session: Arc<RwLock<Option<Session>>>,
}

impl IdentityClient {
    pub fn new(config: AuthConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to create HTTP client");

        Self {
            config,
            client,
            session: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns a copy of the active session, if any.
    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Whether a user is currently signed in.
    pub async fn is_signed_in(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// One provider call: POST the body, surface provider errors verbatim.
    pub(crate) async fn post_account(&self, operation: &str, body: Value) -> AuthResult<Value> {
        let url = format!(
            "{}/v1/accounts:{}?key={}",
            self.config.api_base_url, operation, self.config.api_key
        );

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Network(format!("{operation} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<ErrorBody>(&text) {
                Ok(parsed) => AuthError::Provider {
                    code: parsed.error.code,
                    name: "AuthError".to_string(),
                    message: parsed.error.message,
                },
                Err(_) => {
                    AuthError::Network(format!("{operation} failed with status {status}: {text}"))
                }
            });
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::Network(format!("failed to parse {operation} response: {e}")))
    }

    fn map_error(&self, err: AuthError) -> ErrorObject {
        match err {
            AuthError::Provider {
                code,
                name,
                message,
            } => ErrorObject::provider(code, name, message, Severity::Error),
            AuthError::NotSignedIn => ErrorObject::custom(
                "auth/no-active-session",
                "No Active Session",
                "This Operation Requires a Signed-In User",
                Severity::Error,
            ),
            other => {
                debug!("Provider call failed without provider detail: {}", other);
                ErrorObject::unknown("Unknown", &self.config.default_error_message, Severity::Error)
            }
        }
    }

    /// Completes a sign-in/sign-up call: stores the session, returns the principal.
    async fn complete_sign_in(
        &self,
        response: Value,
        fallback_provider: &str,
    ) -> AuthResult<Principal> {
        let parsed: SignInResponse = serde_json::from_value(response)?;

        let principal = Principal {
            uid: parsed.local_id.clone(),
            display_name: parsed.display_name,
            email: parsed.email,
            email_verified: parsed.email_verified,
            phone_number: parsed.phone_number,
            photo_url: parsed.photo_url,
            provider_id: parsed
                .provider_id
                .unwrap_or_else(|| fallback_provider.to_string()),
        };

        *self.session.write().await = Some(Session {
            uid: parsed.local_id,
            id_token: parsed.id_token,
            refresh_token: parsed.refresh_token,
        });

        info!("Signed in: {}", principal.uid);
        Ok(principal)
    }

    /// Creates a new email/password account and signs it in.
    pub async fn sign_up_with_password(&self, email: &str, password: &str) -> OpResult<Principal> {
        let result = async {
            let response = self
                .post_account(
                    "signUp",
                    json!({ "email": email, "password": password, "returnSecureToken": true }),
                )
                .await?;
            self.complete_sign_in(response, "password").await
        }
        .await;

        result.map_err(|e| self.map_error(e))
    }

    /// Signs in an existing email/password account.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> OpResult<Principal> {
        let result = async {
            let response = self
                .post_account(
                    "signInWithPassword",
                    json!({ "email": email, "password": password, "returnSecureToken": true }),
                )
                .await?;
            self.complete_sign_in(response, "password").await
        }
        .await;

        result.map_err(|e| self.map_error(e))
    }

    /// Exchanges an OAuth provider credential for a session.
    ///
    /// This is the token-exchange leg of the popup flow: the UI obtains the
    /// provider's access token interactively and hands it to this call.
    pub async fn sign_in_with_oauth(
        &self,
        provider_id: &str,
        access_token: &str,
    ) -> OpResult<Principal> {
        let result = async {
            let response = self
                .post_account(
                    "signInWithIdp",
                    json!({
                        "providerId": provider_id,
                        "accessToken": access_token,
                        "returnSecureToken": true
                    }),
                )
                .await?;
            self.complete_sign_in(response, provider_id).await
        }
        .await;

        result.map_err(|e| self.map_error(e))
    }

    /// Signs the current user out, dropping the session.
    pub async fn sign_out(&self) -> OpResult<AuthMessage> {
        *self.session.write().await = None;
        info!("Signed out");
        Ok(AuthMessage {
            message: "User has successfully signed out!".to_string(),
        })
    }

    /// Asks the provider to email a verification link to the signed-in user.
    pub async fn send_verification_email(&self, principal: &Principal) -> OpResult<AuthMessage> {
        let result = async {
            let session = self.session().await.ok_or(AuthError::NotSignedIn)?;
            debug!("Requesting verification email for {}", principal.uid);
            self.post_account(
                "sendOobCode",
                json!({ "requestType": "VERIFY_EMAIL", "idToken": session.id_token }),
            )
            .await?;
            Ok(AuthMessage {
                message: "Success".to_string(),
            })
        }
        .await;

        result.map_err(|e| self.map_error(e))
    }

    /// Resolves the role custom claim for the active session.
    ///
    /// Returns `None` when the account carries no role attribute. Re-run
    /// whenever the principal changes; [`crate::RoleWatcher`] automates that.
    pub async fn resolve_role(&self) -> OpResult<Option<String>> {
        let result = async {
            let session = self.session().await.ok_or(AuthError::NotSignedIn)?;
            let response = self
                .post_account("lookup", json!({ "idToken": session.id_token }))
                .await?;

            let attributes = response
                .pointer("/users/0/customAttributes")
                .and_then(Value::as_str);
            let Some(attributes) = attributes else {
                return Ok(None);
            };

            let claims: Value = serde_json::from_str(attributes)?;
            Ok(claims
                .get("role")
                .and_then(Value::as_str)
                .map(str::to_string))
        }
        .await;

        result.map_err(|e| self.map_error(e))
    }
}
