//! Core client-side authentication operations.
//!
//! The service owns the network half of the session lifecycle: login,
//! registration, token refresh, and logout. The refresh credential itself is
//! an HTTP-only cookie held by the transport's cookie jar; this code never
//! reads it, it only relies on the jar attaching it to requests.

use crate::auth::models::{IdentityResponse, LoginRequest, RegisterRequest};
use crate::config::Config;
use crate::errors::{ClientError, ClientResult};
use crate::session::store::{SessionIdentity, SessionStore};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::warn;
use validator::{Validate, ValidationErrors};

/// Seam for the token refresh operation, mockable in tests.
#[async_trait]
pub trait RefreshSession: Send + Sync {
    /// Performs the single refresh round trip without touching the store.
    async fn refresh_identity(&self) -> ClientResult<SessionIdentity>;
}

/// Authentication service for the login, refresh, and logout flows
pub struct AuthService {
    http: reqwest::Client,
    config: Config,
    store: SessionStore,
}

impl AuthService {
    /// Create a new AuthService instance sharing the application's
    /// cookie-jar HTTP client and session store.
    pub fn new(http: reqwest::Client, config: Config, store: SessionStore) -> Self {
        AuthService {
            http,
            config,
            store,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    /// Authenticate with the submitted credentials and publish the resulting
    /// identity to the session store.
    pub async fn login(&self, login_request: LoginRequest) -> ClientResult<SessionIdentity> {
        if let Err(validation_errors) = login_request.validate() {
            return Err(ClientError::validation(validation_message(validation_errors)));
        }

        let response = self
            .http
            .post(self.url("/login"))
            .basic_auth(&login_request.username, Some(&login_request.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::api(status.as_u16(), message));
        }

        let body = response
            .json::<IdentityResponse>()
            .await
            .map_err(|err| ClientError::malformed_response(format!("login response: {}", err)))?;

        // The login response carries an empty `user` field; the submitted
        // username is authoritative here.
        let mut identity = body.into_identity();
        if identity.username.is_empty() {
            identity.username = login_request.username;
        }

        self.store.write(identity.clone());
        Ok(identity)
    }

    /// Create a new account. The caller logs in separately afterwards.
    pub async fn register(&self, register_request: RegisterRequest) -> ClientResult<()> {
        if let Err(validation_errors) = register_request.validate() {
            return Err(ClientError::validation(validation_message(validation_errors)));
        }

        let response = self
            .http
            .post(self.url("/register"))
            .basic_auth(&register_request.username, Some(&register_request.password))
            .json(&serde_json::json!({ "email": register_request.email }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::api(status.as_u16(), message));
        }

        Ok(())
    }

    /// Exchange the ambient refresh credential for a fresh identity and
    /// publish it to the session store.
    pub async fn refresh(&self) -> ClientResult<SessionIdentity> {
        let identity = self.refresh_identity().await?;
        self.store.write(identity.clone());
        Ok(identity)
    }

    /// Clear the local session, then tell the server to drop the refresh
    /// credential. The local clear happens regardless of the call's outcome.
    pub async fn logout(&self) {
        self.store.clear();

        match self.http.get(self.url("/logout")).send().await {
            Ok(response) if !response.status().is_success() => {
                warn!("logout request returned {}", response.status());
            }
            Ok(_) => {}
            Err(err) => warn!("logout request failed: {}", err),
        }
    }
}

#[async_trait]
impl RefreshSession for AuthService {
    async fn refresh_identity(&self) -> ClientResult<SessionIdentity> {
        let response = self.http.get(self.url("/refresh")).send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::authentication_expired(
                "refresh credential rejected",
            ));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::api(status.as_u16(), message));
        }

        match response.json::<IdentityResponse>().await {
            Ok(body) => Ok(body.into_identity()),
            Err(err) => {
                warn!("refresh returned a malformed identity payload: {}", err);
                Err(ClientError::authentication_expired(
                    "malformed identity response",
                ))
            }
        }
    }
}

fn validation_message(validation_errors: ValidationErrors) -> String {
    let error_messages: Vec<String> = validation_errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                format!(
                    "{}: {}",
                    field,
                    error.message.as_ref().unwrap_or(&"Invalid value".into())
                )
            })
        })
        .collect();

    error_messages.join(", ")
}
