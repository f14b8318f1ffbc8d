//! Shared HTTP plumbing for the poll service API.
//!
//! Builds the application's single cookie-jar `reqwest` client and wraps it
//! with bearer-token attachment plus a one-shot refresh-and-retry when the
//! server reports the access token expired. All typed endpoint wrappers in
//! this module's siblings go through these helpers.

use crate::auth::service::AuthService;
use crate::config::Config;
use crate::errors::{ClientError, ClientResult};
use crate::session::store::SessionStore;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Builds the process-wide HTTP client. The cookie store carries the
/// HTTP-only refresh credential between login and later refresh calls.
pub fn http_client(config: &Config) -> ClientResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .build()?;

    Ok(client)
}

pub struct ApiClient {
    http: reqwest::Client,
    config: Config,
    store: SessionStore,
    auth: Arc<AuthService>,
}

impl ApiClient {
    pub fn new(
        http: reqwest::Client,
        config: Config,
        store: SessionStore,
        auth: Arc<AuthService>,
    ) -> Self {
        ApiClient {
            http,
            config,
            store,
            auth,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    /// Starts a request with the current access token attached. Rebuilt on
    /// every attempt so a retry picks up a freshly minted token.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        let token = self.store.read().access_token;
        if token.is_empty() {
            builder
        } else {
            builder.bearer_auth(token)
        }
    }

    /// Sends a request; on 401/403 refreshes the session once and retries
    /// once. A failed refresh propagates `AuthenticationExpired`.
    async fn send_with_refresh<F>(&self, path: &str, build: F) -> ClientResult<reqwest::Response>
    where
        F: Fn(&Self) -> reqwest::RequestBuilder,
    {
        let response = build(self).send().await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!("access token rejected on {}, refreshing session", path);
            self.auth.refresh().await?;
            let retried = build(self).send().await?;
            return check_status(path, retried).await;
        }

        check_status(path, response).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self
            .send_with_refresh(path, |api| api.request(Method::GET, path))
            .await?;
        decode(path, response).await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self
            .send_with_refresh(path, |api| api.request(Method::POST, path).json(body))
            .await?;
        decode(path, response).await
    }

    /// POST for endpoints that answer with an empty or plain-text body.
    pub async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> ClientResult<()> {
        self.send_with_refresh(path, |api| api.request(Method::POST, path).json(body))
            .await?;
        Ok(())
    }

    /// POST a multipart form. The factory is invoked per attempt because a
    /// form cannot be reused once sent.
    pub async fn post_multipart<F>(&self, path: &str, make_form: F) -> ClientResult<()>
    where
        F: Fn() -> reqwest::multipart::Form,
    {
        self.send_with_refresh(path, |api| {
            api.request(Method::POST, path).multipart(make_form())
        })
        .await?;
        Ok(())
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self
            .send_with_refresh(path, |api| api.request(Method::DELETE, path))
            .await?;
        decode(path, response).await
    }

    pub async fn delete_unit(&self, path: &str) -> ClientResult<()> {
        self.send_with_refresh(path, |api| api.request(Method::DELETE, path))
            .await?;
        Ok(())
    }
}

async fn check_status(path: &str, response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::not_found("resource", path));
    }

    let message = response.text().await.unwrap_or_default();
    Err(ClientError::api(status.as_u16(), message))
}

async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> ClientResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|err| ClientError::malformed_response(format!("{}: {}", path, err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;
    use crate::session::store::SessionIdentity;
    use axum::http::{HeaderMap, header};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> (ApiClient, SessionStore) {
        let config = Config {
            api_base_url: base_url,
            request_timeout_seconds: 5,
            persist_path: "/tmp/unused".to_string(),
        };
        let store = SessionStore::new();
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap();
        let auth = Arc::new(AuthService::new(
            http.clone(),
            config.clone(),
            store.clone(),
        ));
        (ApiClient::new(http, config, store.clone(), auth), store)
    }

    fn stale_identity() -> SessionIdentity {
        SessionIdentity {
            username: "carol".to_string(),
            user_id: 7,
            access_token: "tok-stale".to_string(),
            roles: vec![Role::User],
        }
    }

    #[tokio::test]
    async fn bearer_token_is_attached_from_the_store() {
        let app = Router::new().route(
            "/whoami",
            get(|headers: HeaderMap| async move {
                let token = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                Json(serde_json::json!({ "authorization": token }))
            }),
        );
        let (api, store) = client_for(serve(app).await);
        store.write(stale_identity());

        let body: serde_json::Value = api.get_json("/whoami").await.unwrap();
        assert_eq!(body["authorization"], "Bearer tok-stale");
    }

    #[tokio::test]
    async fn expired_token_triggers_one_refresh_and_retry() {
        let data_calls = Arc::new(AtomicUsize::new(0));
        let refresh_calls = Arc::new(AtomicUsize::new(0));

        let seen_data = data_calls.clone();
        let seen_refresh = refresh_calls.clone();
        let app = Router::new()
            .route(
                "/polls/get",
                get(move |headers: HeaderMap| {
                    let seen = seen_data.clone();
                    async move {
                        seen.fetch_add(1, Ordering::SeqCst);
                        let fresh = headers
                            .get(header::AUTHORIZATION)
                            .and_then(|value| value.to_str().ok())
                            .map(|value| value == "Bearer tok-fresh")
                            .unwrap_or(false);
                        if fresh {
                            Json(serde_json::json!([])).into_response()
                        } else {
                            axum::http::StatusCode::UNAUTHORIZED.into_response()
                        }
                    }
                }),
            )
            .route(
                "/refresh",
                get(move || {
                    let seen = seen_refresh.clone();
                    async move {
                        seen.fetch_add(1, Ordering::SeqCst);
                        Json(serde_json::json!({
                            "id": 7,
                            "access_token": "tok-fresh",
                            "user": "carol",
                            "roles": "user"
                        }))
                    }
                }),
            );
        let (api, store) = client_for(serve(app).await);
        store.write(stale_identity());

        let body: Vec<serde_json::Value> = api.get_json("/polls/get").await.unwrap();
        assert!(body.is_empty());
        assert_eq!(data_calls.load(Ordering::SeqCst), 2);
        assert_eq!(refresh_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.read().access_token, "tok-fresh");
    }

    #[tokio::test]
    async fn failed_refresh_surfaces_authentication_expired() {
        let app = Router::new()
            .route(
                "/polls/get",
                get(|| async { axum::http::StatusCode::UNAUTHORIZED }),
            )
            .route(
                "/refresh",
                get(|| async { axum::http::StatusCode::UNAUTHORIZED }),
            );
        let (api, store) = client_for(serve(app).await);
        store.write(stale_identity());

        let error = api.get_json::<Vec<serde_json::Value>>("/polls/get").await;
        assert!(matches!(
            error,
            Err(ClientError::AuthenticationExpired { .. })
        ));
    }

    #[tokio::test]
    async fn missing_resources_map_to_not_found() {
        let (api, _store) = client_for(serve(Router::new()).await);

        let error = api.get_json::<serde_json::Value>("/polls/get/999").await;
        assert!(matches!(error, Err(ClientError::NotFound { .. })));
    }
}
