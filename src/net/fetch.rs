//! Authenticated fetch: bearer attachment plus the single silent-refresh
//! retry on 401.
//!
//! DESIGN
//! ======
//! Callers hand over a request *builder closure* rather than a built
//! request, because a retry after refresh must reconstruct the request
//! (bodies, multipart forms) with the new bearer token. Within one call
//! there is at most one refresh attempt and one retry, strictly in that
//! order; a second 401 — or any other status — is returned as-is.
//!
//! A 401 from the refresh endpoint itself is never retried: that is the
//! refresh protocol failing, not an expired access token.

use std::time::Duration;

use reqwest::StatusCode;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::notify::AccessNotifier;
use crate::routes::SIGN_IN_PATH;
use crate::session::SessionStore;

/// Shared HTTP client: reqwest client with cookie jar (the long-lived
/// refresh credential rides along as a cookie), config, session store, and
/// the access notifier for forced sign-in events.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    session: SessionStore,
    notifier: AccessNotifier,
}

impl ApiClient {
    /// Build the client with the configured timeouts and a cookie store.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if reqwest cannot construct
    /// the underlying client.
    pub fn new(
        config: ApiConfig,
        session: SessionStore,
        notifier: AccessNotifier,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config, session, notifier })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub fn notifier(&self) -> &AccessNotifier {
        &self.notifier
    }

    /// Raw reqwest client, shared cookie jar included. Used by the auth
    /// endpoints that must not carry a bearer header.
    #[must_use]
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Send an authenticated request.
    ///
    /// Attaches `Authorization: Bearer <token>` when the store holds one
    /// (caller-set headers are preserved; the closure owns them). On a 401
    /// that did not come from the refresh endpoint, runs the refresh
    /// protocol once and retries the rebuilt request exactly once. On
    /// refresh failure the session is cleared, a `SessionExpired` event is
    /// emitted, and the refresh error propagates.
    ///
    /// # Errors
    ///
    /// [`ApiError::Network`] for transport failures, or the refresh
    /// protocol's error when the silent refresh fails.
    pub async fn send<F>(&self, build: F) -> Result<reqwest::Response, ApiError>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let response = self.execute(&build).await?;

        if response.status() != StatusCode::UNAUTHORIZED
            || response.url().as_str().contains("/auth/refresh")
        {
            return Ok(response);
        }

        tracing::debug!(url = %response.url(), "401 received, attempting silent refresh");
        match self.refresh().await {
            Ok(_) => {
                // New token is in the store; rebuild and retry once.
                self.execute(&build).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "silent refresh failed, forcing sign-out");
                self.session.clear();
                self.notifier.session_expired(SIGN_IN_PATH);
                Err(e)
            }
        }
    }

    async fn execute<F>(&self, build: &F) -> Result<reqwest::Response, ApiError>
    where
        F: Fn(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let mut builder = build(&self.http);
        if let Some(token) = self.session.access_token() {
            builder = builder.bearer_auth(token);
        }
        builder.send().await.map_err(|e| ApiError::Network(e.to_string()))
    }
}

#[cfg(test)]
#[path = "fetch_test.rs"]
mod fetch_test;
