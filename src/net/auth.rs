//! Auth endpoints: the session refresh protocol plus sign-in, sign-out,
//! email verification, and password recovery.
//!
//! ARCHITECTURE
//! ============
//! The refresh protocol exchanges the long-lived credential — a cookie the
//! server set at login, carried by the shared cookie jar — for a fresh
//! access token. Claims are decoded from the token *before* anything is
//! written, so a malformed token rejects the whole refresh and the previous
//! session survives. None of the calls here attach a bearer header except
//! `logout`, which goes through the authenticated fetch path.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::net::fetch::ApiClient;

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl ApiClient {
    /// Exchange the refresh cookie for a new access token and store it with
    /// its decoded claims in one atomic update. Returns the new token.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Network`] when the endpoint is unreachable.
    /// - [`ApiError::RefreshFailed`] on a non-success status or a response
    ///   body without an `access_token`.
    /// - [`ApiError::ClaimsDecode`] when the token's claim segment is
    ///   malformed; the session is left untouched.
    pub async fn refresh(&self) -> Result<String, ApiError> {
        let response = self
            .http()
            .post(self.config().refresh_url())
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::RefreshFailed(format!("status {}", status.as_u16())));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::RefreshFailed(format!("bad refresh response: {e}")))?;

        self.session().set_from_token(&body.access_token)?;
        tracing::debug!("access token refreshed");
        Ok(body.access_token)
    }

    /// Sign in with email and password. The server sets the refresh cookie
    /// on this response (kept by the shared jar); the returned access token
    /// is stored together with its claims.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unexpected`] on a non-success status, [`ApiError::Network`]
    /// on transport failure, [`ApiError::ClaimsDecode`] on a malformed token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let response = self
            .http()
            .post(self.config().url("auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Unexpected { status: status.as_u16() });
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        self.session().set_from_token(&body.access_token)?;
        Ok(())
    }

    /// Sign out. The session store is cleared whether or not the server
    /// call succeeds; the server clears the refresh cookie on success.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unexpected`] when the server rejects the logout.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let url = self.config().url("auth/logout");
        let result = self.send(|c| c.post(&url)).await;
        self.session().clear();

        let response = result?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Unexpected { status: status.as_u16() })
        }
    }

    /// Verify a registration email with the query-carried token.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unexpected`] on a non-success status (the server's
    /// message is logged, not surfaced), [`ApiError::Network`] otherwise.
    pub async fn verify_email<T: DeserializeOwned>(&self, token: &str) -> Result<T, ApiError> {
        let url = self.config().url("auth/verify-email");
        let response = self
            .send(|c| c.post(&url).query(&[("token", token)]))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "verify email failed"))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str().map(String::from)))
                .unwrap_or_else(|| "Verification failed".to_string());
            tracing::error!(status = status.as_u16(), %message, "verify email rejected");
            return Err(ApiError::Unexpected { status: status.as_u16() });
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!(error = %e, "verify email response parse failed");
            ApiError::Network(e.to_string())
        })
    }

    /// Request a password-reset email.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unexpected`] on a non-success status.
    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        self.post_json_ok("auth/forgot-password", &serde_json::json!({ "email": email })).await
    }

    /// Reset the password with an emailed token.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unexpected`] on a non-success status.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), ApiError> {
        self.post_json_ok(
            "auth/reset-password",
            &serde_json::json!({ "token": token, "newPassword": new_password }),
        )
        .await
    }

    async fn post_json_ok(&self, path: &str, body: &serde_json::Value) -> Result<(), ApiError> {
        let response = self
            .http()
            .post(self.config().url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Unexpected { status: status.as_u16() })
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;
