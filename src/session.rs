//! Session store: access token plus the identity claims derived from it.
//!
//! ARCHITECTURE
//! ============
//! The store is an explicitly owned, cloneable handle (`Arc<Mutex<..>>`)
//! injected into the fetch layer and the route guard, rather than ambient
//! browser-style storage. All mutation goes through the handle, so the
//! token and its derived claims can be written in one locked section.
//!
//! INVARIANT
//! =========
//! `access_token` absent implies every derived claim is absent. A refresh
//! whose claim segment fails to decode rejects the whole update and leaves
//! the previous session intact.

use std::sync::{Arc, Mutex, PoisonError};

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// =============================================================================
// ROLE + SESSION
// =============================================================================

/// A signed-in user is either a buyer or a seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
}

impl Role {
    /// Parse the role string carried in the token's `authorities` list.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            r if r.eq_ignore_ascii_case("buyer") => Some(Self::Buyer),
            r if r.eq_ignore_ascii_case("seller") => Some(Self::Seller),
            _ => None,
        }
    }
}

/// Snapshot of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: Option<String>,
    pub nickname: Option<String>,
    pub user_id: Option<String>,
    pub role: Option<Role>,
}

impl Session {
    /// Whether an access token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

// =============================================================================
// SESSION STORE
// =============================================================================

struct SessionInner {
    session: Session,
    view_mode: Option<String>,
}

/// Shared handle to the process-wide session state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<SessionInner>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionInner { session: Session::default(), view_mode: None })),
        }
    }

    /// Current access token, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.lock().session.access_token.clone()
    }

    /// Full snapshot of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.lock().session.clone()
    }

    /// Current role claim, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.lock().session.role
    }

    /// Current user-id claim, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<String> {
        self.lock().session.user_id.clone()
    }

    /// Current nickname claim, if any.
    #[must_use]
    pub fn nickname(&self) -> Option<String> {
        self.lock().session.nickname.clone()
    }

    /// Decode `token` and store it together with its claims in one write.
    ///
    /// The middle segment of the three-segment token is treated as an opaque
    /// base64url-encoded JSON payload carrying `nickname`, `id`, and an
    /// `authorities` list whose first entry names the role. Individual
    /// missing claims are tolerated; a structurally undecodable segment
    /// rejects the whole update.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClaimsDecode`] when the token does not have three
    /// segments or the payload is not base64url-encoded JSON. The previous
    /// session is left untouched in that case.
    pub fn set_from_token(&self, token: &str) -> Result<(), ApiError> {
        let claims = decode_claims(token)?;
        let mut inner = self.lock();
        inner.session = Session {
            access_token: Some(token.to_string()),
            nickname: claims.nickname,
            user_id: claims.user_id,
            role: claims.role,
        };
        Ok(())
    }

    /// Clear the token, every derived claim, and the view mode.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.session = Session::default();
        inner.view_mode = None;
    }

    /// UI view-mode preference stored alongside the session.
    #[must_use]
    pub fn view_mode(&self) -> Option<String> {
        self.lock().view_mode.clone()
    }

    pub fn set_view_mode(&self, mode: impl Into<String>) {
        self.lock().view_mode = Some(mode.into());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// CLAIM DECODING
// =============================================================================

struct DecodedClaims {
    nickname: Option<String>,
    user_id: Option<String>,
    role: Option<Role>,
}

/// Decode the claim payload of a three-segment token. Signature is NOT
/// verified here — the server is the authority; the client only derives
/// display identity from the payload.
fn decode_claims(token: &str) -> Result<DecodedClaims, ApiError> {
    let mut segments = token.split('.');
    let (Some(_), Some(payload), Some(_), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(ApiError::ClaimsDecode("token does not have three segments".into()));
    };

    // Tokens arrive both padded and unpadded in the wild; strip before decode.
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| ApiError::ClaimsDecode(format!("payload is not base64url: {e}")))?;

    let json: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::ClaimsDecode(format!("payload is not JSON: {e}")))?;

    let nickname = json.get("nickname").and_then(value_to_string);
    let user_id = json.get("id").and_then(value_to_string);
    let role = json
        .get("authorities")
        .and_then(|a| a.get(0))
        .and_then(|entry| entry.get("role"))
        .and_then(serde_json::Value::as_str)
        .and_then(Role::parse);

    Ok(DecodedClaims { nickname, user_id, role })
}

/// Claims like `id` show up as either JSON strings or numbers.
fn value_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
