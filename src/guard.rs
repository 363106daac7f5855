//! Route guard: the access-control decision evaluated before every
//! navigation.
//!
//! STATE MACHINE
//! =============
//! Effective states are unauthenticated, buyer, seller-without-id (a
//! degenerate token missing its `id` claim), and seller. One transition is
//! evaluated per navigation attempt:
//!
//! 1. No token in the store: run the silent refresh first. A missing or
//!    rejected refresh cookie just means an anonymous visitor; a transport
//!    or token-decode failure aborts the attempt with a forced sign-in.
//! 2. Classify the destination through the route table, apply the decision
//!    table, and on a denial populate the access notifier. The caller must
//!    cancel the in-flight navigation; the notifier's acknowledgement
//!    performs the redirect.
//!
//! Denials are flow control, not errors: `check` only returns `Err` when
//! the refresh protocol itself broke.

use crate::error::ApiError;
use crate::net::ApiClient;
use crate::routes::{AccessClass, HOME_PATH, RouteTable, SALE_ITEMS_PATH, SIGN_IN_PATH};
use crate::session::{Role, Session};

pub const MSG_SIGN_IN: &str = "Please sign in to continue.";
pub const MSG_SELLERS_ONLY: &str = "This page is available to sellers only.";
pub const MSG_RESTRICTED: &str = "Access restricted to sellers only.";

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the navigation complete.
    Allow,
    /// Cancel the navigation; present `message`, then redirect.
    Deny { message: String, redirect_to: String },
}

impl GuardDecision {
    fn deny(message: &str, redirect_to: &str) -> Self {
        Self::Deny { message: message.to_string(), redirect_to: redirect_to.to_string() }
    }

    #[must_use]
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Pure decision table over the current session and the destination's
/// declared access class.
#[must_use]
pub fn evaluate(session: &Session, access: AccessClass) -> GuardDecision {
    if access == AccessClass::Public {
        return GuardDecision::Allow;
    }
    match session.role {
        None => GuardDecision::deny(MSG_SIGN_IN, SIGN_IN_PATH),
        Some(Role::Buyer) => GuardDecision::deny(MSG_SELLERS_ONLY, SALE_ITEMS_PATH),
        Some(Role::Seller) if session.user_id.is_none() => {
            GuardDecision::deny(MSG_RESTRICTED, HOME_PATH)
        }
        Some(Role::Seller) => GuardDecision::Allow,
    }
}

/// Navigation gate wired to the shared client, session, and notifier.
#[derive(Clone)]
pub struct RouteGuard {
    client: ApiClient,
    table: RouteTable,
}

impl RouteGuard {
    #[must_use]
    pub fn new(client: ApiClient, table: RouteTable) -> Self {
        Self { client, table }
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// The shared client this guard refreshes and notifies through.
    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Evaluate one navigation attempt from `from` to `to`.
    ///
    /// On `Ok(Deny { .. })` the access notifier has already been populated;
    /// the caller cancels the navigation and leaves the redirect to the
    /// notifier's acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns the refresh protocol's error when the pre-evaluation silent
    /// refresh fails at the transport or token-decode level. A
    /// `SessionExpired` event has been emitted; the navigation must abort.
    pub async fn check(&self, to: &str, from: &str) -> Result<GuardDecision, ApiError> {
        if self.client.session().access_token().is_none() {
            match self.client.refresh().await {
                Ok(_) => {}
                // No (or expired) refresh cookie: an anonymous visitor, not
                // a broken session. Fall through and evaluate as such.
                Err(ApiError::RefreshFailed(reason)) => {
                    tracing::debug!(%reason, "silent refresh declined, continuing unauthenticated");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "silent refresh broke, aborting navigation");
                    self.client.notifier().session_expired(SIGN_IN_PATH);
                    return Err(e);
                }
            }
        }

        let session = self.client.session().snapshot();
        let decision = evaluate(&session, self.table.classify(to));

        if let GuardDecision::Deny { message, redirect_to } = &decision {
            tracing::debug!(%to, %redirect_to, "navigation denied");
            self.client.notifier().open(message, from, Some(redirect_to));
        }
        Ok(decision)
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;
