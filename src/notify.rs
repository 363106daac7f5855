//! Access-denial notifier: a singleton flag/message/return-path triple plus
//! an event channel for the presentation layer.
//!
//! ARCHITECTURE
//! ============
//! The guard and the fetch layer never touch UI state directly. They emit
//! [`AccessEvent`]s through this hub; a modal (or any other presenter)
//! subscribes, shows the message, and calls [`AccessNotifier::acknowledge`]
//! to learn where to redirect. Events fan out to every live subscriber over
//! unbounded mpsc senders; closed subscribers are dropped on the next emit.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

/// Singleton denial state read by the presenting modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessDenial {
    /// Whether the modal should currently be shown.
    pub visible: bool,
    /// User-facing denial message.
    pub message: String,
    /// Path the presenter navigates to on acknowledgement.
    pub return_path: String,
}

/// Events emitted by the route guard and the authenticated fetch layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessEvent {
    /// A navigation was denied; present the message, then redirect.
    Denied { message: String, return_path: String },
    /// Refresh failed and the session was cleared; force a sign-in redirect.
    SessionExpired { redirect_to: String },
}

struct NotifierInner {
    state: AccessDenial,
    subscribers: Vec<mpsc::UnboundedSender<AccessEvent>>,
}

/// Shared pub/sub hub for access-denial events.
#[derive(Clone)]
pub struct AccessNotifier {
    inner: Arc<Mutex<NotifierInner>>,
}

impl AccessNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(NotifierInner {
                state: AccessDenial::default(),
                subscribers: Vec::new(),
            })),
        }
    }

    /// Subscribe to future access events.
    #[must_use]
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<AccessEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().subscribers.push(tx);
        rx
    }

    /// Open the denial modal. The stored return path is `redirect_to` when
    /// given, otherwise the origin path, otherwise `/`.
    pub fn open(&self, message: &str, prev_path: &str, redirect_to: Option<&str>) {
        let return_path = match redirect_to {
            Some(p) if !p.is_empty() => p.to_string(),
            _ if !prev_path.is_empty() => prev_path.to_string(),
            _ => "/".to_string(),
        };

        let mut inner = self.lock();
        inner.state = AccessDenial {
            visible: true,
            message: message.to_string(),
            return_path: return_path.clone(),
        };
        Self::emit(&mut inner, AccessEvent::Denied { message: message.to_string(), return_path });
    }

    /// Signal that the session is gone and the user must sign in again.
    pub fn session_expired(&self, redirect_to: &str) {
        let mut inner = self.lock();
        Self::emit(&mut inner, AccessEvent::SessionExpired { redirect_to: redirect_to.to_string() });
    }

    /// Close the modal and return the path the presenter should redirect to.
    /// Falls back to `/` when no return path was recorded.
    pub fn acknowledge(&self) -> String {
        let mut inner = self.lock();
        inner.state.visible = false;
        if inner.state.return_path.is_empty() {
            "/".to_string()
        } else {
            inner.state.return_path.clone()
        }
    }

    /// Snapshot of the current denial state.
    #[must_use]
    pub fn state(&self) -> AccessDenial {
        self.lock().state.clone()
    }

    fn emit(inner: &mut NotifierInner, event: AccessEvent) {
        inner.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, NotifierInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for AccessNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;
