//! Client-side core for the marketplace web app.
//!
//! ARCHITECTURE
//! ============
//! The UI is an external collaborator; this crate owns the non-trivial
//! control flow behind it:
//!
//! - [`session`]: injected session store — access token plus derived claims.
//! - [`net`]: authenticated fetch with the single silent-refresh retry on
//!   401, the refresh protocol, and typed item endpoints.
//! - [`routes`] + [`guard`]: per-route declared access classes and the
//!   decision table evaluated before every navigation.
//! - [`notify`]: access-denial event channel consumed by the presenting
//!   modal.
//! - [`cart`]: in-memory per-seller cart aggregation with derived totals.
//!
//! Everything is single-writer from the UI's point of view; the shared
//! handles exist so the fetch layer, the guard, and the presenter observe
//! one session and one denial state.

pub mod cart;
pub mod config;
pub mod error;
pub mod guard;
pub mod net;
pub mod notify;
pub mod routes;
pub mod session;

pub use cart::{Cart, CartItem, CartProduct, CartStore, SaleItemId, Seller};
pub use config::ApiConfig;
pub use error::ApiError;
pub use guard::{GuardDecision, RouteGuard, evaluate};
pub use net::{ApiClient, Body, FormPart};
pub use notify::{AccessDenial, AccessEvent, AccessNotifier};
pub use routes::{AccessClass, RouteTable};
pub use session::{Role, Session, SessionStore};
