//! HTTP layer: authenticated fetch, session refresh, and the typed item
//! endpoint helpers built on top of them.

pub mod auth;
pub mod fetch;
pub mod items;

pub use fetch::ApiClient;
pub use items::{Body, FormPart};
