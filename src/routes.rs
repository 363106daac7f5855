//! Route table with declared access classes.
//!
//! DESIGN
//! ======
//! Access policy is attached to each route at registration time instead of
//! being inferred from path shape at navigation time. Classification is a
//! linear scan over registered patterns (first match wins); the table is a
//! dozen entries, so no index is warranted. Paths not registered at all are
//! treated as public — the guard only restricts what a route declared.

/// Sign-in page, the redirect target for forced sign-outs.
pub const SIGN_IN_PATH: &str = "/signin";
/// Sale-item gallery, where denied buyers are sent back to.
pub const SALE_ITEMS_PATH: &str = "/sale-items";
/// Home page.
pub const HOME_PATH: &str = "/";

/// Access class attached to a route at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessClass {
    /// Anyone may navigate here, signed in or not.
    Public,
    /// Restricted to the seller role.
    SellerOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param,
}

/// One registered route: a `/sale-items/:id/edit` style pattern plus its
/// declared access class.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: String,
    segments: Vec<Segment>,
    access: AccessClass,
}

impl Route {
    fn new(pattern: &str, access: AccessClass) -> Self {
        let segments = pattern
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s.starts_with(':') {
                    Segment::Param
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect();
        Self { pattern: pattern.to_string(), segments, access }
    }

    /// The pattern this route was registered with.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Declared access class.
    #[must_use]
    pub fn access(&self) -> AccessClass {
        self.access
    }

    fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.trim_matches('/').split('/').filter(|s| !s.is_empty()).collect();
        if parts.len() != self.segments.len() {
            return false;
        }
        self.segments.iter().zip(&parts).all(|(seg, part)| match seg {
            Segment::Literal(lit) => lit == part,
            Segment::Param => true,
        })
    }
}

// =============================================================================
// ROUTE TABLE
// =============================================================================

/// Ordered route registrations consulted by the guard.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// The application's route table. Seller-only pages are the sale-item
    /// and brand management views; `/profile/:id/edit` is deliberately
    /// public-class (a signed-in buyer edits their own profile there).
    #[must_use]
    pub fn marketplace() -> Self {
        let mut table = Self::new();
        table.register("/", AccessClass::Public);
        table.register("/sale-items", AccessClass::Public);
        table.register("/sale-items/list", AccessClass::SellerOnly);
        table.register("/sale-items/add", AccessClass::SellerOnly);
        table.register("/sale-items/:id/edit", AccessClass::SellerOnly);
        table.register("/sale-items/:id", AccessClass::Public);
        table.register("/brands", AccessClass::SellerOnly);
        table.register("/brands/add", AccessClass::SellerOnly);
        table.register("/brands/:id/edit", AccessClass::SellerOnly);
        table.register("/register", AccessClass::Public);
        table.register("/verify-email", AccessClass::Public);
        table.register("/signin", AccessClass::Public);
        table.register("/authentications", AccessClass::Public);
        table.register("/profile", AccessClass::Public);
        table.register("/profile/:id/edit", AccessClass::Public);
        table.register("/cart", AccessClass::Public);
        table.register("/your-orders", AccessClass::Public);
        table.register("/your-orders/:order_id", AccessClass::Public);
        table.register("/sale-orders", AccessClass::Public);
        table.register("/sale-orders/:order_id", AccessClass::Public);
        table.register("/reset-password", AccessClass::Public);
        table
    }

    /// Register a route pattern with its access class. Order matters:
    /// `/sale-items/add` must come before `/sale-items/:id`.
    pub fn register(&mut self, pattern: &str, access: AccessClass) {
        self.routes.push(Route::new(pattern, access));
    }

    /// Access class of a destination path. First matching registration wins;
    /// unregistered destinations are public.
    #[must_use]
    pub fn classify(&self, path: &str) -> AccessClass {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        self.routes
            .iter()
            .find(|r| r.matches(path))
            .map_or(AccessClass::Public, Route::access)
    }

    /// Registered routes, in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;
