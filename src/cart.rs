//! In-memory shopping cart grouped by seller.
//!
//! DESIGN
//! ======
//! Carts are an ordered list of per-seller groups; each group holds the
//! lines for that seller. Everything is synchronous and single-writer (the
//! UI thread drives it), so the store is a plain struct with `&mut self`
//! operations and derived read-only totals.
//!
//! INVARIANTS
//! ==========
//! - One cart per seller identity; products without a seller share a cart.
//! - No two lines in a cart share a sale-item id: adding the same item
//!   again increments the line's quantity instead.
//! - A cart emptied by a removal is pruned immediately.
//! - Line quantities are always at least 1.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// PRODUCT TYPES
// =============================================================================

/// Sale-item identifier. Kept as a string because the API serves it as a
/// JSON number in some payloads and a string in others; comparison is
/// always textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SaleItemId(pub String);

impl<'de> Deserialize<'de> for SaleItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) => Ok(Self(s)),
            serde_json::Value::Number(n) => Ok(Self(n.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "expected string or number for sale item id, got {other}"
            ))),
        }
    }
}

impl From<&str> for SaleItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<i64> for SaleItemId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl std::fmt::Display for SaleItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Seller identity attached to a sale item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seller {
    pub id: i64,
    #[serde(default)]
    pub nickname: String,
}

/// Product fields carried into a cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    pub sale_item_id: SaleItemId,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub brand_name: String,
    #[serde(default)]
    pub color: Option<String>,
    /// Unit price; never negative.
    pub price: Decimal,
    #[serde(default)]
    pub seller: Option<Seller>,
}

// =============================================================================
// CART TYPES
// =============================================================================

/// One line in a seller's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Unique per line, assigned on insert; the handle for quantity updates
    /// and removal.
    pub cart_id: Uuid,
    #[serde(flatten)]
    pub product: CartProduct,
    pub order_quantity: u32,
}

/// All lines for one seller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub seller: Option<Seller>,
    pub cart_items: Vec<CartItem>,
}

// =============================================================================
// CART STORE
// =============================================================================

/// The cart aggregate: per-seller carts plus derived totals.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    carts: Vec<Cart>,
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self { carts: Vec::new() }
    }

    /// Current carts, in insertion order.
    #[must_use]
    pub fn carts(&self) -> &[Cart] {
        &self.carts
    }

    /// Replace the whole collection (e.g. restored from a draft order).
    pub fn set_carts(&mut self, carts: Vec<Cart>) {
        self.carts = carts;
    }

    /// Add `qty` of a product. Locates or creates the cart for the product's
    /// seller, then merges into an existing line for the same sale item or
    /// inserts a new one. Returns the line's cart id.
    pub fn add_to_cart(&mut self, product: CartProduct, qty: u32) -> Uuid {
        let qty = qty.max(1);
        let seller_id = product.seller.as_ref().map(|s| s.id);

        let idx = match self
            .carts
            .iter()
            .position(|c| c.seller.as_ref().map(|s| s.id) == seller_id)
        {
            Some(i) => i,
            None => {
                self.carts.push(Cart { seller: product.seller.clone(), cart_items: Vec::new() });
                self.carts.len() - 1
            }
        };
        let cart = &mut self.carts[idx];

        if let Some(line) = cart
            .cart_items
            .iter_mut()
            .find(|i| i.product.sale_item_id == product.sale_item_id)
        {
            line.order_quantity += qty;
            return line.cart_id;
        }

        let cart_id = Uuid::new_v4();
        cart.cart_items.push(CartItem { cart_id, product, order_quantity: qty });
        cart_id
    }

    /// Set a line's quantity (floored at 1). No-op when the id is unknown.
    pub fn update_quantity(&mut self, cart_id: Uuid, new_qty: u32) {
        for cart in &mut self.carts {
            if let Some(line) = cart.cart_items.iter_mut().find(|i| i.cart_id == cart_id) {
                line.order_quantity = new_qty.max(1);
                return;
            }
        }
    }

    /// Remove the line with the given id, then prune any cart left empty.
    pub fn remove_item(&mut self, cart_id: Uuid) {
        for cart in &mut self.carts {
            cart.cart_items.retain(|i| i.cart_id != cart_id);
        }
        self.carts.retain(|c| !c.cart_items.is_empty());
    }

    /// First line matching the sale-item id, searching every cart.
    #[must_use]
    pub fn item_by_sale_item_id(&self, sale_item_id: &SaleItemId) -> Option<&CartItem> {
        self.carts
            .iter()
            .flat_map(|c| c.cart_items.iter())
            .find(|i| i.product.sale_item_id == *sale_item_id)
    }

    /// Total quantity across every cart.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.carts
            .iter()
            .flat_map(|c| c.cart_items.iter())
            .map(|i| u64::from(i.order_quantity))
            .sum()
    }

    /// Sum of price x quantity across every line.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.carts
            .iter()
            .flat_map(|c| c.cart_items.iter())
            .map(|i| i.product.price * Decimal::from(i.order_quantity))
            .sum()
    }

    /// Reset to empty. Idempotent.
    pub fn clear(&mut self) {
        self.carts.clear();
    }
}

#[cfg(test)]
#[path = "cart_test.rs"]
mod cart_test;
