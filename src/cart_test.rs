use rust_decimal_macros::dec;

use super::*;

fn product(sale_item_id: &str, seller_id: Option<i64>, price: Decimal) -> CartProduct {
    CartProduct {
        sale_item_id: sale_item_id.into(),
        model: "Phone X".into(),
        brand_name: "Acme".into(),
        color: None,
        price,
        seller: seller_id.map(|id| Seller { id, nickname: format!("seller-{id}") }),
    }
}

// =============================================================================
// add_to_cart
// =============================================================================

#[test]
fn add_same_sale_item_merges_quantities() {
    let mut store = CartStore::new();
    store.add_to_cart(product("A", Some(1), dec!(10)), 2);
    store.add_to_cart(product("A", Some(1), dec!(10)), 3);

    assert_eq!(store.carts().len(), 1);
    assert_eq!(store.carts()[0].cart_items.len(), 1);
    assert_eq!(store.carts()[0].cart_items[0].order_quantity, 5);
}

#[test]
fn different_sellers_get_distinct_carts() {
    let mut store = CartStore::new();
    store.add_to_cart(product("A", Some(1), dec!(10)), 1);
    store.add_to_cart(product("B", Some(2), dec!(20)), 1);

    assert_eq!(store.carts().len(), 2);
}

#[test]
fn products_without_seller_share_one_cart() {
    let mut store = CartStore::new();
    store.add_to_cart(product("A", None, dec!(10)), 1);
    store.add_to_cart(product("B", None, dec!(20)), 1);

    assert_eq!(store.carts().len(), 1);
    assert!(store.carts()[0].seller.is_none());
    assert_eq!(store.carts()[0].cart_items.len(), 2);
}

#[test]
fn merge_keeps_the_original_line_id() {
    let mut store = CartStore::new();
    let first = store.add_to_cart(product("A", Some(1), dec!(10)), 1);
    let second = store.add_to_cart(product("A", Some(1), dec!(10)), 1);
    assert_eq!(first, second);
}

#[test]
fn zero_quantity_add_is_floored_to_one() {
    let mut store = CartStore::new();
    store.add_to_cart(product("A", Some(1), dec!(10)), 0);
    assert_eq!(store.total_items(), 1);
}

#[test]
fn numeric_and_string_sale_item_ids_compare_equal() {
    let mut store = CartStore::new();
    store.add_to_cart(product("7", Some(1), dec!(10)), 1);

    let mut numeric = product("x", Some(1), dec!(10));
    numeric.sale_item_id = SaleItemId::from(7);
    store.add_to_cart(numeric, 1);

    assert_eq!(store.carts()[0].cart_items.len(), 1);
    assert_eq!(store.carts()[0].cart_items[0].order_quantity, 2);
}

// =============================================================================
// update_quantity
// =============================================================================

#[test]
fn update_quantity_sets_the_matching_line() {
    let mut store = CartStore::new();
    let id = store.add_to_cart(product("A", Some(1), dec!(10)), 1);
    store.update_quantity(id, 4);
    assert_eq!(store.carts()[0].cart_items[0].order_quantity, 4);
}

#[test]
fn update_quantity_unknown_id_is_noop() {
    let mut store = CartStore::new();
    store.add_to_cart(product("A", Some(1), dec!(10)), 2);
    store.update_quantity(Uuid::new_v4(), 9);
    assert_eq!(store.carts()[0].cart_items[0].order_quantity, 2);
}

// =============================================================================
// remove_item
// =============================================================================

#[test]
fn removing_last_line_prunes_the_cart() {
    let mut store = CartStore::new();
    let id = store.add_to_cart(product("A", Some(1), dec!(10)), 1);
    store.add_to_cart(product("B", Some(2), dec!(20)), 1);

    store.remove_item(id);

    assert_eq!(store.carts().len(), 1);
    assert_eq!(store.carts()[0].seller.as_ref().map(|s| s.id), Some(2));
}

#[test]
fn removing_one_of_two_lines_keeps_the_cart() {
    let mut store = CartStore::new();
    let id = store.add_to_cart(product("A", Some(1), dec!(10)), 1);
    store.add_to_cart(product("B", Some(1), dec!(20)), 1);

    store.remove_item(id);

    assert_eq!(store.carts().len(), 1);
    assert_eq!(store.carts()[0].cart_items.len(), 1);
}

#[test]
fn remove_unknown_id_is_noop() {
    let mut store = CartStore::new();
    store.add_to_cart(product("A", Some(1), dec!(10)), 1);
    store.remove_item(Uuid::new_v4());
    assert_eq!(store.carts().len(), 1);
}

// =============================================================================
// totals
// =============================================================================

#[test]
fn totals_sum_quantity_and_price_times_quantity() {
    let mut store = CartStore::new();
    store.add_to_cart(product("A", Some(1), dec!(10)), 2);
    store.add_to_cart(product("B", Some(2), dec!(5)), 1);

    assert_eq!(store.total_items(), 3);
    assert_eq!(store.total_price(), dec!(25));
}

#[test]
fn totals_on_empty_store_are_zero() {
    let store = CartStore::new();
    assert_eq!(store.total_items(), 0);
    assert_eq!(store.total_price(), Decimal::ZERO);
}

// =============================================================================
// lookup / clear
// =============================================================================

#[test]
fn item_by_sale_item_id_searches_all_carts() {
    let mut store = CartStore::new();
    store.add_to_cart(product("A", Some(1), dec!(10)), 1);
    store.add_to_cart(product("B", Some(2), dec!(20)), 3);

    let line = store.item_by_sale_item_id(&"B".into()).unwrap();
    assert_eq!(line.order_quantity, 3);
    assert!(store.item_by_sale_item_id(&"Z".into()).is_none());
}

#[test]
fn clear_twice_is_idempotent() {
    let mut store = CartStore::new();
    store.add_to_cart(product("A", Some(1), dec!(10)), 1);

    store.clear();
    assert!(store.carts().is_empty());
    store.clear();
    assert!(store.carts().is_empty());
}

// =============================================================================
// wire format
// =============================================================================

#[test]
fn sale_item_id_deserializes_from_number_or_string() {
    let from_number: SaleItemId = serde_json::from_str("12").unwrap();
    let from_string: SaleItemId = serde_json::from_str("\"12\"").unwrap();
    assert_eq!(from_number, from_string);
}

#[test]
fn cart_product_deserializes_camel_case() {
    let json = serde_json::json!({
        "saleItemId": 3,
        "model": "Phone X",
        "brandName": "Acme",
        "price": "499.99",
        "seller": { "id": 1, "nickname": "nina" }
    });
    let p: CartProduct = serde_json::from_value(json).unwrap();
    assert_eq!(p.sale_item_id, SaleItemId::from(3));
    assert_eq!(p.price, dec!(499.99));
    assert_eq!(p.seller.unwrap().id, 1);
}
