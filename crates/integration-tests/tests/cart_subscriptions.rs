//! Integration tests for cart subscriptions.
//!
//! These drive a shopper session through the engine and check what a cart
//! badge, a total label and a cart drawer would have rendered.

use leon_cart::{CartEngine, CartLineItem, MemoryStore};
use leon_integration_tests::{Recorder, fixture};
use rust_decimal::Decimal;

#[test]
fn test_shopper_session_notifications() {
    let mut cart = CartEngine::open(MemoryStore::new()).unwrap();

    let badge = Recorder::<u64>::new();
    let total = Recorder::<Decimal>::new();
    let drawer = Recorder::<bool>::new();
    let _badge = cart.subscribe_item_count(badge.listener());
    let _total = cart.subscribe_total(total.listener());
    let _drawer = cart.subscribe_open(drawer.listener());

    cart.add_one(fixture("espadin-clasico")).unwrap();
    cart.open_cart();
    cart.add_one(fixture("espadin-clasico")).unwrap();
    cart.add_to_cart(fixture("madre-dulce"), 1).unwrap();
    cart.close_cart();
    cart.update_quantity("1", 1).unwrap();
    cart.clear_cart().unwrap();

    assert_eq!(badge.values(), vec![0, 1, 2, 3, 2, 0]);
    assert_eq!(
        total.values(),
        vec![
            Decimal::ZERO,
            Decimal::new(8500, 2),
            Decimal::new(17000, 2),
            Decimal::new(23000, 2),
            Decimal::new(14500, 2),
            Decimal::ZERO,
        ]
    );
    assert_eq!(drawer.values(), vec![false, true, false]);
}

#[test]
fn test_item_listeners_see_committed_state() {
    let mut cart = CartEngine::open(MemoryStore::new()).unwrap();
    let items = Recorder::<Vec<CartLineItem>>::new();
    let _sub = cart.subscribe_items(items.listener());

    cart.add_to_cart(fixture("tobala-silvestre"), 2).unwrap();
    cart.remove_from_cart("2").unwrap();

    let seen = items.values();
    assert_eq!(seen.len(), 3);
    assert!(seen[0].is_empty());
    assert_eq!(seen[1][0].quantity, 2);
    assert_eq!(seen[1][0].subtotal, Decimal::new(33000, 2));
    assert!(seen[2].is_empty());
}

#[test]
fn test_unsubscribed_listener_goes_quiet() {
    let mut cart = CartEngine::open(MemoryStore::new()).unwrap();
    let badge = Recorder::<u64>::new();
    let sub = cart.subscribe_item_count(badge.listener());

    cart.add_one(fixture("ensamble-especial")).unwrap();
    assert!(cart.unsubscribe(sub));
    cart.add_one(fixture("ensamble-especial")).unwrap();

    assert_eq!(badge.values(), vec![0, 1]);
    assert_eq!(cart.item_count(), 2);
}
