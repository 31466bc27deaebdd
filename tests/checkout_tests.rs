mod common;

use common::{Fixture, line, profile};
use orderflow::domain::cart::Cart;
use orderflow::domain::money::Money;
use orderflow::domain::ports::{CartSource, OrderRepository};
use orderflow::domain::product::ProductId;
use orderflow::domain::user::Session;
use orderflow::error::OrderError;
use orderflow::interfaces::actions;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_scenario_order_from_cart() {
    let fx = Fixture::new().await;
    let service = fx.service();

    let order_id = service.create_order(Some(&fx.session())).await.unwrap();

    assert_eq!(fx.store.order_count().await, 1);
    let order = fx.store.find_order(order_id).await.unwrap().unwrap();
    assert_eq!(order.user_id, fx.user.id);
    assert_eq!(order.total_price, Money::new(dec!(27)));
    assert_eq!(order.items_price, Money::new(dec!(20)));
    assert_eq!(order.shipping_price, Money::new(dec!(5)));
    assert_eq!(order.tax_price, Money::new(dec!(2)));
    assert_eq!(order.shipping_address, common::address());
    assert_eq!(order.payment_method, "PayPal");
    assert!(!order.is_paid);
    assert!(order.paid_at.is_none());

    let items = fx.store.order_items(order_id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_id, ProductId::new("p1"));
    assert_eq!(items[0].qty, 2);
    assert_eq!(items[0].price, Money::new(dec!(10.00)));
    assert_eq!(items[0].order_id, order_id);

    let cart = fx.store.cart(fx.cart.id).await.unwrap();
    assert!(cart.items.is_empty());
    assert_eq!(cart.items_price, Money::ZERO);
    assert_eq!(cart.shipping_price, Money::ZERO);
    assert_eq!(cart.tax_price, Money::ZERO);
    assert_eq!(cart.total_price, Money::ZERO);
}

#[tokio::test]
async fn test_one_order_item_per_cart_line() {
    let fx = Fixture::new().await;
    fx.store.add_product(ProductId::new("p2")).await;
    fx.store.add_product(ProductId::new("p3")).await;
    let cart = Cart {
        id: fx.cart.id,
        ..Cart::priced(
            fx.user.id,
            vec![
                line("p1", Money::new(dec!(1.50)), 1),
                line("p2", Money::new(dec!(2.25)), 4),
                line("p3", Money::new(dec!(9.99)), 3),
            ],
            Money::ZERO,
            Money::ZERO,
        )
    };
    fx.store.put_cart(cart).await;

    let order_id = fx.service().create_order(Some(&fx.session())).await.unwrap();

    assert_eq!(fx.store.order_items(order_id).await.unwrap().len(), 3);
    assert_eq!(fx.store.order_item_count().await, 3);
}

#[tokio::test]
async fn test_empty_cart_rejected_without_writes() {
    let fx = Fixture::new().await;
    let mut empty = fx.cart.clone();
    empty.clear();
    fx.store.put_cart(empty.clone()).await;

    let response = actions::create_order(&fx.service(), Some(&fx.session())).await;

    assert!(!response.success);
    assert_eq!(response.redirect_to.as_deref(), Some("/cart"));
    assert_eq!(fx.store.order_count().await, 0);
    assert_eq!(fx.store.cart(fx.cart.id).await, Some(empty));
}

#[tokio::test]
async fn test_user_without_cart_is_empty_cart() {
    let fx = Fixture::new().await;
    let other = profile();
    fx.store.add_user(other.clone()).await;

    let result = fx
        .service()
        .create_order(Some(&Session::for_user(other.id)))
        .await;

    assert!(matches!(result, Err(OrderError::EmptyCart)));
}

#[tokio::test]
async fn test_missing_address_rejected_without_writes() {
    let fx = Fixture::new().await;
    let mut user = fx.user.clone();
    user.address = None;
    fx.store.add_user(user).await;

    let response = actions::create_order(&fx.service(), Some(&fx.session())).await;

    assert!(!response.success);
    assert_eq!(response.message, "No shipping address");
    assert_eq!(response.redirect_to.as_deref(), Some("/shipping-address"));
    assert_eq!(fx.store.order_count().await, 0);
    assert_eq!(fx.store.cart(fx.cart.id).await, Some(fx.cart.clone()));
}

#[tokio::test]
async fn test_missing_payment_method_rejected_without_writes() {
    let fx = Fixture::new().await;
    let mut user = fx.user.clone();
    user.payment_method = None;
    fx.store.add_user(user).await;

    let response = actions::create_order(&fx.service(), Some(&fx.session())).await;

    assert!(!response.success);
    assert_eq!(response.redirect_to.as_deref(), Some("/payment-method"));
    assert_eq!(fx.store.order_count().await, 0);
    assert_eq!(fx.store.cart(fx.cart.id).await, Some(fx.cart.clone()));
}

#[tokio::test]
async fn test_unauthenticated_requests() {
    let fx = Fixture::new().await;
    let service = fx.service();

    assert!(matches!(
        service.create_order(None).await,
        Err(OrderError::Unauthenticated)
    ));
    let response = actions::create_order(&service, Some(&Session::default())).await;
    assert!(!response.success);
    assert_eq!(response.message, "User is not authenticated");
    assert!(response.redirect_to.is_none());
}

#[tokio::test]
async fn test_failed_item_insert_rolls_back_everything() {
    let fx = Fixture::new().await;
    let cart = Cart {
        id: fx.cart.id,
        ..Cart::priced(
            fx.user.id,
            vec![
                line("p1", Money::new(dec!(10.00)), 1),
                line("discontinued", Money::new(dec!(3.00)), 1),
            ],
            Money::ZERO,
            Money::ZERO,
        )
    };
    fx.store.put_cart(cart.clone()).await;

    let result = fx.service().create_order(Some(&fx.session())).await;

    assert!(matches!(result, Err(OrderError::OrderNotCreated(_))));
    assert_eq!(fx.store.order_count().await, 0);
    assert_eq!(fx.store.order_item_count().await, 0);
    assert_eq!(fx.store.current_cart(fx.user.id).await.unwrap(), Some(cart));
}

#[tokio::test]
async fn test_invalid_payload_surfaces_validation_error() {
    let fx = Fixture::new().await;
    let mut cart = fx.cart.clone();
    cart.tax_price = Money::new(dec!(-2));
    fx.store.put_cart(cart).await;

    let response = actions::create_order(&fx.service(), Some(&fx.session())).await;

    assert!(!response.success);
    assert_eq!(response.message, "Invalid order data");
    assert_eq!(fx.store.order_count().await, 0);
}

#[tokio::test]
async fn test_success_response_redirects_to_order() {
    let fx = Fixture::new().await;

    let response = actions::create_order(&fx.service(), Some(&fx.session())).await;

    assert!(response.success);
    assert_eq!(response.message, "Order created successfully");
    let order_id = response.data.unwrap();
    assert_eq!(response.redirect_to, Some(format!("/order/{order_id}")));
}

#[tokio::test]
async fn test_concurrent_submissions_create_one_order() {
    let fx = Fixture::new().await;
    let service = std::sync::Arc::new(fx.service());
    let session = fx.session();

    let mut handles = Vec::new();
    for _ in 0..4 {
        let service = service.clone();
        let session = session.clone();
        handles.push(tokio::spawn(async move {
            service.create_order(Some(&session)).await
        }));
    }
    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) => assert!(matches!(e, OrderError::EmptyCart)),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(fx.store.order_count().await, 1);
}

#[tokio::test]
async fn test_order_lookup_includes_lines_and_owner() {
    let fx = Fixture::new().await;
    let service = fx.service();
    let order_id = service.create_order(Some(&fx.session())).await.unwrap();

    let details = service.get_order_by_id(order_id).await.unwrap().unwrap();
    assert_eq!(details.order.id, order_id);
    assert_eq!(details.order_items.len(), 1);
    let user = details.user.unwrap();
    assert_eq!(user.name, "Ada");
    assert_eq!(user.email, "ada@example.com");

    let json = serde_json::to_value(service.get_order_by_id(order_id).await.unwrap()).unwrap();
    assert_eq!(json["totalPrice"], "27.00");
    assert_eq!(json["orderItems"][0]["qty"], 2);

    let missing = service
        .get_order_by_id(orderflow::domain::order::OrderId::new())
        .await
        .unwrap();
    assert!(missing.is_none());
}
