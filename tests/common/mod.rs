#![allow(dead_code)]

use async_trait::async_trait;
use orderflow::application::service::OrderService;
use orderflow::domain::cart::{Cart, CartItem};
use orderflow::domain::money::Money;
use orderflow::domain::order::{Order, OrderItem};
use orderflow::domain::ports::{OrderNotifier, StockHook, UnitOfWork, ViewInvalidator};
use orderflow::domain::product::ProductId;
use orderflow::domain::user::{Session, ShippingAddress, UserId, UserProfile};
use orderflow::error::{OrderError, Result};
use orderflow::infrastructure::in_memory::InMemoryStore;
use orderflow::infrastructure::sandbox::SandboxGateway;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

pub fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Ada Lovelace".to_string(),
        street_address: "1 Main St".to_string(),
        city: "Springfield".to_string(),
        postal_code: "12345".to_string(),
        country: "US".to_string(),
        lat: None,
        lng: None,
    }
}

pub fn profile() -> UserProfile {
    UserProfile {
        id: UserId::new(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        address: Some(address()),
        payment_method: Some("PayPal".to_string()),
    }
}

pub fn line(id: &str, price: Money, qty: u32) -> CartItem {
    CartItem {
        product_id: ProductId::new(id),
        name: id.to_uppercase(),
        slug: id.to_string(),
        image: format!("/images/{id}.jpg"),
        price,
        qty,
    }
}

/// The p1 x2 @ 10.00, shipping 5, tax 2 cart (total 27).
pub fn scenario_cart(user_id: UserId) -> Cart {
    Cart::priced(
        user_id,
        vec![line("p1", Money::new(dec!(10.00)), 2)],
        Money::new(dec!(5)),
        Money::new(dec!(2)),
    )
}

pub struct Fixture {
    pub store: InMemoryStore,
    pub gateway: SandboxGateway,
    pub user: UserProfile,
    pub cart: Cart,
}

impl Fixture {
    /// A shopper with a full profile, the scenario cart, and every product known.
    pub async fn new() -> Self {
        Self::with_gateway(SandboxGateway::new().with_payer_email("a@b.com")).await
    }

    pub async fn with_gateway(gateway: SandboxGateway) -> Self {
        let store = InMemoryStore::new();
        let user = profile();
        let cart = scenario_cart(user.id);
        store.add_user(user.clone()).await;
        store.add_product(ProductId::new("p1")).await;
        store.put_cart(cart.clone()).await;
        Self {
            store,
            gateway,
            user,
            cart,
        }
    }

    pub fn session(&self) -> Session {
        Session::for_user(self.user.id)
    }

    pub fn service(&self) -> OrderService {
        self.service_with(self.gateway.clone())
    }

    /// A service over the same store, talking to a different processor.
    pub fn service_with(&self, gateway: SandboxGateway) -> OrderService {
        OrderService::new(
            Box::new(self.store.clone()),
            Box::new(self.store.clone()),
            Box::new(self.store.clone()),
            Box::new(gateway),
        )
    }
}

#[derive(Clone, Default)]
pub struct RecordingViews {
    pub paths: Arc<Mutex<Vec<String>>>,
}

impl ViewInvalidator for RecordingViews {
    fn invalidate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub paid: Arc<Mutex<Vec<Order>>>,
    pub fail: bool,
}

#[async_trait]
impl OrderNotifier for RecordingNotifier {
    async fn order_paid(&self, order: &Order) -> Result<()> {
        self.paid.lock().unwrap().push(order.clone());
        if self.fail {
            return Err(OrderError::GatewayError("mail relay down".to_string()));
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingStock {
    pub lines: Arc<Mutex<Vec<OrderItem>>>,
    pub fail: bool,
}

#[async_trait]
impl StockHook for RecordingStock {
    async fn on_order_paid(&self, uow: &mut dyn UnitOfWork, items: &[OrderItem]) -> Result<()> {
        if self.fail {
            return Err(OrderError::ValidationError("out of stock".to_string()));
        }
        // Read back through the paying unit of work rather than the store.
        let Some(order_id) = items.first().map(|item| item.order_id) else {
            return Ok(());
        };
        let staged = uow.order_items(order_id).await?;
        self.lines.lock().unwrap().extend(staged);
        Ok(())
    }
}
