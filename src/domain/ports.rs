use super::cart::{Cart, CartId};
use super::money::Money;
use super::order::{Order, OrderId, OrderItem};
use super::payment::{Capture, PaymentIntent};
use super::user::{UserId, UserProfile};
use crate::error::{Result, StoreError};
use async_trait::async_trait;

/// Supplies the shopper's current cart.
#[async_trait]
pub trait CartSource: Send + Sync {
    async fn current_cart(&self, user_id: UserId) -> Result<Option<Cart>, StoreError>;
}

/// Supplies the shopper's saved profile (address, payment method).
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn profile(&self, user_id: UserId) -> Result<Option<UserProfile>, StoreError>;
}

/// Read access to orders plus the entry point for atomic writes.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Opens a unit of work. Units of work on one repository are serialized.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError>;
    async fn find_order(&self, order_id: OrderId) -> Result<Option<Order>, StoreError>;
    async fn order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, StoreError>;
}

/// A transactional batch of writes across the order, order item and cart tables.
///
/// Nothing is visible to other readers until `commit`. Dropping a unit of work
/// without committing discards every staged change.
#[async_trait]
pub trait UnitOfWork: Send {
    async fn find_order(&mut self, order_id: OrderId) -> Result<Option<Order>, StoreError>;
    async fn find_cart(&mut self, cart_id: CartId) -> Result<Option<Cart>, StoreError>;
    async fn order_items(&mut self, order_id: OrderId) -> Result<Vec<OrderItem>, StoreError>;
    async fn insert_order(&mut self, order: &Order) -> Result<(), StoreError>;
    /// Fails with `StoreError::MissingProduct` when the referenced product is unknown.
    async fn insert_order_item(&mut self, item: &OrderItem) -> Result<(), StoreError>;
    /// Fails with `StoreError::MissingOrder` when the order does not exist.
    async fn update_order(&mut self, order: &Order) -> Result<(), StoreError>;
    /// Fails with `StoreError::MissingCart` when the cart does not exist.
    async fn update_cart(&mut self, cart: &Cart) -> Result<(), StoreError>;
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// Adapter over the external payment processor. No retries happen here.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_intent(&self, amount: Money) -> Result<PaymentIntent>;
    async fn capture(&self, intent_id: &str) -> Result<Capture>;
}

/// Adjusts inventory for a paid order.
///
/// Receives the paying unit of work, so its reads and writes commit or roll
/// back with the paid transition. An error aborts the payment.
#[async_trait]
pub trait StockHook: Send + Sync {
    async fn on_order_paid(&self, uow: &mut dyn UnitOfWork, items: &[OrderItem]) -> Result<()>;
}

/// Tells the shopper their order is paid. Runs after commit; failures are
/// logged and never undo the payment.
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    async fn order_paid(&self, order: &Order) -> Result<()>;
}

/// Drops any cached rendering of a view so the next read sees fresh state.
pub trait ViewInvalidator: Send + Sync {
    fn invalidate(&self, path: &str);
}

pub type CartSourceBox = Box<dyn CartSource>;
pub type ProfileSourceBox = Box<dyn ProfileSource>;
pub type OrderRepositoryBox = Box<dyn OrderRepository>;
pub type PaymentGatewayBox = Box<dyn PaymentGateway>;
pub type StockHookBox = Box<dyn StockHook>;
pub type OrderNotifierBox = Box<dyn OrderNotifier>;
pub type ViewInvalidatorBox = Box<dyn ViewInvalidator>;
