use crate::domain::cart::{Cart, CartId};
use crate::domain::order::{Order, OrderId, OrderItem};
use crate::domain::ports::{CartSource, OrderRepository, ProfileSource, UnitOfWork};
use crate::domain::product::ProductId;
use crate::domain::user::{UserId, UserProfile};
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

#[derive(Debug, Default, Clone)]
struct Tables {
    users: HashMap<UserId, UserProfile>,
    products: HashSet<ProductId>,
    carts: HashMap<CartId, Cart>,
    orders: HashMap<OrderId, Order>,
    order_items: HashMap<OrderId, Vec<OrderItem>>,
}

/// A thread-safe in-memory store for users, products, carts and orders.
///
/// Uses `Arc<RwLock<..>>` so clones share the same tables. A unit of work holds
/// the write lock until it is committed or dropped, which makes units of work
/// serializable.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, profile: UserProfile) {
        self.tables.write().await.users.insert(profile.id, profile);
    }

    pub async fn add_product(&self, product_id: ProductId) {
        self.tables.write().await.products.insert(product_id);
    }

    /// Stores a cart, replacing any cart with the same id.
    pub async fn put_cart(&self, cart: Cart) {
        self.tables.write().await.carts.insert(cart.id, cart);
    }

    pub async fn cart(&self, cart_id: CartId) -> Option<Cart> {
        self.tables.read().await.carts.get(&cart_id).cloned()
    }

    pub async fn order_count(&self) -> usize {
        self.tables.read().await.orders.len()
    }

    pub async fn order_item_count(&self) -> usize {
        self.tables.read().await.order_items.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl CartSource for InMemoryStore {
    async fn current_cart(&self, user_id: UserId) -> Result<Option<Cart>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .carts
            .values()
            .find(|cart| cart.user_id == user_id)
            .cloned())
    }
}

#[async_trait]
impl ProfileSource for InMemoryStore {
    async fn profile(&self, user_id: UserId) -> Result<Option<UserProfile>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&user_id).cloned())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let guard = self.tables.clone().write_owned().await;
        let working = (*guard).clone();
        Ok(Box::new(InMemoryUnitOfWork { guard, working }))
    }

    async fn find_order(&self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.orders.get(&order_id).cloned())
    }

    async fn order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.order_items.get(&order_id).cloned().unwrap_or_default())
    }
}

/// Stages writes on a private copy of the tables and swaps it in on commit.
pub struct InMemoryUnitOfWork {
    guard: OwnedRwLockWriteGuard<Tables>,
    working: Tables,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn find_order(&mut self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.working.orders.get(&order_id).cloned())
    }

    async fn find_cart(&mut self, cart_id: CartId) -> Result<Option<Cart>, StoreError> {
        Ok(self.working.carts.get(&cart_id).cloned())
    }

    async fn order_items(&mut self, order_id: OrderId) -> Result<Vec<OrderItem>, StoreError> {
        Ok(self
            .working
            .order_items
            .get(&order_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn insert_order(&mut self, order: &Order) -> Result<(), StoreError> {
        self.working.orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn insert_order_item(&mut self, item: &OrderItem) -> Result<(), StoreError> {
        if !self.working.products.contains(&item.product_id) {
            return Err(StoreError::MissingProduct(item.product_id.clone()));
        }
        if !self.working.orders.contains_key(&item.order_id) {
            return Err(StoreError::MissingOrder(item.order_id));
        }
        self.working
            .order_items
            .entry(item.order_id)
            .or_default()
            .push(item.clone());
        Ok(())
    }

    async fn update_order(&mut self, order: &Order) -> Result<(), StoreError> {
        match self.working.orders.get_mut(&order.id) {
            Some(existing) => {
                *existing = order.clone();
                Ok(())
            }
            None => Err(StoreError::MissingOrder(order.id)),
        }
    }

    async fn update_cart(&mut self, cart: &Cart) -> Result<(), StoreError> {
        match self.working.carts.get_mut(&cart.id) {
            Some(existing) => {
                *existing = cart.clone();
                Ok(())
            }
            None => Err(StoreError::MissingCart(cart.id)),
        }
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let InMemoryUnitOfWork { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::CartItem;
    use crate::domain::money::Money;
    use crate::domain::order::NewOrder;
    use crate::domain::user::ShippingAddress;
    use rust_decimal_macros::dec;

    fn cart_for(user_id: UserId) -> Cart {
        Cart::priced(
            user_id,
            vec![CartItem {
                product_id: ProductId::new("p1"),
                name: "Mug".to_string(),
                slug: "mug".to_string(),
                image: "/images/mug.jpg".to_string(),
                price: Money::new(dec!(10.00)),
                qty: 2,
            }],
            Money::ZERO,
            Money::ZERO,
        )
    }

    fn order_for(user_id: UserId) -> Order {
        Order::create(NewOrder {
            user_id,
            shipping_address: ShippingAddress {
                full_name: "Ada".to_string(),
                street_address: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                postal_code: "12345".to_string(),
                country: "US".to_string(),
                lat: None,
                lng: None,
            },
            payment_method: "PayPal".to_string(),
            items_price: Money::new(dec!(20)),
            shipping_price: Money::ZERO,
            tax_price: Money::ZERO,
            total_price: Money::new(dec!(20)),
        })
    }

    #[tokio::test]
    async fn test_cart_lookup_by_owner() {
        let store = InMemoryStore::new();
        let user = UserId::new();
        let cart = cart_for(user);
        store.put_cart(cart.clone()).await;

        assert_eq!(store.current_cart(user).await.unwrap(), Some(cart));
        assert!(store.current_cart(UserId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_commit_publishes_staged_writes() {
        let store = InMemoryStore::new();
        store.add_product(ProductId::new("p1")).await;
        let user = UserId::new();
        let mut cart = cart_for(user);
        store.put_cart(cart.clone()).await;

        let order = order_for(user);
        let mut uow = store.begin().await.unwrap();
        uow.insert_order(&order).await.unwrap();
        let item = OrderItem::from_cart_item(order.id, &cart.items[0]);
        uow.insert_order_item(&item).await.unwrap();
        cart.clear();
        uow.update_cart(&cart).await.unwrap();
        uow.commit().await.unwrap();

        assert_eq!(store.find_order(order.id).await.unwrap(), Some(order.clone()));
        assert_eq!(store.order_items(order.id).await.unwrap(), vec![item]);
        assert!(store.cart(cart.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_unit_of_work_discards_writes() {
        let store = InMemoryStore::new();
        let order = order_for(UserId::new());

        let mut uow = store.begin().await.unwrap();
        uow.insert_order(&order).await.unwrap();
        assert!(uow.find_order(order.id).await.unwrap().is_some());
        drop(uow);

        assert!(store.find_order(order.id).await.unwrap().is_none());
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_product_rejected() {
        let store = InMemoryStore::new();
        let user = UserId::new();
        let cart = cart_for(user);
        let order = order_for(user);

        let mut uow = store.begin().await.unwrap();
        uow.insert_order(&order).await.unwrap();
        let err = uow
            .insert_order_item(&OrderItem::from_cart_item(order.id, &cart.items[0]))
            .await;
        assert!(matches!(err, Err(StoreError::MissingProduct(_))));
    }

    #[tokio::test]
    async fn test_updates_require_existing_rows() {
        let store = InMemoryStore::new();
        let user = UserId::new();
        let mut uow = store.begin().await.unwrap();

        assert!(matches!(
            uow.update_order(&order_for(user)).await,
            Err(StoreError::MissingOrder(_))
        ));
        assert!(matches!(
            uow.update_cart(&cart_for(user)).await,
            Err(StoreError::MissingCart(_))
        ));
    }
}
