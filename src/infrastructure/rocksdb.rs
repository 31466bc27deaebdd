use crate::domain::cart::{Cart, CartId};
use crate::domain::order::{Order, OrderId, OrderItem};
use crate::domain::ports::{CartSource, OrderRepository, ProfileSource, UnitOfWork};
use crate::domain::product::ProductId;
use crate::domain::user::{UserId, UserProfile};
use crate::error::StoreError;
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Column Family for shopper profiles.
pub const CF_USERS: &str = "users";
/// Column Family for known product ids.
pub const CF_PRODUCTS: &str = "products";
/// Column Family for carts.
pub const CF_CARTS: &str = "carts";
/// Column Family for orders.
pub const CF_ORDERS: &str = "orders";
/// Column Family for order lines, keyed by order id then line id.
pub const CF_ORDER_ITEMS: &str = "order_items";

const COLUMN_FAMILIES: [&str; 5] = [CF_USERS, CF_PRODUCTS, CF_CARTS, CF_ORDERS, CF_ORDER_ITEMS];

/// A persistent store implementation using RocksDB.
///
/// Each table lives in its own Column Family. A unit of work buffers its writes
/// and applies them as one `WriteBatch`, so a commit is atomic on disk. Units of
/// work are serialized through a transaction mutex.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    tx_lock: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that every column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = COLUMN_FAMILIES
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            tx_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn add_user(&self, profile: &UserProfile) -> Result<(), StoreError> {
        put_json(&self.db, CF_USERS, profile.id.0.as_bytes(), profile)
    }

    pub fn add_product(&self, product_id: &ProductId) -> Result<(), StoreError> {
        let cf = handle(&self.db, CF_PRODUCTS)?;
        self.db.put_cf(cf, product_id.as_str().as_bytes(), b"")?;
        Ok(())
    }

    /// Stores a cart, replacing any cart with the same id.
    pub fn put_cart(&self, cart: &Cart) -> Result<(), StoreError> {
        put_json(&self.db, CF_CARTS, cart.id.0.as_bytes(), cart)
    }

    pub fn cart(&self, cart_id: CartId) -> Result<Option<Cart>, StoreError> {
        get_json(&self.db, CF_CARTS, cart_id.0.as_bytes())
    }
}

fn handle<'a>(db: &'a DB, name: &str) -> Result<&'a ColumnFamily, StoreError> {
    db.cf_handle(name)
        .ok_or_else(|| StoreError::Internal(format!("{name} column family not found")))
}

fn get_json<T: DeserializeOwned>(db: &DB, cf: &str, key: &[u8]) -> Result<Option<T>, StoreError> {
    match db.get_cf(handle(db, cf)?, key)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

fn put_json<T: Serialize>(db: &DB, cf: &str, key: &[u8], value: &T) -> Result<(), StoreError> {
    db.put_cf(handle(db, cf)?, key, serde_json::to_vec(value)?)?;
    Ok(())
}

fn item_key(item: &OrderItem) -> Vec<u8> {
    let mut key = item.order_id.0.as_bytes().to_vec();
    key.extend_from_slice(item.id.as_bytes());
    key
}

fn read_order_items(db: &DB, order_id: OrderId) -> Result<Vec<OrderItem>, StoreError> {
    let cf = handle(db, CF_ORDER_ITEMS)?;
    let prefix: &[u8] = order_id.0.as_bytes();
    let mut items = Vec::new();
    for entry in db.iterator_cf(cf, IteratorMode::From(prefix, Direction::Forward)) {
        let (key, value) = entry?;
        if !key.starts_with(prefix) {
            break;
        }
        items.push(serde_json::from_slice(&value)?);
    }
    Ok(items)
}

#[async_trait]
impl CartSource for RocksDBStore {
    async fn current_cart(&self, user_id: UserId) -> Result<Option<Cart>, StoreError> {
        let cf = handle(&self.db, CF_CARTS)?;
        for entry in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = entry?;
            let cart: Cart = serde_json::from_slice(&value)?;
            if cart.user_id == user_id {
                return Ok(Some(cart));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl ProfileSource for RocksDBStore {
    async fn profile(&self, user_id: UserId) -> Result<Option<UserProfile>, StoreError> {
        get_json(&self.db, CF_USERS, user_id.0.as_bytes())
    }
}

#[async_trait]
impl OrderRepository for RocksDBStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let guard = self.tx_lock.clone().lock_owned().await;
        Ok(Box::new(RocksDBUnitOfWork {
            db: self.db.clone(),
            _guard: guard,
            orders: HashMap::new(),
            carts: HashMap::new(),
            items: Vec::new(),
        }))
    }

    async fn find_order(&self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        get_json(&self.db, CF_ORDERS, order_id.0.as_bytes())
    }

    async fn order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, StoreError> {
        read_order_items(&self.db, order_id)
    }
}

/// Buffers writes over a read-through view of the database.
pub struct RocksDBUnitOfWork {
    db: Arc<DB>,
    _guard: OwnedMutexGuard<()>,
    orders: HashMap<OrderId, Order>,
    carts: HashMap<CartId, Cart>,
    items: Vec<OrderItem>,
}

#[async_trait]
impl UnitOfWork for RocksDBUnitOfWork {
    async fn find_order(&mut self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        if let Some(order) = self.orders.get(&order_id) {
            return Ok(Some(order.clone()));
        }
        get_json(&self.db, CF_ORDERS, order_id.0.as_bytes())
    }

    async fn find_cart(&mut self, cart_id: CartId) -> Result<Option<Cart>, StoreError> {
        if let Some(cart) = self.carts.get(&cart_id) {
            return Ok(Some(cart.clone()));
        }
        get_json(&self.db, CF_CARTS, cart_id.0.as_bytes())
    }

    async fn order_items(&mut self, order_id: OrderId) -> Result<Vec<OrderItem>, StoreError> {
        let mut items = read_order_items(&self.db, order_id)?;
        items.extend(
            self.items
                .iter()
                .filter(|item| item.order_id == order_id)
                .cloned(),
        );
        Ok(items)
    }

    async fn insert_order(&mut self, order: &Order) -> Result<(), StoreError> {
        self.orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn insert_order_item(&mut self, item: &OrderItem) -> Result<(), StoreError> {
        let known_product = {
            let products = handle(&self.db, CF_PRODUCTS)?;
            self.db
                .get_pinned_cf(products, item.product_id.as_str().as_bytes())?
                .is_some()
        };
        if !known_product {
            return Err(StoreError::MissingProduct(item.product_id.clone()));
        }
        if self.find_order(item.order_id).await?.is_none() {
            return Err(StoreError::MissingOrder(item.order_id));
        }
        self.items.push(item.clone());
        Ok(())
    }

    async fn update_order(&mut self, order: &Order) -> Result<(), StoreError> {
        if self.find_order(order.id).await?.is_none() {
            return Err(StoreError::MissingOrder(order.id));
        }
        self.orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn update_cart(&mut self, cart: &Cart) -> Result<(), StoreError> {
        if self.find_cart(cart.id).await?.is_none() {
            return Err(StoreError::MissingCart(cart.id));
        }
        self.carts.insert(cart.id, cart.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let mut batch = WriteBatch::default();
        let orders = handle(&self.db, CF_ORDERS)?;
        for order in self.orders.values() {
            batch.put_cf(orders, order.id.0.as_bytes(), serde_json::to_vec(order)?);
        }
        let items = handle(&self.db, CF_ORDER_ITEMS)?;
        for item in &self.items {
            batch.put_cf(items, item_key(item), serde_json::to_vec(item)?);
        }
        let carts = handle(&self.db, CF_CARTS)?;
        for cart in self.carts.values() {
            batch.put_cf(carts, cart.id.0.as_bytes(), serde_json::to_vec(cart)?);
        }
        self.db.write(batch)?;
        Ok(())
    }
}
