use super::cart::{Cart, CartItem};
use super::money::Money;
use super::product::ProductId;
use super::user::{ShippingAddress, UserId, UserSummary};
use crate::error::{OrderError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment details recorded on an order.
///
/// Written as a placeholder when an intent is created and overwritten with the
/// processor's values once the intent is captured. Its presence means a payment
/// was attempted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    pub id: String,
    pub status: String,
    pub email_address: String,
    #[serde(rename = "pricePaid")]
    pub price_paid: Money,
}

impl PaymentResult {
    pub fn placeholder(intent_id: impl Into<String>) -> Self {
        Self {
            id: intent_id.into(),
            status: String::new(),
            email_address: String::new(),
            price_paid: Money::ZERO,
        }
    }
}

/// The order-creation payload snapshotted from a shopper's profile and cart.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: UserId,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub items_price: Money,
    pub shipping_price: Money,
    pub tax_price: Money,
    pub total_price: Money,
}

impl NewOrder {
    pub fn from_cart(
        user_id: UserId,
        shipping_address: ShippingAddress,
        payment_method: String,
        cart: &Cart,
    ) -> Self {
        Self {
            user_id,
            shipping_address,
            payment_method,
            items_price: cart.items_price,
            shipping_price: cart.shipping_price,
            tax_price: cart.tax_price,
            total_price: cart.total_price,
        }
    }

    /// Checks the payload before it is handed to the commit transaction.
    pub fn validate(&self) -> Result<()> {
        let address = &self.shipping_address;
        let required = [
            ("shippingAddress.fullName", &address.full_name),
            ("shippingAddress.streetAddress", &address.street_address),
            ("shippingAddress.city", &address.city),
            ("shippingAddress.postalCode", &address.postal_code),
            ("shippingAddress.country", &address.country),
            ("paymentMethod", &self.payment_method),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(OrderError::ValidationError(format!("{field} is required")));
            }
        }

        let prices = [
            ("itemsPrice", self.items_price),
            ("shippingPrice", self.shipping_price),
            ("taxPrice", self.tax_price),
            ("totalPrice", self.total_price),
        ];
        for (field, price) in prices {
            if price.is_negative() {
                return Err(OrderError::ValidationError(format!(
                    "{field} must not be negative"
                )));
            }
            if price.exceeds_cents() {
                return Err(OrderError::ValidationError(format!(
                    "{field} must have at most two decimal places"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub items_price: Money,
    pub shipping_price: Money,
    pub tax_price: Money,
    pub total_price: Money,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_result: Option<PaymentResult>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn create(payload: NewOrder) -> Self {
        Self {
            id: OrderId::new(),
            user_id: payload.user_id,
            shipping_address: payload.shipping_address,
            payment_method: payload.payment_method,
            items_price: payload.items_price,
            shipping_price: payload.shipping_price,
            tax_price: payload.tax_price,
            total_price: payload.total_price,
            is_paid: false,
            paid_at: None,
            payment_result: None,
            created_at: Utc::now(),
        }
    }

    /// Applies the terminal paid transition. Paying twice is an error.
    pub fn mark_paid(&mut self, payment_result: PaymentResult, paid_at: DateTime<Utc>) -> Result<()> {
        if self.is_paid {
            return Err(OrderError::AlreadyPaid);
        }
        self.is_paid = true;
        self.paid_at = Some(paid_at);
        self.payment_result = Some(payment_result);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub qty: u32,
    pub price: Money,
    pub name: String,
    pub slug: String,
    pub image: String,
}

impl OrderItem {
    /// Snapshots a cart line; later product edits do not touch the order.
    pub fn from_cart_item(order_id: OrderId, item: &CartItem) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            product_id: item.product_id.clone(),
            qty: item.qty,
            price: item.price,
            name: item.name.clone(),
            slug: item.slug.clone(),
            image: item.image.clone(),
        }
    }
}

/// An order together with its lines and owner, as returned by a lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub order_items: Vec<OrderItem>,
    pub user: Option<UserSummary>,
}
