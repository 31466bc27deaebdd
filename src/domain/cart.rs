use super::money::Money;
use super::product::ProductId;
use super::user::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartId(pub Uuid);

impl CartId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CartId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One line of a cart: a product snapshot plus the requested quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub image: String,
    pub price: Money,
    pub qty: u32,
}

impl CartItem {
    pub fn line_total(&self) -> Money {
        self.price * self.qty
    }
}

/// A shopper's cart as computed by the cart service.
///
/// `total_price` is expected to equal the sum of the other three prices;
/// the cart service maintains that, this crate only snapshots it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub items: Vec<CartItem>,
    pub items_price: Money,
    pub shipping_price: Money,
    pub tax_price: Money,
    pub total_price: Money,
}

impl Cart {
    /// Builds a cart whose items and total prices are derived from its lines.
    pub fn priced(
        user_id: UserId,
        items: Vec<CartItem>,
        shipping_price: Money,
        tax_price: Money,
    ) -> Self {
        let items_price: Money = items.iter().map(CartItem::line_total).sum();
        Self {
            id: CartId::new(),
            user_id,
            items,
            items_price,
            shipping_price,
            tax_price,
            total_price: items_price + shipping_price + tax_price,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Empties the cart and zeroes every price.
    pub fn clear(&mut self) {
        self.items.clear();
        self.items_price = Money::ZERO;
        self.shipping_price = Money::ZERO;
        self.tax_price = Money::ZERO;
        self.total_price = Money::ZERO;
    }
}
