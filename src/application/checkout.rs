use super::service::OrderService;
use super::validator::{authenticated_user, build_order};
use crate::domain::cart::CartId;
use crate::domain::order::{Order, OrderId, OrderItem};
use crate::domain::user::{Session, UserProfile};
use crate::error::{OrderError, Result, StoreError};
use tracing::{error, info, instrument, warn};

fn not_created(e: StoreError) -> OrderError {
    error!(error = %e, "Order commit aborted");
    OrderError::OrderNotCreated(e)
}

impl OrderService {
    /// Turns the session user's cart into an order.
    ///
    /// Returns the new order id. The cart is cleared in the same unit of work
    /// that writes the order and its lines.
    #[instrument(skip(self, session))]
    pub async fn create_order(&self, session: Option<&Session>) -> Result<OrderId> {
        let user_id = authenticated_user(session)?;
        let profile = self
            .profiles
            .profile(user_id)
            .await?
            .ok_or(OrderError::UserNotFound)?;
        let cart = self.carts.current_cart(user_id).await?;

        build_order(&profile, cart.as_ref()).inspect_err(|e| {
            warn!(user_id = %user_id, reason = %e, "Checkout rejected");
        })?;
        let Some(cart) = cart else {
            return Err(OrderError::EmptyCart);
        };

        self.commit_order(&profile, cart.id).await
    }

    /// Writes the order, one line per cart item, and the emptied cart.
    ///
    /// The payload and lines come from the cart as read inside the unit of
    /// work, so the lines ordered are exactly the lines cleared. All three
    /// effects commit together or not at all.
    async fn commit_order(&self, profile: &UserProfile, cart_id: CartId) -> Result<OrderId> {
        let mut uow = self.orders.begin().await.map_err(not_created)?;

        let mut current = uow
            .find_cart(cart_id)
            .await
            .map_err(not_created)?
            .ok_or_else(|| not_created(StoreError::MissingCart(cart_id)))?;
        // Emptied by a concurrent commit: no second order.
        if current.is_empty() {
            warn!(cart_id = %cart_id, "Cart emptied before commit");
            return Err(OrderError::EmptyCart);
        }
        let payload = build_order(profile, Some(&current)).inspect_err(|e| {
            warn!(cart_id = %cart_id, reason = %e, "Cart changed into an invalid order");
        })?;

        let order = Order::create(payload);
        uow.insert_order(&order).await.map_err(not_created)?;
        for item in &current.items {
            uow.insert_order_item(&OrderItem::from_cart_item(order.id, item))
                .await
                .map_err(not_created)?;
        }
        let lines = current.items.len();
        current.clear();
        uow.update_cart(&current).await.map_err(not_created)?;
        uow.commit().await.map_err(not_created)?;

        info!(order_id = %order.id, lines, "Order created");
        Ok(order.id)
    }
}
