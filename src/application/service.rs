use crate::domain::order::{OrderDetails, OrderId};
use crate::domain::ports::{
    CartSourceBox, OrderNotifierBox, OrderRepositoryBox, PaymentGatewayBox, ProfileSourceBox,
    StockHookBox, ViewInvalidatorBox,
};
use crate::domain::user::UserSummary;
use crate::error::Result;
use crate::infrastructure::hooks::{
    NoopViewInvalidator, PendingConfirmationNotifier, StockDecrementDisabled,
};
use tracing::instrument;

/// Entry point for checkout and payment operations.
///
/// `OrderService` owns its collaborators behind the domain ports. Every public
/// operation is an independent unit of work; the atomic parts run inside a
/// single `UnitOfWork` of the order repository.
pub struct OrderService {
    pub(crate) carts: CartSourceBox,
    pub(crate) profiles: ProfileSourceBox,
    pub(crate) orders: OrderRepositoryBox,
    pub(crate) gateway: PaymentGatewayBox,
    pub(crate) stock: StockHookBox,
    pub(crate) notifier: OrderNotifierBox,
    pub(crate) views: ViewInvalidatorBox,
}

impl OrderService {
    /// Creates a new `OrderService` with stock decrement disabled, confirmations
    /// pending and no view cache.
    ///
    /// # Arguments
    ///
    /// * `carts` - Source of the shopper's current cart.
    /// * `profiles` - Source of saved addresses and payment methods.
    /// * `orders` - Order storage.
    /// * `gateway` - The payment processor.
    pub fn new(
        carts: CartSourceBox,
        profiles: ProfileSourceBox,
        orders: OrderRepositoryBox,
        gateway: PaymentGatewayBox,
    ) -> Self {
        Self {
            carts,
            profiles,
            orders,
            gateway,
            stock: Box::new(StockDecrementDisabled),
            notifier: Box::new(PendingConfirmationNotifier),
            views: Box::new(NoopViewInvalidator),
        }
    }

    pub fn with_stock_hook(mut self, stock: StockHookBox) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_notifier(mut self, notifier: OrderNotifierBox) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_view_invalidator(mut self, views: ViewInvalidatorBox) -> Self {
        self.views = views;
        self
    }

    /// Fetches an order with its lines and its owner's name and e-mail.
    #[instrument(skip(self))]
    pub async fn get_order_by_id(&self, order_id: OrderId) -> Result<Option<OrderDetails>> {
        let Some(order) = self.orders.find_order(order_id).await? else {
            return Ok(None);
        };
        let order_items = self.orders.order_items(order_id).await?;
        let user = self
            .profiles
            .profile(order.user_id)
            .await?
            .as_ref()
            .map(UserSummary::from);
        Ok(Some(OrderDetails {
            order,
            order_items,
            user,
        }))
    }
}
