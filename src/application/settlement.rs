use super::service::OrderService;
use crate::domain::order::{OrderId, PaymentResult};
use crate::error::{OrderError, Result};
use chrono::Utc;
use tracing::{info, instrument, warn};

impl OrderService {
    /// Marks an order paid exactly once.
    ///
    /// Errors are returned to the caller as-is; `AlreadyPaid` means another
    /// capture won. The confirmation notifier runs after the commit and cannot
    /// undo it.
    #[instrument(skip(self, payment_result), fields(payment_id = %payment_result.id))]
    pub async fn update_order_to_paid(
        &self,
        order_id: OrderId,
        payment_result: PaymentResult,
    ) -> Result<()> {
        let mut uow = self.orders.begin().await?;
        let mut order = uow
            .find_order(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound)?;
        let items = uow.order_items(order_id).await?;

        order.mark_paid(payment_result, Utc::now())?;
        self.stock.on_order_paid(&mut *uow, &items).await?;
        uow.update_order(&order).await?;
        uow.commit().await?;
        info!(paid_at = ?order.paid_at, "Order marked paid");

        if let Err(e) = self.notifier.order_paid(&order).await {
            warn!(error = %e, "Order confirmation failed");
        }
        Ok(())
    }
}
