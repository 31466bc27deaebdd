use super::service::OrderService;
use crate::domain::order::{OrderId, PaymentResult};
use crate::domain::payment::PaymentApproval;
use crate::error::{OrderError, Result};
use tracing::{info, instrument, warn};

impl OrderService {
    /// Opens a payment intent for the order's total and records a placeholder
    /// payment result carrying the intent id.
    ///
    /// Calling this again opens another intent and replaces the placeholder.
    #[instrument(skip(self))]
    pub async fn create_payment_intent(&self, order_id: OrderId) -> Result<String> {
        let order = self
            .orders
            .find_order(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound)?;
        if order.is_paid {
            return Err(OrderError::AlreadyPaid);
        }

        let intent = self.gateway.create_intent(order.total_price).await?;

        let mut uow = self.orders.begin().await?;
        let mut order = uow
            .find_order(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound)?;
        if order.is_paid {
            return Err(OrderError::AlreadyPaid);
        }
        order.payment_result = Some(PaymentResult::placeholder(intent.id.clone()));
        uow.update_order(&order).await?;
        uow.commit().await?;

        info!(intent_id = %intent.id, amount = %order.total_price, "Payment intent created");
        Ok(intent.id)
    }

    /// Captures an approved intent and marks the order paid.
    ///
    /// The capture must be `COMPLETED` and must belong to the intent recorded on
    /// the order; otherwise nothing on the order changes.
    #[instrument(skip(self))]
    pub async fn approve_payment(&self, order_id: OrderId, approval: &PaymentApproval) -> Result<()> {
        let order = self
            .orders
            .find_order(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound)?;

        let capture = self.gateway.capture(&approval.order_id).await?;

        let recorded_intent = order.payment_result.as_ref().map(|r| r.id.as_str());
        if !capture.is_completed() || recorded_intent != Some(capture.id.as_str()) {
            warn!(
                capture_id = %capture.id,
                status = %capture.status,
                recorded_intent = ?recorded_intent,
                "Capture does not match the recorded intent"
            );
            return Err(OrderError::PaymentMismatch);
        }
        let price_paid = capture.captured_amount.ok_or_else(|| {
            OrderError::GatewayError("capture reported no captured amount".to_string())
        })?;

        let payment_result = PaymentResult {
            id: capture.id,
            status: capture.status,
            email_address: capture.payer_email,
            price_paid,
        };
        self.update_order_to_paid(order_id, payment_result).await?;

        self.views.invalidate(&format!("/order/{order_id}"));
        Ok(())
    }
}
