//! Default side-effect hooks for the paid transition.

use crate::domain::order::{Order, OrderItem};
use crate::domain::ports::{OrderNotifier, StockHook, UnitOfWork, ViewInvalidator};
use crate::error::Result;
use async_trait::async_trait;
use tracing::{debug, info};

/// Stock decrement is switched off; paying an order leaves inventory untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct StockDecrementDisabled;

#[async_trait]
impl StockHook for StockDecrementDisabled {
    async fn on_order_paid(&self, _uow: &mut dyn UnitOfWork, items: &[OrderItem]) -> Result<()> {
        debug!(lines = items.len(), "Stock decrement disabled, skipping");
        Ok(())
    }
}

/// Records that a confirmation is due. No message is sent yet.
#[derive(Debug, Default, Clone, Copy)]
pub struct PendingConfirmationNotifier;

#[async_trait]
impl OrderNotifier for PendingConfirmationNotifier {
    async fn order_paid(&self, order: &Order) -> Result<()> {
        info!(order_id = %order.id, "Order confirmation pending delivery");
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopViewInvalidator;

impl ViewInvalidator for NoopViewInvalidator {
    fn invalidate(&self, path: &str) {
        debug!(path, "View invalidated");
    }
}
