//! Request/response surface over `OrderService`.
//!
//! Every business failure becomes `{ success: false, message, redirectTo? }`;
//! nothing escapes as an error. Settlement is not wrapped here: callers of
//! `OrderService::update_order_to_paid` handle its errors themselves.

use crate::application::service::OrderService;
use crate::domain::order::OrderId;
use crate::domain::payment::PaymentApproval;
use crate::domain::user::Session;
use crate::error::OrderError;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ActionResponse<T> {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            redirect_to: None,
            data: None,
        }
    }

    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_redirect(mut self, path: impl Into<String>) -> Self {
        self.redirect_to = Some(path.into());
        self
    }

    pub fn failure(err: &OrderError) -> Self {
        warn!(error = %err, "Action failed");
        Self {
            success: false,
            message: err.public_message(),
            redirect_to: err.redirect_to().map(str::to_string),
            data: None,
        }
    }
}

pub async fn create_order(service: &OrderService, session: Option<&Session>) -> ActionResponse<OrderId> {
    match service.create_order(session).await {
        Ok(order_id) => ActionResponse::ok("Order created successfully")
            .with_redirect(format!("/order/{order_id}"))
            .with_data(order_id),
        Err(e) => ActionResponse::failure(&e),
    }
}

pub async fn create_paypal_order(service: &OrderService, order_id: OrderId) -> ActionResponse<String> {
    match service.create_payment_intent(order_id).await {
        Ok(intent_id) => ActionResponse::ok("Item order created successfully").with_data(intent_id),
        Err(e) => ActionResponse::failure(&e),
    }
}

pub async fn approve_paypal_order(
    service: &OrderService,
    order_id: OrderId,
    approval: &PaymentApproval,
) -> ActionResponse<()> {
    match service.approve_payment(order_id, approval).await {
        Ok(()) => ActionResponse::ok("Your order has been paid"),
        Err(e) => ActionResponse::failure(&e),
    }
}
