use super::money::Money;
use serde::{Deserialize, Serialize};

/// Status the processor reports once funds have moved.
pub const CAPTURE_COMPLETED: &str = "COMPLETED";

/// A processor-side authorization request, created before any funds move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub id: String,
    pub status: String,
}

/// The processor's answer to a capture request.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub id: String,
    pub status: String,
    pub payer_email: String,
    /// Amount of the first capture of the first purchase unit, if any.
    pub captured_amount: Option<Money>,
}

impl Capture {
    pub fn is_completed(&self) -> bool {
        self.status == CAPTURE_COMPLETED
    }
}

/// Data the client posts back after the shopper approves a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentApproval {
    #[serde(rename = "orderID")]
    pub order_id: String,
}

impl PaymentApproval {
    pub fn new(intent_id: impl Into<String>) -> Self {
        Self {
            order_id: intent_id.into(),
        }
    }
}
