use crate::domain::money::Money;
use crate::domain::payment::{CAPTURE_COMPLETED, Capture, PaymentIntent};
use crate::domain::ports::PaymentGateway;
use crate::error::{OrderError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument};
use uuid::Uuid;

/// An in-process payment processor.
///
/// Remembers the amount of every intent it creates and captures them with a
/// configurable status and payer. Used for offline runs and tests.
#[derive(Clone)]
pub struct SandboxGateway {
    intents: Arc<RwLock<HashMap<String, Money>>>,
    payer_email: String,
    capture_status: String,
    unavailable: bool,
}

impl Default for SandboxGateway {
    fn default() -> Self {
        Self {
            intents: Arc::default(),
            payer_email: "sandbox-buyer@example.com".to_string(),
            capture_status: CAPTURE_COMPLETED.to_string(),
            unavailable: false,
        }
    }
}

impl SandboxGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payer_email(mut self, email: impl Into<String>) -> Self {
        self.payer_email = email.into();
        self
    }

    /// Status every capture reports, e.g. `PAYER_ACTION_REQUIRED`.
    pub fn with_capture_status(mut self, status: impl Into<String>) -> Self {
        self.capture_status = status.into();
        self
    }

    /// Makes every call fail as if the processor could not be reached.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub async fn intent_count(&self) -> usize {
        self.intents.read().await.len()
    }

    fn ensure_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(OrderError::GatewayError(
                "sandbox processor unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentGateway for SandboxGateway {
    #[instrument(skip(self, amount), fields(amount = %amount))]
    async fn create_intent(&self, amount: Money) -> Result<PaymentIntent> {
        self.ensure_available()?;
        let id = format!("SANDBOX-{}", Uuid::new_v4().simple()).to_uppercase();
        self.intents.write().await.insert(id.clone(), amount);
        info!(intent_id = %id, "Sandbox intent created");
        Ok(PaymentIntent {
            id,
            status: "CREATED".to_string(),
        })
    }

    #[instrument(skip(self))]
    async fn capture(&self, intent_id: &str) -> Result<Capture> {
        self.ensure_available()?;
        let amount = self
            .intents
            .read()
            .await
            .get(intent_id)
            .copied()
            .ok_or_else(|| OrderError::GatewayError(format!("unknown intent {intent_id}")))?;
        Ok(Capture {
            id: intent_id.to_string(),
            status: self.capture_status.clone(),
            payer_email: self.payer_email.clone(),
            captured_amount: Some(amount),
        })
    }
}
