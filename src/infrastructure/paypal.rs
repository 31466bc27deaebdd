//! PayPal Orders v2 client.
//!
//! Authenticates with the OAuth2 client-credentials flow on every call, then
//! creates or captures a checkout order.

use crate::config::PayPalConfig;
use crate::domain::money::Money;
use crate::domain::payment::{Capture, PaymentIntent};
use crate::domain::ports::PaymentGateway;
use crate::error::{OrderError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::str::FromStr;
use tracing::{debug, instrument};

const CURRENCY: &str = "USD";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Serialize)]
struct CreateOrderRequest<'a> {
    intent: &'a str,
    purchase_units: Vec<PurchaseUnitRequest<'a>>,
}

#[derive(Serialize)]
struct PurchaseUnitRequest<'a> {
    amount: AmountRequest<'a>,
}

#[derive(Serialize)]
struct AmountRequest<'a> {
    currency_code: &'a str,
    value: String,
}

#[derive(Deserialize)]
struct OrderResponse {
    id: String,
    #[serde(default)]
    status: String,
}

#[derive(Deserialize)]
struct CaptureResponse {
    id: String,
    status: String,
    #[serde(default)]
    payer: Option<Payer>,
    #[serde(default)]
    purchase_units: Vec<PurchaseUnit>,
}

#[derive(Deserialize)]
struct Payer {
    #[serde(default)]
    email_address: String,
}

#[derive(Deserialize)]
struct PurchaseUnit {
    #[serde(default)]
    payments: Option<Payments>,
}

#[derive(Deserialize)]
struct Payments {
    #[serde(default)]
    captures: Vec<CaptureDetail>,
}

#[derive(Deserialize)]
struct CaptureDetail {
    amount: Option<CaptureAmount>,
}

#[derive(Deserialize)]
struct CaptureAmount {
    value: String,
}

impl CaptureResponse {
    fn first_captured_amount(&self) -> Result<Option<Money>> {
        let value = self
            .purchase_units
            .first()
            .and_then(|unit| unit.payments.as_ref())
            .and_then(|payments| payments.captures.first())
            .and_then(|capture| capture.amount.as_ref())
            .map(|amount| amount.value.as_str());
        match value {
            Some(v) => Decimal::from_str(v)
                .map(|d| Some(Money::new(d)))
                .map_err(|e| OrderError::GatewayError(format!("invalid captured amount '{v}': {e}"))),
            None => Ok(None),
        }
    }
}

/// HTTP client for the PayPal REST API.
pub struct PayPalClient {
    client: Client,
    config: PayPalConfig,
}

impl PayPalClient {
    pub fn new(config: PayPalConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OrderError::ConfigError(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    async fn access_token(&self) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/v1/oauth2/token", self.config.api_url))
            .basic_auth(&self.config.client_id, Some(&self.config.app_secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(network_error)?;
        let token: TokenResponse = parse(response).await?;
        Ok(token.access_token)
    }
}

fn network_error(e: reqwest::Error) -> OrderError {
    OrderError::GatewayError(format!("network error: {e}"))
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(OrderError::GatewayError(format!("HTTP {status}: {body}")));
    }
    response
        .json()
        .await
        .map_err(|e| OrderError::GatewayError(format!("parse error: {e}")))
}

#[async_trait]
impl PaymentGateway for PayPalClient {
    #[instrument(skip(self, amount), fields(amount = %amount))]
    async fn create_intent(&self, amount: Money) -> Result<PaymentIntent> {
        let token = self.access_token().await?;
        let request = CreateOrderRequest {
            intent: "CAPTURE",
            purchase_units: vec![PurchaseUnitRequest {
                amount: AmountRequest {
                    currency_code: CURRENCY,
                    value: amount.to_cents_string(),
                },
            }],
        };
        let response = self
            .client
            .post(format!("{}/v2/checkout/orders", self.config.api_url))
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;
        let order: OrderResponse = parse(response).await?;
        debug!(intent_id = %order.id, status = %order.status, "PayPal order created");
        Ok(PaymentIntent {
            id: order.id,
            status: order.status,
        })
    }

    #[instrument(skip(self))]
    async fn capture(&self, intent_id: &str) -> Result<Capture> {
        let token = self.access_token().await?;
        let response = self
            .client
            .post(format!(
                "{}/v2/checkout/orders/{intent_id}/capture",
                self.config.api_url
            ))
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(network_error)?;
        let capture: CaptureResponse = parse(response).await?;
        debug!(capture_id = %capture.id, status = %capture.status, "PayPal order captured");
        Ok(Capture {
            captured_amount: capture.first_captured_amount()?,
            payer_email: capture
                .payer
                .as_ref()
                .map(|payer| payer.email_address.clone())
                .unwrap_or_default(),
            id: capture.id,
            status: capture.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_capture_response_first_amount() {
        let body = r#"{
            "id": "5O190127TN364715T",
            "status": "COMPLETED",
            "payer": { "email_address": "a@b.com" },
            "purchase_units": [
                { "payments": { "captures": [
                    { "amount": { "currency_code": "USD", "value": "27.00" } },
                    { "amount": { "currency_code": "USD", "value": "1.00" } }
                ] } }
            ]
        }"#;
        let capture: CaptureResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            capture.first_captured_amount().unwrap(),
            Some(Money::new(dec!(27.00)))
        );
    }

    #[test]
    fn test_capture_response_without_captures() {
        let body = r#"{ "id": "X", "status": "PAYER_ACTION_REQUIRED" }"#;
        let capture: CaptureResponse = serde_json::from_str(body).unwrap();
        assert_eq!(capture.first_captured_amount().unwrap(), None);
        assert!(capture.payer.is_none());
    }

    #[test]
    fn test_create_request_shape() {
        let request = CreateOrderRequest {
            intent: "CAPTURE",
            purchase_units: vec![PurchaseUnitRequest {
                amount: AmountRequest {
                    currency_code: CURRENCY,
                    value: Money::new(dec!(27)).to_cents_string(),
                },
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["intent"], "CAPTURE");
        assert_eq!(json["purchase_units"][0]["amount"]["value"], "27.00");
        assert_eq!(json["purchase_units"][0]["amount"]["currency_code"], "USD");
    }
}
