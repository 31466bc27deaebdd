use crate::domain::cart::CartId;
use crate::domain::order::OrderId;
use crate::domain::product::ProductId;
use thiserror::Error;

/// Failures raised by a storage backend.
///
/// These never reach a caller verbatim: the service layer maps them onto
/// `OrderError` variants whose messages are safe to show to a shopper.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Product {0} does not exist")]
    MissingProduct(ProductId),
    #[error("Cart {0} does not exist")]
    MissingCart(CartId),
    #[error("Order {0} does not exist")]
    MissingOrder(OrderId),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),
    #[error("Internal storage error: {0}")]
    Internal(String),
}

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("User is not authenticated")]
    Unauthenticated,
    #[error("User not found")]
    UserNotFound,
    #[error("Cart is empty")]
    EmptyCart,
    #[error("No shipping address")]
    MissingAddress,
    #[error("No payment method")]
    MissingPaymentMethod,
    #[error("Invalid order data: {0}")]
    ValidationError(String),
    #[error("Order not created")]
    OrderNotCreated(#[source] StoreError),
    #[error("Order not found")]
    OrderNotFound,
    #[error("Order is already paid")]
    AlreadyPaid,
    #[error("Payment gateway error: {0}")]
    GatewayError(String),
    #[error("Error in PayPal payment")]
    PaymentMismatch,
    #[error("Storage error: {0}")]
    StorageError(#[from] StoreError),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl OrderError {
    /// Where the shopper should be sent to fix the problem, if anywhere.
    pub fn redirect_to(&self) -> Option<&'static str> {
        match self {
            OrderError::EmptyCart => Some("/cart"),
            OrderError::MissingAddress => Some("/shipping-address"),
            OrderError::MissingPaymentMethod => Some("/payment-method"),
            _ => None,
        }
    }

    /// A short message without causes or internal identifiers.
    pub fn public_message(&self) -> String {
        match self {
            OrderError::StorageError(_) | OrderError::IoError(_) | OrderError::CsvError(_) => {
                "Something went wrong, please try again".to_string()
            }
            OrderError::ConfigError(_) => "Service is not configured".to_string(),
            OrderError::GatewayError(_) => "Payment provider is unavailable".to_string(),
            OrderError::ValidationError(_) => "Invalid order data".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T, E = OrderError> = std::result::Result<T, E>;
