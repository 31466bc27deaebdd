//! Application layer containing the order-finalization workflow.
//!
//! `OrderService` is the entry point. Its operations are split by concern:
//! `checkout` validates and commits a cart, `reconciliation` drives the
//! payment intent and capture, and `settlement` applies the paid transition.

pub mod checkout;
pub mod reconciliation;
pub mod service;
pub mod settlement;
pub mod validator;
