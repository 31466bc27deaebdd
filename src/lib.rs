//! Order finalization for a shop checkout.
//!
//! Converts a shopper's cart into an order in one atomic commit, opens a
//! payment intent with the processor, and reconciles the capture back into
//! the order exactly once.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
