//! Domain model of order finalization: carts, orders, payments and the ports
//! through which the application layer reaches storage and the processor.

pub mod cart;
pub mod money;
pub mod order;
pub mod payment;
pub mod ports;
pub mod product;
pub mod user;
