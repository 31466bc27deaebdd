//! Adapters behind the domain ports: storage backends, payment processors and
//! the default side-effect hooks.

pub mod hooks;
pub mod in_memory;
pub mod paypal;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod sandbox;
