//! Remote data store boundary.
//!
//! This crate provides:
//! - The `BalanceStore` abstraction over the hosted database's procedures
//! - An HTTPS RPC implementation and an in-memory one
//! - Row mapping from the store's columns to domain types
//! - A loader that fetches the snapshot pair for a reporting window

pub mod error;
pub mod loader;
pub mod rows;
pub mod store;

pub use error::StoreError;
pub use loader::SnapshotLoader;
pub use store::{BalanceStore, InMemoryBalanceStore, RpcBalanceStore};
