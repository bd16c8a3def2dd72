//! # Lamprea Core Types
//!
//! The shared vocabulary of the back office: the master-data entities the
//! rest of the system stores, searches and displays. Entities are immutable
//! value snapshots; changing one is always expressed as a write operation
//! against the store, never as in-place mutation.

pub mod structs;

// Re-export the core types to provide a clean public API.
pub use structs::{Courier, Customer, CustomerDetails, CustomerFullView, SalesAgent, blank_to_none};
