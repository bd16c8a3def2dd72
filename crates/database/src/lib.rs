//! # Lamprea Database Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL database. It is the back office's "permanent archive."
//!
//! ## Architectural Principles
//!
//! - **Adapter layer:** all SQL and driver details live here, behind typed
//!   repositories. The UI invokes these operations and renders their
//!   results; it never sees a connection or a statement.
//! - **One session per call:** a session is owned by a single call and never
//!   shared. The repositories' session-taking methods participate in a
//!   caller's transaction without committing, rolling back, or closing it;
//!   only the composite service holds those responsibilities.
//! - **Asynchronous & pooled:** all operations are asynchronous over a
//!   shared connection pool (`PgPool`).
//!
//! ## Public API
//!
//! - `connect`: establishes the connection pool from typed settings.
//! - `run_migrations`: applies the embedded schema (used by the tests).
//! - The four entity repositories, and `CustomerService` for the compound
//!   customer + details transaction and the joined bulk view.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod mappers;
pub mod repository;
pub mod service;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::{
    CourierRepository, CustomerDetailsRepository, CustomerRepository, SalesAgentRepository,
};
pub use service::CustomerService;
