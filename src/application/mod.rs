//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, command handlers (writes) are kept apart from query
//! handlers (reads).

pub mod handlers;

pub use handlers::account::AccountSummary;
