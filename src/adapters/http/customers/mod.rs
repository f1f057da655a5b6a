//! HTTP adapter for customer endpoints.
//!
//! - `GET /api/customers?search=` - List customers
//! - `POST /api/customers` - Create a customer
//! - `GET /api/customers/:id` - Customer with its subscriptions
//! - `DELETE /api/customers/:id` - Delete a customer without subscriptions

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::customer_routes;
