//! Customer handlers.
//!
//! ## Commands
//! - Create a customer
//! - Delete a customer without subscriptions
//!
//! ## Queries
//! - List customers with search
//! - Get a customer with its subscriptions

mod create_customer;
mod delete_customer;
mod get_customer;
mod list_customers;

// Commands
pub use create_customer::{CreateCustomerCommand, CreateCustomerHandler};
pub use delete_customer::{DeleteCustomerCommand, DeleteCustomerHandler};

// Queries
pub use get_customer::{GetCustomerHandler, GetCustomerQuery, GetCustomerResult};
pub use list_customers::{ListCustomersHandler, ListCustomersQuery};
