//! HTTP adapter for subscription endpoints.
//!
//! - `GET /api/subscriptions?search=&status=` - List subscriptions
//! - `POST /api/subscriptions` - Open a subscription (existing or new customer)
//! - `GET|PATCH|DELETE /api/subscriptions/:id`
//! - `GET|POST /api/subscriptions/:id/payments` - Payment history / record a payment
//! - `POST /api/subscriptions/:id/pause` - Toggle paused
//! - `POST /api/subscriptions/:id/cancel`
//! - `POST /api/subscriptions/preapproval` - Payment authorization link

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::subscription_routes;
