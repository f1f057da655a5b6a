//! HTTP adapter for dashboard KPIs.
//!
//! - `GET /api/dashboard/kpis` - Status counts, MRR and month-over-month growth

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::dashboard_routes;
