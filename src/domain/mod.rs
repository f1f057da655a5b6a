//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `customer` - Customers and their denormalized billing counters
//! - `subscription` - Subscriptions, billing cycles, payments and status
//! - `account` - Tenant profile, theme and trial
//! - `dashboard` - KPI aggregation
//! - `locale` - Page locale resolution

pub mod account;
pub mod customer;
pub mod dashboard;
pub mod foundation;
pub mod locale;
pub mod subscription;
