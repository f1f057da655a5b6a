//! Cobri - recurring-billing backend for small businesses.
//!
//! Each signed-in user (tenant) manages their own customers, the
//! subscriptions billed to them and the payments recorded against those
//! subscriptions, and gets revenue KPIs over the lot.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
