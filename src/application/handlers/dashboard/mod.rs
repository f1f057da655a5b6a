//! Dashboard handlers.

mod get_kpis;

pub use get_kpis::{GetKpisHandler, GetKpisQuery};
