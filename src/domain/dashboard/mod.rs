pub mod kpis;

pub use kpis::DashboardKpis;
