//! Account domain module.
//!
//! An account is the tenant's own profile: who they are, which theme they
//! picked, and where they stand in the free trial.
//!
//! # Module Structure
//!
//! - `aggregate` - Account entity, provisioning and trial math
//! - `preferences` - Theme preference and account status enums

mod aggregate;
mod preferences;

pub use aggregate::{Account, DEFAULT_TRIAL_DAYS};
pub use preferences::{AccountStatus, ThemePreference};
