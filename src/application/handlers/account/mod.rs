//! Account handlers.
//!
//! ## Commands
//! - Provision on sign-in (creates the trial account the first time)
//! - Update the theme preference
//!
//! ## Queries
//! - Get the account with its trial state

mod get_account;
mod provision_account;
mod update_theme;

use crate::domain::account::Account;
use crate::domain::foundation::Timestamp;

// Commands
pub use provision_account::{ProvisionAccountCommand, ProvisionAccountHandler, ProvisionAccountResult};
pub use update_theme::{UpdateThemeCommand, UpdateThemeHandler};

// Queries
pub use get_account::{GetAccountHandler, GetAccountQuery};

/// An account together with its trial state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub account: Account,
    pub trial_days_left: u32,
    pub show_trial_banner: bool,
}

impl AccountSummary {
    pub fn at(account: Account, now: &Timestamp) -> Self {
        Self {
            trial_days_left: account.trial_days_left(now),
            show_trial_banner: account.show_trial_banner(),
            account,
        }
    }
}
