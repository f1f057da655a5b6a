//! HTTP DTOs for account endpoints.

use serde::{Deserialize, Serialize};

use crate::application::AccountSummary;
use crate::domain::account::{AccountStatus, ThemePreference};
use crate::domain::foundation::Timestamp;

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateThemeRequest {
    /// `light`, `dark` or `system`.
    pub theme: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub theme: Option<ThemePreference>,
    pub status: AccountStatus,
    pub trial_ends_at: Option<Timestamp>,
    pub trial_days_left: u32,
    pub show_trial_banner: bool,
    pub created_at: Timestamp,
    pub last_login_at: Timestamp,
}

impl From<AccountSummary> for AccountResponse {
    fn from(summary: AccountSummary) -> Self {
        let account = summary.account;
        Self {
            user_id: account.user_id.to_string(),
            email: account.email,
            display_name: account.display_name,
            theme: account.theme,
            status: account.status,
            trial_ends_at: account.trial_ends_at,
            trial_days_left: summary.trial_days_left,
            show_trial_banner: summary.show_trial_banner,
            created_at: account.created_at,
            last_login_at: account.last_login_at,
        }
    }
}
