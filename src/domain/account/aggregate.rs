//! Account aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthenticatedUser, Timestamp, UserId};

use super::{AccountStatus, ThemePreference};

/// Length of the free trial given on sign-up.
pub const DEFAULT_TRIAL_DAYS: u32 = 15;

/// A tenant's profile, created the first time they sign in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub user_id: UserId,

    pub email: String,

    pub display_name: Option<String>,

    /// `None` until the tenant picks one.
    pub theme: Option<ThemePreference>,

    pub status: AccountStatus,

    pub trial_ends_at: Option<Timestamp>,

    pub created_at: Timestamp,

    pub last_login_at: Timestamp,
}

impl Account {
    /// First sign-in: a trial account lasting `trial_days` from `now`.
    pub fn provision(user: &AuthenticatedUser, trial_days: u32, now: Timestamp) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            theme: None,
            status: AccountStatus::Trial,
            trial_ends_at: Some(now.add_days(i64::from(trial_days))),
            created_at: now,
            last_login_at: now,
        }
    }

    /// Later sign-ins refresh the login time and whatever the token says
    /// about the user. An empty email or name in the token keeps the stored one.
    pub fn record_login(&mut self, user: &AuthenticatedUser, now: Timestamp) {
        self.last_login_at = now;
        if !user.email.trim().is_empty() {
            self.email = user.email.clone();
        }
        if let Some(name) = user.display_name.as_ref().filter(|n| !n.trim().is_empty()) {
            self.display_name = Some(name.clone());
        }
    }

    pub fn set_theme(&mut self, theme: ThemePreference) {
        self.theme = Some(theme);
    }

    /// Whole days left in the trial, rounded up. Zero once it has ended.
    pub fn trial_days_left(&self, now: &Timestamp) -> u32 {
        self.trial_ends_at
            .map(|end| end.days_left_from(now))
            .unwrap_or(0)
    }

    pub fn show_trial_banner(&self) -> bool {
        self.status == AccountStatus::Trial && self.trial_ends_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, name: Option<&str>) -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("uid-1").unwrap(),
            email,
            name.map(str::to_string),
            true,
        )
    }

    fn ymd(y: i32, m: u32, d: u32) -> Timestamp {
        Timestamp::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn provision_starts_a_trial() {
        let now = ymd(2024, 3, 1);
        let account = Account::provision(&user("ana@example.com", Some("Ana")), 15, now);
        assert_eq!(account.status, AccountStatus::Trial);
        assert_eq!(account.trial_ends_at, Some(ymd(2024, 3, 16)));
        assert!(account.theme.is_none());
        assert_eq!(account.trial_days_left(&now), 15);
        assert!(account.show_trial_banner());
    }

    #[test]
    fn trial_days_round_up_and_floor_at_zero() {
        let account = Account::provision(&user("a@b.c", None), 15, ymd(2024, 3, 1));
        let almost_a_day_in = Timestamp::from_datetime(
            *ymd(2024, 3, 1).as_datetime() + chrono::Duration::hours(23),
        );
        assert_eq!(account.trial_days_left(&almost_a_day_in), 15);
        assert_eq!(account.trial_days_left(&ymd(2024, 3, 15)), 1);
        assert_eq!(account.trial_days_left(&ymd(2024, 4, 1)), 0);
    }

    #[test]
    fn banner_hidden_for_active_accounts() {
        let mut account = Account::provision(&user("a@b.c", None), 15, ymd(2024, 3, 1));
        account.status = AccountStatus::Active;
        assert!(!account.show_trial_banner());
    }

    #[test]
    fn login_refreshes_profile_but_keeps_trial() {
        let mut account = Account::provision(&user("old@b.c", Some("Old")), 15, ymd(2024, 3, 1));
        account.record_login(&user("new@b.c", None), ymd(2024, 3, 5));
        assert_eq!(account.email, "new@b.c");
        assert_eq!(account.display_name.as_deref(), Some("Old"));
        assert_eq!(account.last_login_at, ymd(2024, 3, 5));
        assert_eq!(account.trial_ends_at, Some(ymd(2024, 3, 16)));
    }

    #[test]
    fn theme_is_stored() {
        let mut account = Account::provision(&user("a@b.c", None), 15, ymd(2024, 3, 1));
        account.set_theme(ThemePreference::Dark);
        assert_eq!(account.theme, Some(ThemePreference::Dark));
    }
}
