//! Billing configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::account::DEFAULT_TRIAL_DAYS;

#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Length of the free trial granted on first sign-in
    #[serde(default = "default_trial_days")]
    pub trial_days: u32,

    /// Checkout page the stub pre-approval provider points payers at
    #[serde(default = "default_preapproval_base_url")]
    pub preapproval_base_url: String,
}

impl BillingConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.trial_days == 0 || self.trial_days > 365 {
            return Err(ValidationError::InvalidTrialDays);
        }
        let url = self.preapproval_base_url.as_str();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ValidationError::InvalidPreapprovalUrl);
        }
        Ok(())
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            trial_days: default_trial_days(),
            preapproval_base_url: default_preapproval_base_url(),
        }
    }
}

fn default_trial_days() -> u32 {
    DEFAULT_TRIAL_DAYS
}

fn default_preapproval_base_url() -> String {
    "https://example.com/mercadopago/authorize".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = BillingConfig::default();
        assert_eq!(config.trial_days, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn trial_days_must_be_positive_and_bounded() {
        for days in [0, 366] {
            let config = BillingConfig {
                trial_days: days,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidTrialDays));
        }
    }

    #[test]
    fn preapproval_url_must_be_http() {
        let config = BillingConfig {
            preapproval_base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPreapprovalUrl));
    }
}
