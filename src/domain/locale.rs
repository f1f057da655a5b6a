//! Locale selection for page routes.
//!
//! Page paths are prefixed with a locale (`/es/...`, `/en/...`). Anything
//! else is sent to the Spanish root.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;
use crate::domain::subscription::SubscriptionStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Es, Locale::En];

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Es => "es",
            Locale::En => "en",
        }
    }

    /// Root path of this locale, e.g. `/es`.
    pub fn root_path(&self) -> String {
        format!("/{}", self.as_str())
    }

    /// Badge label for a subscription status.
    pub fn status_label(&self, status: SubscriptionStatus) -> &'static str {
        use SubscriptionStatus::*;
        match (self, status) {
            (Locale::En, Authorized) => "Active",
            (Locale::En, Paused) => "Paused",
            (Locale::En, Cancelled) => "Cancelled",
            (Locale::En, Pending) => "Pending",
            (Locale::Es, Authorized) => "Activa",
            (Locale::Es, Paused) => "Pausada",
            (Locale::Es, Cancelled) => "Cancelada",
            (Locale::Es, Pending) => "Pendiente",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "es" => Ok(Locale::Es),
            "en" => Ok(Locale::En),
            other => Err(ValidationError::invalid_format(
                "locale",
                format!("unsupported locale '{}'", other),
            )),
        }
    }
}

/// What to do with an incoming page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRoute {
    /// Serve it under the given locale.
    Continue(Locale),

    /// Send the client elsewhere.
    Redirect(String),
}

/// Decides the route for a page path.
///
/// `/` and any path that does not start with a locale prefix redirect to the
/// default locale root. The prefix check is a plain string prefix, so
/// `/english` continues as `en`.
pub fn resolve_page_path(path: &str) -> PageRoute {
    if path == "/" {
        return PageRoute::Redirect(Locale::default().root_path());
    }
    for locale in Locale::ALL {
        if path.starts_with(&locale.root_path()) {
            return PageRoute::Continue(locale);
        }
    }
    PageRoute::Redirect(Locale::default().root_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_redirects_to_spanish() {
        assert_eq!(resolve_page_path("/"), PageRoute::Redirect("/es".to_string()));
    }

    #[test]
    fn locale_prefixed_paths_continue() {
        assert_eq!(resolve_page_path("/es"), PageRoute::Continue(Locale::Es));
        assert_eq!(resolve_page_path("/en/app/customers"), PageRoute::Continue(Locale::En));
        assert_eq!(resolve_page_path("/english"), PageRoute::Continue(Locale::En));
    }

    #[test]
    fn other_paths_redirect_to_spanish() {
        assert_eq!(resolve_page_path("/pricing"), PageRoute::Redirect("/es".to_string()));
        assert_eq!(resolve_page_path("/fr/app"), PageRoute::Redirect("/es".to_string()));
    }

    #[test]
    fn status_labels_are_localized() {
        assert_eq!(Locale::En.status_label(SubscriptionStatus::Authorized), "Active");
        assert_eq!(Locale::Es.status_label(SubscriptionStatus::Paused), "Pausada");
    }

    #[test]
    fn parse_is_strict() {
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert!("EN".parse::<Locale>().is_err());
        assert!("fr".parse::<Locale>().is_err());
    }
}
