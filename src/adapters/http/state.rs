//! Shared application state for the HTTP surface.

use std::sync::Arc;

use crate::application::handlers::account::{
    GetAccountHandler, ProvisionAccountHandler, UpdateThemeHandler,
};
use crate::application::handlers::customer::{
    CreateCustomerHandler, DeleteCustomerHandler, GetCustomerHandler, ListCustomersHandler,
};
use crate::application::handlers::dashboard::GetKpisHandler;
use crate::application::handlers::subscription::{
    CancelSubscriptionHandler, CreatePreapprovalHandler, CreateSubscriptionHandler,
    DeleteSubscriptionHandler, GetSubscriptionHandler, ListPaymentsHandler,
    ListSubscriptionsHandler, RecordPaymentHandler, TogglePauseHandler,
    UpdateSubscriptionHandler,
};
use crate::ports::{
    AccountRepository, ChangeFeed, CustomerRepository, EventPublisher, PreapprovalProvider,
    SubscriptionRepository,
};

/// Every port the handlers need, cloned per request.
///
/// Application handlers are cheap to build, so they are created on demand
/// from the shared `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<dyn CustomerRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub event_publisher: Arc<dyn EventPublisher>,
    pub change_feed: Arc<dyn ChangeFeed>,
    pub preapprovals: Arc<dyn PreapprovalProvider>,
    pub trial_days: u32,
}

impl AppState {
    // === Accounts ===

    pub fn provision_account_handler(&self) -> ProvisionAccountHandler {
        ProvisionAccountHandler::new(
            self.accounts.clone(),
            self.event_publisher.clone(),
            self.trial_days,
        )
    }

    pub fn get_account_handler(&self) -> GetAccountHandler {
        GetAccountHandler::new(self.accounts.clone())
    }

    pub fn update_theme_handler(&self) -> UpdateThemeHandler {
        UpdateThemeHandler::new(self.accounts.clone(), self.event_publisher.clone())
    }

    // === Customers ===

    pub fn create_customer_handler(&self) -> CreateCustomerHandler {
        CreateCustomerHandler::new(self.customers.clone(), self.event_publisher.clone())
    }

    pub fn list_customers_handler(&self) -> ListCustomersHandler {
        ListCustomersHandler::new(self.customers.clone())
    }

    pub fn get_customer_handler(&self) -> GetCustomerHandler {
        GetCustomerHandler::new(self.customers.clone(), self.subscriptions.clone())
    }

    pub fn delete_customer_handler(&self) -> DeleteCustomerHandler {
        DeleteCustomerHandler::new(self.customers.clone(), self.event_publisher.clone())
    }

    // === Subscriptions ===

    pub fn create_subscription_handler(&self) -> CreateSubscriptionHandler {
        CreateSubscriptionHandler::new(
            self.customers.clone(),
            self.subscriptions.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn update_subscription_handler(&self) -> UpdateSubscriptionHandler {
        UpdateSubscriptionHandler::new(self.subscriptions.clone(), self.event_publisher.clone())
    }

    pub fn record_payment_handler(&self) -> RecordPaymentHandler {
        RecordPaymentHandler::new(self.subscriptions.clone(), self.event_publisher.clone())
    }

    pub fn toggle_pause_handler(&self) -> TogglePauseHandler {
        TogglePauseHandler::new(self.subscriptions.clone(), self.event_publisher.clone())
    }

    pub fn cancel_subscription_handler(&self) -> CancelSubscriptionHandler {
        CancelSubscriptionHandler::new(self.subscriptions.clone(), self.event_publisher.clone())
    }

    pub fn delete_subscription_handler(&self) -> DeleteSubscriptionHandler {
        DeleteSubscriptionHandler::new(self.subscriptions.clone(), self.event_publisher.clone())
    }

    pub fn list_subscriptions_handler(&self) -> ListSubscriptionsHandler {
        ListSubscriptionsHandler::new(self.subscriptions.clone())
    }

    pub fn get_subscription_handler(&self) -> GetSubscriptionHandler {
        GetSubscriptionHandler::new(self.subscriptions.clone())
    }

    pub fn list_payments_handler(&self) -> ListPaymentsHandler {
        ListPaymentsHandler::new(self.subscriptions.clone())
    }

    pub fn create_preapproval_handler(&self) -> CreatePreapprovalHandler {
        CreatePreapprovalHandler::new(self.subscriptions.clone(), self.preapprovals.clone())
    }

    // === Dashboard ===

    pub fn kpis_handler(&self) -> GetKpisHandler {
        GetKpisHandler::new(self.subscriptions.clone())
    }
}
