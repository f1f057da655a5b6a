//! PostgreSQL implementation of SubscriptionRepository.
//!
//! Every write runs in one transaction: the subscription row is locked with
//! `FOR UPDATE`, compared against the caller's snapshot, and the owning
//! customer's counters are adjusted before commit.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::customer_repository::insert_customer;
use super::pool::like_pattern;
use crate::domain::customer::{Customer, LedgerChange};
use crate::domain::foundation::{
    CustomerId, DomainError, ErrorCode, Money, PaymentId, SubscriptionId, Timestamp, UserId,
};
use crate::domain::subscription::{
    BillingCycle, Payment, StatusFilter, Subscription, SubscriptionQuery, SubscriptionStatus,
    SubscriptionView,
};
use crate::ports::{same_revision, SubscriptionRepository};

pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, DomainError> {
        self.pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    user_id: String,
    customer_id: Uuid,
    plan: String,
    price_cents: i64,
    billing_cycle: String,
    status: String,
    last_payment: Option<DateTime<Utc>>,
    next_payment: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let billing_cycle: BillingCycle = row
            .billing_cycle
            .parse()
            .map_err(|e| DomainError::database("Invalid billing_cycle", e))?;

        Ok(Subscription {
            id: SubscriptionId::from_uuid(row.id),
            user_id: UserId::new(row.user_id)
                .map_err(|e| DomainError::database("Invalid user_id", e))?,
            customer_id: CustomerId::from_uuid(row.customer_id),
            plan: row.plan,
            price: Money::from_cents(row.price_cents),
            billing_cycle,
            status: SubscriptionStatus::from_stored(&row.status),
            last_payment: row.last_payment.map(Timestamp::from_datetime),
            next_payment: row.next_payment.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

/// A subscription row joined with its customer's contact columns.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionViewRow {
    #[sqlx(flatten)]
    subscription: SubscriptionRow,
    customer_name: String,
    customer_email: String,
}

impl TryFrom<SubscriptionViewRow> for SubscriptionView {
    type Error = DomainError;

    fn try_from(row: SubscriptionViewRow) -> Result<Self, Self::Error> {
        Ok(SubscriptionView::from_parts(
            row.subscription.try_into()?,
            row.customer_name,
            row.customer_email,
        ))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    subscription_id: Uuid,
    user_id: String,
    paid_at: DateTime<Utc>,
    amount_cents: i64,
    covered_until: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: PaymentId::from_uuid(row.id),
            subscription_id: SubscriptionId::from_uuid(row.subscription_id),
            user_id: UserId::new(row.user_id)
                .map_err(|e| DomainError::database("Invalid user_id", e))?,
            paid_at: Timestamp::from_datetime(row.paid_at),
            amount: Money::from_cents(row.amount_cents),
            covered_until: Timestamp::from_datetime(row.covered_until),
        })
    }
}

const SELECT_VIEW: &str = r#"
    SELECT s.*, c.name AS customer_name, c.email AS customer_email
    FROM subscriptions s
    JOIN customers c ON c.id = s.customer_id
"#;

fn status_param(filter: &StatusFilter) -> Option<&'static str> {
    match filter {
        StatusFilter::All => None,
        StatusFilter::Only(status) => Some(status.as_str()),
    }
}

fn not_found(id: &SubscriptionId) -> DomainError {
    DomainError::new(
        ErrorCode::SubscriptionNotFound,
        format!("Subscription not found: {}", id),
    )
}

/// Locks the stored row and fails unless it still matches `expected`.
async fn lock_current(
    tx: &mut Transaction<'_, Postgres>,
    expected: &Subscription,
) -> Result<(), DomainError> {
    let row: Option<SubscriptionRow> = sqlx::query_as(
        "SELECT * FROM subscriptions WHERE id = $1 AND user_id = $2 FOR UPDATE",
    )
    .bind(expected.id.as_uuid())
    .bind(expected.user_id.as_str())
    .fetch_optional(&mut **tx)
    .await
    .map_err(|e| DomainError::database("Failed to lock subscription", e))?;

    let current = Subscription::try_from(row.ok_or_else(|| not_found(&expected.id))?)?;
    if !same_revision(&current, expected) {
        return Err(DomainError::new(
            ErrorCode::Conflict,
            "Subscription was modified concurrently, reload and retry",
        )
        .with_detail("subscription_id", expected.id.to_string()));
    }
    Ok(())
}

async fn apply_ledger(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &UserId,
    customer_id: &CustomerId,
    ledger: LedgerChange,
) -> Result<(), DomainError> {
    if ledger.is_noop() {
        return Ok(());
    }

    let result = sqlx::query(
        r#"
        UPDATE customers
        SET subscriptions = subscriptions + $3,
            total_value_cents = total_value_cents + $4
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(customer_id.as_uuid())
    .bind(user_id.as_str())
    .bind(ledger.subscriptions)
    .bind(ledger.total_value.cents())
    .execute(&mut **tx)
    .await
    .map_err(|e| DomainError::database("Failed to update customer ledger", e))?;

    if result.rows_affected() == 0 {
        return Err(DomainError::new(
            ErrorCode::CustomerNotFound,
            format!("Customer not found: {}", customer_id),
        ));
    }
    Ok(())
}

async fn write_subscription(
    tx: &mut Transaction<'_, Postgres>,
    subscription: &Subscription,
) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        UPDATE subscriptions SET
            plan = $3,
            price_cents = $4,
            billing_cycle = $5,
            status = $6,
            last_payment = $7,
            next_payment = $8
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(subscription.id.as_uuid())
    .bind(subscription.user_id.as_str())
    .bind(&subscription.plan)
    .bind(subscription.price.cents())
    .bind(subscription.billing_cycle.as_str())
    .bind(subscription.status.as_str())
    .bind(subscription.last_payment.map(|t| *t.as_datetime()))
    .bind(subscription.next_payment.map(|t| *t.as_datetime()))
    .execute(&mut **tx)
    .await
    .map_err(|e| DomainError::database("Failed to update subscription", e))?;
    Ok(())
}

async fn commit(tx: Transaction<'_, Postgres>) -> Result<(), DomainError> {
    tx.commit()
        .await
        .map_err(|e| DomainError::database("Failed to commit transaction", e))
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn create(
        &self,
        subscription: &Subscription,
        new_customer: Option<&Customer>,
        ledger: LedgerChange,
    ) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;

        if let Some(customer) = new_customer {
            if customer.id != subscription.customer_id || customer.user_id != subscription.user_id
            {
                return Err(DomainError::new(
                    ErrorCode::CustomerNotFound,
                    format!("Customer not found: {}", subscription.customer_id),
                ));
            }
            insert_customer(customer)
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::database("Failed to create customer", e))?;
        }

        // Fails with CustomerNotFound when the customer is another tenant's.
        apply_ledger(&mut tx, &subscription.user_id, &subscription.customer_id, ledger).await?;

        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                id, user_id, customer_id, plan, price_cents, billing_cycle, status,
                last_payment, next_payment, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.user_id.as_str())
        .bind(subscription.customer_id.as_uuid())
        .bind(&subscription.plan)
        .bind(subscription.price.cents())
        .bind(subscription.billing_cycle.as_str())
        .bind(subscription.status.as_str())
        .bind(subscription.last_payment.map(|t| *t.as_datetime()))
        .bind(subscription.next_payment.map(|t| *t.as_datetime()))
        .bind(subscription.created_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database("Failed to create subscription", e))?;

        commit(tx).await
    }

    async fn update(
        &self,
        previous: &Subscription,
        updated: &Subscription,
        ledger: LedgerChange,
    ) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;
        lock_current(&mut tx, previous).await?;
        apply_ledger(&mut tx, &updated.user_id, &updated.customer_id, ledger).await?;
        write_subscription(&mut tx, updated).await?;
        commit(tx).await
    }

    async fn record_payment(
        &self,
        previous: &Subscription,
        updated: &Subscription,
        payment: &Payment,
    ) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;
        lock_current(&mut tx, previous).await?;
        write_subscription(&mut tx, updated).await?;

        sqlx::query(
            r#"
            INSERT INTO payments (id, subscription_id, user_id, paid_at, amount_cents, covered_until)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.subscription_id.as_uuid())
        .bind(payment.user_id.as_str())
        .bind(payment.paid_at.as_datetime())
        .bind(payment.amount.cents())
        .bind(payment.covered_until.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database("Failed to record payment", e))?;

        commit(tx).await
    }

    async fn delete(
        &self,
        subscription: &Subscription,
        ledger: LedgerChange,
    ) -> Result<(), DomainError> {
        let mut tx = self.begin().await?;
        lock_current(&mut tx, subscription).await?;
        apply_ledger(&mut tx, &subscription.user_id, &subscription.customer_id, ledger).await?;

        // payments go with it (ON DELETE CASCADE)
        sqlx::query("DELETE FROM subscriptions WHERE id = $1 AND user_id = $2")
            .bind(subscription.id.as_uuid())
            .bind(subscription.user_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to delete subscription", e))?;

        commit(tx).await
    }

    async fn find(
        &self,
        user_id: &UserId,
        id: &SubscriptionId,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> =
            sqlx::query_as("SELECT * FROM subscriptions WHERE id = $1 AND user_id = $2")
                .bind(id.as_uuid())
                .bind(user_id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to fetch subscription", e))?;

        row.map(Subscription::try_from).transpose()
    }

    async fn find_view(
        &self,
        user_id: &UserId,
        id: &SubscriptionId,
    ) -> Result<Option<SubscriptionView>, DomainError> {
        let sql = format!("{} WHERE s.id = $1 AND s.user_id = $2", SELECT_VIEW);
        let row: Option<SubscriptionViewRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch subscription", e))?;

        row.map(SubscriptionView::try_from).transpose()
    }

    async fn list(
        &self,
        user_id: &UserId,
        query: &SubscriptionQuery,
    ) -> Result<Vec<SubscriptionView>, DomainError> {
        let sql = format!(
            r#"{}
            WHERE s.user_id = $1
              AND ($2::text IS NULL OR c.name ILIKE $2 ESCAPE '\' OR c.email ILIKE $2 ESCAPE '\')
              AND ($3::text IS NULL OR s.status = $3)
            ORDER BY s.created_at DESC
            "#,
            SELECT_VIEW
        );
        let rows: Vec<SubscriptionViewRow> = sqlx::query_as(&sql)
            .bind(user_id.as_str())
            .bind(like_pattern(query.search.as_deref()))
            .bind(status_param(&query.status))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list subscriptions", e))?;

        rows.into_iter().map(SubscriptionView::try_from).collect()
    }

    async fn list_for_customer(
        &self,
        user_id: &UserId,
        customer_id: &CustomerId,
    ) -> Result<Vec<SubscriptionView>, DomainError> {
        let sql = format!(
            "{} WHERE s.user_id = $1 AND s.customer_id = $2 ORDER BY s.created_at DESC",
            SELECT_VIEW
        );
        let rows: Vec<SubscriptionViewRow> = sqlx::query_as(&sql)
            .bind(user_id.as_str())
            .bind(customer_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list customer subscriptions", e))?;

        rows.into_iter().map(SubscriptionView::try_from).collect()
    }

    async fn list_all(&self, user_id: &UserId) -> Result<Vec<Subscription>, DomainError> {
        let rows: Vec<SubscriptionRow> =
            sqlx::query_as("SELECT * FROM subscriptions WHERE user_id = $1")
                .bind(user_id.as_str())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to list subscriptions", e))?;

        rows.into_iter().map(Subscription::try_from).collect()
    }

    async fn list_payments(
        &self,
        user_id: &UserId,
        id: &SubscriptionId,
    ) -> Result<Vec<Payment>, DomainError> {
        let rows: Vec<PaymentRow> = sqlx::query_as(
            r#"
            SELECT * FROM payments
            WHERE subscription_id = $1 AND user_id = $2
            ORDER BY paid_at DESC
            "#,
        )
        .bind(id.as_uuid())
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list payments", e))?;

        rows.into_iter().map(Payment::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cycle: &str, status: &str) -> SubscriptionRow {
        SubscriptionRow {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            customer_id: Uuid::new_v4(),
            plan: "Pro".to_string(),
            price_cents: 12_000,
            billing_cycle: cycle.to_string(),
            status: status.to_string(),
            last_payment: None,
            next_payment: Some(Utc::now()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn row_converts_to_subscription() {
        let sub = Subscription::try_from(row("yearly", "paused")).unwrap();
        assert_eq!(sub.billing_cycle, BillingCycle::Yearly);
        assert_eq!(sub.status, SubscriptionStatus::Paused);
        assert_eq!(sub.monthly_value(), Money::from_cents(1_000));
    }

    #[test]
    fn unknown_status_reads_as_authorized() {
        let sub = Subscription::try_from(row("monthly", "on_hold")).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Authorized);
    }

    #[test]
    fn unknown_cycle_is_a_database_error() {
        let err = Subscription::try_from(row("weekly", "authorized")).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn view_row_carries_monthly_value() {
        let view = SubscriptionView::try_from(SubscriptionViewRow {
            subscription: row("yearly", "authorized"),
            customer_name: "Ana".to_string(),
            customer_email: "ana@example.com".to_string(),
        })
        .unwrap();
        assert_eq!(view.monthly_value, Money::from_cents(1_000));
        assert_eq!(view.customer_name, "Ana");
    }

    #[test]
    fn status_filter_binds_status_name() {
        assert_eq!(status_param(&StatusFilter::All), None);
        assert_eq!(
            status_param(&StatusFilter::Only(SubscriptionStatus::Cancelled)),
            Some("cancelled")
        );
    }
}
