//! PostgreSQL implementation of CustomerRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::pool::like_pattern;
use crate::domain::customer::{Customer, CustomerName, EmailAddress};
use crate::domain::foundation::{
    CustomerId, DomainError, ErrorCode, Money, Timestamp, UserId,
};
use crate::ports::CustomerRepository;

pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a customer.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct CustomerRow {
    id: Uuid,
    user_id: String,
    name: String,
    email: String,
    subscriptions: i64,
    total_value_cents: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = DomainError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        Ok(Customer {
            id: CustomerId::from_uuid(row.id),
            user_id: UserId::new(row.user_id)
                .map_err(|e| DomainError::database("Invalid user_id", e))?,
            name: CustomerName::from_stored(row.name),
            email: EmailAddress::from_stored(row.email),
            subscriptions: row.subscriptions,
            total_value: Money::from_cents(row.total_value_cents),
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

pub(super) const INSERT_CUSTOMER: &str = r#"
    INSERT INTO customers (id, user_id, name, email, subscriptions, total_value_cents, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
"#;

pub(super) fn insert_customer<'q>(
    customer: &'q Customer,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    sqlx::query(INSERT_CUSTOMER)
        .bind(customer.id.as_uuid())
        .bind(customer.user_id.as_str())
        .bind(customer.name.as_str())
        .bind(customer.email.as_str())
        .bind(customer.subscriptions)
        .bind(customer.total_value.cents())
        .bind(customer.created_at.as_datetime())
}

fn not_found(id: &CustomerId) -> DomainError {
    DomainError::new(ErrorCode::CustomerNotFound, format!("Customer not found: {}", id))
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    async fn create(&self, customer: &Customer) -> Result<(), DomainError> {
        insert_customer(customer)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to create customer", e))?;
        Ok(())
    }

    async fn find(
        &self,
        user_id: &UserId,
        id: &CustomerId,
    ) -> Result<Option<Customer>, DomainError> {
        let row: Option<CustomerRow> = sqlx::query_as(
            "SELECT * FROM customers WHERE id = $1 AND user_id = $2",
        )
        .bind(id.as_uuid())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch customer", e))?;

        row.map(Customer::try_from).transpose()
    }

    async fn list(
        &self,
        user_id: &UserId,
        search: Option<&str>,
    ) -> Result<Vec<Customer>, DomainError> {
        let rows: Vec<CustomerRow> = sqlx::query_as(
            r#"
            SELECT * FROM customers
            WHERE user_id = $1
              AND ($2::text IS NULL OR name ILIKE $2 ESCAPE '\' OR email ILIKE $2 ESCAPE '\')
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_str())
        .bind(like_pattern(search))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list customers", e))?;

        rows.into_iter().map(Customer::try_from).collect()
    }

    async fn delete(&self, user_id: &UserId, id: &CustomerId) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))?;

        let row: Option<CustomerRow> = sqlx::query_as(
            "SELECT * FROM customers WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(id.as_uuid())
        .bind(user_id.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| DomainError::database("Failed to fetch customer", e))?;

        let customer = Customer::try_from(row.ok_or_else(|| not_found(id))?)?;
        customer.ensure_deletable()?;

        sqlx::query("DELETE FROM customers WHERE id = $1 AND user_id = $2")
            .bind(id.as_uuid())
            .bind(user_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to delete customer", e))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit transaction", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_converts_to_customer() {
        let row = CustomerRow {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            name: "Ana Gómez".to_string(),
            email: "ana@example.com".to_string(),
            subscriptions: 2,
            total_value_cents: 1_833,
            created_at: Utc::now(),
        };
        let customer = Customer::try_from(row).unwrap();
        assert_eq!(customer.name.as_str(), "Ana Gómez");
        assert_eq!(customer.total_value, Money::from_cents(1_833));
    }

    #[test]
    fn blank_user_id_is_a_database_error() {
        let row = CustomerRow {
            id: Uuid::new_v4(),
            user_id: String::new(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            subscriptions: 0,
            total_value_cents: 0,
            created_at: Utc::now(),
        };
        let err = Customer::try_from(row).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn repository_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresCustomerRepository>();
    }
}
