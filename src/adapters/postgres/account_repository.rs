//! PostgreSQL implementation of AccountRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::account::{Account, AccountStatus, ThemePreference};
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::ports::AccountRepository;

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    user_id: String,
    email: String,
    display_name: Option<String>,
    theme: Option<String>,
    status: String,
    trial_ends_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    last_login_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = DomainError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let theme = row
            .theme
            .as_deref()
            .map(str::parse::<ThemePreference>)
            .transpose()
            .map_err(|e| DomainError::database("Invalid theme", e))?;

        Ok(Account {
            user_id: UserId::new(row.user_id)
                .map_err(|e| DomainError::database("Invalid user_id", e))?,
            email: row.email,
            display_name: row.display_name,
            theme,
            status: AccountStatus::from_stored(&row.status),
            trial_ends_at: row.trial_ends_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
            last_login_at: Timestamp::from_datetime(row.last_login_at),
        })
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find(&self, user_id: &UserId) -> Result<Option<Account>, DomainError> {
        let row: Option<AccountRow> = sqlx::query_as("SELECT * FROM accounts WHERE user_id = $1")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch account", e))?;

        row.map(Account::try_from).transpose()
    }

    async fn create(&self, account: &Account) -> Result<Account, DomainError> {
        // A concurrent first sign-in may have inserted the row already; the
        // no-op update makes RETURNING yield the stored row in that case.
        let row: AccountRow = sqlx::query_as(
            r#"
            INSERT INTO accounts (
                user_id, email, display_name, theme, status, trial_ends_at,
                created_at, last_login_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO UPDATE SET user_id = accounts.user_id
            RETURNING *
            "#,
        )
        .bind(account.user_id.as_str())
        .bind(&account.email)
        .bind(&account.display_name)
        .bind(account.theme.map(|t| t.as_str()))
        .bind(account.status.as_str())
        .bind(account.trial_ends_at.map(|t| *t.as_datetime()))
        .bind(account.created_at.as_datetime())
        .bind(account.last_login_at.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to create account", e))?;

        Account::try_from(row)
    }

    async fn update(&self, account: &Account) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts SET
                email = $2,
                display_name = $3,
                theme = $4,
                status = $5,
                trial_ends_at = $6,
                last_login_at = $7
            WHERE user_id = $1
            "#,
        )
        .bind(account.user_id.as_str())
        .bind(&account.email)
        .bind(&account.display_name)
        .bind(account.theme.map(|t| t.as_str()))
        .bind(account.status.as_str())
        .bind(account.trial_ends_at.map(|t| *t.as_datetime()))
        .bind(account.last_login_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update account", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::AccountNotFound,
                format!("Account not found: {}", account.user_id),
            ));
        }
        Ok(())
    }
}
