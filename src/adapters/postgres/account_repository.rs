//! PostgreSQL implementation of AccountRepository.

use super::payment_repository::corrupt_row;
use crate::domain::foundation::{AccountId, DomainError, ErrorCode, Timestamp};
use crate::domain::storefront::{Account, CanonicalEmail, PaymentStatus, PlanId};
use crate::ports::AccountRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

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
    id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    plan_id: String,
    purchased_at: DateTime<Utc>,
    next_maintenance_at: DateTime<Utc>,
    username: String,
    password_hash: String,
    payment_status: String,
    provisioned_at: Option<DateTime<Utc>>,
}

impl TryFrom<AccountRow> for Account {
    type Error = DomainError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId::from_uuid(row.id),
            email: CanonicalEmail::from_canonical(row.email).map_err(corrupt_row)?,
            first_name: row.first_name,
            last_name: row.last_name,
            plan_id: PlanId::new(row.plan_id),
            purchased_at: Timestamp::from_datetime(row.purchased_at),
            next_maintenance_at: Timestamp::from_datetime(row.next_maintenance_at),
            username: CanonicalEmail::from_canonical(row.username).map_err(corrupt_row)?,
            password_hash: row.password_hash,
            payment_status: row.payment_status.parse::<PaymentStatus>().map_err(corrupt_row)?,
            provisioned_at: row.provisioned_at.map(Timestamp::from_datetime),
        })
    }
}

const ACCOUNT_COLUMNS: &str = "id, email, first_name, last_name, plan_id, purchased_at, \
     next_maintenance_at, username, password_hash, payment_status, provisioned_at";

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn exists_by_email(&self, email: &CanonicalEmail) -> Result<bool, DomainError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM accounts WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to check account: {}", e),
                    )
                })?;

        Ok(exists)
    }

    async fn find_by_email(&self, email: &CanonicalEmail) -> Result<Option<Account>, DomainError> {
        let row: Option<AccountRow> =
            sqlx::query_as(&format!("SELECT {} FROM accounts WHERE email = $1", ACCOUNT_COLUMNS))
                .bind(email.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to find account: {}", e),
                    )
                })?;

        row.map(Account::try_from).transpose()
    }

    async fn mark_provisioned(&self, id: &AccountId, at: Timestamp) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE accounts SET provisioned_at = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(at.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Failed to update account: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::AccountNotFound, "Account not found"));
        }

        Ok(())
    }

    async fn list_unprovisioned(&self, limit: u32) -> Result<Vec<Account>, DomainError> {
        let rows: Vec<AccountRow> = sqlx::query_as(&format!(
            "SELECT {} FROM accounts WHERE provisioned_at IS NULL ORDER BY purchased_at ASC LIMIT $1",
            ACCOUNT_COLUMNS
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to list accounts: {}", e))
        })?;

        rows.into_iter().map(Account::try_from).collect()
    }
}
