//! PostgreSQL implementation of PaymentCompletionWriter.
//!
//! Both writes share one transaction. An early return drops the
//! transaction, which rolls it back.

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::storefront::{Account, CanonicalEmail, PendingPayment};
use crate::ports::PaymentCompletionWriter;
use async_trait::async_trait;
use sqlx::PgPool;

/// Unique constraint on `accounts.email`.
const ACCOUNT_EMAIL_CONSTRAINT: &str = "accounts_email_key";

pub struct PostgresPurchaseLedger {
    pool: PgPool,
}

impl PostgresPurchaseLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentCompletionWriter for PostgresPurchaseLedger {
    async fn complete_payment(
        &self,
        payment: &PendingPayment,
        account: &Account,
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to begin transaction: {}", e))
        })?;

        // Complete the payment, only if still pending
        let updated = sqlx::query(
            r#"
            UPDATE payments SET
                status = 'completed',
                gateway_payment_id = $2,
                gateway_signature = $3,
                updated_at = $4
            WHERE gateway_order_id = $1 AND status = 'pending'
            "#,
        )
        .bind(&payment.gateway_order_id)
        .bind(&payment.gateway_payment_id)
        .bind(&payment.gateway_signature)
        .bind(payment.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to complete payment: {}", e))
        })?;

        if updated.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Payment is no longer pending",
            )
            .with_detail("gateway_order_id", &payment.gateway_order_id));
        }

        // Insert the account
        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, email, first_name, last_name, plan_id, purchased_at, next_maintenance_at,
                username, password_hash, payment_status, provisioned_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(account.email.as_str())
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.plan_id.as_str())
        .bind(account.purchased_at.as_datetime())
        .bind(account.next_maintenance_at.as_datetime())
        .bind(account.username.as_str())
        .bind(&account.password_hash)
        .bind(account.payment_status.as_str())
        .bind(account.provisioned_at.map(|t| *t.as_datetime()))
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            let constraint = match &e {
                sqlx::Error::Database(db_err) => db_err.constraint(),
                _ => None,
            };
            account_insert_error(constraint, &account.email, &e)
        })?;

        tx.commit().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to commit transaction: {}", e))
        })?;

        Ok(())
    }
}

/// Maps a failed account insert to a domain error.
///
/// A violation of the email constraint means another payment committed the
/// same account first.
fn account_insert_error(
    constraint: Option<&str>,
    email: &CanonicalEmail,
    cause: impl std::fmt::Display,
) -> DomainError {
    if constraint == Some(ACCOUNT_EMAIL_CONSTRAINT) {
        return DomainError::new(ErrorCode::AccountExists, "Email already registered")
            .with_detail("email", email.as_str());
    }
    DomainError::new(ErrorCode::DatabaseError, format!("Failed to insert account: {}", cause))
}
