//! PostgreSQL implementation of PaymentRepository.

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, Timestamp};
use crate::domain::storefront::{CanonicalEmail, PaymentStatus, PendingPayment, PlanId};
use crate::ports::PaymentRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a payment.
#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    order_id: String,
    gateway_order_id: String,
    plan_id: String,
    amount: i64,
    currency: String,
    first_name: String,
    last_name: String,
    email: String,
    gateway_payment_id: Option<String>,
    gateway_signature: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for PendingPayment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(PendingPayment {
            order_id: OrderId::new(row.order_id).map_err(corrupt_row)?,
            plan_id: PlanId::new(row.plan_id),
            amount: row.amount,
            currency: row.currency,
            first_name: row.first_name,
            last_name: row.last_name,
            email: CanonicalEmail::from_canonical(row.email).map_err(corrupt_row)?,
            gateway_order_id: row.gateway_order_id,
            gateway_payment_id: row.gateway_payment_id,
            gateway_signature: row.gateway_signature,
            status: row.status.parse::<PaymentStatus>().map_err(corrupt_row)?,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

pub(super) fn corrupt_row(e: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Invalid stored value: {}", e))
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn save(&self, payment: &PendingPayment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                order_id, gateway_order_id, plan_id, amount, currency, first_name, last_name,
                email, gateway_payment_id, gateway_signature, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(payment.order_id.as_str())
        .bind(&payment.gateway_order_id)
        .bind(payment.plan_id.as_str())
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(&payment.first_name)
        .bind(&payment.last_name)
        .bind(payment.email.as_str())
        .bind(&payment.gateway_payment_id)
        .bind(&payment.gateway_signature)
        .bind(payment.status.as_str())
        .bind(payment.created_at.as_datetime())
        .bind(payment.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to save payment: {}", e))
        })?;

        Ok(())
    }

    async fn find_by_gateway_order_id(
        &self,
        gateway_order_id: &str,
    ) -> Result<Option<PendingPayment>, DomainError> {
        let row: Option<PaymentRow> = sqlx::query_as(
            r#"
            SELECT order_id, gateway_order_id, plan_id, amount, currency, first_name, last_name,
                   email, gateway_payment_id, gateway_signature, status, created_at, updated_at
            FROM payments
            WHERE gateway_order_id = $1
            "#,
        )
        .bind(gateway_order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find payment: {}", e))
        })?;

        row.map(PendingPayment::try_from).transpose()
    }

    async fn mark_failed(&self, gateway_order_id: &str) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payments SET status = 'failed', updated_at = $2
            WHERE gateway_order_id = $1 AND status = 'pending'
            "#,
        )
        .bind(gateway_order_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to update payment: {}", e))
        })?;

        Ok(result.rows_affected() == 1)
    }
}
