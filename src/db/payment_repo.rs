// src/db/payment_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::payments::{InstallmentStatus, Payment, PaymentInstallment, PaymentMethod},
};

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  PAGAMENTOS (aditivos, sem estorno)
    // =========================================================================

    pub async fn insert_payment<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        installment_id: Option<Uuid>,
        amount: Decimal,
        method: PaymentMethod,
        notes: Option<&str>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (tenant_id, order_id, installment_id, amount, method, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(order_id)
        .bind(installment_id)
        .bind(amount)
        .bind(method)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    pub async fn sum_payments_for_order<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_one(executor)
        .await?;

        Ok(total)
    }

    pub async fn sum_payments_for_installment<'e, E>(
        &self,
        executor: E,
        installment_id: Uuid,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE installment_id = $1",
        )
        .bind(installment_id)
        .fetch_one(executor)
        .await?;

        Ok(total)
    }

    pub async fn list_payments_for_order<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<Vec<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE order_id = $1 ORDER BY created_at ASC",
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;

        Ok(payments)
    }

    // =========================================================================
    //  PARCELAS
    // =========================================================================

    pub async fn insert_installment<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        installment_number: i32,
        amount: Decimal,
        due_date: NaiveDate,
    ) -> Result<PaymentInstallment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let installment = sqlx::query_as::<_, PaymentInstallment>(
            r#"
            INSERT INTO payment_installments (tenant_id, order_id, installment_number, amount, due_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(order_id)
        .bind(installment_number)
        .bind(amount)
        .bind(due_date)
        .fetch_one(executor)
        .await?;

        Ok(installment)
    }

    // Tranca a parcela durante a reconciliação (evita o double-settle)
    pub async fn find_installment_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        installment_id: Uuid,
    ) -> Result<Option<PaymentInstallment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let installment = sqlx::query_as::<_, PaymentInstallment>(
            "SELECT * FROM payment_installments WHERE id = $1 AND tenant_id = $2 FOR UPDATE",
        )
        .bind(installment_id)
        .bind(tenant_id)
        .fetch_optional(executor)
        .await?;

        Ok(installment)
    }

    pub async fn list_installments_for_order<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<Vec<PaymentInstallment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let installments = sqlx::query_as::<_, PaymentInstallment>(
            "SELECT * FROM payment_installments WHERE order_id = $1 ORDER BY installment_number ASC",
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;

        Ok(installments)
    }

    pub async fn count_installments<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM payment_installments WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_one(executor)
        .await?;

        Ok(total)
    }

    pub async fn update_installment_status<'e, E>(
        &self,
        executor: E,
        installment_id: Uuid,
        status: InstallmentStatus,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<PaymentInstallment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let installment = sqlx::query_as::<_, PaymentInstallment>(
            r#"
            UPDATE payment_installments
            SET status = $2, paid_at = COALESCE($3, paid_at)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(installment_id)
        .bind(status)
        .bind(paid_at)
        .fetch_one(executor)
        .await?;

        Ok(installment)
    }
}
