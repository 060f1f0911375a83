// src/db/order_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    middleware::access::AccessScope,
    models::orders::{Order, OrderItem, OrderStatus, PaymentStatus},
};

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_order<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        agency_id: Option<Uuid>,
        customer_id: Uuid,
        total_amount: Decimal,
        discount_amount: Decimal,
        tax_amount: Decimal,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders
                (tenant_id, agency_id, customer_id, total_amount, discount_amount, tax_amount)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(agency_id)
        .bind(customer_id)
        .bind(total_amount)
        .bind(discount_amount)
        .bind(tax_amount)
        .fetch_one(executor)
        .await?;

        Ok(order)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        service_id: Option<Uuid>,
        description: &str,
        quantity: Decimal,
        unit_price: Decimal,
        line_total: Decimal,
    ) -> Result<OrderItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, OrderItem>(
            r#"
            INSERT INTO order_items (order_id, service_id, description, quantity, unit_price, line_total)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(service_id)
        .bind(description)
        .bind(quantity)
        .bind(unit_price)
        .bind(line_total)
        .fetch_one(executor)
        .await?;

        Ok(item)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE id = $1 AND tenant_id = $2",
        )
        .bind(order_id)
        .bind(tenant_id)
        .fetch_optional(executor)
        .await?;

        Ok(order)
    }

    // Trancado durante a reconciliação de pagamentos e transições de status
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE id = $1 AND tenant_id = $2 FOR UPDATE",
        )
        .bind(order_id)
        .bind(tenant_id)
        .fetch_optional(executor)
        .await?;

        Ok(order)
    }

    pub async fn list(
        &self,
        scope: AccessScope,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE tenant_id = $1
              AND ($2 OR agency_id IS NULL OR agency_id = $3)
              AND ($4::text IS NULL OR status = $4)
            ORDER BY created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(scope.tenant_id)
        .bind(scope.all_agencies)
        .bind(scope.agency_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    pub async fn count(
        &self,
        scope: AccessScope,
        status: Option<OrderStatus>,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM orders
            WHERE tenant_id = $1
              AND ($2 OR agency_id IS NULL OR agency_id = $3)
              AND ($4::text IS NULL OR status = $4)
            "#,
        )
        .bind(scope.tenant_id)
        .bind(scope.all_agencies)
        .bind(scope.agency_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn list_items<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<Vec<OrderItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE order_id = $1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(executor)
        .await?;

        Ok(items)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(order)
    }

    pub async fn update_payment_status<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        payment_status: PaymentStatus,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET payment_status = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(payment_status)
        .fetch_one(executor)
        .await?;

        Ok(order)
    }
}
