// src/db/collection_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    middleware::access::AccessScope,
    models::collections::{CollectionRequest, CollectionRequestItem, CollectionStatus},
};

#[derive(Clone)]
pub struct CollectionRepository {
    pool: PgPool,
}

impl CollectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_request<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        agency_id: Option<Uuid>,
        customer_id: Uuid,
        collection_address: &str,
        collection_date: NaiveDate,
        collection_time: &str,
        promo_code: Option<&str>,
        discount_estimate: Decimal,
    ) -> Result<CollectionRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, CollectionRequest>(
            r#"
            INSERT INTO collection_requests
                (tenant_id, agency_id, customer_id, collection_address,
                 collection_date, collection_time, promo_code, discount_estimate)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(agency_id)
        .bind(customer_id)
        .bind(collection_address)
        .bind(collection_date)
        .bind(collection_time)
        .bind(promo_code)
        .bind(discount_estimate)
        .fetch_one(executor)
        .await?;

        Ok(request)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        request_id: Uuid,
        description: &str,
        estimated_weight: Decimal,
    ) -> Result<CollectionRequestItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, CollectionRequestItem>(
            r#"
            INSERT INTO collection_request_items (request_id, description, estimated_weight)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(description)
        .bind(estimated_weight)
        .fetch_one(executor)
        .await?;

        Ok(item)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        request_id: Uuid,
    ) -> Result<Option<CollectionRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, CollectionRequest>(
            "SELECT * FROM collection_requests WHERE id = $1 AND tenant_id = $2",
        )
        .bind(request_id)
        .bind(tenant_id)
        .fetch_optional(executor)
        .await?;

        Ok(request)
    }

    // Tranca a solicitação durante transições de estado do workflow
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        request_id: Uuid,
    ) -> Result<Option<CollectionRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, CollectionRequest>(
            "SELECT * FROM collection_requests WHERE id = $1 AND tenant_id = $2 FOR UPDATE",
        )
        .bind(request_id)
        .bind(tenant_id)
        .fetch_optional(executor)
        .await?;

        Ok(request)
    }

    pub async fn list(
        &self,
        scope: AccessScope,
        status: Option<CollectionStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CollectionRequest>, AppError> {
        let requests = sqlx::query_as::<_, CollectionRequest>(
            r#"
            SELECT * FROM collection_requests
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

        Ok(requests)
    }

    pub async fn count(
        &self,
        scope: AccessScope,
        status: Option<CollectionStatus>,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM collection_requests
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
        request_id: Uuid,
    ) -> Result<Vec<CollectionRequestItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, CollectionRequestItem>(
            "SELECT * FROM collection_request_items WHERE request_id = $1 ORDER BY id",
        )
        .bind(request_id)
        .fetch_all(executor)
        .await?;

        Ok(items)
    }

    pub async fn set_assigned<'e, E>(
        &self,
        executor: E,
        request_id: Uuid,
        collector_id: Uuid,
    ) -> Result<CollectionRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, CollectionRequest>(
            r#"
            UPDATE collection_requests
            SET status = $2, collector_id = $3, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(CollectionStatus::Assigned)
        .bind(collector_id)
        .fetch_one(executor)
        .await?;

        Ok(request)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        request_id: Uuid,
        status: CollectionStatus,
    ) -> Result<CollectionRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, CollectionRequest>(
            r#"
            UPDATE collection_requests
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(request)
    }

    pub async fn set_item_actual_weight<'e, E>(
        &self,
        executor: E,
        request_id: Uuid,
        item_id: Uuid,
        actual_weight: Decimal,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE collection_request_items
            SET actual_weight = $3
            WHERE id = $2 AND request_id = $1
            "#,
        )
        .bind(request_id)
        .bind(item_id)
        .bind(actual_weight)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    // Materializa o vínculo coleta -> pedido e fecha a máquina de estados
    pub async fn link_order<'e, E>(
        &self,
        executor: E,
        request_id: Uuid,
        order_id: Uuid,
        total_weight: Decimal,
    ) -> Result<CollectionRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, CollectionRequest>(
            r#"
            UPDATE collection_requests
            SET status = $2, order_id = $3, total_weight = $4, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(request_id)
        .bind(CollectionStatus::Collected)
        .bind(order_id)
        .bind(total_weight)
        .fetch_one(executor)
        .await?;

        Ok(request)
    }
}
