// src/db/catalog_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{Promo, PromoKind, ServiceKind, ServiceOffering},
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  SERVIÇOS
    // =========================================================================

    pub async fn create_service<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        name: &str,
        kind: ServiceKind,
        unit_price: Decimal,
        is_default: bool,
    ) -> Result<ServiceOffering, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let service = sqlx::query_as::<_, ServiceOffering>(
            r#"
            INSERT INTO service_offerings (tenant_id, name, kind, unit_price, is_default)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(kind)
        .bind(unit_price)
        .bind(is_default)
        .fetch_one(executor)
        .await?;

        Ok(service)
    }

    pub async fn unset_default_services<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        kind: ServiceKind,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE service_offerings SET is_default = FALSE WHERE tenant_id = $1 AND kind = $2",
        )
        .bind(tenant_id)
        .bind(kind)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn list_services(&self, tenant_id: Uuid) -> Result<Vec<ServiceOffering>, AppError> {
        let services = sqlx::query_as::<_, ServiceOffering>(
            "SELECT * FROM service_offerings WHERE tenant_id = $1 ORDER BY name ASC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    // Serviço KILO usado no faturamento de coletas. A ordenação é
    // determinística: o marcado como padrão vence, depois o mais antigo.
    pub async fn find_billing_kilo_service<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<Option<ServiceOffering>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let service = sqlx::query_as::<_, ServiceOffering>(
            r#"
            SELECT * FROM service_offerings
            WHERE tenant_id = $1 AND kind = $2 AND is_active
            ORDER BY is_default DESC, created_at ASC
            LIMIT 1
            "#,
        )
        .bind(tenant_id)
        .bind(ServiceKind::Kilo)
        .fetch_optional(executor)
        .await?;

        Ok(service)
    }

    // =========================================================================
    //  PROMOÇÕES
    // =========================================================================

    pub async fn create_promo<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        code: &str,
        kind: PromoKind,
        value: Decimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Promo, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Promo>(
            r#"
            INSERT INTO promos (tenant_id, code, kind, value, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(code)
        .bind(kind)
        .bind(value)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("promo_code_already_used");
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn list_promos(&self, tenant_id: Uuid) -> Result<Vec<Promo>, AppError> {
        let promos = sqlx::query_as::<_, Promo>(
            "SELECT * FROM promos WHERE tenant_id = $1 ORDER BY created_at DESC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(promos)
    }

    pub async fn find_promo_by_code<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        code: &str,
    ) -> Result<Option<Promo>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let promo = sqlx::query_as::<_, Promo>(
            "SELECT * FROM promos WHERE tenant_id = $1 AND code = $2",
        )
        .bind(tenant_id)
        .bind(code)
        .fetch_optional(executor)
        .await?;

        Ok(promo)
    }
}
