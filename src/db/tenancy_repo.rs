// src/db/tenancy_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::tenancy::{Agency, Tenant},
};

#[derive(Clone)]
pub struct TenancyRepository {
    pool: PgPool,
}

impl TenancyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  TENANTS (pressings)
    // =========================================================================

    pub async fn create_tenant<'e, E>(
        &self,
        executor: E,
        name: &str,
        subdomain: &str,
        phone: Option<&str>,
    ) -> Result<Tenant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (name, subdomain, phone)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(subdomain)
        .bind(phone)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("subdomain_already_used");
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn find_tenant_by_subdomain(
        &self,
        subdomain: &str,
    ) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            "SELECT * FROM tenants WHERE subdomain = $1 AND is_active",
        )
        .bind(subdomain)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tenant)
    }

    // Tranca a linha do tenant. Serializa as operações "primeira agência é
    // a principal" e a troca de agência principal.
    pub async fn lock_tenant<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<Option<Tenant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tenant = sqlx::query_as::<_, Tenant>(
            "SELECT * FROM tenants WHERE id = $1 FOR UPDATE",
        )
        .bind(tenant_id)
        .fetch_optional(executor)
        .await?;

        Ok(tenant)
    }

    // =========================================================================
    //  AGÊNCIAS (filiais)
    // =========================================================================

    pub async fn create_agency<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        name: &str,
        code: &str,
        address: Option<&str>,
        is_main: bool,
    ) -> Result<Agency, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Agency>(
            r#"
            INSERT INTO agencies (tenant_id, name, code, address, is_main)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(code)
        .bind(address)
        .bind(is_main)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("agency_code_already_used");
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn find_agency<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        agency_id: Uuid,
    ) -> Result<Option<Agency>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let agency = sqlx::query_as::<_, Agency>(
            "SELECT * FROM agencies WHERE id = $1 AND tenant_id = $2",
        )
        .bind(agency_id)
        .bind(tenant_id)
        .fetch_optional(executor)
        .await?;

        Ok(agency)
    }

    pub async fn list_agencies(&self, tenant_id: Uuid) -> Result<Vec<Agency>, AppError> {
        let agencies = sqlx::query_as::<_, Agency>(
            "SELECT * FROM agencies WHERE tenant_id = $1 ORDER BY is_main DESC, name ASC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(agencies)
    }

    pub async fn count_agencies<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM agencies WHERE tenant_id = $1")
                .bind(tenant_id)
                .fetch_one(executor)
                .await?;

        Ok(total)
    }

    pub async fn unset_main_agency<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE agencies SET is_main = FALSE WHERE tenant_id = $1 AND is_main")
            .bind(tenant_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn set_main_agency<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        agency_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result =
            sqlx::query("UPDATE agencies SET is_main = TRUE WHERE id = $1 AND tenant_id = $2")
                .bind(agency_id)
                .bind(tenant_id)
                .execute(executor)
                .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_agency<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        agency_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM agencies WHERE id = $1 AND tenant_id = $2")
            .bind(agency_id)
            .bind(tenant_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
