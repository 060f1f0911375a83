// src/db/customer_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, middleware::access::AccessScope, models::crm::Customer};

#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        agency_id: Option<Uuid>,
        user_id: Option<Uuid>,
        full_name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (tenant_id, agency_id, user_id, full_name, email, phone, address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(agency_id)
        .bind(user_id)
        .bind(full_name)
        .bind(email)
        .bind(phone)
        .bind(address)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // E-mail/telefone únicos dentro do tenant
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("customer_contact_already_used");
                }
            }
            AppError::DatabaseError(e)
        })
    }

    // Busca por id restrita ao tenant; a checagem de agência fica no serviço
    // (ensure_access), que conhece o papel do chamador.
    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE id = $1 AND tenant_id = $2",
        )
        .bind(customer_id)
        .bind(tenant_id)
        .fetch_optional(executor)
        .await?;

        Ok(customer)
    }

    // Ficha do cliente ligada ao usuário mobile
    pub async fn find_by_user_id<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE user_id = $1 AND tenant_id = $2",
        )
        .bind(user_id)
        .bind(tenant_id)
        .fetch_optional(executor)
        .await?;

        Ok(customer)
    }

    pub async fn list(
        &self,
        scope: AccessScope,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Customer>, AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT * FROM customers
            WHERE tenant_id = $1
              AND ($2 OR agency_id IS NULL OR agency_id = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(scope.tenant_id)
        .bind(scope.all_agencies)
        .bind(scope.agency_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    pub async fn count(&self, scope: AccessScope) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM customers
            WHERE tenant_id = $1
              AND ($2 OR agency_id IS NULL OR agency_id = $3)
            "#,
        )
        .bind(scope.tenant_id)
        .bind(scope.all_agencies)
        .bind(scope.agency_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
