// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    middleware::access::AccessScope,
    models::auth::{Role, User},
};

// Repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário vivo pelo seu ID (soft-delete respeitado)
    pub async fn find_active_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    // E-mail é único por tenant
    pub async fn find_by_email<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        email: &str,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE tenant_id = $1 AND email = $2 AND deleted_at IS NULL",
        )
        .bind(tenant_id)
        .bind(email)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        agency_id: Option<Uuid>,
        email: &str,
        password_hash: &str,
        full_name: &str,
        phone: Option<&str>,
        role: Role,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (tenant_id, agency_id, email, password_hash, full_name, phone, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(agency_id)
        .bind(email)
        .bind(password_hash)
        .bind(full_name)
        .bind(phone)
        .bind(role)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Converte violação de chave única em um erro amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("email_already_used");
                }
            }
            AppError::DatabaseError(e)
        })
    }

    // Coletor elegível para atribuição: mesmo tenant, papel COLLECTOR, ativo
    pub async fn find_active_collector<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        collector_id: Uuid,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE id = $1 AND tenant_id = $2 AND role = $3
              AND is_active AND deleted_at IS NULL
            "#,
        )
        .bind(collector_id)
        .bind(tenant_id)
        .bind(Role::Collector)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    pub async fn list(
        &self,
        scope: AccessScope,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE tenant_id = $1
              AND ($2 OR agency_id IS NULL OR agency_id = $3)
              AND deleted_at IS NULL
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

        Ok(users)
    }

    pub async fn count(&self, scope: AccessScope) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users
            WHERE tenant_id = $1
              AND ($2 OR agency_id IS NULL OR agency_id = $3)
              AND deleted_at IS NULL
            "#,
        )
        .bind(scope.tenant_id)
        .bind(scope.all_agencies)
        .bind(scope.agency_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    // Soft delete: marca, não remove, para preservar o histórico referencial
    pub async fn soft_delete<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET deleted_at = now(), is_active = FALSE, updated_at = now()
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(user_id)
        .bind(tenant_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn count_active_in_agency<'e, E>(
        &self,
        executor: E,
        agency_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM users
            WHERE agency_id = $1 AND is_active AND deleted_at IS NULL
            "#,
        )
        .bind(agency_id)
        .fetch_one(executor)
        .await?;

        Ok(total)
    }
}
