// src/services/tenancy_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{TenancyRepository, UserRepository},
    middleware::auth::TenantContext,
    models::{
        auth::{Role, User},
        tenancy::Agency,
    },
};

#[derive(Clone)]
pub struct TenancyService {
    repo: TenancyRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl TenancyService {
    pub fn new(repo: TenancyRepository, user_repo: UserRepository, pool: PgPool) -> Self {
        Self { repo, user_repo, pool }
    }

    // =========================================================================
    //  AGÊNCIAS
    // =========================================================================

    // Cria uma agência. A linha do tenant fica trancada durante a operação:
    // é isso que garante o invariante "exatamente uma agência principal",
    // inclusive na corrida da primeira agência.
    pub async fn create_agency(
        &self,
        ctx: &TenantContext,
        name: &str,
        code: &str,
        address: Option<&str>,
        make_main: bool,
    ) -> Result<Agency, AppError> {
        if !ctx.is_privileged() {
            return Err(AppError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;

        self.repo
            .lock_tenant(&mut *tx, ctx.tenant_id)
            .await?
            .ok_or(AppError::NotFound("tenant_not_found"))?;

        let existing = self.repo.count_agencies(&mut *tx, ctx.tenant_id).await?;
        let is_main = make_main || existing == 0;

        if is_main {
            self.repo.unset_main_agency(&mut *tx, ctx.tenant_id).await?;
        }

        let agency = self
            .repo
            .create_agency(&mut *tx, ctx.tenant_id, name, code, address, is_main)
            .await?;

        tx.commit().await?;

        Ok(agency)
    }

    pub async fn list_agencies(&self, ctx: &TenantContext) -> Result<Vec<Agency>, AppError> {
        self.repo.list_agencies(ctx.tenant_id).await
    }

    // Troca de agência principal: desmarca a atual e marca a nova na mesma
    // transação, sob o lock do tenant.
    pub async fn set_main_agency(
        &self,
        ctx: &TenantContext,
        agency_id: Uuid,
    ) -> Result<Agency, AppError> {
        if !ctx.is_privileged() {
            return Err(AppError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;

        self.repo
            .lock_tenant(&mut *tx, ctx.tenant_id)
            .await?
            .ok_or(AppError::NotFound("tenant_not_found"))?;

        let agency = self
            .repo
            .find_agency(&mut *tx, ctx.tenant_id, agency_id)
            .await?
            .ok_or(AppError::NotFound("agency_not_found"))?;

        self.repo.unset_main_agency(&mut *tx, ctx.tenant_id).await?;
        self.repo
            .set_main_agency(&mut *tx, ctx.tenant_id, agency.id)
            .await?;

        let agency = self
            .repo
            .find_agency(&mut *tx, ctx.tenant_id, agency.id)
            .await?
            .ok_or(AppError::NotFound("agency_not_found"))?;

        tx.commit().await?;

        Ok(agency)
    }

    // A agência principal nunca pode ser removida; nem uma agência com
    // usuários ativos vinculados.
    pub async fn delete_agency(&self, ctx: &TenantContext, agency_id: Uuid) -> Result<(), AppError> {
        if !ctx.is_privileged() {
            return Err(AppError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;

        let agency = self
            .repo
            .find_agency(&mut *tx, ctx.tenant_id, agency_id)
            .await?
            .ok_or(AppError::NotFound("agency_not_found"))?;

        if agency.is_main {
            return Err(AppError::Conflict("main_agency_cannot_be_deleted"));
        }

        let active_users = self
            .user_repo
            .count_active_in_agency(&mut *tx, agency.id)
            .await?;
        if active_users > 0 {
            return Err(AppError::Conflict("agency_has_active_users"));
        }

        self.repo.delete_agency(&mut *tx, ctx.tenant_id, agency.id).await?;

        tx.commit().await?;

        Ok(())
    }

    // =========================================================================
    //  USUÁRIOS DO TENANT
    // =========================================================================

    pub async fn create_user(
        &self,
        ctx: &TenantContext,
        agency_id: Option<Uuid>,
        email: &str,
        password: String,
        full_name: &str,
        phone: Option<&str>,
        role: Role,
    ) -> Result<User, AppError> {
        if !ctx.is_privileged() {
            return Err(AppError::Forbidden);
        }

        // A agência informada precisa existir no tenant do chamador
        if let Some(agency_id) = agency_id {
            self.repo
                .find_agency(&self.pool, ctx.tenant_id, agency_id)
                .await?
                .ok_or(AppError::NotFound("agency_not_found"))?;
        }

        // Hashing fora do runtime async, como no fluxo de registro
        let password_hash =
            tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.user_repo
            .create_user(
                &self.pool,
                ctx.tenant_id,
                agency_id,
                email,
                &password_hash,
                full_name,
                phone,
                role,
            )
            .await
    }

    pub async fn list_users(
        &self,
        ctx: &TenantContext,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<User>, i64), AppError> {
        let scope = ctx.scope();
        let users = self.user_repo.list(scope, limit, offset).await?;
        let total = self.user_repo.count(scope).await?;
        Ok((users, total))
    }

    pub async fn soft_delete_user(&self, ctx: &TenantContext, user_id: Uuid) -> Result<(), AppError> {
        if !ctx.is_privileged() {
            return Err(AppError::Forbidden);
        }

        let affected = self
            .user_repo
            .soft_delete(&self.pool, ctx.tenant_id, user_id)
            .await?;

        if affected == 0 {
            return Err(AppError::UserNotFound);
        }

        Ok(())
    }
}
