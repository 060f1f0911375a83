// src/services/catalog_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    middleware::auth::TenantContext,
    models::catalog::{Promo, PromoKind, ServiceKind, ServiceOffering},
};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    // Marcar um serviço como padrão desmarca o padrão anterior do mesmo
    // tipo, na mesma transação. É o que torna o faturamento KILO canônico.
    pub async fn create_service(
        &self,
        ctx: &TenantContext,
        name: &str,
        kind: ServiceKind,
        unit_price: Decimal,
        is_default: bool,
    ) -> Result<ServiceOffering, AppError> {
        if !ctx.is_privileged() {
            return Err(AppError::Forbidden);
        }
        if unit_price <= Decimal::ZERO {
            return Err(AppError::InvalidInput("invalid_amount"));
        }

        let mut tx = self.pool.begin().await?;

        if is_default {
            self.repo
                .unset_default_services(&mut *tx, ctx.tenant_id, kind)
                .await?;
        }

        let service = self
            .repo
            .create_service(&mut *tx, ctx.tenant_id, name, kind, unit_price, is_default)
            .await?;

        tx.commit().await?;

        Ok(service)
    }

    pub async fn list_services(&self, ctx: &TenantContext) -> Result<Vec<ServiceOffering>, AppError> {
        self.repo.list_services(ctx.tenant_id).await
    }

    pub async fn create_promo(
        &self,
        ctx: &TenantContext,
        code: &str,
        kind: PromoKind,
        value: Decimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Promo, AppError> {
        if !ctx.is_privileged() {
            return Err(AppError::Forbidden);
        }
        if start_date > end_date {
            return Err(AppError::InvalidInput("invalid_promo_window"));
        }
        if value <= Decimal::ZERO {
            return Err(AppError::InvalidInput("invalid_amount"));
        }

        self.repo
            .create_promo(&self.pool, ctx.tenant_id, code, kind, value, start_date, end_date)
            .await
    }

    pub async fn list_promos(&self, ctx: &TenantContext) -> Result<Vec<Promo>, AppError> {
        self.repo.list_promos(ctx.tenant_id).await
    }
}
