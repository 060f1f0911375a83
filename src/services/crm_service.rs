// src/services/crm_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CustomerRepository,
    middleware::{access::ensure_access, auth::TenantContext},
    models::crm::Customer,
};

#[derive(Clone)]
pub struct CrmService {
    repo: CustomerRepository,
    pool: PgPool,
}

impl CrmService {
    pub fn new(repo: CustomerRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn create_customer(
        &self,
        ctx: &TenantContext,
        agency_id: Option<Uuid>,
        full_name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<Customer, AppError> {
        // Papéis não privilegiados só cadastram na própria agência
        let agency_id = if ctx.is_privileged() {
            agency_id
        } else {
            ctx.agency_id
        };

        self.repo
            .create(
                &self.pool,
                ctx.tenant_id,
                agency_id,
                None,
                full_name,
                email,
                phone,
                address,
            )
            .await
    }

    // Busca por id com a política completa: tenant sempre, agência para
    // papéis não privilegiados (mesma regra das listagens).
    pub async fn get_customer(
        &self,
        ctx: &TenantContext,
        customer_id: Uuid,
    ) -> Result<Customer, AppError> {
        let customer = self
            .repo
            .find_by_id(&self.pool, ctx.tenant_id, customer_id)
            .await?
            .ok_or(AppError::NotFound("customer_not_found"))?;

        ensure_access(ctx, customer.tenant_id, customer.agency_id, "customer_not_found")?;

        Ok(customer)
    }

    pub async fn list_customers(
        &self,
        ctx: &TenantContext,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Customer>, i64), AppError> {
        let scope = ctx.scope();
        let customers = self.repo.list(scope, limit, offset).await?;
        let total = self.repo.count(scope).await?;
        Ok((customers, total))
    }
}
