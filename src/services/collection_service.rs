// src/services/collection_service.rs

// Workflow de coleta domiciliar:
//   criação (PENDING) -> atribuição de coletor (ASSIGNED) ->
//   coleta no local (IN_PROGRESS/COLLECTED) -> materialização do pedido.
// As transições legais moram em CollectionStatus::can_transition_to;
// aqui ficam as regras de negócio e a orquestração transacional.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, CollectionRepository, CustomerRepository, OrderRepository, UserRepository},
    middleware::{access::ensure_access, auth::TenantContext},
    models::{
        auth::Role,
        collections::{CollectionRequest, CollectionRequestItem, CollectionStatus},
        crm::Customer,
        notifications::NotificationLevel,
        orders::Order,
    },
    services::{NotificationService, messaging::ReceiptMessenger},
};

// Preço por quilo usado quando o tenant ainda não configurou nenhum
// serviço KILO ativo.
fn fallback_kilo_unit_price() -> Decimal {
    Decimal::new(1000, 0)
}

// total = peso * preço/kg - desconto, nunca negativo
pub(crate) fn compute_collection_total(
    total_weight: Decimal,
    unit_price: Decimal,
    discount: Decimal,
) -> Decimal {
    (total_weight * unit_price - discount)
        .max(Decimal::ZERO)
        .round_dp(2)
}

// --- Entradas do serviço ---

pub struct NewCollectionRequest {
    pub customer_id: Option<Uuid>,
    pub collection_address: String,
    pub collection_date: NaiveDate,
    pub collection_time: String,
    pub promo_code: Option<String>,
    pub items: Vec<NewCollectionItem>,
}

pub struct NewCollectionItem {
    pub description: String,
    pub estimated_weight: Decimal,
}

pub struct CollectedItem {
    pub item_id: Uuid,
    pub actual_weight: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRequestDetail {
    #[serde(flatten)]
    pub request: CollectionRequest,
    pub items: Vec<CollectionRequestItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionOutcome {
    pub request: CollectionRequest,
    pub order: Order,
}

#[derive(Clone)]
pub struct CollectionService {
    repo: CollectionRepository,
    catalog_repo: CatalogRepository,
    customer_repo: CustomerRepository,
    user_repo: UserRepository,
    order_repo: OrderRepository,
    notifications: NotificationService,
    messenger: Arc<dyn ReceiptMessenger>,
    pool: PgPool,
}

impl CollectionService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        repo: CollectionRepository,
        catalog_repo: CatalogRepository,
        customer_repo: CustomerRepository,
        user_repo: UserRepository,
        order_repo: OrderRepository,
        notifications: NotificationService,
        messenger: Arc<dyn ReceiptMessenger>,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            catalog_repo,
            customer_repo,
            user_repo,
            order_repo,
            notifications,
            messenger,
            pool,
        }
    }

    // =========================================================================
    //  CRIAÇÃO (cliente mobile ou agente em nome do cliente)
    // =========================================================================

    pub async fn create_request(
        &self,
        ctx: &TenantContext,
        input: NewCollectionRequest,
    ) -> Result<CollectionRequestDetail, AppError> {
        if input.items.is_empty() {
            return Err(AppError::InvalidInput("collection_items_required"));
        }
        if input.items.iter().any(|i| i.estimated_weight <= Decimal::ZERO) {
            return Err(AppError::InvalidInput("invalid_amount"));
        }

        let customer = self.resolve_customer(ctx, input.customer_id).await?;

        // Desconto da promoção, calculado sobre os pesos estimados. Este
        // mesmo valor é aplicado no fechamento da coleta, sem recálculo;
        // só o total base usa os pesos efetivos.
        let discount_estimate = match input.promo_code.as_deref() {
            Some(code) => {
                let promo = self
                    .catalog_repo
                    .find_promo_by_code(&self.pool, ctx.tenant_id, code)
                    .await?
                    .ok_or(AppError::NotFound("promo_not_found"))?;

                if !promo.is_valid_on(Utc::now().date_naive()) {
                    return Err(AppError::InvalidInput("promo_not_valid"));
                }

                let estimated_weight: Decimal =
                    input.items.iter().map(|i| i.estimated_weight).sum();
                let unit_price = self.kilo_unit_price(ctx.tenant_id).await?;
                promo.discount_for(estimated_weight * unit_price)
            }
            None => Decimal::ZERO,
        };

        let mut tx = self.pool.begin().await?;

        let request = self
            .repo
            .create_request(
                &mut *tx,
                ctx.tenant_id,
                customer.agency_id,
                customer.id,
                &input.collection_address,
                input.collection_date,
                &input.collection_time,
                input.promo_code.as_deref(),
                discount_estimate,
            )
            .await?;

        let mut items = Vec::with_capacity(input.items.len());
        for item in &input.items {
            items.push(
                self.repo
                    .insert_item(&mut *tx, request.id, &item.description, item.estimated_weight)
                    .await?,
            );
        }

        tx.commit().await?;

        Ok(CollectionRequestDetail { request, items })
    }

    // =========================================================================
    //  ATRIBUIÇÃO DE COLETOR (papéis privilegiados)
    // =========================================================================

    pub async fn assign_collector(
        &self,
        ctx: &TenantContext,
        request_id: Uuid,
        collector_id: Uuid,
    ) -> Result<CollectionRequest, AppError> {
        if !ctx.is_privileged() {
            return Err(AppError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;

        let request = self
            .repo
            .find_by_id_for_update(&mut *tx, ctx.tenant_id, request_id)
            .await?
            .ok_or(AppError::NotFound("collection_request_not_found"))?;

        ensure_access(ctx, request.tenant_id, request.agency_id, "collection_request_not_found")?;

        if !request.status.can_transition_to(CollectionStatus::Assigned) {
            return Err(invalid_transition(request.status, CollectionStatus::Assigned));
        }

        // Mesmo tenant, papel COLLECTOR, ativo — senão NotFound
        let collector = self
            .user_repo
            .find_active_collector(&mut *tx, ctx.tenant_id, collector_id)
            .await?
            .ok_or(AppError::NotFound("collector_not_found"))?;

        let request = self.repo.set_assigned(&mut *tx, request.id, collector.id).await?;

        tx.commit().await?;

        // A notificação só nasce depois do commit. Se falhar, a atribuição
        // fica de pé: é um efeito colateral best-effort, não correção.
        self.notifications
            .notify_best_effort(
                ctx.tenant_id,
                collector.id,
                "Nova coleta atribuída",
                &format!(
                    "Coleta em {} no dia {}",
                    request.collection_address, request.collection_date
                ),
                NotificationLevel::Info,
                Some("COLLECTION_REQUEST"),
                Some(request.id),
            )
            .await;

        Ok(request)
    }

    // =========================================================================
    //  COLETA NO LOCAL (apenas o coletor atribuído)
    // =========================================================================

    pub async fn start_collection(
        &self,
        ctx: &TenantContext,
        request_id: Uuid,
    ) -> Result<CollectionRequest, AppError> {
        let mut tx = self.pool.begin().await?;

        let request = self
            .repo
            .find_by_id_for_update(&mut *tx, ctx.tenant_id, request_id)
            .await?
            .ok_or(AppError::NotFound("collection_request_not_found"))?;

        if request.collector_id != Some(ctx.user_id) {
            return Err(AppError::Forbidden);
        }
        if !request.status.can_transition_to(CollectionStatus::InProgress) {
            return Err(invalid_transition(request.status, CollectionStatus::InProgress));
        }

        let request = self
            .repo
            .update_status(&mut *tx, request.id, CollectionStatus::InProgress)
            .await?;

        tx.commit().await?;

        Ok(request)
    }

    // Pesa os itens, fatura pelo serviço KILO canônico do tenant e
    // materializa o pedido. Pesos, pedido, itens e o vínculo
    // coleta -> pedido são gravados em uma única transação.
    pub async fn complete_collection(
        &self,
        ctx: &TenantContext,
        request_id: Uuid,
        collected_items: Vec<CollectedItem>,
        total_weight: Decimal,
    ) -> Result<CollectionOutcome, AppError> {
        if total_weight <= Decimal::ZERO
            || collected_items.iter().any(|i| i.actual_weight <= Decimal::ZERO)
        {
            return Err(AppError::InvalidInput("invalid_amount"));
        }

        let mut tx = self.pool.begin().await?;

        let request = self
            .repo
            .find_by_id_for_update(&mut *tx, ctx.tenant_id, request_id)
            .await?
            .ok_or(AppError::NotFound("collection_request_not_found"))?;

        if request.collector_id != Some(ctx.user_id) {
            return Err(AppError::Forbidden);
        }
        if !request.status.can_transition_to(CollectionStatus::Collected) {
            return Err(invalid_transition(request.status, CollectionStatus::Collected));
        }

        for item in &collected_items {
            let affected = self
                .repo
                .set_item_actual_weight(&mut *tx, request.id, item.item_id, item.actual_weight)
                .await?;
            if affected == 0 {
                return Err(AppError::InvalidInput("unknown_collection_item"));
            }
        }

        let kilo_service = self
            .catalog_repo
            .find_billing_kilo_service(&mut *tx, ctx.tenant_id)
            .await?;
        let (service_id, unit_price) = match &kilo_service {
            Some(s) => (Some(s.id), s.unit_price),
            None => (None, fallback_kilo_unit_price()),
        };

        let total_amount =
            compute_collection_total(total_weight, unit_price, request.discount_estimate);

        let order = self
            .order_repo
            .create_order(
                &mut *tx,
                ctx.tenant_id,
                request.agency_id,
                request.customer_id,
                total_amount,
                request.discount_estimate,
                Decimal::ZERO,
            )
            .await?;

        // Um OrderItem por item coletado, com o peso efetivo
        let items = self.repo.list_items(&mut *tx, request.id).await?;
        for item in items.iter().filter(|i| i.actual_weight.is_some()) {
            let weight = item.actual_weight.unwrap_or(Decimal::ZERO);
            self.order_repo
                .insert_item(
                    &mut *tx,
                    order.id,
                    service_id,
                    &item.description,
                    weight,
                    unit_price,
                    (weight * unit_price).round_dp(2),
                )
                .await?;
        }

        let request = self
            .repo
            .link_order(&mut *tx, request.id, order.id, total_weight)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "🧺 Coleta {} concluída: pedido #{} ({})",
            request.id,
            order.reference,
            total_amount
        );

        self.notify_customer_after_collection(ctx, &request, &order).await;

        Ok(CollectionOutcome { request, order })
    }

    // =========================================================================
    //  CANCELAMENTO / CONSULTA
    // =========================================================================

    pub async fn cancel_request(
        &self,
        ctx: &TenantContext,
        request_id: Uuid,
    ) -> Result<CollectionRequest, AppError> {
        let mut tx = self.pool.begin().await?;

        let request = self
            .repo
            .find_by_id_for_update(&mut *tx, ctx.tenant_id, request_id)
            .await?
            .ok_or(AppError::NotFound("collection_request_not_found"))?;

        // Cancela quem tem privilégio ou o próprio cliente dono da coleta
        if !ctx.is_privileged() {
            let customer = self
                .customer_repo
                .find_by_id(&mut *tx, ctx.tenant_id, request.customer_id)
                .await?
                .ok_or(AppError::NotFound("collection_request_not_found"))?;
            if customer.user_id != Some(ctx.user_id) {
                return Err(AppError::Forbidden);
            }
        }

        if !request.status.can_transition_to(CollectionStatus::Cancelled) {
            return Err(invalid_transition(request.status, CollectionStatus::Cancelled));
        }

        let request = self
            .repo
            .update_status(&mut *tx, request.id, CollectionStatus::Cancelled)
            .await?;

        tx.commit().await?;

        Ok(request)
    }

    pub async fn get_request(
        &self,
        ctx: &TenantContext,
        request_id: Uuid,
    ) -> Result<CollectionRequestDetail, AppError> {
        let request = self
            .repo
            .find_by_id(&self.pool, ctx.tenant_id, request_id)
            .await?
            .ok_or(AppError::NotFound("collection_request_not_found"))?;

        ensure_access(ctx, request.tenant_id, request.agency_id, "collection_request_not_found")?;

        let items = self.repo.list_items(&self.pool, request.id).await?;

        Ok(CollectionRequestDetail { request, items })
    }

    pub async fn list_requests(
        &self,
        ctx: &TenantContext,
        status: Option<CollectionStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<CollectionRequest>, i64), AppError> {
        let scope = ctx.scope();
        let requests = self.repo.list(scope, status, limit, offset).await?;
        let total = self.repo.count(scope, status).await?;
        Ok((requests, total))
    }

    // --- Helpers ---

    async fn resolve_customer(
        &self,
        ctx: &TenantContext,
        customer_id: Option<Uuid>,
    ) -> Result<Customer, AppError> {
        if ctx.role == Role::Client {
            // Cliente mobile só agenda para a própria ficha
            return self
                .customer_repo
                .find_by_user_id(&self.pool, ctx.tenant_id, ctx.user_id)
                .await?
                .ok_or(AppError::NotFound("customer_not_found"));
        }

        let customer_id = customer_id.ok_or(AppError::InvalidInput("customer_required"))?;
        let customer = self
            .customer_repo
            .find_by_id(&self.pool, ctx.tenant_id, customer_id)
            .await?
            .ok_or(AppError::NotFound("customer_not_found"))?;

        ensure_access(ctx, customer.tenant_id, customer.agency_id, "customer_not_found")?;

        Ok(customer)
    }

    async fn kilo_unit_price(&self, tenant_id: Uuid) -> Result<Decimal, AppError> {
        let price = self
            .catalog_repo
            .find_billing_kilo_service(&self.pool, tenant_id)
            .await?
            .map(|s| s.unit_price)
            .unwrap_or_else(fallback_kilo_unit_price);
        Ok(price)
    }

    async fn notify_customer_after_collection(
        &self,
        ctx: &TenantContext,
        request: &CollectionRequest,
        order: &Order,
    ) {
        let customer = match self
            .customer_repo
            .find_by_id(&self.pool, ctx.tenant_id, request.customer_id)
            .await
        {
            Ok(Some(customer)) => customer,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("Falha ao buscar cliente para notificação: {}", e);
                return;
            }
        };

        if let Some(user_id) = customer.user_id {
            self.notifications
                .notify_best_effort(
                    ctx.tenant_id,
                    user_id,
                    "Coleta concluída",
                    &format!(
                        "Suas peças foram coletadas. Pedido #{} no valor de {}.",
                        order.reference, order.total_amount
                    ),
                    NotificationLevel::Info,
                    Some("ORDER"),
                    Some(order.id),
                )
                .await;
        }

        if let Some(phone) = &customer.phone {
            let body = format!(
                "Recibo: pedido #{} — total {} (desconto {}).",
                order.reference, order.total_amount, order.discount_amount
            );
            if let Err(e) = self.messenger.send_receipt(phone, &body).await {
                tracing::warn!("Falha no envio do recibo para {}: {}", phone, e);
            }
        }
    }
}

fn invalid_transition(from: CollectionStatus, to: CollectionStatus) -> AppError {
    AppError::InvalidTransition {
        from: format!("{:?}", from),
        to: format!("{:?}", to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn billing_is_weight_times_kilo_price_minus_discount() {
        // Pesos [2.0, 3.5] => 5.5 kg a 1000/kg
        let total = compute_collection_total(dec("5.5"), dec("1000"), dec("550"));
        assert_eq!(total, dec("4950.00"));
    }

    #[test]
    fn billing_without_discount() {
        let total = compute_collection_total(dec("5.5"), dec("1000"), Decimal::ZERO);
        assert_eq!(total, dec("5500.00"));
    }

    #[test]
    fn discount_never_pushes_total_below_zero() {
        let total = compute_collection_total(dec("1.0"), dec("500"), dec("9999"));
        assert_eq!(total, Decimal::ZERO);
    }

    #[test]
    fn total_is_rounded_to_cents() {
        let total = compute_collection_total(dec("1.333"), dec("1000"), Decimal::ZERO);
        assert_eq!(total, dec("1333.00"));

        let total = compute_collection_total(dec("0.333"), dec("999.99"), Decimal::ZERO);
        assert_eq!(total, dec("333.00"));
    }

    #[test]
    fn fallback_price_is_used_when_no_kilo_service() {
        assert_eq!(fallback_kilo_unit_price(), dec("1000"));
    }
}
