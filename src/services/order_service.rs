// src/services/order_service.rs

// Ciclo de vida pós-coleta do pedido. A criação acontece no fechamento
// da coleta (CollectionService); aqui ficam consulta e progressão de
// status, sem pular etapa.

use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CustomerRepository, OrderRepository},
    middleware::{access::ensure_access, auth::TenantContext},
    models::{
        notifications::NotificationLevel,
        orders::{Order, OrderItem, OrderStatus},
    },
    services::NotificationService,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Clone)]
pub struct OrderService {
    repo: OrderRepository,
    customer_repo: CustomerRepository,
    notifications: NotificationService,
    pool: PgPool,
}

impl OrderService {
    pub fn new(
        repo: OrderRepository,
        customer_repo: CustomerRepository,
        notifications: NotificationService,
        pool: PgPool,
    ) -> Self {
        Self {
            repo,
            customer_repo,
            notifications,
            pool,
        }
    }

    pub async fn get_order(
        &self,
        ctx: &TenantContext,
        order_id: Uuid,
    ) -> Result<OrderDetail, AppError> {
        let order = self
            .repo
            .find_by_id(&self.pool, ctx.tenant_id, order_id)
            .await?
            .ok_or(AppError::NotFound("order_not_found"))?;

        ensure_access(ctx, order.tenant_id, order.agency_id, "order_not_found")?;

        let items = self.repo.list_items(&self.pool, order.id).await?;

        Ok(OrderDetail { order, items })
    }

    pub async fn list_orders(
        &self,
        ctx: &TenantContext,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Order>, i64), AppError> {
        let scope = ctx.scope();
        let orders = self.repo.list(scope, status, limit, offset).await?;
        let total = self.repo.count(scope, status).await?;
        Ok((orders, total))
    }

    pub async fn update_status(
        &self,
        ctx: &TenantContext,
        order_id: Uuid,
        target: OrderStatus,
    ) -> Result<Order, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = self
            .repo
            .find_by_id_for_update(&mut *tx, ctx.tenant_id, order_id)
            .await?
            .ok_or(AppError::NotFound("order_not_found"))?;

        ensure_access(ctx, order.tenant_id, order.agency_id, "order_not_found")?;

        if !order.status.can_transition_to(target) {
            return Err(AppError::InvalidTransition {
                from: format!("{:?}", order.status),
                to: format!("{:?}", target),
            });
        }

        let order = self.repo.update_status(&mut *tx, order.id, target).await?;

        tx.commit().await?;

        if target == OrderStatus::Ready {
            self.notify_ready(ctx, &order).await;
        }

        Ok(order)
    }

    // Peças prontas: avisa o cliente que tem conta no app
    async fn notify_ready(&self, ctx: &TenantContext, order: &Order) {
        let customer = match self
            .customer_repo
            .find_by_id(&self.pool, ctx.tenant_id, order.customer_id)
            .await
        {
            Ok(Some(customer)) => customer,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("Falha ao buscar cliente do pedido {}: {}", order.id, e);
                return;
            }
        };

        if let Some(user_id) = customer.user_id {
            self.notifications
                .notify_best_effort(
                    ctx.tenant_id,
                    user_id,
                    "Pedido pronto",
                    &format!("Seu pedido #{} está pronto para retirada.", order.reference),
                    NotificationLevel::Info,
                    Some("ORDER"),
                    Some(order.id),
                )
                .await;
        }
    }
}
