// src/services/notification_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::NotificationRepository,
    middleware::auth::TenantContext,
    models::notifications::{InternalNotification, NotificationLevel},
};

#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
    pool: PgPool,
}

impl NotificationService {
    pub fn new(repo: NotificationRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn notify(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        title: &str,
        content: &str,
        level: NotificationLevel,
        related_type: Option<&str>,
        related_id: Option<Uuid>,
    ) -> Result<InternalNotification, AppError> {
        self.repo
            .insert(
                &self.pool,
                tenant_id,
                user_id,
                title,
                content,
                level,
                related_type,
                related_id,
            )
            .await
    }

    // Efeito colateral do workflow: nunca derruba a operação principal.
    // A falha fica registrada no log e a vida segue.
    pub async fn notify_best_effort(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        title: &str,
        content: &str,
        level: NotificationLevel,
        related_type: Option<&str>,
        related_id: Option<Uuid>,
    ) {
        if let Err(e) = self
            .notify(tenant_id, user_id, title, content, level, related_type, related_id)
            .await
        {
            tracing::warn!(
                "Falha ao criar notificação para o usuário {}: {}",
                user_id,
                e
            );
        }
    }

    pub async fn list_mine(
        &self,
        ctx: &TenantContext,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<InternalNotification>, i64), AppError> {
        let notifications = self
            .repo
            .list_for_user(ctx.tenant_id, ctx.user_id, unread_only, limit, offset)
            .await?;
        let total = self
            .repo
            .count_for_user(ctx.tenant_id, ctx.user_id, unread_only)
            .await?;
        Ok((notifications, total))
    }

    pub async fn mark_read(&self, ctx: &TenantContext, notification_id: Uuid) -> Result<(), AppError> {
        let affected = self
            .repo
            .mark_read(ctx.tenant_id, ctx.user_id, notification_id)
            .await?;

        if affected == 0 {
            return Err(AppError::NotFound("notification_not_found"));
        }

        Ok(())
    }
}
