// src/db/notification_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::notifications::{InternalNotification, NotificationLevel},
};

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        user_id: Uuid,
        title: &str,
        content: &str,
        level: NotificationLevel,
        related_type: Option<&str>,
        related_id: Option<Uuid>,
    ) -> Result<InternalNotification, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let notification = sqlx::query_as::<_, InternalNotification>(
            r#"
            INSERT INTO internal_notifications
                (tenant_id, user_id, title, content, level, related_type, related_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(user_id)
        .bind(title)
        .bind(content)
        .bind(level)
        .bind(related_type)
        .bind(related_id)
        .fetch_one(executor)
        .await?;

        Ok(notification)
    }

    pub async fn list_for_user(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<InternalNotification>, AppError> {
        let notifications = sqlx::query_as::<_, InternalNotification>(
            r#"
            SELECT * FROM internal_notifications
            WHERE tenant_id = $1 AND user_id = $2
              AND (NOT $3 OR read_at IS NULL)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(tenant_id)
        .bind(user_id)
        .bind(unread_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    pub async fn count_for_user(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        unread_only: bool,
    ) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM internal_notifications
            WHERE tenant_id = $1 AND user_id = $2
              AND (NOT $3 OR read_at IS NULL)
            "#,
        )
        .bind(tenant_id)
        .bind(user_id)
        .bind(unread_only)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    // Só o destinatário pode marcar como lida
    pub async fn mark_read(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        notification_id: Uuid,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE internal_notifications
            SET read_at = now()
            WHERE id = $1 AND tenant_id = $2 AND user_id = $3 AND read_at IS NULL
            "#,
        )
        .bind(notification_id)
        .bind(tenant_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
