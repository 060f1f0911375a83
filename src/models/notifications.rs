// src/models/notifications.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationLevel {
    Info,
    Warning,
    Alert,
}

// Notificação interna efêmera, criada como efeito colateral do workflow
// (atribuição de coletor, coleta concluída). Falha na criação nunca
// derruba a operação principal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InternalNotification {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub user_id: Uuid,

    #[schema(example = "Nova coleta atribuída")]
    pub title: String,
    pub content: String,

    pub level: NotificationLevel,

    #[schema(example = "COLLECTION_REQUEST")]
    pub related_type: Option<String>,
    pub related_id: Option<Uuid>,

    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
