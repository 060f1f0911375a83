// src/models/crm.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Cliente do pressing. E-mail e telefone são únicos dentro do tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub agency_id: Option<Uuid>,

    // Preenchido quando o cliente usa o app mobile
    pub user_id: Option<Uuid>,

    #[schema(example = "Maria da Silva")]
    pub full_name: String,

    #[schema(example = "maria@email.com")]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,

    pub loyalty_points: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
