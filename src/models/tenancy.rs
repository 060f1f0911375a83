// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Um pressing (conta de negócio). Todo dado do sistema pertence a um tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,

    #[schema(example = "Pressing Net Plus")]
    pub name: String,

    #[schema(example = "netplus")]
    pub subdomain: String,

    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// Uma filial do pressing. Exatamente uma agência por tenant é a principal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Agency {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "Agência Centro")]
    pub name: String,

    #[schema(example = "CENTRO")]
    pub code: String,

    pub address: Option<String>,
    pub is_main: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
