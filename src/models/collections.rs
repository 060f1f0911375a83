// src/models/collections.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Estados de uma solicitação de coleta domiciliar.
// PENDING -> ASSIGNED -> IN_PROGRESS -> COLLECTED; qualquer estado
// não-COLLECTED pode ser cancelado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionStatus {
    Pending,
    Assigned,
    InProgress,
    Collected,
    Cancelled,
}

impl CollectionStatus {
    // Ponto único de verdade para as transições legais da máquina de estados.
    pub fn can_transition_to(self, next: CollectionStatus) -> bool {
        use CollectionStatus::*;
        match (self, next) {
            (Pending, Assigned) => true,
            (Assigned, InProgress) => true,
            (Assigned, Collected) | (InProgress, Collected) => true,
            (Pending, Cancelled) | (Assigned, Cancelled) | (InProgress, Cancelled) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, CollectionStatus::Collected | CollectionStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRequest {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub agency_id: Option<Uuid>,
    pub customer_id: Uuid,

    // Preenchido na atribuição
    pub collector_id: Option<Uuid>,

    // Preenchido quando a coleta vira um pedido faturável
    pub order_id: Option<Uuid>,

    #[schema(example = "Rua das Acácias, 120")]
    pub collection_address: String,

    #[schema(value_type = String, format = Date)]
    pub collection_date: NaiveDate,

    #[schema(example = "14:00-16:00")]
    pub collection_time: String,

    pub status: CollectionStatus,

    pub promo_code: Option<String>,

    // Estimativa feita na criação; o total real é calculado na coleta
    #[schema(example = "550.00")]
    pub discount_estimate: Decimal,

    pub total_weight: Option<Decimal>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRequestItem {
    pub id: Uuid,
    pub request_id: Uuid,

    #[schema(example = "Camisas sociais")]
    pub description: String,

    // Peso informado pelo cliente na criação (kg)
    #[schema(example = "2.5")]
    pub estimated_weight: Decimal,

    // Peso pesado pelo coletor no local (kg)
    pub actual_weight: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::CollectionStatus::*;

    #[test]
    fn happy_path_transitions() {
        assert!(Pending.can_transition_to(Assigned));
        assert!(Assigned.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Collected));
        assert!(Assigned.can_transition_to(Collected));
    }

    #[test]
    fn any_state_but_collected_can_cancel() {
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Assigned.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Cancelled));
        assert!(!Collected.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn illegal_jumps_are_rejected() {
        assert!(!Pending.can_transition_to(Collected));
        assert!(!Pending.can_transition_to(InProgress));
        assert!(!Collected.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Assigned));
    }

    #[test]
    fn terminal_states() {
        assert!(Collected.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Pending.is_terminal());
        assert!(!InProgress.is_terminal());
    }
}
