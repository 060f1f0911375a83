// src/models/orders.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    Processing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    // Fluxo operacional do pedido. Cancelamento só antes da conclusão.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (New, Processing) => true,
            (Processing, Ready) => true,
            (Ready, Completed) => true,
            (New, Cancelled) | (Processing, Cancelled) | (Ready, Cancelled) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
    Refunded,
    Installment,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub agency_id: Option<Uuid>,
    pub customer_id: Uuid,

    // Número sequencial exibível (recibo, atendimento)
    pub reference: i32,

    pub status: OrderStatus,
    pub payment_status: PaymentStatus,

    #[schema(example = "5500.00")]
    pub total_amount: Decimal,
    #[schema(example = "550.00")]
    pub discount_amount: Decimal,
    #[schema(example = "0.00")]
    pub tax_amount: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub service_id: Option<Uuid>,

    #[schema(example = "Camisas sociais")]
    pub description: String,

    // Quilos ou peças, conforme o serviço
    #[schema(example = "2.0")]
    pub quantity: Decimal,

    #[schema(example = "1000.00")]
    pub unit_price: Decimal,

    #[schema(example = "2000.00")]
    pub line_total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::OrderStatus::*;

    #[test]
    fn operational_flow() {
        assert!(New.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Completed));
    }

    #[test]
    fn no_skipping_stages() {
        assert!(!New.can_transition_to(Ready));
        assert!(!New.can_transition_to(Completed));
        assert!(!Processing.can_transition_to(Completed));
    }

    #[test]
    fn cancel_only_before_completion() {
        assert!(New.can_transition_to(Cancelled));
        assert!(Ready.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(New));
    }
}
