// src/models/catalog.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums (colunas TEXT validadas pela aplicação) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceKind {
    Kilo,  // Cobrança por quilo
    Piece, // Cobrança por peça
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromoKind {
    Percentage,
    Fixed,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOffering {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "Lavagem ao quilo")]
    pub name: String,

    pub kind: ServiceKind,

    #[schema(example = "1000.00")]
    pub unit_price: Decimal,

    // Serviço canônico usado no faturamento de coletas KILO
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Promo {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "BEMVINDO10")]
    pub code: String,

    pub kind: PromoKind,

    // Percentual (0-100) ou valor fixo, conforme o kind
    #[schema(example = "10.00")]
    pub value: Decimal,

    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Promo {
    // A promoção só vale dentro da janela [start_date, end_date] e se estiver ativa.
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.is_active && self.start_date <= date && date <= self.end_date
    }

    // Desconto sobre uma base estimada. O valor final é recalculado na coleta.
    pub fn discount_for(&self, baseline: Decimal) -> Decimal {
        let discount = match self.kind {
            PromoKind::Percentage => baseline * self.value / Decimal::from(100),
            PromoKind::Fixed => self.value,
        };
        discount.max(Decimal::ZERO).round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn promo(kind: PromoKind, value: Decimal) -> Promo {
        Promo {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            code: "PROMO".into(),
            kind,
            value,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn promo_window_is_inclusive() {
        let p = promo(PromoKind::Fixed, Decimal::from(500));
        assert!(p.is_valid_on(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
        assert!(p.is_valid_on(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()));
        assert!(!p.is_valid_on(NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()));
        assert!(!p.is_valid_on(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
    }

    #[test]
    fn inactive_promo_never_valid() {
        let mut p = promo(PromoKind::Fixed, Decimal::from(500));
        p.is_active = false;
        assert!(!p.is_valid_on(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()));
    }

    #[test]
    fn percentage_discount_over_baseline() {
        let p = promo(PromoKind::Percentage, Decimal::from(10));
        assert_eq!(p.discount_for(Decimal::from(5500)), Decimal::from(550));
    }

    #[test]
    fn fixed_discount_ignores_baseline() {
        let p = promo(PromoKind::Fixed, Decimal::from(500));
        assert_eq!(p.discount_for(Decimal::from(99)), Decimal::from(500));
    }
}
