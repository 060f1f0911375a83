// src/models/payments.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    MobileMoney,
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentRecordStatus {
    Pending,
    Partial,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallmentStatus {
    Pending,
    Partial,
    Paid,
    Overdue,
    Cancelled,
}

impl InstallmentStatus {
    pub fn is_settled(self) -> bool {
        matches!(self, InstallmentStatus::Paid)
    }

    pub fn is_open(self) -> bool {
        matches!(
            self,
            InstallmentStatus::Pending | InstallmentStatus::Partial | InstallmentStatus::Overdue
        )
    }
}

// Pagamento registrado de forma aditiva; não há estorno modelado.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub order_id: Uuid,
    pub installment_id: Option<Uuid>,

    #[schema(example = "1833.34")]
    pub amount: Decimal,

    pub method: PaymentMethod,
    pub status: PaymentRecordStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstallment {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub order_id: Uuid,

    #[schema(example = 1)]
    pub installment_number: i32,

    #[schema(example = "1833.33")]
    pub amount: Decimal,

    #[schema(value_type = String, format = Date)]
    pub due_date: NaiveDate,

    pub status: InstallmentStatus,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PaymentInstallment {
    // Status exibido nas listagens: uma parcela aberta e vencida aparece como OVERDUE.
    pub fn effective_status(&self, today: NaiveDate) -> InstallmentStatus {
        if self.status.is_open() && self.due_date < today {
            InstallmentStatus::Overdue
        } else {
            self.status
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn installment(status: InstallmentStatus, due: NaiveDate) -> PaymentInstallment {
        PaymentInstallment {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            installment_number: 1,
            amount: Decimal::from(100),
            due_date: due,
            status,
            paid_at: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn open_installment_past_due_shows_overdue() {
        let due = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 1, 11).unwrap();
        let i = installment(InstallmentStatus::Pending, due);
        assert_eq!(i.effective_status(today), InstallmentStatus::Overdue);
    }

    #[test]
    fn paid_installment_never_shows_overdue() {
        let due = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let i = installment(InstallmentStatus::Paid, due);
        assert_eq!(i.effective_status(today), InstallmentStatus::Paid);
    }

    #[test]
    fn due_today_is_not_overdue() {
        let due = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let i = installment(InstallmentStatus::Pending, due);
        assert_eq!(i.effective_status(due), InstallmentStatus::Pending);
    }
}
