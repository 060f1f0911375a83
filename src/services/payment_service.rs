// src/services/payment_service.rs

// Reconciliação financeira dos pedidos: pagamento direto, parcelamento
// e quitação de parcelas. Toda reconciliação roda em transação
// SERIALIZABLE com o pedido (e a parcela, quando há) trancados por
// FOR UPDATE, então dois caixas quitando a mesma parcela ao mesmo tempo
// nunca produzem double-settle.

use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{OrderRepository, PaymentRepository},
    middleware::{access::ensure_access, auth::TenantContext},
    models::{
        orders::{Order, OrderStatus, PaymentStatus},
        payments::{InstallmentStatus, Payment, PaymentInstallment, PaymentMethod},
    },
};

const MIN_INSTALLMENTS: i32 = 2;
const MAX_INSTALLMENTS: i32 = 12;
const DEFAULT_INTERVAL_DAYS: u64 = 30;

// Divide o total em partes iguais a 2 casas; a última parcela absorve
// a sobra do arredondamento, então a soma bate centavo a centavo.
pub(crate) fn split_amount(total: Decimal, count: i32) -> Vec<Decimal> {
    let per = (total / Decimal::from(count)).round_dp(2);
    let mut parts = vec![per; count as usize];
    let last = total - per * Decimal::from(count - 1);
    parts[count as usize - 1] = last.round_dp(2);
    parts
}

pub(crate) fn settled_status(due: Decimal, paid: Decimal) -> InstallmentStatus {
    if paid >= due {
        InstallmentStatus::Paid
    } else {
        InstallmentStatus::Partial
    }
}

// O pedido quita quando todas as parcelas vivas estão pagas
// (parcelas canceladas não seguram a quitação).
pub(crate) fn plan_fully_paid(installments: &[PaymentInstallment]) -> bool {
    let mut any_paid = false;
    for i in installments {
        match i.status {
            InstallmentStatus::Paid => any_paid = true,
            InstallmentStatus::Cancelled => {}
            _ => return false,
        }
    }
    any_paid
}

// Pedido cancelado não movimenta caixa: nem pagamento direto, nem plano.
pub(crate) fn ensure_order_open(status: OrderStatus) -> Result<(), AppError> {
    if status == OrderStatus::Cancelled {
        return Err(AppError::Conflict("order_cancelled"));
    }
    Ok(())
}

// Resultado da quitação de uma parcela: o chamador fica sabendo na hora
// se essa era a última parcela viva do pedido.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentSettlement {
    pub installment: PaymentInstallment,
    pub order_fully_paid: bool,
}

#[derive(Clone)]
pub struct PaymentService {
    repo: PaymentRepository,
    order_repo: OrderRepository,
    pool: PgPool,
}

impl PaymentService {
    pub fn new(repo: PaymentRepository, order_repo: OrderRepository, pool: PgPool) -> Self {
        Self {
            repo,
            order_repo,
            pool,
        }
    }

    // =========================================================================
    //  PARCELAMENTO
    // =========================================================================

    pub async fn create_installment_plan(
        &self,
        ctx: &TenantContext,
        order_id: Uuid,
        count: i32,
        first_due_date: NaiveDate,
        interval_days: Option<u64>,
    ) -> Result<Vec<PaymentInstallment>, AppError> {
        if !(MIN_INSTALLMENTS..=MAX_INSTALLMENTS).contains(&count) {
            return Err(AppError::InvalidInput("invalid_installment_count"));
        }

        let mut tx = self.serializable_tx().await?;

        let order = self.locked_order(&mut tx, ctx, order_id).await?;

        ensure_order_open(order.status)?;
        if order.payment_status == PaymentStatus::Paid {
            return Err(AppError::Conflict("order_already_paid"));
        }
        if self.repo.count_installments(&mut *tx, order.id).await? > 0 {
            return Err(AppError::Conflict("installment_plan_exists"));
        }

        let interval = interval_days.unwrap_or(DEFAULT_INTERVAL_DAYS);
        let amounts = split_amount(order.total_amount, count);

        let mut installments = Vec::with_capacity(amounts.len());
        for (idx, amount) in amounts.iter().enumerate() {
            let due_date = first_due_date
                .checked_add_days(Days::new(interval * idx as u64))
                .ok_or(AppError::InvalidInput("invalid_amount"))?;
            installments.push(
                self.repo
                    .insert_installment(
                        &mut *tx,
                        ctx.tenant_id,
                        order.id,
                        idx as i32 + 1,
                        *amount,
                        due_date,
                    )
                    .await?,
            );
        }

        self.order_repo
            .update_payment_status(&mut *tx, order.id, PaymentStatus::Installment)
            .await?;

        tx.commit().await?;

        Ok(installments)
    }

    // Quita (total ou parcialmente) uma parcela e reconcilia o pedido
    // na mesma transação. Parcela quitada é terminal: uma segunda
    // tentativa volta AlreadySettled sem tocar no caixa.
    pub async fn apply_installment_payment(
        &self,
        ctx: &TenantContext,
        installment_id: Uuid,
        amount: Decimal,
        method: PaymentMethod,
        notes: Option<&str>,
    ) -> Result<InstallmentSettlement, AppError> {
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidInput("invalid_amount"));
        }

        let mut tx = self.serializable_tx().await?;

        let installment = self
            .repo
            .find_installment_for_update(&mut *tx, ctx.tenant_id, installment_id)
            .await?
            .ok_or(AppError::NotFound("installment_not_found"))?;

        // Escopo de agência vem do pedido dono da parcela
        let order = self.locked_order(&mut tx, ctx, installment.order_id).await?;

        match installment.status {
            InstallmentStatus::Cancelled => {
                return Err(AppError::Conflict("installment_cancelled"));
            }
            s if s.is_settled() => return Err(AppError::AlreadySettled),
            _ => {}
        }

        self.repo
            .insert_payment(
                &mut *tx,
                ctx.tenant_id,
                order.id,
                Some(installment.id),
                amount,
                method,
                notes,
            )
            .await?;

        let paid_so_far = self
            .repo
            .sum_payments_for_installment(&mut *tx, installment.id)
            .await?;
        let new_status = settled_status(installment.amount, paid_so_far);
        let paid_at = new_status.is_settled().then(Utc::now);

        let installment = self
            .repo
            .update_installment_status(&mut *tx, installment.id, new_status, paid_at)
            .await?;

        // Última parcela quitada fecha o pedido
        let plan = self.repo.list_installments_for_order(&mut *tx, order.id).await?;
        let order_fully_paid = plan_fully_paid(&plan);
        if order_fully_paid {
            self.order_repo
                .update_payment_status(&mut *tx, order.id, PaymentStatus::Paid)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "💰 Parcela {}/{} do pedido #{} recebida ({})",
            installment.installment_number,
            plan.len(),
            order.reference,
            amount
        );

        Ok(InstallmentSettlement {
            installment,
            order_fully_paid,
        })
    }

    pub async fn list_installments(
        &self,
        ctx: &TenantContext,
        order_id: Uuid,
    ) -> Result<Vec<PaymentInstallment>, AppError> {
        let order = self.accessible_order(ctx, order_id).await?;

        let today = Utc::now().date_naive();
        let installments = self
            .repo
            .list_installments_for_order(&self.pool, order.id)
            .await?
            .into_iter()
            .map(|mut i| {
                // Exibe OVERDUE para parcelas abertas vencidas sem mutar o banco
                i.status = i.effective_status(today);
                i
            })
            .collect();

        Ok(installments)
    }

    // =========================================================================
    //  PAGAMENTO DIRETO
    // =========================================================================

    pub async fn pay_order(
        &self,
        ctx: &TenantContext,
        order_id: Uuid,
        amount: Decimal,
        method: PaymentMethod,
        notes: Option<&str>,
    ) -> Result<Order, AppError> {
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidInput("invalid_amount"));
        }

        let mut tx = self.serializable_tx().await?;

        let order = self.locked_order(&mut tx, ctx, order_id).await?;

        ensure_order_open(order.status)?;
        if order.payment_status == PaymentStatus::Paid {
            return Err(AppError::Conflict("order_already_paid"));
        }
        // Pedido parcelado só recebe via parcelas
        if order.payment_status == PaymentStatus::Installment
            || self.repo.count_installments(&mut *tx, order.id).await? > 0
        {
            return Err(AppError::Conflict("order_under_installment_plan"));
        }

        self.repo
            .insert_payment(&mut *tx, ctx.tenant_id, order.id, None, amount, method, notes)
            .await?;

        // Pagamento a maior é aceito e fica visível no extrato
        let total_paid = self.repo.sum_payments_for_order(&mut *tx, order.id).await?;
        let new_status = if total_paid >= order.total_amount {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Partial
        };

        let order = self
            .order_repo
            .update_payment_status(&mut *tx, order.id, new_status)
            .await?;

        tx.commit().await?;

        Ok(order)
    }

    pub async fn list_payments(
        &self,
        ctx: &TenantContext,
        order_id: Uuid,
    ) -> Result<Vec<Payment>, AppError> {
        let order = self.accessible_order(ctx, order_id).await?;
        self.repo.list_payments_for_order(&self.pool, order.id).await
    }

    // --- Helpers ---

    async fn serializable_tx(&self) -> Result<Transaction<'static, Postgres>, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    async fn locked_order(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        ctx: &TenantContext,
        order_id: Uuid,
    ) -> Result<Order, AppError> {
        let order = self
            .order_repo
            .find_by_id_for_update(&mut **tx, ctx.tenant_id, order_id)
            .await?
            .ok_or(AppError::NotFound("order_not_found"))?;

        ensure_access(ctx, order.tenant_id, order.agency_id, "order_not_found")?;

        Ok(order)
    }

    async fn accessible_order(
        &self,
        ctx: &TenantContext,
        order_id: Uuid,
    ) -> Result<Order, AppError> {
        let order = self
            .order_repo
            .find_by_id(&self.pool, ctx.tenant_id, order_id)
            .await?
            .ok_or(AppError::NotFound("order_not_found"))?;

        ensure_access(ctx, order.tenant_id, order.agency_id, "order_not_found")?;

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn installment(number: i32, status: InstallmentStatus) -> PaymentInstallment {
        PaymentInstallment {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            installment_number: number,
            amount: dec("100"),
            due_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            status,
            paid_at: None,
            created_at: DateTime::<Utc>::default(),
        }
    }

    #[test]
    fn split_distributes_rounding_remainder_to_last_part() {
        let parts = split_amount(dec("100"), 3);
        assert_eq!(parts, vec![dec("33.33"), dec("33.33"), dec("33.34")]);
        assert_eq!(parts.iter().copied().sum::<Decimal>(), dec("100"));
    }

    #[test]
    fn split_of_exact_division_is_uniform() {
        let parts = split_amount(dec("5500"), 2);
        assert_eq!(parts, vec![dec("2750.00"), dec("2750.00")]);
    }

    #[test]
    fn split_sum_always_matches_total() {
        for count in 2..=12 {
            let parts = split_amount(dec("9999.97"), count);
            assert_eq!(parts.len(), count as usize);
            assert_eq!(parts.iter().copied().sum::<Decimal>(), dec("9999.97"));
        }
    }

    #[test]
    fn full_amount_settles_the_installment() {
        assert_eq!(settled_status(dec("100"), dec("100")), InstallmentStatus::Paid);
        assert_eq!(settled_status(dec("100"), dec("150")), InstallmentStatus::Paid);
    }

    #[test]
    fn partial_amount_leaves_the_installment_open() {
        assert_eq!(settled_status(dec("100"), dec("40")), InstallmentStatus::Partial);
    }

    #[test]
    fn plan_closes_only_when_every_live_installment_is_paid() {
        let open = vec![
            installment(1, InstallmentStatus::Paid),
            installment(2, InstallmentStatus::Partial),
        ];
        assert!(!plan_fully_paid(&open));

        let closed = vec![
            installment(1, InstallmentStatus::Paid),
            installment(2, InstallmentStatus::Paid),
        ];
        assert!(plan_fully_paid(&closed));
    }

    #[test]
    fn cancelled_installments_do_not_block_closing() {
        let plan = vec![
            installment(1, InstallmentStatus::Paid),
            installment(2, InstallmentStatus::Cancelled),
        ];
        assert!(plan_fully_paid(&plan));
    }

    #[test]
    fn plan_with_no_paid_installment_is_not_closed() {
        let plan = vec![installment(1, InstallmentStatus::Cancelled)];
        assert!(!plan_fully_paid(&plan));
    }

    #[test]
    fn cancelled_order_accepts_no_money() {
        assert!(matches!(
            ensure_order_open(OrderStatus::Cancelled),
            Err(AppError::Conflict("order_cancelled"))
        ));
        for status in [
            OrderStatus::New,
            OrderStatus::Processing,
            OrderStatus::Ready,
            OrderStatus::Completed,
        ] {
            assert!(ensure_order_open(status).is_ok());
        }
    }
}
