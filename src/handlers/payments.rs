// src/handlers/payments.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::{error::ApiError, response},
    config::AppState,
    middleware::{auth::TenantContext, i18n::Locale},
    models::{
        orders::Order,
        payments::{Payment, PaymentInstallment, PaymentMethod},
    },
    services::payment_service::InstallmentSettlement,
};

// =============================================================================
//  PAGAMENTO DIRETO
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayOrderPayload {
    #[schema(value_type = String, example = "5500")]
    pub amount: Decimal,

    #[schema(example = "CASH")]
    pub method: PaymentMethod,

    pub notes: Option<String>,
}

// POST /api/orders/{id}/payments
#[utoipa::path(
    post,
    path = "/api/orders/{id}/payments",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    request_body = PayOrderPayload,
    responses(
        (status = 201, description = "Pagamento registrado; pedido reconciliado", body = Order),
        (status = 400, description = "Pedido já pago, cancelado ou sob parcelamento")
    ),
    security(("api_jwt" = []))
)]
pub async fn pay_order(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<PayOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state
        .payment_service
        .pay_order(
            &ctx,
            order_id,
            payload.amount,
            payload.method,
            payload.notes.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, response::ok(order)))
}

// GET /api/orders/{id}/payments
#[utoipa::path(
    get,
    path = "/api/orders/{id}/payments",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Extrato de pagamentos do pedido", body = Vec<Payment>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = app_state
        .payment_service
        .list_payments(&ctx, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, response::ok(payments)))
}

// =============================================================================
//  PARCELAMENTO
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstallmentPlanPayload {
    #[schema(example = 3)]
    pub count: i32,

    #[schema(value_type = String, format = Date, example = "2026-09-15")]
    pub first_due_date: NaiveDate,

    // Dias entre vencimentos (padrão: 30)
    #[schema(example = 30)]
    pub interval_days: Option<u64>,
}

// POST /api/orders/{id}/installments
#[utoipa::path(
    post,
    path = "/api/orders/{id}/installments",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    request_body = CreateInstallmentPlanPayload,
    responses(
        (status = 201, description = "Parcelamento criado (soma bate com o total)", body = Vec<PaymentInstallment>),
        (status = 400, description = "Quantidade fora de 2..12, pedido pago, cancelado ou plano já existente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_installment_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<CreateInstallmentPlanPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let installments = app_state
        .payment_service
        .create_installment_plan(
            &ctx,
            order_id,
            payload.count,
            payload.first_due_date,
            payload.interval_days,
        )
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, response::ok(installments)))
}

// GET /api/orders/{id}/installments
#[utoipa::path(
    get,
    path = "/api/orders/{id}/installments",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Parcelas do pedido (vencidas aparecem OVERDUE)", body = Vec<PaymentInstallment>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_installments(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let installments = app_state
        .payment_service
        .list_installments(&ctx, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, response::ok(installments)))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayInstallmentPayload {
    #[schema(value_type = String, example = "1833.33")]
    pub amount: Decimal,

    #[schema(example = "MOBILE_MONEY")]
    pub method: PaymentMethod,

    pub notes: Option<String>,
}

// POST /api/installments/{id}/pay
#[utoipa::path(
    post,
    path = "/api/installments/{id}/pay",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "ID da parcela")),
    request_body = PayInstallmentPayload,
    responses(
        (status = 200, description = "Parcela quitada ou parcialmente paga", body = InstallmentSettlement),
        (status = 400, description = "Parcela já quitada ou cancelada")
    ),
    security(("api_jwt" = []))
)]
pub async fn pay_installment(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Path(installment_id): Path<Uuid>,
    Json(payload): Json<PayInstallmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let settlement = app_state
        .payment_service
        .apply_installment_payment(
            &ctx,
            installment_id,
            payload.amount,
            payload.method,
            payload.notes.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, response::ok(settlement)))
}
