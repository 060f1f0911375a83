// src/handlers/catalog.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        response,
    },
    config::AppState,
    middleware::{auth::TenantContext, i18n::Locale},
    models::catalog::{Promo, PromoKind, ServiceKind, ServiceOffering},
};

// =============================================================================
//  SERVIÇOS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServicePayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Lavagem ao quilo")]
    pub name: String,

    #[schema(example = "KILO")]
    pub kind: ServiceKind,

    #[schema(value_type = String, example = "1000")]
    pub unit_price: Decimal,

    #[serde(default)]
    pub is_default: bool,
}

// POST /api/services
#[utoipa::path(
    post,
    path = "/api/services",
    tag = "Catalog",
    request_body = CreateServicePayload,
    responses(
        (status = 201, description = "Serviço criado", body = ServiceOffering),
        (status = 403, description = "Papel sem privilégio")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_service(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Json(payload): Json<CreateServicePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let service = app_state
        .catalog_service
        .create_service(
            &ctx,
            &payload.name,
            payload.kind,
            payload.unit_price,
            payload.is_default,
        )
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, response::ok(service)))
}

// GET /api/services
#[utoipa::path(
    get,
    path = "/api/services",
    tag = "Catalog",
    responses(
        (status = 200, description = "Serviços ativos do tenant", body = Vec<ServiceOffering>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_services(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let services = app_state
        .catalog_service
        .list_services(&ctx)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, response::ok(services)))
}

// =============================================================================
//  PROMOÇÕES
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromoPayload {
    #[validate(length(min = 2, message = "min_length"))]
    #[schema(example = "BIENVENUE10")]
    pub code: String,

    #[schema(example = "PERCENTAGE")]
    pub kind: PromoKind,

    #[schema(value_type = String, example = "10")]
    pub value: Decimal,

    #[schema(value_type = String, format = Date, example = "2026-01-01")]
    pub start_date: NaiveDate,

    #[schema(value_type = String, format = Date, example = "2026-03-31")]
    pub end_date: NaiveDate,
}

// POST /api/promos
#[utoipa::path(
    post,
    path = "/api/promos",
    tag = "Catalog",
    request_body = CreatePromoPayload,
    responses(
        (status = 201, description = "Promoção criada", body = Promo),
        (status = 400, description = "Código já existente ou janela inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_promo(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Json(payload): Json<CreatePromoPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let promo = app_state
        .catalog_service
        .create_promo(
            &ctx,
            &payload.code,
            payload.kind,
            payload.value,
            payload.start_date,
            payload.end_date,
        )
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, response::ok(promo)))
}

// GET /api/promos
#[utoipa::path(
    get,
    path = "/api/promos",
    tag = "Catalog",
    responses(
        (status = 200, description = "Promoções do tenant", body = Vec<Promo>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_promos(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let promos = app_state
        .catalog_service
        .list_promos(&ctx)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, response::ok(promos)))
}
