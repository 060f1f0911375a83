// src/handlers/tenancy.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        response::{self, PageQuery, Pagination},
    },
    config::AppState,
    middleware::{auth::TenantContext, i18n::Locale},
    models::{
        auth::{Role, User},
        tenancy::Agency,
    },
};

// =============================================================================
//  AGÊNCIAS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgencyPayload {
    #[validate(length(min = 2, message = "min_length"))]
    #[schema(example = "Agência Centro")]
    pub name: String,

    #[validate(length(min = 2, message = "min_length"))]
    #[schema(example = "CENTRO")]
    pub code: String,

    pub address: Option<String>,

    #[serde(default)]
    pub is_main: bool,
}

// POST /api/agencies
#[utoipa::path(
    post,
    path = "/api/agencies",
    tag = "Tenancy",
    request_body = CreateAgencyPayload,
    responses(
        (status = 201, description = "Agência criada", body = Agency),
        (status = 400, description = "Código de agência já usado"),
        (status = 403, description = "Papel sem privilégio")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_agency(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Json(payload): Json<CreateAgencyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let agency = app_state
        .tenancy_service
        .create_agency(
            &ctx,
            &payload.name,
            &payload.code,
            payload.address.as_deref(),
            payload.is_main,
        )
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, response::ok(agency)))
}

// GET /api/agencies
#[utoipa::path(
    get,
    path = "/api/agencies",
    tag = "Tenancy",
    responses(
        (status = 200, description = "Agências do tenant", body = Vec<Agency>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_agencies(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let agencies = app_state
        .tenancy_service
        .list_agencies(&ctx)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, response::ok(agencies)))
}

// PATCH /api/agencies/{id}/main
#[utoipa::path(
    patch,
    path = "/api/agencies/{id}/main",
    tag = "Tenancy",
    params(("id" = Uuid, Path, description = "ID da agência")),
    responses(
        (status = 200, description = "Agência promovida a principal", body = Agency),
        (status = 404, description = "Agência não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_main_agency(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Path(agency_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let agency = app_state
        .tenancy_service
        .set_main_agency(&ctx, agency_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, response::ok(agency)))
}

// DELETE /api/agencies/{id}
#[utoipa::path(
    delete,
    path = "/api/agencies/{id}",
    tag = "Tenancy",
    params(("id" = Uuid, Path, description = "ID da agência")),
    responses(
        (status = 200, description = "Agência removida"),
        (status = 400, description = "Agência principal ou com usuários ativos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_agency(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Path(agency_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .tenancy_service
        .delete_agency(&ctx, agency_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, response::ok(())))
}

// =============================================================================
//  USUÁRIOS DO TENANT
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    pub agency_id: Option<Uuid>,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "agente@pressing.com")]
    pub email: String,

    #[validate(length(min = 6, message = "password_too_short"))]
    pub password: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Ana Souza")]
    pub full_name: String,

    pub phone: Option<String>,

    #[schema(example = "COLLECTOR")]
    pub role: Role,
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Tenancy",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 400, description = "E-mail já usado"),
        (status = 403, description = "Papel sem privilégio")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let user = app_state
        .tenancy_service
        .create_user(
            &ctx,
            payload.agency_id,
            &payload.email,
            payload.password,
            &payload.full_name,
            payload.phone.as_deref(),
            payload.role,
        )
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, response::ok(user)))
}

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Tenancy",
    params(PageQuery),
    responses(
        (status = 200, description = "Usuários visíveis no escopo do chamador", body = Vec<User>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (users, total) = app_state
        .tenancy_service
        .list_users(&ctx, page.limit(), page.offset())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let pagination = Pagination::new(page.page(), page.limit(), total);
    Ok((StatusCode::OK, response::ok_paginated(users, pagination)))
}

// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Tenancy",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário desativado (soft delete)"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: TenantContext,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .tenancy_service
        .soft_delete_user(&ctx, user_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, response::ok(())))
}
